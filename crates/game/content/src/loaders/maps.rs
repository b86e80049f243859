//! Map layout loader.

use serde::{Deserialize, Serialize};

use crate::definitions::MapDefinition;
use crate::loaders::{ContentLoader, LoadResult};

/// Map catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapCatalog {
    pub maps: Vec<MapDefinition>,
}

/// Loader for map layouts from RON documents.
///
/// Every map is shape-checked; one bad map rejects the whole document.
pub struct MapLoader;

impl ContentLoader for MapLoader {
    type Definition = MapDefinition;

    fn parse(content: &str) -> LoadResult<Vec<MapDefinition>> {
        let catalog: MapCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse map catalog RON: {}", e))?;

        for map in &catalog.maps {
            map.validate()
                .map_err(|e| anyhow::anyhow!("Invalid map '{}': {}", map.id, e))?;
        }

        Ok(catalog.maps)
    }
}
