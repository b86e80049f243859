//! Item catalog loader.

use serde::{Deserialize, Serialize};

use crate::definitions::ItemDefinition;
use crate::loaders::{ContentLoader, LoadResult};

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemDefinition>,
}

/// Loader for item catalogs from RON documents.
///
/// ```ron
/// (
///     items: [
///         (id: "potion", name: "Healing Potion", kind: Consumable(effect: "heal", potency: 25), max_stack: 99),
///         (id: "cellar_key", name: "Cellar Key", kind: Key(door: "cellar")),
///     ],
/// )
/// ```
pub struct ItemLoader;

impl ContentLoader for ItemLoader {
    type Definition = ItemDefinition;

    fn parse(content: &str) -> LoadResult<Vec<ItemDefinition>> {
        let catalog: ItemCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;

        Ok(catalog.items)
    }
}
