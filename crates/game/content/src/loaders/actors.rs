//! Actor template loader.

use serde::{Deserialize, Serialize};

use crate::definitions::ActorTemplate;
use crate::loaders::{ContentLoader, LoadResult};

/// Actor catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorCatalog {
    pub actors: Vec<ActorTemplate>,
}

/// Loader for actor templates from RON documents.
pub struct ActorLoader;

impl ContentLoader for ActorLoader {
    type Definition = ActorTemplate;

    fn parse(content: &str) -> LoadResult<Vec<ActorTemplate>> {
        let catalog: ActorCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse actor catalog RON: {}", e))?;

        if let Some(actor) = catalog.actors.iter().find(|a| a.max_health == 0) {
            anyhow::bail!("Actor '{}' must have max_health > 0", actor.id);
        }

        Ok(catalog.actors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_actor_templates_with_defaults() {
        let actors = ActorLoader::parse(
            r#"(actors: [
                (id: "goblin", name: "Goblin", max_health: 30, faction: Some("greenskins"), loot: ["potion"]),
            ])"#,
        )
        .unwrap();

        assert_eq!(actors[0].speed, 100);
        assert_eq!(actors[0].faction.as_deref(), Some("greenskins"));
        assert_eq!(actors[0].loot, vec!["potion".to_string()]);
    }

    #[test]
    fn rejects_zero_health() {
        let err = ActorLoader::parse(r#"(actors: [(id: "ghost", name: "Ghost", max_health: 0)])"#)
            .unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
