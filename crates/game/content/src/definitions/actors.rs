//! Actor templates (players and NPC archetypes).

use serde::{Deserialize, Serialize};

use crate::catalogue::Definition;

/// Template used to spawn an actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorTemplate {
    pub id: String,
    pub name: String,
    pub max_health: u32,
    #[serde(default)]
    pub max_energy: u32,
    #[serde(default = "default_speed")]
    pub speed: u16,
    #[serde(default)]
    pub faction: Option<String>,
    /// Item ids dropped on defeat.
    #[serde(default)]
    pub loot: Vec<String>,
}

impl ActorTemplate {
    pub fn new(id: impl Into<String>, name: impl Into<String>, max_health: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_health,
            max_energy: 0,
            speed: default_speed(),
            faction: None,
            loot: Vec::new(),
        }
    }
}

impl Definition for ActorTemplate {
    const KIND: &'static str = "actors";

    fn id(&self) -> &str {
        &self.id
    }
}

fn default_speed() -> u16 {
    100
}
