//! Item definitions.

use serde::{Deserialize, Serialize};

use crate::catalogue::Definition;

/// Static item definition.
///
/// Stack limits follow item kind by convention:
/// - Consumables: max_stack=99 (stackable)
/// - Keys: max_stack=1 (unique keys don't stack)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    #[serde(default = "default_max_stack")]
    pub max_stack: u16,
    /// Base trade value.
    #[serde(default)]
    pub value: u32,
}

impl ItemDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        let max_stack = match kind {
            ItemKind::Consumable { .. } => 99,
            _ => 1,
        };
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            max_stack,
            value: 0,
        }
    }
}

impl Definition for ItemDefinition {
    const KIND: &'static str = "items";

    fn id(&self) -> &str {
        &self.id
    }
}

/// Item type with type-specific data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Equippable weapon.
    Weapon { damage: u16 },

    /// Equippable armor.
    Armor { defense: u16 },

    /// Consumable item (potions, scrolls, food).
    Consumable { effect: String, potency: u16 },

    /// Key for unlocking a named door.
    Key { door: String },

    /// Utility item.
    Utility,
}

fn default_max_stack() -> u16 {
    1
}
