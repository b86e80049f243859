//! In-memory StateStore implementation for tests and local runs.

use std::sync::RwLock;

use crate::state::{StateStore, StateTable, StoreError};

/// Keeps the last saved table in memory.
#[derive(Default)]
pub struct InMemoryStateStore {
    table: RwLock<Option<StateTable>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts with a previously saved table.
    pub fn with_table(table: StateTable) -> Self {
        Self {
            table: RwLock::new(Some(table)),
        }
    }
}

impl StateStore for InMemoryStateStore {
    fn location(&self) -> String {
        "in-memory state store".to_string()
    }

    fn load(&self) -> Result<Option<StateTable>, StoreError> {
        let table = self.table.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(table.clone())
    }

    fn save(&self, table: &StateTable) -> Result<(), StoreError> {
        let mut stored = self.table.write().map_err(|_| StoreError::LockPoisoned)?;
        *stored = Some(table.clone());
        Ok(())
    }
}
