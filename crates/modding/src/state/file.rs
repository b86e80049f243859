//! File-based StateStore implementation.

use std::fs;
use std::path::{Path, PathBuf};

use crate::state::{StateStore, StateTable, StoreError};

/// Stores the state table as a pretty-printed JSON document.
///
/// Writes go to a temporary sibling file first and are moved into place
/// with an atomic rename, so a crash mid-save leaves the old file intact.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStore for FileStateStore {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<Option<StateTable>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let json = fs::read_to_string(&self.path)?;
        let table: StateTable =
            serde_json::from_str(&json).map_err(|e| StoreError::Json(e.to_string()))?;
        let table = StateTable::from_entries(table.entries().to_vec());

        tracing::debug!(
            "Loaded {} state entries from {}",
            table.len(),
            self.path.display()
        );

        Ok(Some(table))
    }

    fn save(&self, table: &StateTable) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let json =
            serde_json::to_string_pretty(table).map_err(|e| StoreError::Json(e.to_string()))?;

        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &self.path)?;

        tracing::debug!(
            "Saved {} state entries to {}",
            table.len(),
            self.path.display()
        );

        Ok(())
    }
}
