//! Persisted enable/order state.
//!
//! The [`StateTable`] remembers, per package id, whether the user enabled it
//! and where it sat in the load order. Tables are values: every mutation
//! returns a new table, which the orchestrator swaps in behind an `Arc`.
//!
//! Entries outlive the packages they describe. When a package disappears its
//! entry is kept after the active ones, so reinstalling it restores the
//! user's choice.

mod file;
mod memory;

pub use file::FileStateStore;
pub use memory::InMemoryStateStore;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by state stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

/// Loads and saves the [`StateTable`].
pub trait StateStore: Send + Sync {
    /// Where the table lives, for diagnostics.
    fn location(&self) -> String {
        "state store".to_string()
    }

    /// Returns `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<StateTable>, StoreError>;

    fn save(&self, table: &StateTable) -> Result<(), StoreError>;
}

/// Persisted choice for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub id: String,
    pub enabled: bool,
    pub order: usize,
}

impl StateEntry {
    pub fn new(id: impl Into<String>, enabled: bool, order: usize) -> Self {
        Self {
            id: id.into(),
            enabled,
            order,
        }
    }
}

/// Ordered list of [`StateEntry`] values; `order` always equals list position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTable {
    #[serde(default)]
    entries: Vec<StateEntry>,
}

impl StateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from entries in any order.
    ///
    /// Entries are sorted by their `order` (ties keep input order), later
    /// duplicates of an id are dropped, and `order` is renumbered.
    pub fn from_entries(mut entries: Vec<StateEntry>) -> Self {
        entries.sort_by_key(|e| e.order);

        let mut seen = HashSet::new();
        entries.retain(|e| seen.insert(e.id.clone()));

        let mut table = Self { entries };
        table.renumber();
        table
    }

    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&StateEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Unknown ids report `true`, the default for a newly seen package.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.get(id).is_none_or(|e| e.enabled)
    }

    /// Ids in saved order; this is the resolver's seed.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a table with the flag for `id` set.
    ///
    /// An unknown id gets a new entry at the end, so a package can be
    /// disabled before it is installed.
    pub fn with_enabled(&self, id: &str, enabled: bool) -> StateTable {
        let mut next = self.clone();
        match next.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => entry.enabled = enabled,
            None => {
                let order = next.entries.len();
                next.entries.push(StateEntry::new(id, enabled, order));
            }
        }
        next
    }

    /// Returns a table with `id` moved to `new_index`.
    ///
    /// Returns `None` when `id` is unknown or `new_index` is out of bounds.
    /// Ordering constraints are not consulted.
    pub fn with_moved(&self, id: &str, new_index: usize) -> Option<StateTable> {
        let current = self.position(id)?;
        if new_index >= self.entries.len() {
            return None;
        }

        let mut next = self.clone();
        let entry = next.entries.remove(current);
        next.entries.insert(new_index, entry);
        next.renumber();
        Some(next)
    }

    /// Merges a freshly resolved order into this table.
    ///
    /// Resolved ids come first, in resolved order, keeping their previous
    /// `enabled` flag (new ids are enabled). Entries for ids that were not
    /// resolved follow in their previous relative order.
    pub fn merged<S: AsRef<str>>(&self, resolved: &[S]) -> StateTable {
        let active: HashSet<&str> = resolved.iter().map(AsRef::as_ref).collect();

        let mut entries: Vec<StateEntry> = resolved
            .iter()
            .enumerate()
            .map(|(order, id)| {
                let id = id.as_ref();
                StateEntry::new(id, self.is_enabled(id), order)
            })
            .collect();

        entries.extend(
            self.entries
                .iter()
                .filter(|e| !active.contains(e.id.as_str()))
                .cloned(),
        );

        let mut table = StateTable { entries };
        table.renumber();
        table
    }

    fn renumber(&mut self) {
        for (order, entry) in self.entries.iter_mut().enumerate() {
            entry.order = order;
        }
    }
}
