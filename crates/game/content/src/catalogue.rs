//! Type-indexed content registry populated by importers.
//!
//! Entries are keyed by `(definition type, id)` where the id comparison is
//! case-insensitive. A later [`Catalogue::add_or_replace`] for an existing key
//! replaces both the definition and its provenance, which is how a
//! high-priority package overrides content from a package loaded before it.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A content definition that can be stored in the [`Catalogue`].
pub trait Definition: Any + Send + Sync + fmt::Debug {
    /// Kind label used in logs and diagnostics (e.g. `"items"`).
    const KIND: &'static str;

    /// Identifier of this definition, unique per type ignoring case.
    fn id(&self) -> &str;
}

/// Where a catalogue entry came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Provenance {
    /// Id of the package that contributed the entry.
    pub package: String,
    /// Content file inside the package, relative to the package root.
    pub source_file: String,
}

impl Provenance {
    pub fn new(package: impl Into<String>, source_file: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            source_file: source_file.into(),
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.source_file)
    }
}

/// A stored definition together with its provenance.
#[derive(Debug)]
pub struct CatalogueEntry<T> {
    definition: T,
    provenance: Provenance,
}

impl<T: Definition> CatalogueEntry<T> {
    pub fn id(&self) -> &str {
        self.definition.id()
    }

    pub fn definition(&self) -> &T {
        &self.definition
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn package(&self) -> &str {
        &self.provenance.package
    }

    pub fn source_file(&self) -> &str {
        &self.provenance.source_file
    }
}

type StoredEntry = Arc<dyn Any + Send + Sync>;
type Table = HashMap<String, StoredEntry>;

/// Concurrent registry of imported content definitions.
///
/// Readers and writers may run on different threads. Each entry lives behind
/// an `Arc`, so replacing a key swaps a pointer under the write lock and a
/// reader holding an older entry keeps a complete value.
#[derive(Default)]
pub struct Catalogue {
    tables: RwLock<HashMap<TypeId, Table>>,
}

impl Catalogue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `definition`, replacing any entry of the same type whose id
    /// matches ignoring case.
    ///
    /// Returns the replaced entry, if there was one.
    pub fn add_or_replace<T: Definition>(
        &self,
        definition: T,
        provenance: Provenance,
    ) -> Option<Arc<CatalogueEntry<T>>> {
        let key = fold_id(definition.id());
        let entry: StoredEntry = Arc::new(CatalogueEntry {
            definition,
            provenance,
        });

        let previous = self
            .write()
            .entry(TypeId::of::<T>())
            .or_default()
            .insert(key, entry)?;

        let previous = previous.downcast::<CatalogueEntry<T>>().ok()?;
        tracing::trace!(
            kind = T::KIND,
            id = previous.id(),
            replaced = %previous.provenance,
            "Catalogue entry replaced"
        );
        Some(previous)
    }

    /// Looks up a definition by id, ignoring case.
    pub fn try_get<T: Definition>(&self, id: &str) -> Option<Arc<CatalogueEntry<T>>> {
        let tables = self.read();
        let entry = tables.get(&TypeId::of::<T>())?.get(&fold_id(id))?;
        Arc::clone(entry).downcast::<CatalogueEntry<T>>().ok()
    }

    /// Returns `true` if a definition of type `T` with this id exists.
    pub fn contains<T: Definition>(&self, id: &str) -> bool {
        self.read()
            .get(&TypeId::of::<T>())
            .is_some_and(|table| table.contains_key(&fold_id(id)))
    }

    /// Returns every definition of type `T`, sorted by case-folded id.
    pub fn get_all<T: Definition>(&self) -> Vec<Arc<CatalogueEntry<T>>> {
        let tables = self.read();
        let Some(table) = tables.get(&TypeId::of::<T>()) else {
            return Vec::new();
        };

        let mut keyed: Vec<(&String, &StoredEntry)> = table.iter().collect();
        keyed.sort_by(|a, b| a.0.cmp(b.0));

        keyed
            .into_iter()
            .filter_map(|(_, entry)| Arc::clone(entry).downcast::<CatalogueEntry<T>>().ok())
            .collect()
    }

    /// Number of definitions of type `T`.
    pub fn len_of<T: Definition>(&self) -> usize {
        self.read()
            .get(&TypeId::of::<T>())
            .map_or(0, |table| table.len())
    }

    /// Total number of definitions across all types.
    pub fn len(&self) -> usize {
        self.read().values().map(|table| table.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empties every type's table.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Replaces all content with the content of `other` in one step.
    ///
    /// Readers observe either the old content or the new content, never a
    /// mix of both.
    pub fn replace_with(&self, other: Catalogue) {
        let incoming = other
            .tables
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        *self.write() = incoming;
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Table>> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Table>> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Catalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalogue")
            .field("types", &self.read().len())
            .field("entries", &self.len())
            .finish()
    }
}

fn fold_id(id: &str) -> String {
    id.to_lowercase()
}
