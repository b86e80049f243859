//! Registration table of importable content kinds.
//!
//! Content kinds are registered explicitly at startup. Each entry names the
//! content file it owns (`<name>.ron`) and carries monomorphized function
//! pointers that parse that file into the catalogue and describe what the
//! catalogue holds for it.

use crate::catalogue::{Catalogue, Definition, Provenance};
use crate::loaders::{ActorLoader, ContentLoader, ItemLoader, LoadResult, MapLoader};

/// Parses one content document and writes its definitions into a catalogue.
pub type ImportFn = fn(&str, &Catalogue, &Provenance) -> LoadResult<usize>;

/// Lists the catalogue entries owned by one content kind.
pub type DescribeFn = fn(&Catalogue) -> Vec<EntrySummary>;

/// Type-erased view of a catalogue entry, for diagnostics and tooling.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntrySummary {
    pub id: String,
    pub package: String,
    pub source_file: String,
    pub detail: String,
}

/// One registered content kind.
#[derive(Clone, Copy)]
pub struct ContentKind {
    name: &'static str,
    import: ImportFn,
    describe: DescribeFn,
}

impl ContentKind {
    /// Registers a loader under its definition's kind name.
    pub fn of<L: ContentLoader>() -> Self {
        Self {
            name: L::Definition::KIND,
            import: import_with::<L>,
            describe: describe_with::<L>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Content file owned by this kind, relative to a package's content dir.
    pub fn file_name(&self) -> String {
        format!("{}.ron", self.name)
    }

    /// Parses `content` and stores every definition, returning how many were written.
    ///
    /// The document is parsed completely before anything is written, so a
    /// malformed file contributes nothing.
    pub fn import(
        &self,
        content: &str,
        catalogue: &Catalogue,
        provenance: &Provenance,
    ) -> LoadResult<usize> {
        (self.import)(content, catalogue, provenance)
    }

    pub fn describe(&self, catalogue: &Catalogue) -> Vec<EntrySummary> {
        (self.describe)(catalogue)
    }
}

impl std::fmt::Debug for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentKind")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Ordered table of content kinds.
///
/// Kinds are imported in registration order within a package.
#[derive(Clone, Debug)]
pub struct ContentKinds {
    kinds: Vec<ContentKind>,
}

impl ContentKinds {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self { kinds: Vec::new() }
    }

    /// Creates the table with the built-in kinds: items, actors, maps.
    pub fn default_kinds() -> Self {
        let mut kinds = Self::new();
        kinds.register(ContentKind::of::<ItemLoader>());
        kinds.register(ContentKind::of::<ActorLoader>());
        kinds.register(ContentKind::of::<MapLoader>());
        kinds
    }

    /// Adds a kind, replacing any kind registered under the same name.
    pub fn register(&mut self, kind: ContentKind) -> &mut Self {
        match self.kinds.iter_mut().find(|k| k.name == kind.name) {
            Some(existing) => *existing = kind,
            None => self.kinds.push(kind),
        }
        self
    }

    /// Finds a kind by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&ContentKind> {
        self.kinds.iter().find(|k| k.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentKind> + '_ {
        self.kinds.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.kinds.iter().map(|k| k.name)
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl Default for ContentKinds {
    fn default() -> Self {
        Self::default_kinds()
    }
}

fn import_with<L: ContentLoader>(
    content: &str,
    catalogue: &Catalogue,
    provenance: &Provenance,
) -> LoadResult<usize> {
    let definitions = L::parse(content)?;
    let count = definitions.len();

    for definition in definitions {
        if let Some(previous) = catalogue.add_or_replace(definition, provenance.clone()) {
            tracing::debug!(
                kind = L::Definition::KIND,
                id = previous.id(),
                overridden = %previous.provenance(),
                by = %provenance,
                "Definition overridden"
            );
        }
    }

    Ok(count)
}

fn describe_with<L: ContentLoader>(catalogue: &Catalogue) -> Vec<EntrySummary> {
    catalogue
        .get_all::<L::Definition>()
        .iter()
        .map(|entry| EntrySummary {
            id: entry.id().to_string(),
            package: entry.package().to_string(),
            source_file: entry.source_file().to_string(),
            detail: format!("{:?}", entry.definition()),
        })
        .collect()
}
