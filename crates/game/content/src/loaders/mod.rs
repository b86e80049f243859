//! Content loaders for reading package content files.
//!
//! Each loader parses one RON document into definitions. [`ContentKinds`] is
//! the registration table that maps a content kind (and therefore a file
//! name such as `items.ron`) to the loader that imports it into a
//! [`Catalogue`](crate::Catalogue).

pub mod actors;
pub mod items;
pub mod kinds;
pub mod maps;

pub use actors::ActorLoader;
pub use items::ItemLoader;
pub use kinds::{ContentKind, ContentKinds, EntrySummary};
pub use maps::MapLoader;

use crate::catalogue::Definition;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// A parser for one kind of content document.
pub trait ContentLoader {
    type Definition: Definition;

    /// Parses a whole content document.
    fn parse(content: &str) -> LoadResult<Vec<Self::Definition>>;
}
