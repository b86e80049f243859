//! Data-driven content definitions, the runtime catalogue, and loaders.
//!
//! This crate houses the content model that mod packages contribute to:
//! - Content definitions (items, actor templates, maps)
//! - The [`Catalogue`], a concurrent registry keyed by definition type and
//!   case-insensitive id, where later writes override earlier ones
//! - RON loaders and the [`ContentKinds`] registration table that maps a
//!   content file name to the loader that imports it
//!
//! The catalogue is shared explicitly as an `Arc<Catalogue>`; there is no
//! process-wide instance.

pub mod catalogue;
pub mod definitions;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalogue::{Catalogue, CatalogueEntry, Definition, Provenance};
pub use definitions::{ActorTemplate, ItemDefinition, ItemKind, MapDefinition};

#[cfg(feature = "loaders")]
pub use loaders::{ActorLoader, ContentKind, ContentKinds, EntrySummary, ItemLoader, MapLoader};
