//! Load-order resolution and content registration for mod packages.
//!
//! This crate discovers content packages, validates their declared
//! dependencies, computes a deterministic load order, persists the user's
//! enable/reorder choices, and drives an importer over every enabled package
//! in order so later packages override earlier ones in the shared
//! [`Catalogue`](game_content::Catalogue).
//!
//! Modules are organized by responsibility:
//! - [`manifest`] describes a package and reads it from `mod.toml`
//! - [`discovery`] enumerates candidate packages
//! - [`resolver`] orders manifests and detects missing references and cycles
//! - [`state`] holds the persisted enable/order table and its stores
//! - [`import`] is the seam to the content importer
//! - [`events`] carries load errors to subscribers
//! - [`orchestrator`] ties everything together behind [`LoadOrchestrator`]
pub mod discovery;
pub mod error;
pub mod events;
pub mod import;
pub mod manifest;
pub mod orchestrator;
pub mod resolver;
pub mod state;

pub use discovery::{
    DirectoryPackage, DirectorySource, InMemoryPackage, InMemorySource, PackageHandle,
    PackageSource,
};
pub use error::{BuildError, LoadError, LoadErrorKind};
pub use events::ErrorChannel;
pub use import::{CatalogueImporter, ContentImporter};
pub use manifest::{Manifest, ManifestReader, TomlManifestReader};
pub use orchestrator::{
    LoadOrchestrator, LoadOrchestratorBuilder, LoadedPackage, LoaderConfig, ReloadSummary,
};
pub use resolver::DependencyResolver;
pub use state::{
    FileStateStore, InMemoryStateStore, StateEntry, StateStore, StateTable, StoreError,
};
