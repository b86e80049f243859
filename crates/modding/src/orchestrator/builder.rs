//! Builder for [`LoadOrchestrator`].

use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};

use game_content::Catalogue;
use tokio::sync::Mutex;

use super::{LoadOrchestrator, LoaderConfig};
use crate::discovery::PackageSource;
use crate::error::BuildError;
use crate::events::ErrorChannel;
use crate::import::ContentImporter;
use crate::manifest::{ManifestReader, TomlManifestReader};
use crate::state::{InMemoryStateStore, StateStore};

/// Assembles a [`LoadOrchestrator`].
///
/// A package source and a content importer are required. The manifest
/// reader defaults to [`TomlManifestReader`], the state store to an empty
/// [`InMemoryStateStore`] and the catalogue to a fresh one.
pub struct LoadOrchestratorBuilder {
    config: LoaderConfig,
    source: Option<Arc<dyn PackageSource>>,
    reader: Option<Arc<dyn ManifestReader>>,
    store: Option<Arc<dyn StateStore>>,
    importer: Option<Arc<dyn ContentImporter>>,
    catalogue: Option<Arc<Catalogue>>,
}

impl LoadOrchestratorBuilder {
    pub(super) fn new() -> Self {
        Self {
            config: LoaderConfig::default(),
            source: None,
            reader: None,
            store: None,
            importer: None,
            catalogue: None,
        }
    }

    /// Override loader configuration
    pub fn config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn auto_reload(mut self, auto_reload: bool) -> Self {
        self.config.auto_reload = auto_reload;
        self
    }

    /// Set the required package source
    pub fn source(self, source: impl PackageSource + 'static) -> Self {
        self.shared_source(Arc::new(source))
    }

    /// Set a package source the caller keeps a handle to
    pub fn shared_source(mut self, source: Arc<dyn PackageSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn manifest_reader(mut self, reader: impl ManifestReader + 'static) -> Self {
        self.reader = Some(Arc::new(reader));
        self
    }

    pub fn state_store(self, store: impl StateStore + 'static) -> Self {
        self.shared_state_store(Arc::new(store))
    }

    pub fn shared_state_store(mut self, store: Arc<dyn StateStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the required content importer
    pub fn importer(mut self, importer: impl ContentImporter + 'static) -> Self {
        self.importer = Some(Arc::new(importer));
        self
    }

    /// Share an existing catalogue instead of creating one
    pub fn catalogue(mut self, catalogue: Arc<Catalogue>) -> Self {
        self.catalogue = Some(catalogue);
        self
    }

    pub fn build(self) -> Result<LoadOrchestrator, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSource)?;
        let importer = self.importer.ok_or(BuildError::MissingImporter)?;
        if self.config.error_buffer == 0 {
            return Err(BuildError::ZeroErrorBuffer);
        }

        Ok(LoadOrchestrator {
            source,
            reader: self
                .reader
                .unwrap_or_else(|| Arc::new(TomlManifestReader::new())),
            store: self
                .store
                .unwrap_or_else(|| Arc::new(InMemoryStateStore::new())),
            importer,
            catalogue: self.catalogue.unwrap_or_default(),
            errors: ErrorChannel::with_capacity(self.config.error_buffer),
            config: self.config,
            state: RwLock::new(None),
            unsaved: AtomicBool::new(false),
            active: RwLock::new(Arc::from(Vec::new())),
            control: Mutex::new(()),
        })
    }
}
