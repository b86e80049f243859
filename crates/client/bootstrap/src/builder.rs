//! Builds the load orchestrator used by front-ends.
use std::sync::Arc;

use anyhow::{Context, Result};
use game_content::{Catalogue, ContentKinds};
use modding::{CatalogueImporter, DirectorySource, FileStateStore, LoadOrchestrator};
use tracing::info;

use crate::config::BootstrapConfig;

/// Assembles an orchestrator over a mods directory and a state file.
pub struct LoaderBuilder {
    config: BootstrapConfig,
    kinds: ContentKinds,
    catalogue: Option<Arc<Catalogue>>,
}

impl LoaderBuilder {
    pub fn new(config: BootstrapConfig) -> Self {
        Self {
            config,
            kinds: ContentKinds::default_kinds(),
            catalogue: None,
        }
    }

    /// Replace the content kinds the importer understands.
    pub fn content_kinds(mut self, kinds: ContentKinds) -> Self {
        self.kinds = kinds;
        self
    }

    /// Share an existing catalogue with the orchestrator.
    pub fn catalogue(mut self, catalogue: Arc<Catalogue>) -> Self {
        self.catalogue = Some(catalogue);
        self
    }

    pub fn build(self) -> Result<LoaderSetup> {
        let importer = CatalogueImporter::new(Arc::new(self.kinds));
        let mut builder = LoadOrchestrator::builder()
            .config(self.config.loader.clone())
            .source(DirectorySource::new(&self.config.mods_dir))
            .state_store(FileStateStore::new(&self.config.state_file))
            .importer(importer);

        if let Some(catalogue) = self.catalogue {
            builder = builder.catalogue(catalogue);
        }

        let orchestrator = builder
            .build()
            .context("Failed to assemble load orchestrator")?;

        info!(
            mods_dir = %self.config.mods_dir.display(),
            state_file = %self.config.state_file.display(),
            "Load orchestrator ready"
        );

        Ok(LoaderSetup {
            config: self.config,
            orchestrator,
        })
    }
}

pub struct LoaderSetup {
    pub config: BootstrapConfig,
    pub orchestrator: LoadOrchestrator,
}
