//! Types describing the outcome of a reload.

use std::fmt;
use std::sync::Arc;

use crate::discovery::PackageHandle;
use crate::error::LoadError;
use crate::manifest::Manifest;

/// A package placed in the active load order.
///
/// Replaced wholesale by every successful reload.
#[derive(Clone)]
pub struct LoadedPackage {
    manifest: Arc<Manifest>,
    handle: Arc<dyn PackageHandle>,
    order: usize,
    enabled: bool,
}

impl LoadedPackage {
    pub fn new(
        manifest: Arc<Manifest>,
        handle: Arc<dyn PackageHandle>,
        order: usize,
        enabled: bool,
    ) -> Self {
        Self {
            manifest,
            handle,
            order,
            enabled,
        }
    }

    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn handle(&self) -> &Arc<dyn PackageHandle> {
        &self.handle
    }

    /// 0-based position in the resolved order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Whether the package was enabled when this order was activated.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl fmt::Debug for LoadedPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedPackage")
            .field("id", &self.manifest.id)
            .field("order", &self.order)
            .field("enabled", &self.enabled)
            .field("location", &self.handle.location())
            .finish()
    }
}

/// Result of a successful reload.
#[derive(Debug, Clone, Default)]
pub struct ReloadSummary {
    /// Every resolved package id, in load order.
    pub order: Vec<String>,
    /// Ids that were imported, in import order.
    pub imported: Vec<String>,
    /// Definitions written across all imports.
    pub definitions: usize,
    /// Non-fatal errors raised during the run.
    pub errors: Vec<LoadError>,
}

impl ReloadSummary {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
