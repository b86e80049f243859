//! Load orchestrator.
//!
//! [`LoadOrchestrator`] owns one reload pipeline:
//!
//! ```text
//! discover ─▶ read manifests ─▶ resolve ─▶ merge + save state ─▶ import (in order) ─▶ publish
//!                  │                 │                                  │
//!                  ▼                 ▼                                  ▼
//!            ManifestError    Missing/Circular                     ImportError
//!            (skip package)   (abort, keep old)                 (skip package)
//! ```
//!
//! Every error is published on the [`ErrorChannel`] as it happens. A reload
//! that fails resolution leaves the active package list, the catalogue and
//! the saved state exactly as they were.

mod builder;
mod config;
mod package;

pub use builder::LoadOrchestratorBuilder;
pub use config::LoaderConfig;
pub use package::{LoadedPackage, ReloadSummary};

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use game_content::Catalogue;
use tokio::sync::{Mutex, broadcast};
use tracing::{debug, error, info, warn};

use crate::discovery::{PackageHandle, PackageSource};
use crate::error::LoadError;
use crate::events::ErrorChannel;
use crate::import::ContentImporter;
use crate::manifest::{Manifest, ManifestReader};
use crate::resolver::DependencyResolver;
use crate::state::{StateStore, StateTable};

/// A discovered package whose manifest was read successfully.
struct Candidate {
    manifest: Arc<Manifest>,
    handle: Arc<dyn PackageHandle>,
}

/// Discovers, orders and imports mod packages.
///
/// The state table is read from the store at the start of every reload and
/// every state mutation, and each change is written back. A store that
/// cannot be read is never overwritten: the reload proceeds on the
/// in-memory table and mutations are refused. After a failed save the
/// in-memory table stays ahead of the store until a save succeeds.
/// Reloads and state mutations are serialized; readers of
/// [`active_packages`](Self::active_packages) and the catalogue are never
/// blocked by an import in progress.
pub struct LoadOrchestrator {
    source: Arc<dyn PackageSource>,
    reader: Arc<dyn ManifestReader>,
    store: Arc<dyn StateStore>,
    importer: Arc<dyn ContentImporter>,
    catalogue: Arc<Catalogue>,
    errors: ErrorChannel,
    config: LoaderConfig,

    state: RwLock<Option<Arc<StateTable>>>,
    unsaved: AtomicBool,
    active: RwLock<Arc<[LoadedPackage]>>,
    control: Mutex<()>,
}

impl LoadOrchestrator {
    pub fn builder() -> LoadOrchestratorBuilder {
        LoadOrchestratorBuilder::new()
    }

    /// Shared catalogue populated by reloads.
    pub fn catalogue(&self) -> &Arc<Catalogue> {
        &self.catalogue
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn error_channel(&self) -> &ErrorChannel {
        &self.errors
    }

    /// Receives every [`LoadError`] raised after this call.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<LoadError> {
        self.errors.subscribe()
    }

    /// Packages of the last successful reload, in load order.
    pub fn active_packages(&self) -> Arc<[LoadedPackage]> {
        Arc::clone(&self.active.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Snapshot of the enable/order state.
    ///
    /// Returns the in-memory table once one exists. Before that the store is
    /// read, and an unreadable store yields an empty table.
    pub fn state_table(&self) -> Arc<StateTable> {
        match self.cached_state() {
            Some(table) => table,
            None => self.read_state().unwrap_or_default(),
        }
    }

    /// Whether `id` is enabled. Unknown ids report `true`.
    pub fn is_enabled(&self, id: &str) -> bool {
        self.state_table().is_enabled(id)
    }

    /// Rediscovers all packages, resolves their order and reimports them.
    ///
    /// Returns the fatal error on failure; non-fatal errors are listed in the
    /// summary. All errors are also published on the error channel.
    pub async fn reload(&self) -> Result<ReloadSummary, LoadError> {
        let _guard = self.control.lock().await;
        self.reload_locked().await
    }

    /// Enables or disables a package and persists the choice.
    ///
    /// Fails with `IoError`, changing nothing, when the store cannot be read.
    /// Takes effect on the next reload (immediately when
    /// [`LoaderConfig::auto_reload`] is set).
    pub async fn enable(&self, id: &str, enabled: bool) -> Result<(), LoadError> {
        {
            let _guard = self.control.lock().await;
            let next = self.read_state()?.with_enabled(id, enabled);
            info!(target: "modding::state", id, enabled, "Package toggled");
            self.persist(Arc::new(next))?;
        }

        if self.config.auto_reload {
            self.reload().await?;
        }
        Ok(())
    }

    /// Moves a package to `new_index` in the saved order and persists it.
    ///
    /// Returns `Ok(false)` without changing anything when `id` is unknown or
    /// `new_index` is out of bounds. The move is not checked against ordering
    /// constraints; the next reload may place the package elsewhere.
    pub async fn move_package(&self, id: &str, new_index: usize) -> Result<bool, LoadError> {
        {
            let _guard = self.control.lock().await;
            let Some(next) = self.read_state()?.with_moved(id, new_index) else {
                debug!(target: "modding::state", id, new_index, "Move ignored");
                return Ok(false);
            };
            info!(target: "modding::state", id, new_index, "Package moved");
            self.persist(Arc::new(next))?;
        }

        if self.config.auto_reload {
            self.reload().await?;
        }
        Ok(true)
    }

    async fn reload_locked(&self) -> Result<ReloadSummary, LoadError> {
        let mut errors = Vec::new();

        let handles = self
            .source
            .discover()
            .map_err(|e| {
                let context = format!("package discovery failed in {}", self.source.location());
                self.report(LoadError::io(&context, &e))
            })?;
        let candidates = self.read_candidates(handles, &mut errors);

        let (previous, store_readable) = match self.read_state() {
            Ok(table) => (table, true),
            Err(e) => {
                errors.push(e);
                (self.cached_state().unwrap_or_default(), false)
            }
        };

        let manifests: Vec<&Manifest> = candidates.iter().map(|c| c.manifest.as_ref()).collect();
        let seed: Vec<&str> = previous.ids().collect();
        let order = DependencyResolver::resolve(&manifests, &seed).map_err(|e| self.report(e))?;

        let resolved: Vec<&str> = order.iter().map(|&i| manifests[i].id.as_str()).collect();
        let table = Arc::new(previous.merged(&resolved));
        if store_readable {
            if let Err(e) = self.persist(Arc::clone(&table)) {
                errors.push(e);
            }
        } else {
            warn!(
                target: "modding::state",
                location = %self.store.location(),
                "State store unreadable, keeping this order in memory only"
            );
            *self.write_state() = Some(Arc::clone(&table));
        }

        let packages: Vec<LoadedPackage> = order
            .iter()
            .enumerate()
            .map(|(position, &i)| {
                let candidate = &candidates[i];
                LoadedPackage::new(
                    Arc::clone(&candidate.manifest),
                    Arc::clone(&candidate.handle),
                    position,
                    table.is_enabled(&candidate.manifest.id),
                )
            })
            .collect();

        let staging = Catalogue::new();
        let mut imported = Vec::new();
        let mut definitions = 0;
        for package in &packages {
            if !package.is_enabled() {
                debug!(target: "modding::reload", id = package.id(), "Skipping disabled package");
                continue;
            }

            match self.importer.import(package, &staging).await {
                Ok(count) => {
                    debug!(target: "modding::reload", id = package.id(), count, "Package imported");
                    definitions += count;
                    imported.push(package.id().to_string());
                }
                Err(e) => errors.push(self.report(LoadError::import(package.id(), &e))),
            }
        }

        self.catalogue.replace_with(staging);
        *self.write_active() = packages.into();

        info!(
            target: "modding::reload",
            packages = resolved.len(),
            imported = imported.len(),
            definitions,
            errors = errors.len(),
            "Reload complete"
        );

        Ok(ReloadSummary {
            order: resolved.iter().map(|id| id.to_string()).collect(),
            imported,
            definitions,
            errors,
        })
    }

    /// Reads every manifest, dropping unreadable candidates and duplicate ids.
    fn read_candidates(
        &self,
        handles: Vec<Arc<dyn PackageHandle>>,
        errors: &mut Vec<LoadError>,
    ) -> Vec<Candidate> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::with_capacity(handles.len());

        for handle in handles {
            let manifest = match self.reader.read_manifest(handle.as_ref()) {
                Ok(manifest) => manifest,
                Err(e) => {
                    errors.push(self.report(e));
                    continue;
                }
            };

            if !seen.insert(manifest.id.clone()) {
                errors.push(self.report(LoadError::manifest(
                    &manifest.id,
                    format!(
                        "duplicate package id '{}' at {}; keeping the first one discovered",
                        manifest.id,
                        handle.location()
                    ),
                )));
                continue;
            }

            debug!(
                target: "modding::reload",
                id = %manifest.id,
                location = %handle.location(),
                "Manifest read"
            );
            candidates.push(Candidate {
                manifest: Arc::new(manifest),
                handle,
            });
        }

        candidates
    }

    /// Reads the saved table from the store.
    ///
    /// While a failed save leaves the in-memory table ahead of the store, the
    /// in-memory table is returned instead. A store with nothing saved yields
    /// the in-memory table, or an empty one.
    fn read_state(&self) -> Result<Arc<StateTable>, LoadError> {
        if self.unsaved.load(Ordering::Acquire)
            && let Some(table) = self.cached_state()
        {
            return Ok(table);
        }

        let loaded = self.store.load().map_err(|e| {
            let context = format!("failed to read mod state from {}", self.store.location());
            self.report(LoadError::io(&context, &e))
        })?;

        let table = match loaded {
            Some(table) => Arc::new(table),
            None => self.cached_state().unwrap_or_default(),
        };
        *self.write_state() = Some(Arc::clone(&table));
        Ok(table)
    }

    /// Swaps in a new table and writes it to the store.
    ///
    /// The in-memory table is replaced even when the save fails.
    fn persist(&self, table: Arc<StateTable>) -> Result<(), LoadError> {
        *self.write_state() = Some(Arc::clone(&table));

        match self.store.save(&table) {
            Ok(()) => {
                self.unsaved.store(false, Ordering::Release);
                Ok(())
            }
            Err(e) => {
                self.unsaved.store(true, Ordering::Release);
                let context = format!("failed to save mod state to {}", self.store.location());
                Err(self.report(LoadError::io(&context, &e)))
            }
        }
    }

    /// Logs and publishes an error, handing it back for the caller.
    fn report(&self, error: LoadError) -> LoadError {
        if error.is_fatal() {
            error!(
                target: "modding::reload",
                kind = %error.kind,
                ids = ?error.involved_ids,
                "{}", error.message
            );
        } else {
            warn!(
                target: "modding::reload",
                kind = %error.kind,
                ids = ?error.involved_ids,
                "{}", error.message
            );
        }

        self.errors.publish(error.clone());
        error
    }

    fn cached_state(&self) -> Option<Arc<StateTable>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Option<Arc<StateTable>>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_active(&self) -> RwLockWriteGuard<'_, Arc<[LoadedPackage]>> {
        self.active.write().unwrap_or_else(PoisonError::into_inner)
    }
}
