//! Error types surfaced by a reload.
//!
//! Every [`LoadError`] names the package ids it concerns so a front-end can
//! point the user at the offending mod.
use thiserror::Error;

use crate::state::StoreError;

/// Classification of a [`LoadError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
pub enum LoadErrorKind {
    /// One candidate's manifest could not be read; the candidate is skipped.
    ManifestError,
    /// A manifest references an id that was not discovered; aborts the reload.
    MissingDependency,
    /// Ordering constraints form a cycle; aborts the reload.
    CircularDependency,
    /// Discovery or state persistence failed.
    IoError,
    /// The importer failed for one package; the remaining packages still import.
    ImportError,
}

impl LoadErrorKind {
    /// Whether this kind aborts the reload that raised it.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            LoadErrorKind::MissingDependency | LoadErrorKind::CircularDependency
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct LoadError {
    pub kind: LoadErrorKind,
    pub message: String,
    pub involved_ids: Vec<String>,
}

impl LoadError {
    pub fn new(
        kind: LoadErrorKind,
        message: impl Into<String>,
        involved_ids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            involved_ids: involved_ids.into_iter().map(Into::into).collect(),
        }
    }

    /// `package` is the manifest id when known, otherwise the package handle's name.
    pub fn manifest(package: &str, message: impl Into<String>) -> Self {
        Self::new(LoadErrorKind::ManifestError, message, [package])
    }

    pub fn missing_dependency(id: &str, missing: &str) -> Self {
        Self::new(
            LoadErrorKind::MissingDependency,
            format!("'{}' references '{}', which was not found", id, missing),
            [id, missing],
        )
    }

    pub fn circular_dependency(involved_ids: Vec<String>, message: impl Into<String>) -> Self {
        Self::new(LoadErrorKind::CircularDependency, message, involved_ids)
    }

    pub fn io(context: &str, source: &dyn std::error::Error) -> Self {
        Self::new(
            LoadErrorKind::IoError,
            format!("{}: {}", context, source),
            Vec::<String>::new(),
        )
    }

    pub fn import(package: &str, source: &anyhow::Error) -> Self {
        Self::new(
            LoadErrorKind::ImportError,
            format!("failed to import '{}': {:#}", package, source),
            [package],
        )
    }

    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }

    pub fn involves(&self, id: &str) -> bool {
        self.involved_ids.iter().any(|involved| involved == id)
    }
}

impl From<StoreError> for LoadError {
    fn from(error: StoreError) -> Self {
        LoadError::io("state store", &error)
    }
}

/// Errors raised while assembling a [`LoadOrchestrator`](crate::LoadOrchestrator).
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("load orchestrator requires a package source")]
    MissingSource,

    #[error("load orchestrator requires a content importer")]
    MissingImporter,

    #[error("error buffer must hold at least one error")]
    ZeroErrorBuffer,
}
