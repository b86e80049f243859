//! Package manifest parsing and validation.
//!
//! Handles parsing `mod.toml` manifests into [`Manifest`] records:
//!
//! ```toml
//! id = "better-potions"
//! name = "Better Potions"
//! version = "1.2.0"
//! requires = ["base"]
//! load_after = ["base"]
//! load_before = ["hardcore"]
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::discovery::PackageHandle;
use crate::error::LoadError;

/// Declared identity and ordering metadata of one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Unique package id
    pub id: String,
    /// Human-readable name
    #[serde(default)]
    pub name: Option<String>,
    /// Opaque version string (not interpreted)
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Packages that must be present
    #[serde(default, alias = "dependencies")]
    pub requires: BTreeSet<String>,
    /// Packages this one must load before
    #[serde(default, alias = "load-before")]
    pub load_before: BTreeSet<String>,
    /// Packages this one must load after
    #[serde(default, alias = "load-after")]
    pub load_after: BTreeSet<String>,
}

impl Manifest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            version: None,
            author: None,
            description: None,
            requires: BTreeSet::new(),
            load_before: BTreeSet::new(),
            load_after: BTreeSet::new(),
        }
    }

    pub fn requires<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.requires.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn load_before<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load_before.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn load_after<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.load_after.extend(ids.into_iter().map(Into::into));
        self
    }

    /// Name for display, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Every id this manifest references, in validation order:
    /// `requires`, then `load_before`, then `load_after`.
    pub fn references(&self) -> impl Iterator<Item = &str> + '_ {
        self.requires
            .iter()
            .chain(&self.load_before)
            .chain(&self.load_after)
            .map(String::as_str)
    }

    /// Checks the fields the resolver relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("package id cannot be empty".to_string());
        }
        if self.id.trim() != self.id {
            return Err(format!(
                "package id '{}' has leading or trailing whitespace",
                self.id
            ));
        }
        if let Some(blank) = self.references().find(|r| r.trim().is_empty()) {
            return Err(format!("package '{}' references a blank id {:?}", self.id, blank));
        }
        Ok(())
    }
}

/// Reads a [`Manifest`] from a package.
pub trait ManifestReader: Send + Sync {
    /// Fails with a `ManifestError` when the manifest is missing or malformed.
    fn read_manifest(&self, package: &dyn PackageHandle) -> Result<Manifest, LoadError>;
}

/// Reads `mod.toml` at the package root.
#[derive(Debug, Clone)]
pub struct TomlManifestReader {
    file_name: PathBuf,
}

impl TomlManifestReader {
    pub const DEFAULT_FILE_NAME: &'static str = "mod.toml";

    pub fn new() -> Self {
        Self::with_file_name(Self::DEFAULT_FILE_NAME)
    }

    pub fn with_file_name(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    pub fn file_name(&self) -> &Path {
        &self.file_name
    }

    /// Parses manifest text.
    pub fn parse(contents: &str) -> Result<Manifest, String> {
        let manifest: Manifest = toml::from_str(contents)
            .map_err(|e| format!("failed to parse manifest TOML: {}", e))?;
        manifest.validate()?;
        Ok(manifest)
    }
}

impl Default for TomlManifestReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestReader for TomlManifestReader {
    fn read_manifest(&self, package: &dyn PackageHandle) -> Result<Manifest, LoadError> {
        let bytes = package
            .open_file(&self.file_name)
            .map_err(|e| {
                LoadError::manifest(
                    package.name(),
                    format!(
                        "failed to read {} in {}: {}",
                        self.file_name.display(),
                        package.location(),
                        e
                    ),
                )
            })?
            .ok_or_else(|| {
                LoadError::manifest(
                    package.name(),
                    format!(
                        "no {} found in {}",
                        self.file_name.display(),
                        package.location()
                    ),
                )
            })?;

        let contents = String::from_utf8(bytes).map_err(|_| {
            LoadError::manifest(
                package.name(),
                format!("{} is not valid UTF-8", self.file_name.display()),
            )
        })?;

        Self::parse(&contents).map_err(|message| {
            LoadError::manifest(
                package.name(),
                format!("{} ({})", message, package.location()),
            )
        })
    }
}
