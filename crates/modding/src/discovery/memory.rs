//! In-memory packages for tests and embedded content.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::{PackageHandle, PackageSource, check_relative};

/// A package whose files live in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPackage {
    name: String,
    files: HashMap<PathBuf, Vec<u8>>,
}

impl InMemoryPackage {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            files: HashMap::new(),
        }
    }

    /// Adds (or replaces) a file.
    pub fn with_file(mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.into(), contents.into());
        self
    }
}

impl PackageHandle for InMemoryPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> String {
        format!("memory://{}", self.name)
    }

    fn open_file(&self, relative: &Path) -> io::Result<Option<Vec<u8>>> {
        check_relative(relative)?;
        Ok(self.files.get(relative).cloned())
    }
}

/// A mutable set of in-memory packages.
///
/// Packages can be added or removed between reloads to simulate installs.
#[derive(Default)]
pub struct InMemorySource {
    packages: RwLock<Vec<Arc<dyn PackageHandle>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_packages(packages: impl IntoIterator<Item = InMemoryPackage>) -> Self {
        let source = Self::new();
        for package in packages {
            source.insert(package);
        }
        source
    }

    /// Adds a package, replacing one with the same name.
    pub fn insert(&self, package: impl PackageHandle + 'static) {
        let mut packages = self
            .packages
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        packages.retain(|p| p.name() != package.name());
        packages.push(Arc::new(package));
    }

    /// Removes a package by name, returning whether it was present.
    pub fn remove(&self, name: &str) -> bool {
        let mut packages = self
            .packages
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = packages.len();
        packages.retain(|p| p.name() != name);
        packages.len() != before
    }
}

impl PackageSource for InMemorySource {
    fn location(&self) -> String {
        "in-memory package source".to_string()
    }

    fn discover(&self) -> io::Result<Vec<Arc<dyn PackageHandle>>> {
        let packages = self
            .packages
            .read()
            .map_err(|_| io::Error::other("package source lock was poisoned"))?;
        Ok(packages.clone())
    }
}
