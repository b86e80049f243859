//! Filesystem-backed package discovery.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use super::{PackageHandle, PackageSource, check_relative};

/// A package rooted at a directory.
#[derive(Debug, Clone)]
pub struct DirectoryPackage {
    name: String,
    root: PathBuf,
}

impl DirectoryPackage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self { name, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageHandle for DirectoryPackage {
    fn name(&self) -> &str {
        &self.name
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }

    fn open_file(&self, relative: &Path) -> io::Result<Option<Vec<u8>>> {
        check_relative(relative)?;

        match fs::read(self.root.join(relative)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// Treats every sub-directory of `mods_dir` as one package.
///
/// Packages are returned sorted by directory name. A missing `mods_dir`
/// yields no packages.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    mods_dir: PathBuf,
}

impl DirectorySource {
    pub fn new(mods_dir: impl Into<PathBuf>) -> Self {
        Self {
            mods_dir: mods_dir.into(),
        }
    }

    pub fn mods_dir(&self) -> &Path {
        &self.mods_dir
    }
}

impl PackageSource for DirectorySource {
    fn location(&self) -> String {
        self.mods_dir.display().to_string()
    }

    fn discover(&self) -> io::Result<Vec<Arc<dyn PackageHandle>>> {
        if !self.mods_dir.exists() {
            debug!("Mods directory {} does not exist", self.mods_dir.display());
            return Ok(Vec::new());
        }

        let mut roots = Vec::new();
        for entry in fs::read_dir(&self.mods_dir)? {
            let path = entry?.path();
            if path.is_dir() {
                roots.push(path);
            }
        }
        roots.sort();

        info!(
            "Discovered {} candidate packages in {}",
            roots.len(),
            self.mods_dir.display()
        );

        Ok(roots
            .into_iter()
            .map(|root| Arc::new(DirectoryPackage::new(root)) as Arc<dyn PackageHandle>)
            .collect())
    }
}
