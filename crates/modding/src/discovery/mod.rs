//! Package discovery.
//!
//! A [`PackageSource`] enumerates candidate packages; each candidate is an
//! opaque [`PackageHandle`] that can open files relative to its root. The
//! core never touches the filesystem itself: [`DirectorySource`] is the
//! filesystem-backed implementation and [`InMemorySource`] backs tests and
//! embedded content.

mod directory;
mod memory;

pub use directory::{DirectoryPackage, DirectorySource};
pub use memory::{InMemoryPackage, InMemorySource};

use std::fmt;
use std::io;
use std::path::{Component, Path};
use std::sync::Arc;

/// One discovered package.
pub trait PackageHandle: Send + Sync + fmt::Debug {
    /// Identity of the handle within its source (e.g. the directory name).
    ///
    /// Used to name the package in errors before its manifest is read.
    fn name(&self) -> &str;

    /// Human-readable location for diagnostics.
    fn location(&self) -> String {
        self.name().to_string()
    }

    /// Reads a file relative to the package root.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    fn open_file(&self, relative: &Path) -> io::Result<Option<Vec<u8>>>;
}

/// Enumerates candidate packages.
pub trait PackageSource: Send + Sync {
    /// Where packages are discovered from, for diagnostics.
    fn location(&self) -> String {
        "package source".to_string()
    }

    /// Enumeration order is not significant; resolution is seeded separately.
    fn discover(&self) -> io::Result<Vec<Arc<dyn PackageHandle>>>;
}

/// Rejects absolute paths and parent-directory components.
pub(crate) fn check_relative(relative: &Path) -> io::Result<()> {
    let escapes = relative.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });

    if escapes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("path {} escapes the package root", relative.display()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_paths_must_stay_inside_package() {
        assert!(check_relative(Path::new("content/items.ron")).is_ok());
        assert!(check_relative(Path::new("../other/mod.toml")).is_err());
        assert!(check_relative(Path::new("/etc/passwd")).is_err());
    }
}
