//! Seam between the orchestrator and the content importer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use game_content::{Catalogue, ContentKinds, Provenance};
use tracing::debug;

use crate::orchestrator::LoadedPackage;

/// Imports one resolved, enabled package into a catalogue.
///
/// The orchestrator awaits each call before starting the next package, so an
/// importer never runs concurrently with itself. Importing the same package
/// twice must overwrite rather than duplicate.
#[async_trait]
pub trait ContentImporter: Send + Sync {
    /// Returns the number of definitions written.
    async fn import(&self, package: &LoadedPackage, catalogue: &Catalogue) -> anyhow::Result<usize>;
}

/// Imports `content/<kind>.ron` for every registered content kind.
///
/// Kinds are imported in registration order; a package may ship any subset
/// of the files.
pub struct CatalogueImporter {
    kinds: Arc<ContentKinds>,
    content_dir: PathBuf,
}

impl CatalogueImporter {
    pub const DEFAULT_CONTENT_DIR: &'static str = "content";

    pub fn new(kinds: Arc<ContentKinds>) -> Self {
        Self {
            kinds,
            content_dir: PathBuf::from(Self::DEFAULT_CONTENT_DIR),
        }
    }

    pub fn with_content_dir(mut self, content_dir: impl Into<PathBuf>) -> Self {
        self.content_dir = content_dir.into();
        self
    }

    pub fn kinds(&self) -> &ContentKinds {
        &self.kinds
    }
}

impl Default for CatalogueImporter {
    fn default() -> Self {
        Self::new(Arc::new(ContentKinds::default_kinds()))
    }
}

#[async_trait]
impl ContentImporter for CatalogueImporter {
    async fn import(&self, package: &LoadedPackage, catalogue: &Catalogue) -> anyhow::Result<usize> {
        let mut written = 0;

        for kind in self.kinds.iter() {
            let relative = self.content_dir.join(kind.file_name());
            let Some(bytes) = package
                .handle()
                .open_file(&relative)
                .with_context(|| format!("failed to read {}", relative.display()))?
            else {
                continue;
            };

            let content = String::from_utf8(bytes)
                .with_context(|| format!("{} is not valid UTF-8", relative.display()))?;
            let provenance = Provenance::new(package.id(), relative.display().to_string());
            let count = kind
                .import(&content, catalogue, &provenance)
                .with_context(|| format!("failed to import {}", relative.display()))?;

            debug!(
                package = package.id(),
                kind = kind.name(),
                count,
                "Imported content file"
            );
            written += count;
        }

        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{InMemoryPackage, PackageHandle};
    use crate::manifest::Manifest;
    use game_content::{ActorTemplate, ItemDefinition};

    fn loaded(package: InMemoryPackage) -> LoadedPackage {
        let handle: Arc<dyn PackageHandle> = Arc::new(package);
        LoadedPackage::new(Arc::new(Manifest::new("potions")), handle, 0, true)
    }

    #[tokio::test]
    async fn imports_every_present_kind_with_provenance() {
        let package = loaded(
            InMemoryPackage::new("potions-dir")
                .with_file(
                    "content/items.ron",
                    r#"(items: [(id: "Potion", name: "Potion", kind: Consumable(effect: "heal", potency: 10))])"#,
                )
                .with_file(
                    "content/actors.ron",
                    r#"(actors: [(id: "brewer", name: "Brewer", max_health: 12)])"#,
                ),
        );
        let catalogue = Catalogue::new();

        let written = CatalogueImporter::default()
            .import(&package, &catalogue)
            .await
            .unwrap();

        assert_eq!(written, 2);
        let potion = catalogue.try_get::<ItemDefinition>("potion").unwrap();
        assert_eq!(potion.package(), "potions");
        assert_eq!(potion.source_file(), "content/items.ron");
        assert!(catalogue.contains::<ActorTemplate>("BREWER"));
    }

    #[tokio::test]
    async fn package_without_content_imports_nothing() {
        let package = loaded(InMemoryPackage::new("bare").with_file("mod.toml", "id = \"bare\""));
        let catalogue = Catalogue::new();

        let written = CatalogueImporter::default()
            .import(&package, &catalogue)
            .await
            .unwrap();

        assert_eq!(written, 0);
        assert!(catalogue.is_empty());
    }

    #[tokio::test]
    async fn malformed_file_names_the_file() {
        let package = loaded(InMemoryPackage::new("broken").with_file("content/maps.ron", "(maps: ["));

        let error = CatalogueImporter::default()
            .import(&package, &Catalogue::new())
            .await
            .unwrap_err();

        assert!(format!("{:#}", error).contains("content/maps.ron"));
    }
}
