#![allow(dead_code)]

use std::sync::Arc;

use modding::{
    CatalogueImporter, InMemoryPackage, InMemorySource, InMemoryStateStore, LoadOrchestrator,
    StateStore,
};

/// Package whose directory name matches its manifest id.
pub fn package(id: &str, manifest_extra: &str) -> InMemoryPackage {
    InMemoryPackage::new(id).with_file("mod.toml", format!("id = \"{id}\"\n{manifest_extra}"))
}

/// Adds `content/items.ron` holding one utility item per `(id, value)` pair.
pub fn with_items(package: InMemoryPackage, items: &[(&str, u32)]) -> InMemoryPackage {
    let entries: Vec<String> = items
        .iter()
        .map(|(id, value)| format!("(id: \"{id}\", name: \"{id}\", kind: Utility, value: {value})"))
        .collect();
    package.with_file("content/items.ron", format!("(items: [{}])", entries.join(", ")))
}

pub fn orchestrator(
    source: &Arc<InMemorySource>,
    store: Arc<dyn StateStore>,
) -> LoadOrchestrator {
    LoadOrchestrator::builder()
        .shared_source(source.clone())
        .shared_state_store(store)
        .importer(CatalogueImporter::default())
        .build()
        .expect("orchestrator should build")
}

pub fn in_memory(source: &Arc<InMemorySource>) -> LoadOrchestrator {
    orchestrator(source, Arc::new(InMemoryStateStore::new()))
}

pub fn active_ids(orchestrator: &LoadOrchestrator) -> Vec<String> {
    orchestrator
        .active_packages()
        .iter()
        .map(|p| p.id().to_string())
        .collect()
}
