mod common;

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use common::{active_ids, in_memory, orchestrator, package, with_items};
use game_content::ItemDefinition;
use modding::{
    InMemorySource, InMemoryStateStore, LoadErrorKind, PackageHandle, PackageSource, StateEntry,
    StateStore, StateTable, StoreError,
};

/// Accepts loads but refuses every save.
struct ReadOnlyStore;

impl StateStore for ReadOnlyStore {
    fn load(&self) -> Result<Option<StateTable>, StoreError> {
        Ok(None)
    }

    fn save(&self, _table: &StateTable) -> Result<(), StoreError> {
        Err(StoreError::Io(io::Error::other("disk full")))
    }
}

/// Fails its first load, then behaves like an in-memory store.
struct FlakyStore {
    inner: InMemoryStateStore,
    failed: AtomicBool,
}

impl StateStore for FlakyStore {
    fn load(&self) -> Result<Option<StateTable>, StoreError> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(StoreError::Io(io::Error::other("device busy")));
        }
        self.inner.load()
    }

    fn save(&self, table: &StateTable) -> Result<(), StoreError> {
        self.inner.save(table)
    }
}

/// Never loads; counts save attempts.
#[derive(Default)]
struct UnreadableStore {
    saves: AtomicUsize,
}

impl StateStore for UnreadableStore {
    fn location(&self) -> String {
        "unreadable-store".to_string()
    }

    fn load(&self) -> Result<Option<StateTable>, StoreError> {
        Err(StoreError::Json("expected value at line 1".to_string()))
    }

    fn save(&self, _table: &StateTable) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Wraps a source whose discovery can be switched off.
struct SwitchableSource {
    inner: Arc<InMemorySource>,
    offline: AtomicBool,
}

impl PackageSource for SwitchableSource {
    fn location(&self) -> String {
        "switchable-source".to_string()
    }

    fn discover(&self) -> io::Result<Vec<Arc<dyn PackageHandle>>> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(io::Error::other("mount point gone"));
        }
        self.inner.discover()
    }
}

fn value_of(orchestrator: &modding::LoadOrchestrator, id: &str) -> Option<u32> {
    orchestrator
        .catalogue()
        .try_get::<ItemDefinition>(id)
        .map(|entry| entry.definition().value)
}

/// Saved order [C, B, A] with `B load_after A` resolves to [C, A, B].
#[tokio::test]
async fn test_saved_order_seeds_resolution() {
    let source = Arc::new(InMemorySource::with_packages([
        package("A", ""),
        package("B", "load_after = [\"A\"]"),
        package("C", ""),
    ]));
    let saved = StateTable::from_entries(vec![
        StateEntry::new("C", true, 0),
        StateEntry::new("B", true, 1),
        StateEntry::new("A", true, 2),
    ]);
    let orchestrator = orchestrator(&source, Arc::new(InMemoryStateStore::with_table(saved)));

    let summary = orchestrator.reload().await.expect("reload should succeed");

    assert_eq!(summary.order, vec!["C", "A", "B"]);
    assert_eq!(active_ids(&orchestrator), vec!["C", "A", "B"]);
    assert_eq!(
        orchestrator.state_table().ids().collect::<Vec<_>>(),
        vec!["C", "A", "B"]
    );
    assert!(summary.is_clean());
}

#[tokio::test]
async fn test_reload_is_idempotent() {
    let source = Arc::new(InMemorySource::with_packages([
        with_items(package("base", ""), &[("potion", 5), ("rope", 1)]),
        with_items(package("extra", ""), &[("torch", 2)]),
    ]));
    let orchestrator = in_memory(&source);

    let first = orchestrator.reload().await.expect("first reload");
    let first_items: Vec<String> = orchestrator
        .catalogue()
        .get_all::<ItemDefinition>()
        .iter()
        .map(|e| e.id().to_string())
        .collect();

    let second = orchestrator.reload().await.expect("second reload");
    let second_items: Vec<String> = orchestrator
        .catalogue()
        .get_all::<ItemDefinition>()
        .iter()
        .map(|e| e.id().to_string())
        .collect();

    assert_eq!(first.order, second.order);
    assert_eq!(first_items, second_items);
    assert_eq!(second.definitions, 3);
}

/// A later package in load order overrides an earlier one's definition.
#[tokio::test]
async fn test_later_package_overrides_content() {
    let source = Arc::new(InMemorySource::with_packages([
        with_items(package("better-potions", "load_after = [\"base\"]"), &[("Potion", 50)]),
        with_items(package("base", ""), &[("potion", 10)]),
    ]));
    let orchestrator = in_memory(&source);

    let summary = orchestrator.reload().await.expect("reload should succeed");

    assert_eq!(summary.order, vec!["base", "better-potions"]);
    assert_eq!(value_of(&orchestrator, "POTION"), Some(50));
    assert_eq!(orchestrator.catalogue().len_of::<ItemDefinition>(), 1);

    let potion = orchestrator
        .catalogue()
        .try_get::<ItemDefinition>("potion")
        .expect("potion should be present");
    assert_eq!(potion.package(), "better-potions");
}

#[tokio::test]
async fn test_cycle_leaves_previous_configuration_active() {
    let source = Arc::new(InMemorySource::with_packages([
        with_items(package("A", ""), &[("sword", 7)]),
        package("B", ""),
    ]));
    let orchestrator = in_memory(&source);
    let mut errors = orchestrator.subscribe_errors();

    orchestrator.reload().await.expect("initial reload");
    let before = active_ids(&orchestrator);
    let state_before = orchestrator.state_table();

    source.insert(with_items(package("A", "load_before = [\"B\"]"), &[("axe", 3)]));
    source.insert(package("B", "load_before = [\"A\"]"));

    let error = orchestrator.reload().await.unwrap_err();
    assert_eq!(error.kind, LoadErrorKind::CircularDependency);
    assert!(error.involves("A") && error.involves("B"));

    assert_eq!(active_ids(&orchestrator), before);
    assert_eq!(*orchestrator.state_table(), *state_before);
    assert_eq!(value_of(&orchestrator, "sword"), Some(7));
    assert!(value_of(&orchestrator, "axe").is_none());

    let published = errors.try_recv().expect("cycle should be published");
    assert_eq!(published, error);
}

#[tokio::test]
async fn test_missing_dependency_names_both_ids() {
    let source = Arc::new(InMemorySource::with_packages([package(
        "X",
        "requires = [\"Ghost\"]",
    )]));
    let orchestrator = in_memory(&source);

    let error = orchestrator.reload().await.unwrap_err();

    assert_eq!(error.kind, LoadErrorKind::MissingDependency);
    assert_eq!(error.involved_ids, vec!["X", "Ghost"]);
    assert!(orchestrator.active_packages().is_empty());
}

/// Move then disable then reload: A keeps its resolved slot but imports nothing.
#[tokio::test]
async fn test_disabled_package_stays_active_but_is_not_imported() {
    let source = Arc::new(InMemorySource::with_packages([
        with_items(package("B", ""), &[("torch", 2)]),
        with_items(package("A", ""), &[("potion", 10)]),
    ]));
    let orchestrator = in_memory(&source);
    orchestrator.reload().await.expect("initial reload");
    assert_eq!(value_of(&orchestrator, "potion"), Some(10));

    assert!(orchestrator.move_package("A", 0).await.expect("move"));
    orchestrator.enable("A", false).await.expect("disable");
    assert!(!orchestrator.is_enabled("A"));

    let summary = orchestrator.reload().await.expect("reload after disable");

    assert_eq!(summary.order, vec!["A", "B"]);
    assert_eq!(summary.imported, vec!["B"]);
    let active = orchestrator.active_packages();
    assert_eq!(active[0].id(), "A");
    assert_eq!(active[0].order(), 0);
    assert!(!active[0].is_enabled());
    assert!(value_of(&orchestrator, "potion").is_none());
    assert_eq!(value_of(&orchestrator, "torch"), Some(2));
}

#[tokio::test]
async fn test_move_ignores_unknown_ids_and_bad_indices() {
    let source = Arc::new(InMemorySource::with_packages([package("A", ""), package("B", "")]));
    let orchestrator = in_memory(&source);
    orchestrator.reload().await.expect("reload");

    assert!(!orchestrator.move_package("ghost", 0).await.expect("move"));
    assert!(!orchestrator.move_package("A", 2).await.expect("move"));
    assert_eq!(
        orchestrator.state_table().ids().collect::<Vec<_>>(),
        vec!["A", "B"]
    );
}

#[tokio::test]
async fn test_unreadable_manifest_is_skipped() {
    let source = Arc::new(InMemorySource::with_packages([
        package("A", ""),
        modding::InMemoryPackage::new("broken").with_file("mod.toml", "id = ["),
    ]));
    let orchestrator = in_memory(&source);
    let mut errors = orchestrator.subscribe_errors();

    let summary = orchestrator.reload().await.expect("manifest errors are not fatal");

    assert_eq!(summary.order, vec!["A"]);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].kind, LoadErrorKind::ManifestError);
    assert_eq!(summary.errors[0].involved_ids, vec!["broken"]);
    assert_eq!(errors.try_recv().expect("published").kind, LoadErrorKind::ManifestError);
}

#[tokio::test]
async fn test_dependent_of_unreadable_manifest_reports_missing_dependency() {
    let source = Arc::new(InMemorySource::with_packages([
        package("X", "requires = [\"broken\"]"),
        modding::InMemoryPackage::new("broken"),
    ]));
    let orchestrator = in_memory(&source);

    let error = orchestrator.reload().await.unwrap_err();

    assert_eq!(error.kind, LoadErrorKind::MissingDependency);
    assert_eq!(error.involved_ids, vec!["X", "broken"]);
}

#[tokio::test]
async fn test_duplicate_id_keeps_first_discovered() {
    let source = Arc::new(InMemorySource::with_packages([
        with_items(
            modding::InMemoryPackage::new("first").with_file("mod.toml", "id = \"shared\""),
            &[("gem", 1)],
        ),
        with_items(
            modding::InMemoryPackage::new("second").with_file("mod.toml", "id = \"shared\""),
            &[("gem", 2)],
        ),
    ]));
    let orchestrator = in_memory(&source);

    let summary = orchestrator.reload().await.expect("duplicates are not fatal");

    assert_eq!(summary.order, vec!["shared"]);
    assert_eq!(summary.errors[0].kind, LoadErrorKind::ManifestError);
    assert_eq!(value_of(&orchestrator, "gem"), Some(1));
    assert_eq!(orchestrator.active_packages()[0].handle().name(), "first");
}

#[tokio::test]
async fn test_import_failure_skips_only_that_package() {
    let source = Arc::new(InMemorySource::with_packages([
        package("bad", "").with_file("content/items.ron", "(items: [(id: "),
        with_items(package("good", ""), &[("torch", 2)]),
    ]));
    let orchestrator = in_memory(&source);

    let summary = orchestrator.reload().await.expect("import errors are not fatal");

    assert_eq!(summary.order, vec!["bad", "good"]);
    assert_eq!(summary.imported, vec!["good"]);
    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].kind, LoadErrorKind::ImportError);
    assert!(summary.errors[0].involves("bad"));
    assert_eq!(value_of(&orchestrator, "torch"), Some(2));
}

#[tokio::test]
async fn test_save_failure_keeps_in_memory_order() {
    let source = Arc::new(InMemorySource::with_packages([package("A", ""), package("B", "")]));
    let orchestrator = orchestrator(&source, Arc::new(ReadOnlyStore));

    let summary = orchestrator.reload().await.expect("save errors are not fatal");

    assert_eq!(summary.errors.len(), 1);
    assert_eq!(summary.errors[0].kind, LoadErrorKind::IoError);
    assert_eq!(
        orchestrator.state_table().ids().collect::<Vec<_>>(),
        vec!["A", "B"]
    );

    let error = orchestrator.enable("A", false).await.unwrap_err();
    assert_eq!(error.kind, LoadErrorKind::IoError);
    assert!(!orchestrator.is_enabled("A"));
}

#[tokio::test]
async fn test_vanished_package_keeps_its_state() {
    let source = Arc::new(InMemorySource::with_packages([package("A", ""), package("B", "")]));
    let orchestrator = in_memory(&source);
    orchestrator.reload().await.expect("reload");
    orchestrator.enable("B", false).await.expect("disable");

    assert!(source.remove("B"));
    let summary = orchestrator.reload().await.expect("reload without B");
    assert_eq!(summary.order, vec!["A"]);
    assert_eq!(
        orchestrator.state_table().ids().collect::<Vec<_>>(),
        vec!["A", "B"]
    );

    source.insert(package("B", ""));
    orchestrator.reload().await.expect("reload with B again");
    assert!(!orchestrator.is_enabled("B"));
    assert!(!orchestrator.active_packages()[1].is_enabled());
}

#[tokio::test]
async fn test_auto_reload_applies_changes_immediately() {
    let source = Arc::new(InMemorySource::with_packages([with_items(
        package("A", ""),
        &[("potion", 10)],
    )]));
    let orchestrator = modding::LoadOrchestrator::builder()
        .shared_source(source.clone())
        .importer(modding::CatalogueImporter::default())
        .auto_reload(true)
        .build()
        .expect("orchestrator should build");

    orchestrator.reload().await.expect("reload");
    assert_eq!(value_of(&orchestrator, "potion"), Some(10));

    orchestrator.enable("A", false).await.expect("disable");
    assert!(value_of(&orchestrator, "potion").is_none());

    orchestrator.enable("A", true).await.expect("enable");
    assert_eq!(value_of(&orchestrator, "potion"), Some(10));
}

#[tokio::test]
async fn test_catalogue_readable_during_background_reload() {
    let source = Arc::new(InMemorySource::with_packages([with_items(
        package("A", ""),
        &[("potion", 10)],
    )]));
    let orchestrator = Arc::new(in_memory(&source));
    orchestrator.reload().await.expect("reload");

    let background = {
        let orchestrator = Arc::clone(&orchestrator);
        tokio::spawn(async move { orchestrator.reload().await })
    };

    assert_eq!(value_of(&orchestrator, "potion"), Some(10));
    background
        .await
        .expect("task should join")
        .expect("reload should succeed");
    assert_eq!(value_of(&orchestrator, "potion"), Some(10));
}

/// A transient read failure must not cost the user their saved choices.
#[tokio::test]
async fn test_transient_store_failure_keeps_saved_choices() {
    let source = Arc::new(InMemorySource::with_packages([
        with_items(package("A", ""), &[("sword", 7)]),
        with_items(package("B", ""), &[("potion", 10)]),
    ]));
    let saved = StateTable::from_entries(vec![
        StateEntry::new("B", false, 0),
        StateEntry::new("A", true, 1),
    ]);
    let store = Arc::new(FlakyStore {
        inner: InMemoryStateStore::with_table(saved.clone()),
        failed: AtomicBool::new(false),
    });
    let orchestrator = orchestrator(&source, store.clone());

    let first = orchestrator.reload().await.expect("read failure is not fatal");
    assert_eq!(first.errors.len(), 1);
    assert_eq!(first.errors[0].kind, LoadErrorKind::IoError);
    assert_eq!(store.inner.load().unwrap(), Some(saved.clone()));

    let second = orchestrator.reload().await.expect("store readable again");
    assert!(second.is_clean());
    assert_eq!(second.order, vec!["B", "A"]);
    assert_eq!(second.imported, vec!["A"]);
    assert!(!orchestrator.is_enabled("B"));
    assert!(value_of(&orchestrator, "potion").is_none());
    assert_eq!(store.inner.load().unwrap(), Some(saved));
}

#[tokio::test]
async fn test_unreadable_store_is_reported_by_every_reload_and_never_overwritten() {
    let source = Arc::new(InMemorySource::with_packages([package("A", "")]));
    let store = Arc::new(UnreadableStore::default());
    let orchestrator = orchestrator(&source, store.clone());

    assert!(orchestrator.is_enabled("A"));

    for _ in 0..2 {
        let summary = orchestrator.reload().await.expect("read failure is not fatal");
        assert_eq!(summary.order, vec!["A"]);
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].kind, LoadErrorKind::IoError);
        assert!(summary.errors[0].message.contains("unreadable-store"));
    }

    let error = orchestrator.enable("A", false).await.unwrap_err();
    assert_eq!(error.kind, LoadErrorKind::IoError);
    assert!(orchestrator.is_enabled("A"));
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_discovery_failure_changes_nothing() {
    let packages = Arc::new(InMemorySource::with_packages([
        with_items(package("A", ""), &[("sword", 7)]),
        package("B", ""),
    ]));
    let source = Arc::new(SwitchableSource {
        inner: packages,
        offline: AtomicBool::new(false),
    });
    let orchestrator = modding::LoadOrchestrator::builder()
        .shared_source(source.clone())
        .importer(modding::CatalogueImporter::default())
        .build()
        .expect("orchestrator should build");
    let mut errors = orchestrator.subscribe_errors();

    orchestrator.reload().await.expect("initial reload");
    let before = active_ids(&orchestrator);
    let state_before = orchestrator.state_table();

    source.offline.store(true, Ordering::SeqCst);
    let error = orchestrator.reload().await.unwrap_err();

    assert_eq!(error.kind, LoadErrorKind::IoError);
    assert!(error.message.contains("switchable-source"));
    assert_eq!(errors.try_recv().expect("published"), error);
    assert_eq!(active_ids(&orchestrator), before);
    assert_eq!(*orchestrator.state_table(), *state_before);
    assert_eq!(value_of(&orchestrator, "sword"), Some(7));
}
