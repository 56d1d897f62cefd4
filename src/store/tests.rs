// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Evomap and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rstest::{fixture, rstest};

use super::{
    load_session, reset, save_session, FileStore, KeyValueStore, LoadReport, MemoryStore,
    StoreError, WriteDurability, STORAGE_KEY,
};
use crate::model::{
    ComponentType, Session, DEFAULT_USER_NEED_DESCRIPTION, DEFAULT_USER_NEED_TITLE,
};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!("evomap-{prefix}-{}-{nanos}-{counter}", std::process::id()));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

struct FileStoreTestCtx {
    tmp: TempDir,
    store: FileStore,
}

#[fixture]
fn ctx() -> FileStoreTestCtx {
    let tmp = TempDir::new("store");
    let store = FileStore::new(tmp.path().join("maps"));
    FileStoreTestCtx { tmp, store }
}

#[rstest]
fn empty_storage_seeds_the_inference_map() {
    let kv = MemoryStore::new();
    let (session, report) = load_session(&kv, 42).unwrap();

    assert_eq!(report, LoadReport::SeededFresh);
    assert_eq!(session.diagrams().len(), 1);
    assert_eq!(session.active_diagram_id(), None);

    let map = &session.diagrams()[0];
    assert_eq!(map.name(), "AI Inference Map");
    assert_eq!(map.nodes().len(), 13);
    assert_eq!(map.last_modified(), 42);
    assert_eq!(map.user_need_title(), DEFAULT_USER_NEED_TITLE);
}

#[rstest]
fn empty_string_counts_as_missing() {
    let kv = MemoryStore::new().with_entry(STORAGE_KEY, "");
    let (session, report) = load_session(&kv, 1).unwrap();

    assert_eq!(report, LoadReport::SeededFresh);
    assert_eq!(session.diagrams()[0].name(), "AI Inference Map");
}

#[rstest]
#[case("[]")]
#[case("{}")]
#[case("null")]
#[case("\"maps\"")]
fn parsed_but_empty_storage_seeds_my_first_map(#[case] raw: &str) {
    let kv = MemoryStore::new().with_entry(STORAGE_KEY, raw);
    let (session, report) = load_session(&kv, 1).unwrap();

    assert_eq!(report, LoadReport::SeededEmpty);
    let map = &session.diagrams()[0];
    assert_eq!(map.name(), "My First Map");
    assert_eq!(map.nodes().len(), 13);
}

#[rstest]
#[case("{not json")]
#[case("[{\"id\": 5}]")]
#[case("   ")]
#[case("\n")]
fn unreadable_storage_recovers_with_an_empty_map(#[case] raw: &str) {
    let kv = MemoryStore::new().with_entry(STORAGE_KEY, raw);
    let (session, report) = load_session(&kv, 1).unwrap();

    assert!(matches!(report, LoadReport::Recovered { .. }));
    assert!(report.seeded());
    let map = &session.diagrams()[0];
    assert_eq!(map.name(), "My First Map");
    assert!(map.nodes().is_empty());
}

#[rstest]
fn legacy_maps_are_backfilled_and_keep_their_nodes() {
    let raw = r#"[
        {"id":"map_1","name":"Legacy","nodes":[
            {"id":"a","name":"A","value":10,"evolution":20,"type":1,"dependencies":["b"]},
            {"id":"b","name":"B","value":5,"evolution":90,"type":2,"dependencies":[]}
        ],"lastModified":7},
        {"id":"map_2","name":"Modern","userNeedTitle":"Buyers","userNeedDescription":"Buy things.","nodes":[],"lastModified":9}
    ]"#;
    let kv = MemoryStore::new().with_entry(STORAGE_KEY, raw);
    let (session, report) = load_session(&kv, 100).unwrap();

    assert_eq!(report, LoadReport::Loaded { maps: 2, backfilled: 1 });
    let legacy = &session.diagrams()[0];
    assert_eq!(legacy.user_need_title(), DEFAULT_USER_NEED_TITLE);
    assert_eq!(legacy.user_need_description(), DEFAULT_USER_NEED_DESCRIPTION);
    assert_eq!(legacy.last_modified(), 7);
    assert_eq!(legacy.nodes()[0].component_type(), ComponentType::Hardware);
    assert_eq!(legacy.nodes()[0].dependencies()[0].as_str(), "b");

    let modern = &session.diagrams()[1];
    assert_eq!(modern.user_need_title(), "Buyers");
    assert_eq!(session.most_recent().map(|d| d.name()), Some("Modern"));
}

#[rstest]
fn save_then_load_preserves_the_collection() {
    let mut kv = MemoryStore::new();
    let (mut session, _) = load_session(&kv, 10).unwrap();
    let id = session.diagrams()[0].id().clone();
    session.rename(&id, "Renamed", 11);
    let copy = session.copy(&id, 12).unwrap();

    assert!(save_session(&mut kv, &session).unwrap());
    let (reloaded, report) = load_session(&kv, 99).unwrap();

    assert_eq!(report, LoadReport::Loaded { maps: 2, backfilled: 0 });
    assert_eq!(reloaded.diagrams(), session.diagrams());
    assert_eq!(
        reloaded.diagram(&copy).and_then(|d| d.copied_from_id()),
        Some(&id)
    );
}

#[rstest]
fn save_skips_an_empty_collection() {
    let mut kv = MemoryStore::new().with_entry(STORAGE_KEY, "[]");
    assert!(!save_session(&mut kv, &Session::new()).unwrap());
    assert_eq!(kv.get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
}

#[rstest]
fn reset_forgets_saved_maps() {
    let mut kv = MemoryStore::new().with_entry(STORAGE_KEY, "{broken");
    reset(&mut kv).unwrap();
    let (_, report) = load_session(&kv, 1).unwrap();
    assert_eq!(report, LoadReport::SeededFresh);
}

#[rstest]
fn file_store_round_trips_and_reports_missing_keys(ctx: FileStoreTestCtx) {
    let mut store = ctx.store;
    assert_eq!(store.get(STORAGE_KEY).unwrap(), None);

    store.set(STORAGE_KEY, "[1,2]").unwrap();
    assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("[1,2]"));
    assert!(ctx.tmp.path().join("maps").join("wardley-maps.json").is_file());

    store.set(STORAGE_KEY, "[3]").unwrap();
    assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("[3]"));

    store.remove(STORAGE_KEY).unwrap();
    store.remove(STORAGE_KEY).unwrap();
    assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
}

#[rstest]
fn file_store_leaves_no_temp_files_behind(ctx: FileStoreTestCtx) {
    let mut store = ctx.store.with_durability(WriteDurability::Durable);
    store.set(STORAGE_KEY, "[]").unwrap();
    store.set(STORAGE_KEY, "[[]]").unwrap();

    let names = std::fs::read_dir(store.root())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["wardley-maps.json".to_owned()]);
}

#[rstest]
#[case("")]
#[case("../escape")]
#[case(".hidden")]
#[case("a/b")]
fn file_store_rejects_keys_that_are_not_plain_names(ctx: FileStoreTestCtx, #[case] key: &str) {
    let mut store = ctx.store;
    let err = store.set(key, "x").unwrap_err();
    assert!(matches!(err, StoreError::InvalidKey { .. }));
}

#[rstest]
fn file_store_feeds_load_session(ctx: FileStoreTestCtx) {
    let mut store = ctx.store;
    let (session, _) = load_session(&store, 5).unwrap();
    save_session(&mut store, &session).unwrap();

    let (reloaded, report) = load_session(&store, 6).unwrap();
    assert_eq!(report, LoadReport::Loaded { maps: 1, backfilled: 0 });
    assert_eq!(reloaded.diagrams()[0].name(), "AI Inference Map");
}
