use rootify_lib::{
    get_roots_path, is_header_only, AppState, ImportAction, ImportExportService, RootStore,
    CSV_HEADER,
};

#[path = "support.rs"]
mod support;
use support::{ensure_test_home, lock_test_mutex, reset_test_fs};

#[test]
fn roots_persist_across_app_state_reopen() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    {
        let state = AppState::open().expect("open state");
        state.roots.add("交易", "transaction").expect("add");
        state.roots.add("日期", "date").expect("add");
        state.roots.add("证券", "securities").expect("add");
        state.roots.delete("证券").expect("delete");
        state.close().expect("close");
    }

    assert!(get_roots_path().exists(), "roots.json should be written");

    let state = AppState::open().expect("reopen state");
    let all = state.roots.get_all().expect("get all");
    assert_eq!(all.len(), 2);
    assert_eq!(all.get("交易").map(String::as_str), Some("transaction"));
    assert!(!all.contains_key("证券"));
}

#[test]
fn export_then_import_reproduces_dictionary() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let home = ensure_test_home();

    let source = RootStore::open(home.join("source.json")).expect("open source");
    source
        .import_merge(vec![
            ("交易", "transaction"),
            ("日期", "date"),
            ("备注", "remark, note"),
            ("名称", "\"name\""),
        ])
        .expect("seed");
    let exported = source.export_all().expect("export");
    assert!(exported.starts_with(CSV_HEADER));

    let target = RootStore::open(home.join("target.json")).expect("open target");
    let preview =
        ImportExportService::parse_preview(&exported, &target.snapshot().expect("snapshot"))
            .expect("parse");
    assert!(preview.iter().all(|item| item.action == ImportAction::Add));
    ImportExportService::commit(&target, &preview).expect("commit");

    assert_eq!(
        target.get_all().expect("target roots"),
        source.get_all().expect("source roots")
    );
}

#[test]
fn import_preview_does_not_touch_store() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    let state = AppState::open().expect("open state");
    state.roots.add("交易", "trade").expect("add");

    let csv = "中文词根,英文对应\n交易,transaction\n客户,customer\n";
    let preview =
        ImportExportService::parse_preview(csv, &state.roots.snapshot().expect("snapshot"))
            .expect("parse");
    assert_eq!(preview[0].action, ImportAction::Update);
    assert_eq!(preview[1].action, ImportAction::Add);

    assert_eq!(state.roots.len().expect("len"), 1);
    assert_eq!(
        state.roots.snapshot().expect("snapshot").get("交易"),
        Some("trade")
    );
}

#[test]
fn clearing_roots_leaves_header_only_export() {
    let _guard = lock_test_mutex();
    reset_test_fs();
    let _home = ensure_test_home();

    let state = AppState::open().expect("open state");
    state
        .roots
        .import_merge(vec![("交易", "transaction")])
        .expect("seed");
    state.roots.clear().expect("clear");

    let exported = state.roots.export_all().expect("export");
    assert!(is_header_only(&exported));
    assert_eq!(
        ImportExportService::export(&state.roots).expect("export"),
        None
    );
}
