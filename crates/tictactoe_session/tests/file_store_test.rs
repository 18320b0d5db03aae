//! Tests for the JSON flat-file session store.

use std::fs;

use tempfile::TempDir;
use tictactoe_session::{
    FileSessionStore, RecordedWins, SessionPatch, SessionRecord, SessionStore, TallyKey,
};

fn setup_store() -> (TempDir, FileSessionStore) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileSessionStore::new(dir.path().join("session.json"));
    (dir, store)
}

fn read_file(store: &FileSessionStore) -> serde_json::Value {
    let content = fs::read_to_string(store.path()).expect("Session file exists");
    serde_json::from_str(&content).expect("Session file is JSON")
}

#[tokio::test]
async fn test_read_materializes_default() {
    let (_dir, store) = setup_store();
    assert!(!store.path().exists());

    let record = store.read_session().await.expect("Read failed");

    assert_eq!(record, SessionRecord::default());
    assert_eq!(
        read_file(&store),
        serde_json::json!({ "dimensions": 3, "recordedWins": { "x": 0, "o": 0, "none": 0 } })
    );
}

#[tokio::test]
async fn test_write_merges_dimensions() {
    let (_dir, store) = setup_store();
    store.record_winner(TallyKey::X).await.expect("Write failed");

    store
        .write_session(SessionPatch::default().with_dimensions(5))
        .await
        .expect("Write failed");

    let record = store.read_session().await.expect("Read failed");
    assert_eq!(*record.dimensions(), 5);
    assert_eq!(*record.recorded_wins(), RecordedWins::new(1, 0, 0));
}

#[tokio::test]
async fn test_write_replaces_tallies() {
    let (_dir, store) = setup_store();
    store
        .write_session(SessionPatch::default().with_recorded_wins(RecordedWins::new(4, 5, 6)))
        .await
        .expect("Write failed");

    assert_eq!(read_file(&store)["recordedWins"]["o"], 5);
    assert_eq!(read_file(&store)["dimensions"], 3);
}

#[tokio::test]
async fn test_record_winner_counts_each_key() {
    let (_dir, store) = setup_store();
    for key in [TallyKey::X, TallyKey::O, TallyKey::X, TallyKey::Draw] {
        store.record_winner(key).await.expect("Write failed");
    }
    let record = store.read_session().await.expect("Read failed");
    assert_eq!(*record.recorded_wins(), RecordedWins::new(2, 1, 1));
}

#[tokio::test]
async fn test_malformed_file_falls_back_to_default() {
    let (_dir, store) = setup_store();
    fs::write(store.path(), "{ not json").expect("Write failed");

    let record = store.read_session().await.expect("Read failed");

    assert_eq!(record, SessionRecord::default());
    assert_eq!(read_file(&store)["dimensions"], 3);
}

#[tokio::test]
async fn test_invalid_dimension_in_file_falls_back_to_default() {
    let (_dir, store) = setup_store();
    fs::write(
        store.path(),
        r#"{ "dimensions": 0, "recordedWins": { "x": 9, "o": 9, "none": 9 } }"#,
    )
    .expect("Write failed");

    let record = store.read_session().await.expect("Read failed");
    assert_eq!(record, SessionRecord::default());
}

#[tokio::test]
async fn test_record_winner_at_max_tally_does_not_overflow() {
    let (_dir, store) = setup_store();
    fs::write(
        store.path(),
        r#"{ "dimensions": 3, "recordedWins": { "x": 18446744073709551615, "o": 2, "none": 0 } }"#,
    )
    .expect("Write failed");

    store.record_winner(TallyKey::X).await.expect("Record failed");
    store.record_winner(TallyKey::O).await.expect("Record failed");

    let record = store.read_session().await.expect("Read failed");
    assert_eq!(*record.recorded_wins(), RecordedWins::new(u64::MAX, 3, 0));
    assert_eq!(record.recorded_wins().total(), u64::MAX);
}

#[tokio::test]
async fn test_rejected_patch_leaves_file_untouched() {
    let (_dir, store) = setup_store();
    store
        .write_session(SessionPatch::default().with_dimensions(4))
        .await
        .expect("Write failed");

    let result = store
        .write_session(SessionPatch::default().with_dimensions(99))
        .await;

    assert!(result.expect_err("Out of range").is_invalid_input());
    assert_eq!(read_file(&store)["dimensions"], 4);
}

#[tokio::test]
async fn test_reset_restores_default() {
    let (_dir, store) = setup_store();
    store.record_winner(TallyKey::O).await.expect("Write failed");
    store
        .write_session(SessionPatch::default().with_dimensions(8))
        .await
        .expect("Write failed");

    let record = store.reset().await.expect("Reset failed");

    assert_eq!(record, SessionRecord::default());
    assert_eq!(store.read_session().await.expect("Read failed"), SessionRecord::default());
}

#[tokio::test]
async fn test_creates_missing_parent_directory() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let store = FileSessionStore::new(dir.path().join("nested").join("session.json"));

    store.read_session().await.expect("Read failed");

    assert!(store.path().exists());
}
