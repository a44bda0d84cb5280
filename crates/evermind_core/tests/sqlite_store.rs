use chrono::{TimeZone, Utc};
use evermind_core::{
    open_db, Assignment, AssignmentDocument, AssignmentDraft, AssignmentStore, LoadOutcome,
    LocalCache, Priority, RemoteStore, SqliteDocumentStore, SqliteLocalCache, StaticIdentity,
    SyncBridge, SyncError, UserId,
};

fn record(title: &str, priority: Priority) -> Assignment {
    let draft = AssignmentDraft::new(title, "BIO150", "2025-03-18")
        .with_description("chapters 3-4")
        .with_priority(priority);
    Assignment::from_draft(&draft, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()).unwrap()
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

#[test]
fn document_store_upserts_one_document_per_user() {
    let dir = tempfile::tempdir().unwrap();
    let store = SqliteDocumentStore::open(dir.path().join("remote.db")).unwrap();

    assert!(store.load(&user("alice")).unwrap().is_none());

    let first = AssignmentDocument::from_assignments(&[record("Quiz", Priority::Low)]);
    store.save(&user("alice"), &first).unwrap();
    let second = AssignmentDocument::from_assignments(&[
        record("Lab", Priority::High),
        record("Essay", Priority::Medium),
    ]);
    store.save(&user("alice"), &second).unwrap();

    assert_eq!(store.load(&user("alice")).unwrap(), Some(second));
    assert!(store.load(&user("bob")).unwrap().is_none());
}

#[test]
fn malformed_stored_document_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("remote.db");
    let conn = open_db(&path).unwrap();
    conn.execute(
        "INSERT INTO userdata (user_id, data) VALUES ('alice', '{\"error\":\"No data found\"}');",
        [],
    )
    .unwrap();

    let store = SqliteDocumentStore::new(conn);
    let err = store.load(&user("alice")).unwrap_err();
    assert!(matches!(err, SyncError::Document(_)));
}

#[test]
fn local_cache_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let records = vec![record("Quiz", Priority::Low), record("Lab", Priority::High)];

    {
        let cache = SqliteLocalCache::open(&path).unwrap();
        assert_eq!(cache.read().unwrap(), None);
        cache.write(&records).unwrap();
    }

    let cache = SqliteLocalCache::open(&path).unwrap();
    assert_eq!(cache.read().unwrap(), Some(records));
}

#[test]
fn notification_preference_defaults_off() {
    let dir = tempfile::tempdir().unwrap();
    let cache = SqliteLocalCache::open(dir.path().join("cache.db")).unwrap();

    assert!(!cache.notifications_enabled().unwrap());
    cache.set_notifications_enabled(true).unwrap();
    assert!(cache.notifications_enabled().unwrap());
    cache.set_notifications_enabled(false).unwrap();
    assert!(!cache.notifications_enabled().unwrap());
}

#[test]
fn bridge_over_sqlite_round_trips_a_session() {
    let dir = tempfile::tempdir().unwrap();
    let remote_path = dir.path().join("remote.db");
    let cache_path = dir.path().join("cache.db");
    let records = vec![record("Quiz", Priority::Low)];

    let bridge = SyncBridge::new(
        Box::new(StaticIdentity::signed_in(user("alice"))),
        Box::new(SqliteDocumentStore::open(&remote_path).unwrap()),
        Box::new(SqliteLocalCache::open(&cache_path).unwrap()),
    );
    assert!(!bridge.push_snapshot(&records).is_failure());
    drop(bridge);

    let bridge = SyncBridge::new(
        Box::new(StaticIdentity::signed_in(user("alice"))),
        Box::new(SqliteDocumentStore::open(&remote_path).unwrap()),
        Box::new(SqliteLocalCache::open(dir.path().join("fresh-cache.db")).unwrap()),
    );
    let mut store = AssignmentStore::new();
    assert_eq!(
        bridge.load_session(&mut store),
        LoadOutcome::Remote { records: 1 }
    );
    assert_eq!(store.assignments(), records.as_slice());
}
