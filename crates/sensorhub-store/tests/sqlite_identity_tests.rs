use sensorhub_core::errors::{ErrorKind, SensorHubError};
use sensorhub_core::stores::IdentityStore;
use sensorhub_store::SqliteIdentityStore;

#[test]
fn test_insert_generates_ids_and_round_trips() {
    let store = SqliteIdentityStore::open_in_memory().unwrap();

    let a = store.insert("thermo-1").unwrap();
    let b = store.insert("thermo-2").unwrap();
    assert!(b.id > a.id);

    let fetched = store.get_by_id(a.id).unwrap().unwrap();
    assert_eq!(fetched, a);
}

#[test]
fn test_get_by_name() {
    let store = SqliteIdentityStore::open_in_memory().unwrap();
    let inserted = store.insert("thermo-1").unwrap();

    let found = store.get_by_name("thermo-1").unwrap().unwrap();
    assert_eq!(found.id, inserted.id);
    assert!(store.get_by_name("absent").unwrap().is_none());
}

#[test]
fn test_unique_name_violation_maps_to_duplicate_name() {
    let store = SqliteIdentityStore::open_in_memory().unwrap();
    store.insert("thermo-1").unwrap();

    let err = store.insert("thermo-1").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(matches!(err, SensorHubError::DuplicateName { .. }));
}

#[test]
fn test_delete_reports_absence() {
    let store = SqliteIdentityStore::open_in_memory().unwrap();
    let inserted = store.insert("thermo-1").unwrap();

    assert!(store.delete(inserted.id).unwrap());
    assert!(!store.delete(inserted.id).unwrap());
    assert!(store.get_by_id(inserted.id).unwrap().is_none());
}

#[test]
fn test_list_in_id_order_with_offset_and_limit() {
    let store = SqliteIdentityStore::open_in_memory().unwrap();
    for name in ["a", "b", "c", "d"] {
        store.insert(name).unwrap();
    }

    let page = store.list(1, 2).unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].name, "b");
    assert_eq!(page[1].name, "c");

    let tail = store.list(3, 10).unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].name, "d");
}

#[test]
fn test_joined_at_survives_storage() {
    let store = SqliteIdentityStore::open_in_memory().unwrap();
    let inserted = store.insert("thermo-1").unwrap();

    let fetched = store.get_by_id(inserted.id).unwrap().unwrap();
    // Timestamps are persisted at second precision
    assert_eq!(fetched.joined_at, inserted.joined_at);
}
