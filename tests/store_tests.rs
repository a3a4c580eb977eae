//! Document store behavior tests over the embedded SQLite engine.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use reservoir::error::ReservoirError;
use reservoir::report::Projection;
use reservoir::store::{DocumentStore, SqliteStore, StoreConfig};
use reservoir::types::{Document, FieldValue};
use tempfile::TempDir;

fn doc(code: &str, building: &str) -> Document {
    let mut doc = Document::new();
    doc.set("reservation_code", FieldValue::Text(code.to_string()));
    doc.set("building", FieldValue::Text(building.to_string()));
    doc
}

// ═══════════════════════════════════════════════════════════════════════════
// INSERTION ORDER AND ROUND TRIPS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_find_all_preserves_insertion_order() {
    let store = SqliteStore::open_in_memory("reservations").unwrap();
    let batch = vec![doc("A1", "NYC"), doc("A2", "LA"), doc("A3", "SF")];

    assert_eq!(store.insert_many(&batch).unwrap(), 3);

    let found = store.find_all().unwrap();
    let codes: Vec<String> = found
        .iter()
        .map(|d| d.get("reservation_code").unwrap().display())
        .collect();
    assert_eq!(codes, vec!["A1", "A2", "A3"]);
}

#[test]
fn test_date_type_survives_persistence() {
    let store = SqliteStore::open_in_memory("reservations").unwrap();
    let checkin = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

    let mut document = doc("A1", "NYC");
    document.set("ds_checkin", FieldValue::DateTime(checkin));
    store.insert_many(&[document]).unwrap();

    let found = store.find_one().unwrap().unwrap();
    assert_eq!(found.get("ds_checkin"), Some(&FieldValue::DateTime(checkin)));
}

#[test]
fn test_explicit_nulls_survive_persistence() {
    let store = SqliteStore::open_in_memory("reservations").unwrap();

    let mut document = doc("A3", "SF");
    document.set("ds_checkin", FieldValue::Null);
    store.insert_many(&[document]).unwrap();

    let found = store.find_one().unwrap().unwrap();
    // Present with a null value, not omitted
    assert_eq!(found.get("ds_checkin"), Some(&FieldValue::Null));
}

// ═══════════════════════════════════════════════════════════════════════════
// CLEAR AND COUNT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_clear_removes_everything_and_reports_count() {
    let store = SqliteStore::open_in_memory("reservations").unwrap();
    store
        .insert_many(&[doc("A1", "NYC"), doc("A2", "LA")])
        .unwrap();

    assert_eq!(store.clear().unwrap(), 2);
    assert_eq!(store.count().unwrap(), 0);
    assert_eq!(store.clear().unwrap(), 0);
}

// ═══════════════════════════════════════════════════════════════════════════
// PROJECTION QUERY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_project_with_limit() {
    let store = SqliteStore::open_in_memory("reservations").unwrap();
    let batch: Vec<Document> = (1..=8).map(|i| doc(&format!("A{i}"), "NYC")).collect();
    store.insert_many(&batch).unwrap();

    let projection = Projection::reservation_summary();
    let views = store.project(&projection, Some(5)).unwrap();
    assert_eq!(views.len(), 5);
    assert_eq!(views[0].display("confirmation_code"), "A1");

    let all = store.project(&projection, None).unwrap();
    assert_eq!(all.len(), 8);
}

#[test]
fn test_project_always_yields_six_keys() {
    let store = SqliteStore::open_in_memory("reservations").unwrap();
    store.insert_many(&[doc("A1", "NYC")]).unwrap();

    let views = store
        .project(&Projection::reservation_summary(), None)
        .unwrap();
    assert_eq!(views[0].len(), 6);
    // Stay dates were never loaded, so they project to the sentinel
    assert_eq!(views[0].display("checkin_date"), "N/A");
}

// ═══════════════════════════════════════════════════════════════════════════
// FILE-BACKED STORES AND CREDENTIALS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_file_backed_store_persists_between_opens() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("reservations.db");
    let config = StoreConfig::default();

    {
        let store = SqliteStore::open(&config, Some(&path)).unwrap();
        store.insert_many(&[doc("A1", "NYC")]).unwrap();
    }

    let store = SqliteStore::open(&config, Some(&path)).unwrap();
    assert_eq!(store.count().unwrap(), 1);
}

#[test]
fn test_open_fails_for_unreachable_path() {
    let config = StoreConfig::default();
    let result = SqliteStore::open(&config, Some("/no/such/dir/store.db".as_ref()));
    match result {
        Err(ReservoirError::StoreUnavailable(_)) => {}
        other => panic!("expected StoreUnavailable, got {other:?}"),
    }
}

#[test]
fn test_provision_user_then_duplicate() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("reservations.db");
    let config = StoreConfig::default();
    let store = SqliteStore::open(&config, Some(&path)).unwrap();

    store
        .provision_user(&config.username, &config.password)
        .unwrap();

    let result = store.provision_user(&config.username, &config.password);
    assert!(matches!(result, Err(ReservoirError::UserAlreadyExists(_))));
}
