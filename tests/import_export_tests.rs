mod common;

use common::{BASE_TOTAL, EQUIPMENT_WEIGHT, seed_exercise};
use mlpt::{
    Aggregates, Ammo, SqliteStore, StoreError, StoreSnapshot, load_store_from_json,
    save_edl_to_csv, save_store_to_json,
};
use std::fs;
use tempfile::NamedTempFile;

#[test]
fn json_snapshot_round_trip_preserves_totals() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);
    let file = NamedTempFile::new().unwrap();

    save_store_to_json(&store, file.path()).unwrap();

    let restored = SqliteStore::open_in_memory().unwrap();
    let snapshot = load_store_from_json(&restored, file.path()).unwrap();
    assert_eq!(snapshot.exercises.len(), 1);
    assert_eq!(snapshot.edl.len(), 2);

    let totals = restored.exercise_totals(seeded.exercise).unwrap();
    assert_eq!(totals.base_allowance_weight, BASE_TOTAL);
    assert_eq!(totals.equipment_weight, EQUIPMENT_WEIGHT);
    assert_eq!(restored.list_ammo().unwrap(), store.list_ammo().unwrap());
    assert_eq!(
        restored.exercise_units(seeded.exercise).unwrap(),
        store.exercise_units(seeded.exercise).unwrap()
    );
    assert_eq!(
        restored.combat_loads(seeded.tank).unwrap(),
        store.combat_loads(seeded.tank).unwrap()
    );
}

#[test]
fn snapshot_uses_record_codes() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_exercise(&store);
    let file = NamedTempFile::new().unwrap();
    save_store_to_json(&store, file.path()).unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(json["ammo_items"][0]["unit_type"], "G");
    assert_eq!(json["equipment_items"][1]["phasing_location"], "AFOE");
    assert!(json["exported_at"].is_string());
}

#[test]
fn snapshot_restore_requires_empty_store() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_exercise(&store);
    let file = NamedTempFile::new().unwrap();
    save_store_to_json(&store, file.path()).unwrap();

    let err = load_store_from_json(&store, file.path()).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
    assert_eq!(store.list_ammo().unwrap().len(), 2);
}

#[test]
fn snapshot_with_duplicate_ids_is_rejected() {
    let store = SqliteStore::open_in_memory().unwrap();
    let mut snapshot = StoreSnapshot::from_store(&store).unwrap();
    let mut ammo = Ammo::new("Dup", 1);
    ammo.id = 3;
    snapshot.ammo = vec![ammo.clone(), ammo];

    let err = snapshot.restore_into(&store).unwrap_err();
    assert!(err.to_string().contains("duplicate id 3"));
    assert!(store.is_empty().unwrap());
}

#[test]
fn snapshot_with_dangling_reference_rolls_back() {
    let store = SqliteStore::open_in_memory().unwrap();
    let source = SqliteStore::open_in_memory().unwrap();
    seed_exercise(&source);
    let mut snapshot = StoreSnapshot::from_store(&source).unwrap();
    snapshot.units.clear();

    let err = snapshot.restore_into(&store).unwrap_err();
    assert!(err.is_constraint_violation(), "unexpected error: {err}");
    assert!(store.is_empty().unwrap());
}

#[test]
fn edl_csv_export_writes_weighted_lines() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);
    let file = NamedTempFile::new().unwrap();

    let rows = save_edl_to_csv(&store, seeded.exercise, file.path()).unwrap();
    assert_eq!(rows, 2);

    let mut reader = csv::Reader::from_path(file.path()).unwrap();
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "edl_id");
    assert_eq!(&headers[6], "base_allowance_weight");

    let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(&records[0][1], "1st Battalion");
    assert_eq!(&records[0][3], "AE");
    assert_eq!(&records[0][6], "600");
    assert_eq!(&records[1][2], "M1A1 Abrams");
    assert_eq!(&records[1][6], "440");
}

#[test]
fn edl_csv_export_rejects_unknown_exercise() {
    let store = SqliteStore::open_in_memory().unwrap();
    let file = NamedTempFile::new().unwrap();
    let err = save_edl_to_csv(&store, 12, file.path()).unwrap_err();
    assert!(err.to_string().contains("exercise 12 does not exist"));
}
