mod common;

use common::{BASE_TOTAL, EQUIPMENT_COUNT, seed_exercise};
use mlpt::report::{EDL_COLUMNS, edl_frame, render_text_table, summarize_by};
use mlpt::{EquipmentItem, PhasingLocation, SqliteStore};
use polars::prelude::ChunkAgg;

#[test]
fn edl_frame_has_one_row_per_line() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);

    let frame = edl_frame(&store, seeded.exercise).unwrap();
    assert_eq!(frame.height(), 2);
    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, EDL_COLUMNS.to_vec());

    let base = frame.column("base_allowance_weight").unwrap().i64().unwrap();
    assert_eq!(base.get(0), Some(600));
    assert_eq!(base.get(1), Some(440));
    assert_eq!(base.sum(), Some(BASE_TOTAL));

    let weight = frame.column("equipment_weight").unwrap().f64().unwrap();
    assert_eq!(weight.get(1), Some(240_000.0));
}

#[test]
fn edl_frame_for_empty_exercise_is_empty() {
    let store = SqliteStore::open_in_memory().unwrap();
    let frame = edl_frame(&store, 1).unwrap();
    assert_eq!(frame.height(), 0);
    assert_eq!(frame.width(), EDL_COLUMNS.len());
}

#[test]
fn summarize_by_unit_sums_lines() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);
    let extra = store
        .create_equipment_item(&EquipmentItem::new(seeded.rifle, PhasingLocation::FollowOn, 10))
        .unwrap();
    store
        .add_edl_entry(seeded.exercise, seeded.battalion, extra.id)
        .unwrap();

    let frame = edl_frame(&store, seeded.exercise).unwrap();
    let summary = summarize_by(&frame, "unit").unwrap();
    assert_eq!(summary.height(), 2);

    let units = summary.column("unit").unwrap().str().unwrap();
    assert_eq!(units.get(0), Some("1st Battalion"));
    assert_eq!(units.get(1), Some("Tank Company"));

    let quantity = summary.column("quantity").unwrap().i64().unwrap();
    assert_eq!(quantity.get(0), Some(40));
    assert_eq!(quantity.get(1), Some(2));
    assert_eq!(quantity.sum(), Some(EQUIPMENT_COUNT + 10));
}

#[test]
fn summarize_by_phasing_location() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);

    let frame = edl_frame(&store, seeded.exercise).unwrap();
    let summary = summarize_by(&frame, "phasing_location").unwrap();

    let phasing = summary.column("phasing_location").unwrap().str().unwrap();
    assert_eq!(phasing.get(0), Some("AE"));
    assert_eq!(phasing.get(1), Some("AFOE"));
    let sustain = summary
        .column("daily_sustain_weight")
        .unwrap()
        .i64()
        .unwrap();
    assert_eq!(sustain.get(0), Some(180));
    assert_eq!(sustain.get(1), Some(112));
}

#[test]
fn summarize_by_rejects_other_columns() {
    let store = SqliteStore::open_in_memory().unwrap();
    let frame = edl_frame(&store, 1).unwrap();
    let err = summarize_by(&frame, "equipment").unwrap_err();
    assert!(err.to_string().contains("cannot summarize by 'equipment'"));
}

#[test]
fn render_text_table_boxes_every_row() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);
    let frame = edl_frame(&store, seeded.exercise).unwrap();

    let table = render_text_table(&frame);
    let lines: Vec<&str> = table.lines().collect();
    // separator, header, separator, two rows, separator
    assert_eq!(lines.len(), 6);
    assert!(lines[1].contains("equipment_weight"));
    assert!(lines[3].contains("M4 Carbine"));
    assert!(lines[4].contains("AFOE"));
    assert!(lines.iter().all(|l| l.len() == lines[0].len()));
}
