mod common;

use common::{
    ASSAULT_TOTAL, BASE_TOTAL, EQUIPMENT_COUNT, EQUIPMENT_WEIGHT, SUSTAIN_TOTAL, seed_exercise,
};
use mlpt::{
    Aggregates, AllowanceKind, Ammo, AmmoItem, Equipment, EquipmentItem, Exercise,
    PhasingLocation, SqliteStore, StoreError, Unit, UnitType,
};

#[test]
fn exercise_without_equipment_totals_zero() {
    let store = SqliteStore::open_in_memory().unwrap();
    let exercise = store.create_exercise(&Exercise::new("Empty")).unwrap();

    let totals = store.exercise_totals(exercise.id).unwrap();
    assert_eq!(totals.base_allowance_weight, 0);
    assert_eq!(totals.daily_assault_weight, 0);
    assert_eq!(totals.daily_sustain_weight, 0);
    assert_eq!(totals.equipment_weight, 0.0);
    assert_eq!(totals.equipment_count, 0);
}

#[test]
fn unknown_exercise_totals_zero() {
    let store = SqliteStore::open_in_memory().unwrap();
    seed_exercise(&store);
    assert_eq!(store.total_base_allowance_weight(9999).unwrap(), 0);
    assert_eq!(store.total_equipment_count(9999).unwrap(), 0);
}

#[test]
fn seeded_exercise_totals_follow_join_graph() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);

    assert_eq!(
        store.total_base_allowance_weight(seeded.exercise).unwrap(),
        BASE_TOTAL
    );
    assert_eq!(
        store.total_daily_assault_weight(seeded.exercise).unwrap(),
        ASSAULT_TOTAL
    );
    assert_eq!(
        store.total_daily_sustain_weight(seeded.exercise).unwrap(),
        SUSTAIN_TOTAL
    );
    assert_eq!(
        store.total_equipment_weight(seeded.exercise).unwrap(),
        EQUIPMENT_WEIGHT
    );
    assert_eq!(
        store.total_equipment_count(seeded.exercise).unwrap(),
        EQUIPMENT_COUNT
    );
    assert_eq!(
        store
            .total_allowance_weight(seeded.exercise, AllowanceKind::DailyAssault)
            .unwrap(),
        ASSAULT_TOTAL
    );
}

#[test]
fn base_allowance_is_linear_in_quantity() {
    let store = SqliteStore::open_in_memory().unwrap();
    let ammo = store.create_ammo(&Ammo::new("7.62mm", 3)).unwrap();
    let item = AmmoItem::new(ammo.id, UnitType::GroundCombatElement).with_allowances(8, 0, 0);
    let item = store.create_ammo_item(&item).unwrap();
    let gun = store.create_equipment(&Equipment::new("M240", 27.0)).unwrap();
    store.add_combat_load(gun.id, item.id).unwrap();
    let mut guns = store
        .create_equipment_item(&EquipmentItem::new(gun.id, PhasingLocation::Assault, 5))
        .unwrap();
    let unit = store.create_unit(&Unit::new("Weapons Company")).unwrap();
    let exercise = store.create_exercise(&Exercise::new("Linear")).unwrap();
    store.add_edl_entry(exercise.id, unit.id, guns.id).unwrap();

    let single = store.total_base_allowance_weight(exercise.id).unwrap();
    assert_eq!(single, 3 * 8 * 5);

    guns.quantity *= 2;
    assert!(store.update_equipment_item(&guns).unwrap());
    let doubled = store.total_base_allowance_weight(exercise.id).unwrap();
    assert_eq!(doubled, 2 * single);
    assert_eq!(store.total_equipment_weight(exercise.id).unwrap(), 27.0 * 10.0);
}

#[test]
fn totals_are_additive_across_lines() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);
    let before = store.total_base_allowance_weight(seeded.exercise).unwrap();

    let extra = store
        .create_equipment_item(&EquipmentItem::new(seeded.rifle, PhasingLocation::FollowOn, 4))
        .unwrap();
    store
        .add_edl_entry(seeded.exercise, seeded.battalion, extra.id)
        .unwrap();

    let after = store.total_base_allowance_weight(seeded.exercise).unwrap();
    assert_eq!(after, before + 2 * 10 * 4);
    assert_eq!(
        store.total_equipment_count(seeded.exercise).unwrap(),
        EQUIPMENT_COUNT + 4
    );
}

#[test]
fn totals_are_scoped_to_the_exercise() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);
    let other = store.create_exercise(&Exercise::new("Other")).unwrap();
    store
        .add_edl_entry(other.id, seeded.battalion, seeded.rifles)
        .unwrap();

    assert_eq!(
        store.total_base_allowance_weight(other.id).unwrap(),
        2 * 10 * 30
    );
    assert_eq!(
        store.total_base_allowance_weight(seeded.exercise).unwrap(),
        BASE_TOTAL
    );
}

#[test]
fn deleting_ammo_cascades_and_totals_recompute() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);

    assert!(store.delete_ammo(seeded.tank_ammo).unwrap());

    assert!(store.get_ammo_item(seeded.tank_item).unwrap().is_none());
    let loads = store.combat_loads(seeded.tank).unwrap();
    assert_eq!(loads.len(), 1);
    assert_eq!(loads[0].ammo_item.id, seeded.rifle_item);
    assert_eq!(store.list_combat_loads().unwrap().len(), 2);

    assert_eq!(
        store.total_base_allowance_weight(seeded.exercise).unwrap(),
        2 * 10 * 30 + 2 * 10 * 2
    );
    assert_eq!(
        store.total_daily_sustain_weight(seeded.exercise).unwrap(),
        2 * 3 * 30 + 2 * 3 * 2
    );
    // Equipment is untouched.
    assert_eq!(
        store.total_equipment_weight(seeded.exercise).unwrap(),
        EQUIPMENT_WEIGHT
    );
}

#[test]
fn combat_loads_list_allowances_in_order() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);

    let loads = store.combat_loads(seeded.tank).unwrap();
    let names: Vec<String> = loads.iter().map(|l| l.to_string()).collect();
    assert_eq!(names, vec!["120mm HEAT", "5.56mm Ball"]);
    assert_eq!(loads[0].ammo_item.base_allocation, 4);
    assert_eq!(loads[0].ammo_weight, 50);
    assert_eq!(loads[1].ammo_item.id, seeded.rifle_item);

    let no_loads = store
        .create_equipment(&Equipment::new("HMMWV", 5_900.0))
        .unwrap();
    assert!(store.combat_loads(no_loads.id).unwrap().is_empty());
}

#[test]
fn exercise_totals_summary_lists_every_total() {
    let store = SqliteStore::open_in_memory().unwrap();
    let seeded = seed_exercise(&store);
    let totals = store.exercise_totals(seeded.exercise).unwrap();

    assert_eq!(totals.exercise_id, seeded.exercise);
    let summary = totals.to_cli_summary();
    assert!(summary.contains(&format!("base_allowance={BASE_TOTAL}")));
    assert!(summary.contains(&format!("equipment={EQUIPMENT_COUNT}")));
}

#[test]
fn allowance_weight_overflow_is_reported_as_invalid_data() {
    let store = SqliteStore::open_in_memory().unwrap();
    let ammo = store
        .create_ammo(&Ammo::new("Heavy", 2_000_000_000))
        .unwrap();
    let item =
        AmmoItem::new(ammo.id, UnitType::GroundCombatElement).with_allowances(u32::MAX, 1, 0);
    let item = store.create_ammo_item(&item).unwrap();
    let equipment = store.create_equipment(&Equipment::new("Mule", 1.0)).unwrap();
    store.add_combat_load(equipment.id, item.id).unwrap();
    let eitem = store
        .create_equipment_item(&EquipmentItem::new(
            equipment.id,
            PhasingLocation::Assault,
            u32::MAX,
        ))
        .unwrap();
    let unit = store.create_unit(&Unit::new("Depot")).unwrap();
    let exercise = store.create_exercise(&Exercise::new("Overload")).unwrap();
    store.add_edl_entry(exercise.id, unit.id, eitem.id).unwrap();

    let err = store.total_base_allowance_weight(exercise.id).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)), "unexpected error: {err}");
    assert!(err.to_string().contains("overflows i64"));

    // Totals that still fit are unaffected.
    assert_eq!(
        store.total_daily_assault_weight(exercise.id).unwrap(),
        2_000_000_000 * i64::from(u32::MAX)
    );

    let err = store.edl_weight_rows(exercise.id).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}
