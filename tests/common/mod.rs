#![allow(dead_code)]

use mlpt::{
    Ammo, AmmoItem, Equipment, EquipmentItem, Exercise, PhasingLocation, SqliteStore, Unit,
    UnitType,
};

/// Ids of the rows created by [`seed_exercise`].
pub struct Seeded {
    pub rifle_ammo: i64,
    pub tank_ammo: i64,
    pub rifle_item: i64,
    pub tank_item: i64,
    pub rifle: i64,
    pub tank: i64,
    pub rifles: i64,
    pub tanks: i64,
    pub battalion: i64,
    pub tank_company: i64,
    pub exercise: i64,
}

// Expected totals for the seeded exercise.
//   rifle line: 30 rifles carrying 5.56mm (weight 2; 10/5/3)
//   tank line:  2 tanks carrying 120mm (weight 50; 4/2/1) and 5.56mm
pub const BASE_TOTAL: i64 = 2 * 10 * 30 + (50 * 4 + 2 * 10) * 2;
pub const ASSAULT_TOTAL: i64 = 2 * 5 * 30 + (50 * 2 + 2 * 5) * 2;
pub const SUSTAIN_TOTAL: i64 = 2 * 3 * 30 + (50 + 2 * 3) * 2;
pub const EQUIPMENT_WEIGHT: f64 = 30.0 * 7.0 + 2.0 * 120_000.0;
pub const EQUIPMENT_COUNT: i64 = 32;

pub fn seed_exercise(store: &SqliteStore) -> Seeded {
    let rifle_ammo = store.create_ammo(&Ammo::new("5.56mm Ball", 2)).unwrap();
    let tank_ammo = store.create_ammo(&Ammo::new("120mm HEAT", 50)).unwrap();

    let rifle_item = store
        .create_ammo_item(
            &AmmoItem::new(rifle_ammo.id, UnitType::GroundCombatElement).with_allowances(10, 5, 3),
        )
        .unwrap();
    let tank_item = store
        .create_ammo_item(
            &AmmoItem::new(tank_ammo.id, UnitType::GroundCombatElement).with_allowances(4, 2, 1),
        )
        .unwrap();

    let rifle = store.create_equipment(&Equipment::new("M4 Carbine", 7.0)).unwrap();
    let tank = store
        .create_equipment(&Equipment::new("M1A1 Abrams", 120_000.0).with_fuel(500, 56.6))
        .unwrap();

    store.add_combat_load(rifle.id, rifle_item.id).unwrap();
    store.add_combat_load(tank.id, tank_item.id).unwrap();
    store.add_combat_load(tank.id, rifle_item.id).unwrap();

    let rifles = store
        .create_equipment_item(&EquipmentItem::new(rifle.id, PhasingLocation::Assault, 30))
        .unwrap();
    let tanks = store
        .create_equipment_item(&EquipmentItem::new(tank.id, PhasingLocation::FollowOn, 2))
        .unwrap();

    let battalion = store.create_unit(&Unit::new("1st Battalion")).unwrap();
    let tank_company = store.create_unit(&Unit::new("Tank Company")).unwrap();
    let exercise = store.create_exercise(&Exercise::new("Steel Knight")).unwrap();

    store
        .add_edl_entry(exercise.id, battalion.id, rifles.id)
        .unwrap();
    store
        .add_edl_entry(exercise.id, tank_company.id, tanks.id)
        .unwrap();

    Seeded {
        rifle_ammo: rifle_ammo.id,
        tank_ammo: tank_ammo.id,
        rifle_item: rifle_item.id,
        tank_item: tank_item.id,
        rifle: rifle.id,
        tank: tank.id,
        rifles: rifles.id,
        tanks: tanks.id,
        battalion: battalion.id,
        tank_company: tank_company.id,
        exercise: exercise.id,
    }
}
