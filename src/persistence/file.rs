use super::sqlite::RestoreRows;
use super::{SqliteStore, StoreError, StoreResult};
use crate::exercise::{ExerciseEdl, ExerciseUnit};
use crate::{Ammo, AmmoItem, CombatLoad, Equipment, EquipmentItem, Exercise, Unit};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;
use tracing::info;

/// Every table of a store, serialized together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub ammo: Vec<Ammo>,
    #[serde(default)]
    pub ammo_items: Vec<AmmoItem>,
    #[serde(default)]
    pub equipment: Vec<Equipment>,
    #[serde(default)]
    pub equipment_items: Vec<EquipmentItem>,
    #[serde(default)]
    pub combat_loads: Vec<CombatLoad>,
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub exercise_units: Vec<ExerciseUnit>,
    #[serde(default)]
    pub edl: Vec<ExerciseEdl>,
}

impl StoreSnapshot {
    pub fn from_store(store: &SqliteStore) -> StoreResult<Self> {
        Ok(Self {
            exported_at: Utc::now(),
            ammo: store.list_ammo()?,
            ammo_items: store.list_ammo_items()?,
            equipment: store.list_equipment()?,
            equipment_items: store.list_equipment_items()?,
            combat_loads: store.list_combat_loads()?,
            units: store.list_units()?,
            exercises: store.list_exercises()?,
            exercise_units: store.all_exercise_units()?,
            edl: store.all_edl_entries()?,
        })
    }

    fn validate(&self) -> StoreResult<()> {
        check_unique_ids("ammo", self.ammo.iter().map(|r| r.id))?;
        check_unique_ids("ammo_items", self.ammo_items.iter().map(|r| r.id))?;
        check_unique_ids("equipment", self.equipment.iter().map(|r| r.id))?;
        check_unique_ids("equipment_items", self.equipment_items.iter().map(|r| r.id))?;
        check_unique_ids("combat_loads", self.combat_loads.iter().map(|r| r.id))?;
        check_unique_ids("units", self.units.iter().map(|r| r.id))?;
        check_unique_ids("exercises", self.exercises.iter().map(|r| r.id))?;
        check_unique_ids("edl", self.edl.iter().map(|r| r.id))?;
        for ammo in &self.ammo {
            crate::validation::validate_ammo(ammo)?;
        }
        for equipment in &self.equipment {
            crate::validation::validate_equipment(equipment)?;
        }
        for unit in &self.units {
            crate::validation::validate_unit(unit)?;
        }
        for exercise in &self.exercises {
            crate::validation::validate_exercise(exercise)?;
        }
        Ok(())
    }

    /// Writes every row into `store`, keeping ids. The store must be empty.
    pub fn restore_into(&self, store: &SqliteStore) -> StoreResult<()> {
        self.validate()?;
        store.restore_rows(RestoreRows {
            ammo: &self.ammo,
            ammo_items: &self.ammo_items,
            equipment: &self.equipment,
            equipment_items: &self.equipment_items,
            combat_loads: &self.combat_loads,
            units: &self.units,
            exercises: &self.exercises,
            exercise_units: &self.exercise_units,
            edl: &self.edl,
        })
    }
}

fn check_unique_ids(table: &str, ids: impl Iterator<Item = i64>) -> StoreResult<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if id <= 0 {
            return Err(StoreError::InvalidData(format!(
                "{table} row has invalid id {id}"
            )));
        }
        if !seen.insert(id) {
            return Err(StoreError::InvalidData(format!(
                "{table} contains duplicate id {id}"
            )));
        }
    }
    Ok(())
}

pub fn save_store_to_json<P: AsRef<Path>>(store: &SqliteStore, path: P) -> StoreResult<()> {
    let snapshot = StoreSnapshot::from_store(store)?;
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, &snapshot)?;
    info!(path = %path.as_ref().display(), "saved json snapshot");
    Ok(())
}

/// Reads a snapshot and restores it into `store`, which must be empty.
pub fn load_store_from_json<P: AsRef<Path>>(
    store: &SqliteStore,
    path: P,
) -> StoreResult<StoreSnapshot> {
    let file = File::open(path.as_ref())?;
    let snapshot: StoreSnapshot = serde_json::from_reader(file)?;
    snapshot.restore_into(store)?;
    info!(path = %path.as_ref().display(), "loaded json snapshot");
    Ok(snapshot)
}

#[derive(Debug, Serialize)]
struct EdlCsvRecord<'a> {
    edl_id: i64,
    unit: &'a str,
    equipment: &'a str,
    phasing_location: &'static str,
    quantity: u32,
    equipment_weight: f64,
    base_allowance_weight: i64,
    daily_assault_weight: i64,
    daily_sustain_weight: i64,
}

/// Writes one CSV row per EDL line of the exercise. Returns the row count.
pub fn save_edl_to_csv<P: AsRef<Path>>(
    store: &SqliteStore,
    exercise_id: i64,
    path: P,
) -> StoreResult<usize> {
    if store.get_exercise(exercise_id)?.is_none() {
        return Err(StoreError::InvalidData(format!(
            "exercise {exercise_id} does not exist"
        )));
    }
    let rows = store.edl_weight_rows(exercise_id)?;
    let file = File::create(path.as_ref())?;
    let mut writer = csv::Writer::from_writer(file);
    for row in &rows {
        writer.serialize(EdlCsvRecord {
            edl_id: row.edl_id,
            unit: &row.unit,
            equipment: &row.equipment,
            phasing_location: row.phasing_location.code(),
            quantity: row.quantity,
            equipment_weight: row.equipment_weight,
            base_allowance_weight: row.base_allowance_weight,
            daily_assault_weight: row.daily_assault_weight,
            daily_sustain_weight: row.daily_sustain_weight,
        })?;
    }
    writer.flush()?;
    Ok(rows.len())
}
