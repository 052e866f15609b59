use super::{StoreError, StoreResult};
use crate::config::DatabaseLocation;
use crate::exercise::{ExerciseEdl, ExerciseUnit};
use crate::{Ammo, AmmoItem, CombatLoad, Equipment, EquipmentItem, Exercise, Unit};
use parking_lot::Mutex;
use rusqlite::types::Value;
use rusqlite::{Connection, Row, params};
use tracing::{debug, info};

const SCHEMA: &str = r#"
    PRAGMA foreign_keys = ON;
    CREATE TABLE IF NOT EXISTS ammo (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        weight INTEGER NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS ammo_item (
        id INTEGER PRIMARY KEY,
        ammo_id INTEGER NOT NULL REFERENCES ammo(id) ON DELETE CASCADE,
        unit_type TEXT NOT NULL DEFAULT 'G' CHECK (unit_type IN ('G', 'N')),
        base_allocation INTEGER NOT NULL DEFAULT 0 CHECK (base_allocation >= 0),
        daily_assault INTEGER NOT NULL DEFAULT 0 CHECK (daily_assault >= 0),
        daily_sustain INTEGER NOT NULL DEFAULT 0 CHECK (daily_sustain >= 0)
    );
    CREATE TABLE IF NOT EXISTS equipment (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL,
        fuel_capacity INTEGER NOT NULL DEFAULT 0,
        burn_rate REAL NOT NULL DEFAULT 0,
        weight REAL NOT NULL DEFAULT 0
    );
    CREATE TABLE IF NOT EXISTS equipment_item (
        id INTEGER PRIMARY KEY,
        equipment_id INTEGER NOT NULL REFERENCES equipment(id) ON DELETE CASCADE,
        phasing_location TEXT NOT NULL DEFAULT 'AE' CHECK (phasing_location IN ('AE', 'AFOE')),
        quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0)
    );
    CREATE TABLE IF NOT EXISTS combat_load (
        id INTEGER PRIMARY KEY,
        equipment_id INTEGER NOT NULL REFERENCES equipment(id) ON DELETE CASCADE,
        ammo_item_id INTEGER NOT NULL REFERENCES ammo_item(id) ON DELETE CASCADE
    );
    CREATE TABLE IF NOT EXISTS unit (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS exercise (
        id INTEGER PRIMARY KEY,
        name TEXT NOT NULL
    );
    CREATE TABLE IF NOT EXISTS exercise_unit (
        exercise_id INTEGER NOT NULL REFERENCES exercise(id) ON DELETE CASCADE,
        unit_id INTEGER NOT NULL REFERENCES unit(id) ON DELETE CASCADE,
        PRIMARY KEY (exercise_id, unit_id)
    );
    CREATE TABLE IF NOT EXISTS exercise_edl (
        id INTEGER PRIMARY KEY,
        exercise_id INTEGER NOT NULL REFERENCES exercise(id) ON DELETE CASCADE,
        unit_id INTEGER NOT NULL REFERENCES unit(id) ON DELETE CASCADE,
        equipment_item_id INTEGER NOT NULL REFERENCES equipment_item(id) ON DELETE CASCADE
    );
    CREATE INDEX IF NOT EXISTS idx_ammo_item_ammo ON ammo_item(ammo_id);
    CREATE INDEX IF NOT EXISTS idx_equipment_item_equipment ON equipment_item(equipment_id);
    CREATE INDEX IF NOT EXISTS idx_combat_load_equipment ON combat_load(equipment_id);
    CREATE INDEX IF NOT EXISTS idx_combat_load_ammo_item ON combat_load(ammo_item_id);
    CREATE INDEX IF NOT EXISTS idx_exercise_edl_exercise ON exercise_edl(exercise_id);
    CREATE INDEX IF NOT EXISTS idx_exercise_edl_equipment_item ON exercise_edl(equipment_item_id);
"#;

/// Tables in dependency order: parents before the rows that reference them.
const TABLES: [&str; 9] = [
    "ammo",
    "ammo_item",
    "equipment",
    "equipment_item",
    "combat_load",
    "unit",
    "exercise",
    "exercise_unit",
    "exercise_edl",
];

/// SQLite-backed store for the exercise planning schema.
pub struct SqliteStore {
    connection: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        info!(path = %path.display(), "opened sqlite store");
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        debug!("opened in-memory sqlite store");
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    /// Opens the store the configuration points at.
    pub fn open(location: &DatabaseLocation) -> StoreResult<Self> {
        match location {
            DatabaseLocation::Memory => Self::open_in_memory(),
            DatabaseLocation::File(path) => Self::new(path),
        }
    }

    fn initialize_schema(connection: &Connection) -> StoreResult<()> {
        connection.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn with_connection<T>(
        &self,
        f: impl FnOnce(&Connection) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let conn = self.connection.lock();
        f(&conn)
    }

    pub(crate) fn with_transaction<T>(
        &self,
        f: impl FnOnce(&rusqlite::Transaction<'_>) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let mut conn = self.connection.lock();
        let tx = conn.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// True when none of the tables hold any rows.
    pub fn is_empty(&self) -> StoreResult<bool> {
        self.with_connection(|conn| {
            for table in TABLES {
                let count: i64 =
                    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                        row.get(0)
                    })?;
                if count > 0 {
                    return Ok(false);
                }
            }
            Ok(true)
        })
    }

    pub(crate) fn all_exercise_units(&self) -> StoreResult<Vec<ExerciseUnit>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT exercise_id, unit_id FROM exercise_unit ORDER BY exercise_id, unit_id",
            )?;
            let rows = stmt.query_map([], |row| {
                Ok(ExerciseUnit {
                    exercise_id: row.get(0)?,
                    unit_id: row.get(1)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub(crate) fn all_edl_entries(&self) -> StoreResult<Vec<ExerciseEdl>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, exercise_id, unit_id, equipment_item_id FROM exercise_edl ORDER BY id",
            )?;
            let rows = stmt.query_map([], edl_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Inserts rows with their existing ids. Used to restore snapshots, so the
    /// store must be empty.
    pub(crate) fn restore_rows(&self, rows: RestoreRows<'_>) -> StoreResult<()> {
        if !self.is_empty()? {
            return Err(StoreError::InvalidData(
                "snapshots can only be restored into an empty store".into(),
            ));
        }
        self.with_transaction(|tx| {
            {
                let mut stmt = tx.prepare("INSERT INTO ammo (id, name, weight) VALUES (?1, ?2, ?3)")?;
                for ammo in rows.ammo {
                    stmt.execute(params![ammo.id, ammo.name, ammo.weight])?;
                }
            }
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO ammo_item (id, ammo_id, unit_type, base_allocation, daily_assault, daily_sustain)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                )?;
                for item in rows.ammo_items {
                    stmt.execute(params![
                        item.id,
                        item.ammo_id,
                        item.unit_type,
                        item.base_allocation,
                        item.daily_assault,
                        item.daily_sustain
                    ])?;
                }
            }
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO equipment (id, name, fuel_capacity, burn_rate, weight)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                )?;
                for equipment in rows.equipment {
                    stmt.execute(params![
                        equipment.id,
                        equipment.name,
                        equipment.fuel_capacity,
                        equipment.burn_rate,
                        equipment.weight
                    ])?;
                }
            }
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO equipment_item (id, equipment_id, phasing_location, quantity)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for item in rows.equipment_items {
                    stmt.execute(params![
                        item.id,
                        item.equipment_id,
                        item.phasing_location,
                        item.quantity
                    ])?;
                }
            }
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO combat_load (id, equipment_id, ammo_item_id) VALUES (?1, ?2, ?3)",
                )?;
                for load in rows.combat_loads {
                    stmt.execute(params![load.id, load.equipment_id, load.ammo_item_id])?;
                }
            }
            {
                let mut stmt = tx.prepare("INSERT INTO unit (id, name) VALUES (?1, ?2)")?;
                for unit in rows.units {
                    stmt.execute(params![unit.id, unit.name])?;
                }
            }
            {
                let mut stmt = tx.prepare("INSERT INTO exercise (id, name) VALUES (?1, ?2)")?;
                for exercise in rows.exercises {
                    stmt.execute(params![exercise.id, exercise.name])?;
                }
            }
            {
                let mut stmt =
                    tx.prepare("INSERT INTO exercise_unit (exercise_id, unit_id) VALUES (?1, ?2)")?;
                for link in rows.exercise_units {
                    stmt.execute(params![link.exercise_id, link.unit_id])?;
                }
            }
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO exercise_edl (id, exercise_id, unit_id, equipment_item_id)
                     VALUES (?1, ?2, ?3, ?4)",
                )?;
                for entry in rows.edl {
                    stmt.execute(params![
                        entry.id,
                        entry.exercise_id,
                        entry.unit_id,
                        entry.equipment_item_id
                    ])?;
                }
            }
            Ok(())
        })?;
        info!(
            ammo = rows.ammo.len(),
            equipment = rows.equipment.len(),
            exercises = rows.exercises.len(),
            "restored snapshot"
        );
        Ok(())
    }
}

/// Borrowed table contents handed to [`SqliteStore::restore_rows`].
pub(crate) struct RestoreRows<'a> {
    pub ammo: &'a [Ammo],
    pub ammo_items: &'a [AmmoItem],
    pub equipment: &'a [Equipment],
    pub equipment_items: &'a [EquipmentItem],
    pub combat_loads: &'a [CombatLoad],
    pub units: &'a [Unit],
    pub exercises: &'a [Exercise],
    pub exercise_units: &'a [ExerciseUnit],
    pub edl: &'a [ExerciseEdl],
}

pub(crate) fn ammo_from_row(row: &Row<'_>) -> rusqlite::Result<Ammo> {
    Ok(Ammo {
        id: row.get(0)?,
        name: row.get(1)?,
        weight: row.get(2)?,
    })
}

pub(crate) fn ammo_item_from_row(row: &Row<'_>) -> rusqlite::Result<AmmoItem> {
    Ok(AmmoItem {
        id: row.get(0)?,
        ammo_id: row.get(1)?,
        unit_type: row.get(2)?,
        base_allocation: row.get(3)?,
        daily_assault: row.get(4)?,
        daily_sustain: row.get(5)?,
    })
}

pub(crate) fn equipment_from_row(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    Ok(Equipment {
        id: row.get(0)?,
        name: row.get(1)?,
        fuel_capacity: row.get(2)?,
        burn_rate: row.get(3)?,
        weight: row.get(4)?,
    })
}

pub(crate) fn equipment_item_from_row(row: &Row<'_>) -> rusqlite::Result<EquipmentItem> {
    Ok(EquipmentItem {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        phasing_location: row.get(2)?,
        quantity: row.get(3)?,
    })
}

pub(crate) fn combat_load_from_row(row: &Row<'_>) -> rusqlite::Result<CombatLoad> {
    Ok(CombatLoad {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        ammo_item_id: row.get(2)?,
    })
}

pub(crate) fn unit_from_row(row: &Row<'_>) -> rusqlite::Result<Unit> {
    Ok(Unit {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn exercise_from_row(row: &Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

pub(crate) fn edl_from_row(row: &Row<'_>) -> rusqlite::Result<ExerciseEdl> {
    Ok(ExerciseEdl {
        id: row.get(0)?,
        exercise_id: row.get(1)?,
        unit_id: row.get(2)?,
        equipment_item_id: row.get(3)?,
    })
}

/// Reads a summed ammunition weight. SQLite turns an integer product that
/// overflows i64 into a REAL, which is reported instead of truncated.
pub(crate) fn allowance_weight(value: Value) -> StoreResult<i64> {
    match value {
        Value::Null => Ok(0),
        Value::Integer(weight) => Ok(weight),
        Value::Real(_) => Err(StoreError::InvalidData(
            "allowance weight overflows i64".into(),
        )),
        other => Err(StoreError::InvalidData(format!(
            "unexpected allowance weight {other:?}"
        ))),
    }
}
