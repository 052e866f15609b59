//! Record operations for units, exercises and their equipment density lists.

use super::StoreResult;
use super::sqlite::{
    SqliteStore, allowance_weight, edl_from_row, exercise_from_row, unit_from_row,
};
use crate::exercise::{EdlLine, EdlWeightRow, ExerciseEdl};
use crate::validation;
use crate::{Exercise, PhasingLocation, Unit};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

impl SqliteStore {
    pub fn create_unit(&self, unit: &Unit) -> StoreResult<Unit> {
        validation::validate_unit(unit)?;
        let id = self.with_connection(|conn| {
            conn.execute("INSERT INTO unit (name) VALUES (?1)", [&unit.name])?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(id, name = %unit.name, "created unit");
        Ok(Unit {
            id,
            name: unit.name.clone(),
        })
    }

    pub fn get_unit(&self, id: i64) -> StoreResult<Option<Unit>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row("SELECT id, name FROM unit WHERE id = ?1", [id], unit_from_row)
                .optional()?)
        })
    }

    pub fn list_units(&self) -> StoreResult<Vec<Unit>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM unit ORDER BY id")?;
            let rows = stmt.query_map([], unit_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn update_unit(&self, unit: &Unit) -> StoreResult<bool> {
        validation::validate_unit(unit)?;
        let changed = self.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE unit SET name = ?2 WHERE id = ?1",
                params![unit.id, unit.name],
            )?)
        })?;
        Ok(changed > 0)
    }

    pub fn delete_unit(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM unit WHERE id = ?1", [id])?)
        })?;
        if removed > 0 {
            info!(id, "deleted unit");
        }
        Ok(removed > 0)
    }

    pub fn create_exercise(&self, exercise: &Exercise) -> StoreResult<Exercise> {
        validation::validate_exercise(exercise)?;
        let id = self.with_connection(|conn| {
            conn.execute("INSERT INTO exercise (name) VALUES (?1)", [&exercise.name])?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(id, name = %exercise.name, "created exercise");
        Ok(Exercise {
            id,
            name: exercise.name.clone(),
        })
    }

    pub fn get_exercise(&self, id: i64) -> StoreResult<Option<Exercise>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, name FROM exercise WHERE id = ?1",
                    [id],
                    exercise_from_row,
                )
                .optional()?)
        })
    }

    pub fn list_exercises(&self) -> StoreResult<Vec<Exercise>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, name FROM exercise ORDER BY id")?;
            let rows = stmt.query_map([], exercise_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn update_exercise(&self, exercise: &Exercise) -> StoreResult<bool> {
        validation::validate_exercise(exercise)?;
        let changed = self.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE exercise SET name = ?2 WHERE id = ?1",
                params![exercise.id, exercise.name],
            )?)
        })?;
        Ok(changed > 0)
    }

    pub fn delete_exercise(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM exercise WHERE id = ?1", [id])?)
        })?;
        if removed > 0 {
            info!(id, "deleted exercise");
        }
        Ok(removed > 0)
    }

    /// Links a unit to an exercise. Returns false when the link already existed.
    pub fn add_exercise_unit(&self, exercise_id: i64, unit_id: i64) -> StoreResult<bool> {
        let inserted = self.with_connection(|conn| {
            Ok(conn.execute(
                "INSERT OR IGNORE INTO exercise_unit (exercise_id, unit_id) VALUES (?1, ?2)",
                params![exercise_id, unit_id],
            )?)
        })?;
        Ok(inserted > 0)
    }

    pub fn remove_exercise_unit(&self, exercise_id: i64, unit_id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute(
                "DELETE FROM exercise_unit WHERE exercise_id = ?1 AND unit_id = ?2",
                params![exercise_id, unit_id],
            )?)
        })?;
        Ok(removed > 0)
    }

    pub fn exercise_units(&self, exercise_id: i64) -> StoreResult<Vec<Unit>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.name FROM unit u
                 JOIN exercise_unit eu ON eu.unit_id = u.id
                 WHERE eu.exercise_id = ?1
                 ORDER BY u.id",
            )?;
            let rows = stmt.query_map([exercise_id], unit_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Places an equipment item in the exercise EDL under the given unit. The
    /// unit is linked to the exercise in the same transaction.
    pub fn add_edl_entry(
        &self,
        exercise_id: i64,
        unit_id: i64,
        equipment_item_id: i64,
    ) -> StoreResult<ExerciseEdl> {
        let id = self.with_transaction(|tx| {
            tx.execute(
                "INSERT INTO exercise_edl (exercise_id, unit_id, equipment_item_id) VALUES (?1, ?2, ?3)",
                params![exercise_id, unit_id, equipment_item_id],
            )?;
            let id = tx.last_insert_rowid();
            tx.execute(
                "INSERT OR IGNORE INTO exercise_unit (exercise_id, unit_id) VALUES (?1, ?2)",
                params![exercise_id, unit_id],
            )?;
            Ok(id)
        })?;
        debug!(id, exercise_id, unit_id, equipment_item_id, "added edl entry");
        Ok(ExerciseEdl {
            id,
            exercise_id,
            unit_id,
            equipment_item_id,
        })
    }

    pub fn get_edl_entry(&self, id: i64) -> StoreResult<Option<ExerciseEdl>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, exercise_id, unit_id, equipment_item_id FROM exercise_edl WHERE id = ?1",
                    [id],
                    edl_from_row,
                )
                .optional()?)
        })
    }

    pub fn remove_edl_entry(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM exercise_edl WHERE id = ?1", [id])?)
        })?;
        Ok(removed > 0)
    }

    pub fn edl_lines(&self, exercise_id: i64) -> StoreResult<Vec<EdlLine>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT edl.id, x.name, u.name, ei.id, eq.name, ei.phasing_location, ei.quantity
                 FROM exercise_edl edl
                 JOIN exercise x ON x.id = edl.exercise_id
                 JOIN unit u ON u.id = edl.unit_id
                 JOIN equipment_item ei ON ei.id = edl.equipment_item_id
                 JOIN equipment eq ON eq.id = ei.equipment_id
                 WHERE edl.exercise_id = ?1
                 ORDER BY edl.id",
            )?;
            let rows = stmt.query_map([exercise_id], |row| {
                Ok(EdlLine {
                    edl_id: row.get(0)?,
                    exercise_name: row.get(1)?,
                    unit_name: row.get(2)?,
                    equipment_item_id: row.get(3)?,
                    equipment_name: row.get(4)?,
                    phasing_location: row.get(5)?,
                    quantity: row.get(6)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Each EDL line with its equipment weight and the ammunition weight its
    /// combat loads contribute. Summing a column gives the matching exercise
    /// total.
    pub fn edl_weight_rows(&self, exercise_id: i64) -> StoreResult<Vec<EdlWeightRow>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT edl.id, u.name, eq.name, ei.phasing_location, ei.quantity,
                        ei.quantity * eq.weight,
                        ei.quantity * COALESCE(loads.base, 0),
                        ei.quantity * COALESCE(loads.assault, 0),
                        ei.quantity * COALESCE(loads.sustain, 0)
                 FROM exercise_edl edl
                 JOIN unit u ON u.id = edl.unit_id
                 JOIN equipment_item ei ON ei.id = edl.equipment_item_id
                 JOIN equipment eq ON eq.id = ei.equipment_id
                 LEFT JOIN (
                     SELECT cl.equipment_id,
                            SUM(a.weight * ai.base_allocation) AS base,
                            SUM(a.weight * ai.daily_assault) AS assault,
                            SUM(a.weight * ai.daily_sustain) AS sustain
                     FROM combat_load cl
                     JOIN ammo_item ai ON ai.id = cl.ammo_item_id
                     JOIN ammo a ON a.id = ai.ammo_id
                     GROUP BY cl.equipment_id
                 ) loads ON loads.equipment_id = ei.equipment_id
                 WHERE edl.exercise_id = ?1
                 ORDER BY edl.id",
            )?;
            let rows = stmt.query_map([exercise_id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, PhasingLocation>(3)?,
                    row.get::<_, u32>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, Value>(6)?,
                    row.get::<_, Value>(7)?,
                    row.get::<_, Value>(8)?,
                ))
            })?;
            rows.map(|row| {
                let (
                    edl_id,
                    unit,
                    equipment,
                    phasing_location,
                    quantity,
                    weight,
                    base,
                    assault,
                    sustain,
                ) = row?;
                Ok(EdlWeightRow {
                    edl_id,
                    unit,
                    equipment,
                    phasing_location,
                    quantity,
                    equipment_weight: weight,
                    base_allowance_weight: allowance_weight(base)?,
                    daily_assault_weight: allowance_weight(assault)?,
                    daily_sustain_weight: allowance_weight(sustain)?,
                })
            })
            .collect()
        })
    }
}
