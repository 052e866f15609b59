use crate::ammo::AmmoItem;
use crate::equipment::CombatLoadLine;
use crate::persistence::sqlite::allowance_weight;
use crate::persistence::{SqliteStore, StoreResult};
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Which ammunition allowance an aggregate multiplies by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowanceKind {
    BaseAllocation,
    DailyAssault,
    DailySustain,
}

impl AllowanceKind {
    fn column(&self) -> &'static str {
        match self {
            AllowanceKind::BaseAllocation => "base_allocation",
            AllowanceKind::DailyAssault => "daily_assault",
            AllowanceKind::DailySustain => "daily_sustain",
        }
    }
}

/// Every exercise-level total in one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseTotals {
    pub exercise_id: i64,
    pub base_allowance_weight: i64,
    pub daily_assault_weight: i64,
    pub daily_sustain_weight: i64,
    pub equipment_weight: f64,
    pub equipment_count: i64,
}

impl ExerciseTotals {
    pub fn to_cli_summary(&self) -> String {
        [
            format!("equipment={}", self.equipment_count),
            format!("equipment_weight={}", self.equipment_weight),
            format!("base_allowance={}", self.base_allowance_weight),
            format!("daily_assault={}", self.daily_assault_weight),
            format!("daily_sustain={}", self.daily_sustain_weight),
        ]
        .join(", ")
    }
}

impl fmt::Display for ExerciseTotals {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_cli_summary())
    }
}

/// Derived totals over the join graph
/// exercise -> EDL -> equipment item -> equipment -> combat load -> ammo item -> ammo.
///
/// Every EDL line of the exercise contributes once. Exercises without
/// equipment, and unknown exercise ids, total zero.
pub trait Aggregates {
    /// Sum of `ammo.weight * allowance * equipment_item.quantity`.
    fn total_allowance_weight(&self, exercise_id: i64, kind: AllowanceKind) -> StoreResult<i64>;

    /// Sum of `equipment_item.quantity * equipment.weight`.
    fn total_equipment_weight(&self, exercise_id: i64) -> StoreResult<f64>;

    /// Sum of `equipment_item.quantity`.
    fn total_equipment_count(&self, exercise_id: i64) -> StoreResult<i64>;

    /// The ammunition allowances linked to an equipment type, in combat load order.
    fn combat_loads(&self, equipment_id: i64) -> StoreResult<Vec<CombatLoadLine>>;

    fn total_base_allowance_weight(&self, exercise_id: i64) -> StoreResult<i64> {
        self.total_allowance_weight(exercise_id, AllowanceKind::BaseAllocation)
    }

    fn total_daily_assault_weight(&self, exercise_id: i64) -> StoreResult<i64> {
        self.total_allowance_weight(exercise_id, AllowanceKind::DailyAssault)
    }

    fn total_daily_sustain_weight(&self, exercise_id: i64) -> StoreResult<i64> {
        self.total_allowance_weight(exercise_id, AllowanceKind::DailySustain)
    }

    fn exercise_totals(&self, exercise_id: i64) -> StoreResult<ExerciseTotals> {
        Ok(ExerciseTotals {
            exercise_id,
            base_allowance_weight: self.total_base_allowance_weight(exercise_id)?,
            daily_assault_weight: self.total_daily_assault_weight(exercise_id)?,
            daily_sustain_weight: self.total_daily_sustain_weight(exercise_id)?,
            equipment_weight: self.total_equipment_weight(exercise_id)?,
            equipment_count: self.total_equipment_count(exercise_id)?,
        })
    }
}

impl Aggregates for SqliteStore {
    fn total_allowance_weight(&self, exercise_id: i64, kind: AllowanceKind) -> StoreResult<i64> {
        // The column name comes from a closed enum, never from input.
        let sql = format!(
            "SELECT COALESCE(SUM(a.weight * ai.{} * ei.quantity), 0)
             FROM exercise_edl edl
             JOIN equipment_item ei ON ei.id = edl.equipment_item_id
             JOIN combat_load cl ON cl.equipment_id = ei.equipment_id
             JOIN ammo_item ai ON ai.id = cl.ammo_item_id
             JOIN ammo a ON a.id = ai.ammo_id
             WHERE edl.exercise_id = ?1",
            kind.column()
        );
        let raw = self.with_connection(|conn| {
            Ok(conn.query_row(&sql, [exercise_id], |row| row.get::<_, Value>(0))?)
        })?;
        let total = allowance_weight(raw)?;
        trace!(exercise_id, ?kind, total, "allowance weight");
        Ok(total)
    }

    fn total_equipment_weight(&self, exercise_id: i64) -> StoreResult<f64> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                "SELECT COALESCE(SUM(ei.quantity * eq.weight), 0.0)
                 FROM exercise_edl edl
                 JOIN equipment_item ei ON ei.id = edl.equipment_item_id
                 JOIN equipment eq ON eq.id = ei.equipment_id
                 WHERE edl.exercise_id = ?1",
                [exercise_id],
                |row| row.get::<_, f64>(0),
            )?)
        })
    }

    fn total_equipment_count(&self, exercise_id: i64) -> StoreResult<i64> {
        self.with_connection(|conn| {
            Ok(conn.query_row(
                "SELECT COALESCE(SUM(ei.quantity), 0)
                 FROM exercise_edl edl
                 JOIN equipment_item ei ON ei.id = edl.equipment_item_id
                 WHERE edl.exercise_id = ?1",
                [exercise_id],
                |row| row.get::<_, i64>(0),
            )?)
        })
    }

    fn combat_loads(&self, equipment_id: i64) -> StoreResult<Vec<CombatLoadLine>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT cl.id, ai.id, ai.ammo_id, ai.unit_type, ai.base_allocation,
                        ai.daily_assault, ai.daily_sustain, a.name, a.weight
                 FROM combat_load cl
                 JOIN ammo_item ai ON ai.id = cl.ammo_item_id
                 JOIN ammo a ON a.id = ai.ammo_id
                 WHERE cl.equipment_id = ?1
                 ORDER BY cl.id",
            )?;
            let rows = stmt.query_map([equipment_id], |row| {
                Ok(CombatLoadLine {
                    combat_load_id: row.get(0)?,
                    ammo_item: AmmoItem {
                        id: row.get(1)?,
                        ammo_id: row.get(2)?,
                        unit_type: row.get(3)?,
                        base_allocation: row.get(4)?,
                        daily_assault: row.get(5)?,
                        daily_sustain: row.get(6)?,
                    },
                    ammo_name: row.get(7)?,
                    ammo_weight: row.get(8)?,
                })
            })?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }
}
