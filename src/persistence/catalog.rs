//! Record operations for the ammunition and equipment catalog.

use super::StoreResult;
use super::sqlite::{
    SqliteStore, ammo_from_row, ammo_item_from_row, combat_load_from_row, equipment_from_row,
    equipment_item_from_row,
};
use crate::validation;
use crate::{Ammo, AmmoItem, CombatLoad, Equipment, EquipmentItem};
use rusqlite::{OptionalExtension, params};
use tracing::{debug, info};

impl SqliteStore {
    pub fn create_ammo(&self, ammo: &Ammo) -> StoreResult<Ammo> {
        validation::validate_ammo(ammo)?;
        let id = self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO ammo (name, weight) VALUES (?1, ?2)",
                params![ammo.name, ammo.weight],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(id, name = %ammo.name, "created ammo");
        Ok(Ammo { id, ..ammo.clone() })
    }

    pub fn get_ammo(&self, id: i64) -> StoreResult<Option<Ammo>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, name, weight FROM ammo WHERE id = ?1",
                    [id],
                    ammo_from_row,
                )
                .optional()?)
        })
    }

    pub fn list_ammo(&self) -> StoreResult<Vec<Ammo>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, weight FROM ammo ORDER BY id")?;
            let rows = stmt.query_map([], ammo_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn update_ammo(&self, ammo: &Ammo) -> StoreResult<bool> {
        validation::validate_ammo(ammo)?;
        let changed = self.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE ammo SET name = ?2, weight = ?3 WHERE id = ?1",
                params![ammo.id, ammo.name, ammo.weight],
            )?)
        })?;
        Ok(changed > 0)
    }

    /// Removes the ammo along with its allowance profiles and any combat loads
    /// that referenced them.
    pub fn delete_ammo(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM ammo WHERE id = ?1", [id])?)
        })?;
        if removed > 0 {
            info!(id, "deleted ammo");
        }
        Ok(removed > 0)
    }

    pub fn create_ammo_item(&self, item: &AmmoItem) -> StoreResult<AmmoItem> {
        let id = self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO ammo_item (ammo_id, unit_type, base_allocation, daily_assault, daily_sustain)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    item.ammo_id,
                    item.unit_type,
                    item.base_allocation,
                    item.daily_assault,
                    item.daily_sustain
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(id, ammo_id = item.ammo_id, "created ammo item");
        Ok(AmmoItem { id, ..item.clone() })
    }

    pub fn get_ammo_item(&self, id: i64) -> StoreResult<Option<AmmoItem>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, ammo_id, unit_type, base_allocation, daily_assault, daily_sustain
                     FROM ammo_item WHERE id = ?1",
                    [id],
                    ammo_item_from_row,
                )
                .optional()?)
        })
    }

    pub fn list_ammo_items(&self) -> StoreResult<Vec<AmmoItem>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, ammo_id, unit_type, base_allocation, daily_assault, daily_sustain
                 FROM ammo_item ORDER BY id",
            )?;
            let rows = stmt.query_map([], ammo_item_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn update_ammo_item(&self, item: &AmmoItem) -> StoreResult<bool> {
        let changed = self.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE ammo_item
                 SET ammo_id = ?2, unit_type = ?3, base_allocation = ?4, daily_assault = ?5, daily_sustain = ?6
                 WHERE id = ?1",
                params![
                    item.id,
                    item.ammo_id,
                    item.unit_type,
                    item.base_allocation,
                    item.daily_assault,
                    item.daily_sustain
                ],
            )?)
        })?;
        Ok(changed > 0)
    }

    pub fn delete_ammo_item(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM ammo_item WHERE id = ?1", [id])?)
        })?;
        Ok(removed > 0)
    }

    pub fn create_equipment(&self, equipment: &Equipment) -> StoreResult<Equipment> {
        validation::validate_equipment(equipment)?;
        let id = self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO equipment (name, fuel_capacity, burn_rate, weight) VALUES (?1, ?2, ?3, ?4)",
                params![
                    equipment.name,
                    equipment.fuel_capacity,
                    equipment.burn_rate,
                    equipment.weight
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(id, name = %equipment.name, "created equipment");
        Ok(Equipment {
            id,
            ..equipment.clone()
        })
    }

    pub fn get_equipment(&self, id: i64) -> StoreResult<Option<Equipment>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, name, fuel_capacity, burn_rate, weight FROM equipment WHERE id = ?1",
                    [id],
                    equipment_from_row,
                )
                .optional()?)
        })
    }

    pub fn list_equipment(&self) -> StoreResult<Vec<Equipment>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, fuel_capacity, burn_rate, weight FROM equipment ORDER BY id",
            )?;
            let rows = stmt.query_map([], equipment_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn update_equipment(&self, equipment: &Equipment) -> StoreResult<bool> {
        validation::validate_equipment(equipment)?;
        let changed = self.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE equipment SET name = ?2, fuel_capacity = ?3, burn_rate = ?4, weight = ?5
                 WHERE id = ?1",
                params![
                    equipment.id,
                    equipment.name,
                    equipment.fuel_capacity,
                    equipment.burn_rate,
                    equipment.weight
                ],
            )?)
        })?;
        Ok(changed > 0)
    }

    /// Removes the equipment, its items, its combat loads and every EDL line
    /// that placed one of its items in an exercise.
    pub fn delete_equipment(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM equipment WHERE id = ?1", [id])?)
        })?;
        if removed > 0 {
            info!(id, "deleted equipment");
        }
        Ok(removed > 0)
    }

    pub fn create_equipment_item(&self, item: &EquipmentItem) -> StoreResult<EquipmentItem> {
        let id = self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO equipment_item (equipment_id, phasing_location, quantity) VALUES (?1, ?2, ?3)",
                params![item.equipment_id, item.phasing_location, item.quantity],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(id, equipment_id = item.equipment_id, "created equipment item");
        Ok(EquipmentItem { id, ..item.clone() })
    }

    pub fn get_equipment_item(&self, id: i64) -> StoreResult<Option<EquipmentItem>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, equipment_id, phasing_location, quantity FROM equipment_item WHERE id = ?1",
                    [id],
                    equipment_item_from_row,
                )
                .optional()?)
        })
    }

    pub fn list_equipment_items(&self) -> StoreResult<Vec<EquipmentItem>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, equipment_id, phasing_location, quantity FROM equipment_item ORDER BY id",
            )?;
            let rows = stmt.query_map([], equipment_item_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn update_equipment_item(&self, item: &EquipmentItem) -> StoreResult<bool> {
        let changed = self.with_connection(|conn| {
            Ok(conn.execute(
                "UPDATE equipment_item SET equipment_id = ?2, phasing_location = ?3, quantity = ?4
                 WHERE id = ?1",
                params![
                    item.id,
                    item.equipment_id,
                    item.phasing_location,
                    item.quantity
                ],
            )?)
        })?;
        Ok(changed > 0)
    }

    pub fn delete_equipment_item(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM equipment_item WHERE id = ?1", [id])?)
        })?;
        Ok(removed > 0)
    }

    pub fn add_combat_load(
        &self,
        equipment_id: i64,
        ammo_item_id: i64,
    ) -> StoreResult<CombatLoad> {
        let id = self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO combat_load (equipment_id, ammo_item_id) VALUES (?1, ?2)",
                params![equipment_id, ammo_item_id],
            )?;
            Ok(conn.last_insert_rowid())
        })?;
        debug!(id, equipment_id, ammo_item_id, "added combat load");
        Ok(CombatLoad {
            id,
            equipment_id,
            ammo_item_id,
        })
    }

    pub fn remove_combat_load(&self, id: i64) -> StoreResult<bool> {
        let removed = self.with_connection(|conn| {
            Ok(conn.execute("DELETE FROM combat_load WHERE id = ?1", [id])?)
        })?;
        Ok(removed > 0)
    }

    pub fn list_combat_loads(&self) -> StoreResult<Vec<CombatLoad>> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, equipment_id, ammo_item_id FROM combat_load ORDER BY id")?;
            let rows = stmt.query_map([], combat_load_from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }
}
