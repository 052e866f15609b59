pub mod aggregates;
pub mod ammo;
pub mod config;
pub mod equipment;
pub mod exercise;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod persistence;
pub mod report;
pub mod unit;
pub mod validation;

pub use aggregates::{Aggregates, AllowanceKind, ExerciseTotals};
pub use ammo::{Ammo, AmmoItem, UnitType};
pub use config::{AppConfig, DatabaseLocation};
pub use equipment::{CombatLoad, CombatLoadLine, Equipment, EquipmentItem, PhasingLocation};
pub use exercise::{EdlLine, EdlWeightRow, Exercise, ExerciseEdl, ExerciseUnit};
pub use persistence::{
    SqliteStore, StoreError, StoreResult, StoreSnapshot, load_store_from_json, save_edl_to_csv,
    save_store_to_json,
};
pub use unit::Unit;
pub use validation::ValidationError;
