use crate::ammo::AmmoItem;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A weapon system or vehicle. The same equipment may appear in many units
/// and many exercises at once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default)]
    pub id: i64,
    pub name: String,
    /// Total fuel capacity in gallons.
    #[serde(default)]
    pub fuel_capacity: i64,
    /// Fuel burn rate in gallons per hour.
    #[serde(default)]
    pub burn_rate: f64,
    /// Weight in pounds.
    #[serde(default)]
    pub weight: f64,
}

impl Equipment {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            fuel_capacity: 0,
            burn_rate: 0.0,
            weight,
        }
    }

    pub fn with_fuel(mut self, fuel_capacity: i64, burn_rate: f64) -> Self {
        self.fuel_capacity = fuel_capacity;
        self.burn_rate = burn_rate;
        self
    }
}

impl fmt::Display for Equipment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Where an equipment item sits relative to the phasing of the exercise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhasingLocation {
    #[default]
    #[serde(rename = "AE")]
    Assault,
    #[serde(rename = "AFOE")]
    FollowOn,
}

impl PhasingLocation {
    pub fn code(&self) -> &'static str {
        match self {
            PhasingLocation::Assault => "AE",
            PhasingLocation::FollowOn => "AFOE",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PhasingLocation::Assault => "Assault Element",
            PhasingLocation::FollowOn => "Assault Follow-On Element",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "AE" => Some(PhasingLocation::Assault),
            "AFOE" => Some(PhasingLocation::FollowOn),
            _ => None,
        }
    }

    pub fn variants() -> &'static [PhasingLocation] {
        &[PhasingLocation::Assault, PhasingLocation::FollowOn]
    }
}

impl fmt::Display for PhasingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for PhasingLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PhasingLocation::from_code(s)
            .ok_or_else(|| format!("unknown phasing location '{s}' (expected AE or AFOE)"))
    }
}

impl ToSql for PhasingLocation {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for PhasingLocation {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        PhasingLocation::from_code(code).ok_or_else(|| {
            FromSqlError::Other(format!("invalid phasing_location '{code}'").into())
        })
    }
}

/// A concrete count of one equipment type, placed in an exercise EDL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentItem {
    #[serde(default)]
    pub id: i64,
    pub equipment_id: i64,
    #[serde(default)]
    pub phasing_location: PhasingLocation,
    #[serde(default)]
    pub quantity: u32,
}

impl EquipmentItem {
    pub fn new(equipment_id: i64, phasing_location: PhasingLocation, quantity: u32) -> Self {
        Self {
            id: 0,
            equipment_id,
            phasing_location,
            quantity,
        }
    }
}

/// Links an equipment type to an ammunition allowance it carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatLoad {
    #[serde(default)]
    pub id: i64,
    pub equipment_id: i64,
    pub ammo_item_id: i64,
}

/// An ammunition allowance as it appears in an equipment's combat load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatLoadLine {
    pub combat_load_id: i64,
    pub ammo_item: AmmoItem,
    pub ammo_name: String,
    pub ammo_weight: i64,
}

impl fmt::Display for CombatLoadLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ammo_name)
    }
}
