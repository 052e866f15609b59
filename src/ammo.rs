use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A catalog entry for a type of ammunition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ammo {
    /// Row id. Zero until the record has been stored.
    #[serde(default)]
    pub id: i64,
    /// The common name of the ammunition (at most 50 characters).
    pub name: String,
    /// Weight of a single round or package.
    #[serde(default)]
    pub weight: i64,
}

impl Ammo {
    pub fn new(name: impl Into<String>, weight: i64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            weight,
        }
    }
}

impl fmt::Display for Ammo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Element classification an allowance profile applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    #[default]
    #[serde(rename = "G")]
    GroundCombatElement,
    #[serde(rename = "N")]
    NonGroundCombatElement,
}

impl UnitType {
    pub fn code(&self) -> &'static str {
        match self {
            UnitType::GroundCombatElement => "G",
            UnitType::NonGroundCombatElement => "N",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            UnitType::GroundCombatElement => "Ground Combat Element",
            UnitType::NonGroundCombatElement => "Non-Ground Combat Element",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "G" => Some(UnitType::GroundCombatElement),
            "N" => Some(UnitType::NonGroundCombatElement),
            _ => None,
        }
    }

    pub fn variants() -> &'static [UnitType] {
        &[
            UnitType::GroundCombatElement,
            UnitType::NonGroundCombatElement,
        ]
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for UnitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitType::from_code(s).ok_or_else(|| format!("unknown unit type '{s}' (expected G or N)"))
    }
}

impl ToSql for UnitType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for UnitType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let code = value.as_str()?;
        UnitType::from_code(code)
            .ok_or_else(|| FromSqlError::Other(format!("invalid unit_type '{code}'").into()))
    }
}

/// A specific allowance profile for an ammunition type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AmmoItem {
    #[serde(default)]
    pub id: i64,
    pub ammo_id: i64,
    #[serde(default)]
    pub unit_type: UnitType,
    /// Rounds issued per piece of equipment at the start of the exercise.
    #[serde(default)]
    pub base_allocation: u32,
    /// Daily replenishment while in the assault.
    #[serde(default)]
    pub daily_assault: u32,
    /// Daily replenishment while sustaining.
    #[serde(default)]
    pub daily_sustain: u32,
}

impl AmmoItem {
    pub fn new(ammo_id: i64, unit_type: UnitType) -> Self {
        Self {
            id: 0,
            ammo_id,
            unit_type,
            base_allocation: 0,
            daily_assault: 0,
            daily_sustain: 0,
        }
    }

    pub fn with_allowances(
        mut self,
        base_allocation: u32,
        daily_assault: u32,
        daily_sustain: u32,
    ) -> Self {
        self.base_allocation = base_allocation;
        self.daily_assault = daily_assault;
        self.daily_sustain = daily_sustain;
        self
    }
}
