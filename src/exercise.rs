use crate::equipment::PhasingLocation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The primary planning object. Units and equipment are attached to it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    #[serde(default)]
    pub id: i64,
    /// At most 128 characters.
    pub name: String,
}

impl Exercise {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
        }
    }
}

impl fmt::Display for Exercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Direct membership of a unit in an exercise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseUnit {
    pub exercise_id: i64,
    pub unit_id: i64,
}

/// One line of an exercise's equipment density list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseEdl {
    #[serde(default)]
    pub id: i64,
    pub exercise_id: i64,
    pub unit_id: i64,
    pub equipment_item_id: i64,
}

/// An EDL entry resolved to display names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdlLine {
    pub edl_id: i64,
    pub exercise_name: String,
    pub unit_name: String,
    pub equipment_item_id: i64,
    pub equipment_name: String,
    pub phasing_location: PhasingLocation,
    pub quantity: u32,
}

impl fmt::Display for EdlLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {}  {} ",
            self.exercise_name, self.unit_name, self.equipment_name
        )
    }
}

/// An EDL line with the weights it contributes to the exercise totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdlWeightRow {
    pub edl_id: i64,
    pub unit: String,
    pub equipment: String,
    pub phasing_location: PhasingLocation,
    pub quantity: u32,
    pub equipment_weight: f64,
    pub base_allowance_weight: i64,
    pub daily_assault_weight: i64,
    pub daily_sustain_weight: i64,
}
