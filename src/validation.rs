use crate::{Ammo, Equipment, Exercise, Unit};
use thiserror::Error;

pub const MAX_NAME_LEN: usize = 50;
pub const MAX_EXERCISE_NAME_LEN: usize = 128;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn validate_name(kind: &str, name: &str, max_len: usize) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new(format!("{kind} requires a non-empty name")));
    }
    let len = name.chars().count();
    if len > max_len {
        return Err(ValidationError::new(format!(
            "{kind} name '{name}' is {len} characters (max {max_len})"
        )));
    }
    Ok(())
}

fn validate_measure(
    kind: &str,
    name: &str,
    field: &str,
    value: f64,
) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::new(format!(
            "{kind} '{name}' has invalid {field} {value} (must be a non-negative number)"
        )));
    }
    Ok(())
}

pub fn validate_ammo(ammo: &Ammo) -> Result<(), ValidationError> {
    validate_name("ammo", &ammo.name, MAX_NAME_LEN)?;
    if ammo.weight < 0 {
        return Err(ValidationError::new(format!(
            "ammo '{}' has negative weight {}",
            ammo.name, ammo.weight
        )));
    }
    Ok(())
}

pub fn validate_equipment(equipment: &Equipment) -> Result<(), ValidationError> {
    validate_name("equipment", &equipment.name, MAX_NAME_LEN)?;
    if equipment.fuel_capacity < 0 {
        return Err(ValidationError::new(format!(
            "equipment '{}' has negative fuel_capacity {}",
            equipment.name, equipment.fuel_capacity
        )));
    }
    validate_measure("equipment", &equipment.name, "burn_rate", equipment.burn_rate)?;
    validate_measure("equipment", &equipment.name, "weight", equipment.weight)?;
    Ok(())
}

pub fn validate_unit(unit: &Unit) -> Result<(), ValidationError> {
    validate_name("unit", &unit.name, MAX_NAME_LEN)
}

pub fn validate_exercise(exercise: &Exercise) -> Result<(), ValidationError> {
    validate_name("exercise", &exercise.name, MAX_EXERCISE_NAME_LEN)
}
