use crate::validation::ValidationError;
use polars::prelude::PolarsError;
use serde_json::Error as SerdeJsonError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid record: {0}")]
    Validation(#[from] ValidationError),
    #[error("serialization error: {0}")]
    Serialization(#[from] SerdeJsonError),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("dataframe error: {0}")]
    DataFrame(#[from] PolarsError),
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl StoreError {
    /// True when SQLite rejected a write because of a foreign key, check or
    /// uniqueness constraint.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                if err.code == rusqlite::ErrorCode::ConstraintViolation
        )
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

mod catalog;
mod exercises;
pub mod file;
pub mod sqlite;

pub use file::{StoreSnapshot, load_store_from_json, save_edl_to_csv, save_store_to_json};
pub use sqlite::SqliteStore;
