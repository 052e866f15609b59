//! Runtime configuration read from the environment.
//!
//! | variable         | meaning                                     | default          |
//! |------------------|---------------------------------------------|------------------|
//! | `MLPT_DATABASE`  | SQLite file path, or `:memory:`             | `:memory:`       |
//! | `MLPT_HTTP_ADDR` | listen address for the HTTP API             | `127.0.0.1:3000` |
//! | `MLPT_LOG`       | tracing filter directive (falls back to `RUST_LOG`) | `warn`   |

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub const DATABASE_ENV: &str = "MLPT_DATABASE";
pub const HTTP_ADDR_ENV: &str = "MLPT_HTTP_ADDR";
pub const LOG_ENV: &str = "MLPT_LOG";

const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_LOG_FILTER: &str = "warn";
const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: '{value}'")]
    InvalidAddress { var: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseLocation,
    pub http_addr: SocketAddr,
    pub log_filter: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database = match lookup(DATABASE_ENV) {
            Some(value) if !value.trim().is_empty() && value.trim() != IN_MEMORY => {
                DatabaseLocation::File(PathBuf::from(value.trim()))
            }
            _ => DatabaseLocation::Memory,
        };

        let addr_value = lookup(HTTP_ADDR_ENV).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr = addr_value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidAddress {
                var: HTTP_ADDR_ENV,
                value: addr_value.clone(),
            })?;

        let log_filter = lookup(LOG_ENV)
            .or_else(|| lookup("RUST_LOG"))
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            database,
            http_addr,
            log_filter,
        })
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseLocation::Memory,
            http_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
