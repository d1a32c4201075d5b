//! Environment-driven settings
//!
//! | Variable | Default |
//! |---|---|
//! | `PORT` | `8080` |
//! | `DATABASE_URL` | `data.db` |
//! | `STORAGE_BACKEND` | `redb` (`redb` or `memory`) |
//! | `CODE_LENGTH` | `6` |
//! | `MAX_GENERATE_ATTEMPTS` | `16` |

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::code::{DEFAULT_CODE_LEN, MAX_CODE_LEN, MIN_CODE_LEN};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_DATABASE_URL: &str = "data.db";
pub const DEFAULT_MAX_GENERATE_ATTEMPTS: u32 = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Redb,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub database_url: String,
    pub storage: StorageBackend,
    pub code_length: usize,
    pub max_generate_attempts: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            storage: StorageBackend::Redb,
            code_length: DEFAULT_CODE_LEN,
            max_generate_attempts: DEFAULT_MAX_GENERATE_ATTEMPTS,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = parse_or(&lookup, "PORT", defaults.port, "not a port number")?;
        let database_url = lookup("DATABASE_URL").unwrap_or(defaults.database_url);
        let storage = parse_or(
            &lookup,
            "STORAGE_BACKEND",
            defaults.storage,
            "expected redb or memory",
        )?;

        let code_length = parse_or(&lookup, "CODE_LENGTH", defaults.code_length, "not a number")?;
        if !(MIN_CODE_LEN..=MAX_CODE_LEN).contains(&code_length) {
            return Err(ConfigError::Invalid {
                key: "CODE_LENGTH",
                value: code_length.to_string(),
                reason: "must be between 6 and 8",
            });
        }

        let max_generate_attempts = parse_or(
            &lookup,
            "MAX_GENERATE_ATTEMPTS",
            defaults.max_generate_attempts,
            "not a number",
        )?;
        if max_generate_attempts == 0 {
            return Err(ConfigError::Invalid {
                key: "MAX_GENERATE_ATTEMPTS",
                value: "0".to_string(),
                reason: "must be at least 1",
            });
        }

        Ok(Self {
            port,
            database_url,
            storage,
            code_length,
            max_generate_attempts,
        })
    }
}

fn parse_or<F, T>(
    lookup: &F,
    key: &'static str,
    default: T,
    reason: &'static str,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().parse() {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(ConfigError::Invalid { key, value, reason }),
        },
    }
}
