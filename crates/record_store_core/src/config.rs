//! Store configuration with environment overrides.
//!
//! # Invariants
//! - Defaults are usable without any environment: `record_store.db` in the
//!   working directory, 5s busy timeout, build-mode log level.
//! - Unset or empty variables keep the default.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::time::Duration;

/// Fixed relative path of the store file.
pub const DEFAULT_DB_FILE_NAME: &str = "record_store.db";
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

pub const ENV_DB_PATH: &str = "RECORD_STORE_DB_PATH";
pub const ENV_BUSY_TIMEOUT_MS: &str = "RECORD_STORE_BUSY_TIMEOUT_MS";
pub const ENV_LOG_LEVEL: &str = "RECORD_STORE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "RECORD_STORE_LOG_DIR";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
    pub busy_timeout: Duration,
    pub log_level: String,
    /// Absolute directory for rolling log files; `None` keeps logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            busy_timeout: Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue { key: &'static str, value: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { key, value } => write!(f, "invalid value `{value}` for {key}"),
        }
    }
}

impl Error for ConfigError {}

impl StoreConfig {
    /// Builds a config from defaults overridden by `RECORD_STORE_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(raw) = read(ENV_BUSY_TIMEOUT_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_BUSY_TIMEOUT_MS,
                    value: raw.clone(),
                })?;
            config.busy_timeout = Duration::from_millis(millis);
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = level;
        }
        if let Some(dir) = read(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, StoreConfig, DEFAULT_DB_FILE_NAME, ENV_BUSY_TIMEOUT_MS, ENV_DB_PATH};
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_fixed_path() {
        let config = StoreConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_FILE_NAME));
        assert_eq!(config.busy_timeout, Duration::from_secs(5));
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/tmp/blog.db"),
            (ENV_BUSY_TIMEOUT_MS, "250"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/blog.db"));
        assert_eq!(config.busy_timeout, Duration::from_millis(250));
    }

    #[test]
    fn unparsable_timeout_is_rejected() {
        let err = StoreConfig::from_lookup(lookup_from(&[(ENV_BUSY_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_BUSY_TIMEOUT_MS,
                value: "soon".to_string()
            }
        );
    }
}
