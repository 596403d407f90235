//! Environment-driven runtime configuration.
//!
//! # Invariants
//! - Blank variables behave as unset.
//! - Building a config never fails; every field has a default except
//!   `log_dir`, whose absence disables file logging.

use crate::logging::default_log_level;
use crate::persist::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "WEEKSLOT_DB_PATH";
pub const ENV_STORAGE_KEY: &str = "WEEKSLOT_STORAGE_KEY";
pub const ENV_LOG_LEVEL: &str = "WEEKSLOT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "WEEKSLOT_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "weekslot.sqlite3";

/// Settings shared by every front end of the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file backing the key-value store.
    pub db_path: PathBuf,
    /// Key holding the encoded schedule collection.
    pub storage_key: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            storage_key: read(ENV_STORAGE_KEY).unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_STORAGE_KEY};
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = CoreConfig::from_lookup(|name| (name == ENV_STORAGE_KEY).then(|| "  ".to_string()));
        assert_eq!(config.storage_key, "schedules");
        assert!(config.db_path.ends_with("weekslot.sqlite3"));
        assert!(config.log_dir.is_none());
        assert!(!config.log_level.is_empty());
    }

    #[test]
    fn explicit_values_are_trimmed_and_used() {
        let vars = HashMap::from([
            (ENV_DB_PATH, " /data/weekslot.db "),
            (ENV_STORAGE_KEY, "team_a"),
            (ENV_LOG_DIR, "/var/log/weekslot"),
        ]);
        let config = CoreConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string()));
        assert_eq!(config.db_path, PathBuf::from("/data/weekslot.db"));
        assert_eq!(config.storage_key, "team_a");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/weekslot")));
    }
}
