//! Runtime configuration resolved from the environment.
//!
//! # Responsibility
//! - Resolve storage location, storage key and logging settings.
//! - Apply defaults when variables are unset or blank.
//!
//! # Invariants
//! - Values are trimmed; blank values count as unset.
//! - Resolution never fails; invalid log levels surface at `init_logging`.

use crate::logging::default_log_level;
use crate::store::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;

pub const DB_PATH_VAR: &str = "TASKBOARD_DB_PATH";
pub const STORAGE_KEY_VAR: &str = "TASKBOARD_STORAGE_KEY";
pub const LOG_LEVEL_VAR: &str = "TASKBOARD_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "TASKBOARD_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "taskboard.sqlite3";

/// Resolved core settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the key-value slots.
    pub db_path: PathBuf,
    /// Slot name for the task collection.
    pub storage_key: String,
    pub log_level: String,
    /// Rolling log directory; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves settings from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves settings through `lookup`, which maps a variable name to
    /// its raw value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };

        Self {
            db_path: value(DB_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            storage_key: value(STORAGE_KEY_VAR).unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_string()),
            log_level: value(LOG_LEVEL_VAR).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: value(LOG_DIR_VAR).map(PathBuf::from),
        }
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
