//! Store and runtime configuration.
//!
//! # Responsibility
//! - Define the knobs the root composition passes to `TaskStore::open`.
//! - Resolve process-level settings (database path, logging) from the
//!   environment through an injectable lookup.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - A configured log directory is always absolute.

use crate::logging::{default_log_level, normalize_level};
use crate::model::task::User;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Slot key the task collection is mirrored under.
pub const DEFAULT_SLOT_KEY: &str = "tasks";
pub const DB_PATH_ENV: &str = "TASKDECK_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "TASKDECK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "TASKDECK_LOG_DIR";
const DEFAULT_DB_FILE_NAME: &str = "taskdeck.sqlite3";

/// Per-store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub slot_key: String,
    /// The single local user the board belongs to.
    pub current_user: User,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            current_user: User::new("local-user", "Local User"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidLogLevel(String),
    RelativeLogDir(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLogLevel(message) => write!(f, "{LOG_LEVEL_ENV}: {message}"),
            Self::RelativeLogDir(value) => {
                write!(f, "{LOG_DIR_ENV} must be an absolute path, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

/// Process-level settings for executables embedding the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub db_path: PathBuf,
    pub log_level: &'static str,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl RuntimeConfig {
    /// Reads `TASKDECK_*` variables from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// # Errors
    /// - `InvalidLogLevel` for levels outside `trace|debug|info|warn|error`.
    /// - `RelativeLogDir` for a non-absolute log directory.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|raw| raw.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let db_path = read(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));

        let log_level = match read(LOG_LEVEL_ENV) {
            Some(level) => {
                normalize_level(&level).map_err(|err| ConfigError::InvalidLogLevel(err.to_string()))?
            }
            None => default_log_level(),
        };

        let log_dir = match read(LOG_DIR_ENV) {
            Some(dir) => {
                let path = PathBuf::from(&dir);
                if !path.is_absolute() {
                    return Err(ConfigError::RelativeLogDir(dir));
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            db_path,
            log_level,
            log_dir,
        })
    }
}
