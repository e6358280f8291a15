//! Runtime settings resolved from the environment.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Resolution never fails; malformed numbers fall back to defaults with a
//!   warning.

use crate::logging::default_log_level;
use log::warn;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "PROJECTDESK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "PROJECTDESK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "PROJECTDESK_LOG_DIR";
pub const ENV_PAGE_SIZE: &str = "PROJECTDESK_PAGE_SIZE";

const DEFAULT_DB_FILE_NAME: &str = "projectdesk.sqlite3";
const DEFAULT_PAGE_SIZE: u32 = 10;

/// Process settings shared by all transports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Rolling log file directory. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    pub default_page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns the raw value for a key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|raw| raw.trim().to_string())
                .filter(|trimmed| !trimmed.is_empty())
        };
        let defaults = Self::default();

        let default_page_size = match value(ENV_PAGE_SIZE) {
            Some(raw) => match raw.parse::<u32>() {
                Ok(size) if size > 0 => size,
                _ => {
                    warn!("event=config_load module=config status=fallback key={ENV_PAGE_SIZE} value={raw}");
                    defaults.default_page_size
                }
            },
            None => defaults.default_page_size,
        };

        Self {
            db_path: value(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            log_level: value(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: value(ENV_LOG_DIR).map(PathBuf::from),
            default_page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Settings, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL, ENV_PAGE_SIZE};
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn settings_from(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Settings::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn empty_environment_yields_defaults() {
        assert_eq!(settings_from(&[]), Settings::default());
    }

    #[test]
    fn values_are_trimmed_and_blank_values_ignored() {
        let settings = settings_from(&[
            (ENV_DB_PATH, "  /var/lib/projectdesk/app.db "),
            (ENV_LOG_LEVEL, "warn"),
            (ENV_LOG_DIR, "   "),
            (ENV_PAGE_SIZE, "25"),
        ]);
        assert_eq!(settings.db_path, PathBuf::from("/var/lib/projectdesk/app.db"));
        assert_eq!(settings.log_level, "warn");
        assert_eq!(settings.log_dir, None);
        assert_eq!(settings.default_page_size, 25);
    }

    #[test]
    fn invalid_page_size_falls_back_to_default() {
        let defaults = Settings::default();
        assert_eq!(
            settings_from(&[(ENV_PAGE_SIZE, "0")]).default_page_size,
            defaults.default_page_size
        );
        assert_eq!(
            settings_from(&[(ENV_PAGE_SIZE, "many")]).default_page_size,
            defaults.default_page_size
        );
    }
}
