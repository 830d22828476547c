//! Logbook settings persistence.
//!
//! Stores the database location and service policy in a JSON file at an
//! OS-appropriate location.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the logbook database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "mhike.db";

/// What an update does when no row has the requested id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MissingRowPolicy {
    /// Succeed without touching anything.
    #[default]
    Ignore,
    /// Fail with `HikeNotFound` / `ObservationNotFound`.
    Reject,
}

/// Persisted logbook settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogbookSettings {
    /// Path of the SQLite database file.
    pub database_path: String,
    pub missing_row_policy: MissingRowPolicy,
}

impl Default for LogbookSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path().to_string_lossy().to_string(),
            missing_row_policy: MissingRowPolicy::default(),
        }
    }
}

/// Name of the per-application directory under the platform config and data dirs.
const APP_DIR_NAME: &str = "mhike";

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// `base/mhike`, or `./mhike` when the platform directory is unknown.
fn app_dir(base: Option<PathBuf>) -> PathBuf {
    base.unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}

/// Returns the settings file path: `<config dir>/mhike/settings.json`
/// (e.g. `~/.config/mhike/settings.json` on Linux).
pub fn settings_file_path() -> PathBuf {
    app_dir(dirs::config_dir()).join(SETTINGS_FILE_NAME)
}

/// Returns the default database path: `<data dir>/mhike/mhike.db`.
pub fn default_database_path() -> PathBuf {
    app_dir(dirs::data_dir()).join(DATABASE_FILE_NAME)
}

/// Loads settings from the default location.
pub fn load_settings() -> LogbookSettings {
    load_settings_from(settings_file_path())
}

/// Loads settings from `path`; returns defaults if the file is missing or corrupt.
pub fn load_settings_from<P: AsRef<Path>>(path: P) -> LogbookSettings {
    let path = path.as_ref();
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("Ignoring unreadable settings file {}: {e}", path.display());
            LogbookSettings::default()
        }),
        Err(_) => LogbookSettings::default(),
    }
}

/// Saves settings to the default location.
pub fn save_settings(settings: &LogbookSettings) -> Result<()> {
    save_settings_to(settings_file_path(), settings)
}

/// Saves settings to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`crate::HikeLogError::Io`] if the directory or file cannot be
/// written.
pub fn save_settings_to<P: AsRef<Path>>(path: P, settings: &LogbookSettings) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths_share_app_directory() {
        let settings = settings_file_path();
        let database = default_database_path();
        assert!(settings.ends_with(Path::new(APP_DIR_NAME).join(SETTINGS_FILE_NAME)));
        assert!(database.ends_with(Path::new(APP_DIR_NAME).join(DATABASE_FILE_NAME)));
        assert_eq!(app_dir(None), PathBuf::from(".").join(APP_DIR_NAME));
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let settings = load_settings_from(dir.path().join("absent.json"));
        assert_eq!(settings, LogbookSettings::default());
        assert!(settings.database_path.ends_with(DATABASE_FILE_NAME));
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(load_settings_from(&path), LogbookSettings::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = LogbookSettings {
            database_path: "/tmp/hikes.db".to_string(),
            missing_row_policy: MissingRowPolicy::Reject,
        };
        save_settings_to(&path, &settings).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"missingRowPolicy\": \"reject\""));
        assert_eq!(load_settings_from(&path), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"missingRowPolicy":"reject"}"#).unwrap();

        let settings = load_settings_from(&path);
        assert_eq!(settings.missing_row_policy, MissingRowPolicy::Reject);
        assert_eq!(settings.database_path, LogbookSettings::default().database_path);
    }
}
