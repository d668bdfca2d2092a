//! Persisted application settings.
//!
//! Stored as `settings.json` in the data dir. Loading is tolerant: a
//! missing or corrupt file yields the defaults, and saving rewrites the
//! whole file.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Directory holding `settings.json` and `session.json`; overridable via
/// the `SIS_DATA_DIR` environment variable.
pub fn data_dir() -> PathBuf {
    std::env::var("SIS_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

/// Polling the portal more often than this is pointless and unfriendly.
pub const MIN_REFRESH_MINUTES: u64 = 5;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Watch-mode poll interval, floored at [`MIN_REFRESH_MINUTES`].
    pub refresh_minutes: u64,
    /// Uppercase status substrings marking a failing sitting. Deployment
    /// locale decides these; defaults cover English and Greek portals.
    pub failure_keywords: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            refresh_minutes: 30,
            failure_keywords: vec!["FAIL".to_string(), "ΑΠΟΤ".to_string()],
        }
    }
}

impl Settings {
    pub fn refresh_minutes(&self) -> u64 {
        self.refresh_minutes.max(MIN_REFRESH_MINUTES)
    }

    fn path(dir: &Path) -> PathBuf {
        dir.join("settings.json")
    }

    /// Loads settings from `dir`, falling back to defaults when the file is
    /// missing or unreadable.
    pub fn load(dir: &Path) -> Settings {
        let data = match std::fs::read_to_string(Self::path(dir)) {
            Ok(d) => d,
            Err(_) => return Settings::default(),
        };
        serde_json::from_str(&data).unwrap_or_default()
    }

    pub fn save(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(Self::path(dir), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    fn temp_dir(name: &str) -> PathBuf {
        env::temp_dir().join(format!("sis_grade_watch_{name}"))
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let settings = Settings::load(&temp_dir("settings_missing"));
        assert_eq!(settings.refresh_minutes, 30);
        assert_eq!(settings.failure_keywords, vec!["FAIL", "ΑΠΟΤ"]);
    }

    #[test]
    fn test_load_corrupt_file_gives_defaults() {
        let dir = temp_dir("settings_corrupt");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("settings.json"), "{not json").unwrap();

        let settings = Settings::load(&dir);
        assert_eq!(settings.refresh_minutes, 30);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_and_reload() {
        let dir = temp_dir("settings_roundtrip");
        let _ = fs::remove_dir_all(&dir);

        let settings = Settings {
            refresh_minutes: 10,
            failure_keywords: vec!["FAIL".to_string()],
        };
        settings.save(&dir).unwrap();

        let loaded = Settings::load(&dir);
        assert_eq!(loaded.refresh_minutes, 10);
        assert_eq!(loaded.failure_keywords, vec!["FAIL"]);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_refresh_floor() {
        let settings = Settings {
            refresh_minutes: 1,
            ..Settings::default()
        };
        assert_eq!(settings.refresh_minutes(), MIN_REFRESH_MINUTES);
    }
}
