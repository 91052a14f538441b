use std::{
    io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::timer::ReminderInterval;

pub const CONFIG_FILE_NAME: &str = "config.json";

/// User settings read from `config.json` in the application directory. Every field is optional in
/// the file, missing ones fall back to [Config::default].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reminder interval used when `start` is given no value.
    pub interval_minutes: u32,
    /// Task log location. Relative paths are resolved against the application directory.
    pub log_file: PathBuf,
    pub sound: bool,
    pub notifications: bool,
    /// Length of the longest bar in the weekly chart.
    pub chart_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval_minutes: 60,
            log_file: PathBuf::from("tasks.csv"),
            sound: true,
            notifications: true,
            chart_width: 40,
        }
    }
}

impl Config {
    pub fn load(app_dir: &Path) -> Result<Self> {
        let path = app_dir.join(CONFIG_FILE_NAME);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No config at {path:?}, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read {path:?}")),
        };
        serde_json::from_str(&content).with_context(|| format!("Malformed config {path:?}"))
    }

    pub fn log_path(&self, app_dir: &Path) -> PathBuf {
        app_dir.join(&self.log_file)
    }

    pub fn default_interval(&self) -> Result<ReminderInterval> {
        ReminderInterval::from_minutes(self.interval_minutes).with_context(|| {
            format!(
                "interval_minutes in {CONFIG_FILE_NAME} must be positive, got {}",
                self.interval_minutes
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::Result;
    use tempfile::tempdir;

    use super::{Config, CONFIG_FILE_NAME};

    #[test]
    fn test_missing_config_uses_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = Config::load(dir.path())?;
        assert_eq!(config, Config::default());
        assert_eq!(config.log_path(dir.path()), dir.path().join("tasks.csv"));
        assert_eq!(config.default_interval()?.minutes(), 60);
        Ok(())
    }

    #[test]
    fn test_partial_config() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "interval_minutes": 25, "sound": false }"#,
        )?;
        let config = Config::load(dir.path())?;
        assert_eq!(config.interval_minutes, 25);
        assert!(!config.sound);
        assert!(config.notifications);
        assert_eq!(config.log_file, PathBuf::from("tasks.csv"));
        Ok(())
    }

    #[test]
    fn test_malformed_config_fails() -> Result<()> {
        let dir = tempdir()?;
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json")?;
        assert!(Config::load(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = Config {
            interval_minutes: 0,
            ..Config::default()
        };
        assert!(config.default_interval().is_err());
    }
}
