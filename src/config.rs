use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::report::DEFAULT_CHART_MAX_HOURS;
use crate::store;

const DB_ENV: &str = "KRONOS_DB";
const LOG_ENV: &str = "KRONOS_LOG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub log_dir: Option<PathBuf>,
    pub chart_max_hours: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: None,
            log_dir: None,
            chart_max_hours: DEFAULT_CHART_MAX_HOURS,
        }
    }
}

impl Config {
    /// Loads `<config_dir>/kronos/config.json`, or defaults when absent.
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_json::from_str(&content)?;
        if !(config.chart_max_hours.is_finite() && config.chart_max_hours > 0.0) {
            config.chart_max_hours = DEFAULT_CHART_MAX_HOURS;
        }
        Ok(config)
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kronos").join("config.json"))
    }

    /// Database location: `KRONOS_DB`, then the config file, then the data dir.
    pub fn db_path(&self) -> PathBuf {
        if let Ok(path) = std::env::var(DB_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        self.db_path.clone().unwrap_or_else(store::default_db_path)
    }

    pub fn log_level(&self) -> String {
        std::env::var(LOG_ENV)
            .ok()
            .filter(|level| !level.trim().is_empty())
            .or_else(|| self.log_level.clone())
            .unwrap_or_else(|| crate::logging::default_log_level().to_string())
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .map(|dir| dir.join("kronos").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"log_level": "warn"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.log_level.as_deref(), Some("warn"));
        assert_eq!(config.db_path, None);
        assert_eq!(config.chart_max_hours, DEFAULT_CHART_MAX_HOURS);
    }

    #[test]
    fn non_positive_chart_ceiling_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"chart_max_hours": 0}"#).unwrap();
        assert_eq!(
            Config::load_from(&path).unwrap().chart_max_hours,
            DEFAULT_CHART_MAX_HOURS
        );
    }

    #[test]
    fn explicit_db_path_is_used() {
        let config = Config {
            db_path: Some(PathBuf::from("/tmp/kronos-test.db")),
            ..Config::default()
        };
        if std::env::var(DB_ENV).is_err() {
            assert_eq!(config.db_path(), PathBuf::from("/tmp/kronos-test.db"));
        }
    }
}
