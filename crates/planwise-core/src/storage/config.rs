//! TOML-based application configuration.
//!
//! Stores scheduling preferences:
//! - Working hours window
//! - Default event duration and minimum useful slot length
//! - Back-to-back buffer and next-slot search horizon
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::schedule::WorkingHours;
use crate::slots::MAX_SEARCH_HORIZON_DAYS;

/// Scheduling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// "HH:mm"
    #[serde(default = "default_working_hours_start")]
    pub working_hours_start: String,
    /// "HH:mm"
    #[serde(default = "default_working_hours_end")]
    pub working_hours_end: String,
    #[serde(default = "default_duration_minutes")]
    pub default_duration_minutes: u32,
    #[serde(default = "default_min_slot_minutes")]
    pub min_slot_minutes: u32,
    #[serde(default = "default_back_to_back_buffer")]
    pub back_to_back_buffer_minutes: u32,
    #[serde(default = "default_search_horizon_days")]
    pub search_horizon_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

// Default functions
fn default_working_hours_start() -> String {
    "09:00".into()
}
fn default_working_hours_end() -> String {
    "17:00".into()
}
fn default_duration_minutes() -> u32 {
    60
}
fn default_min_slot_minutes() -> u32 {
    30
}
fn default_back_to_back_buffer() -> u32 {
    15
}
fn default_search_horizon_days() -> u32 {
    14
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            working_hours_start: default_working_hours_start(),
            working_hours_end: default_working_hours_end(),
            default_duration_minutes: default_duration_minutes(),
            min_slot_minutes: default_min_slot_minutes(),
            back_to_back_buffer_minutes: default_back_to_back_buffer(),
            search_horizon_days: default_search_horizon_days(),
        }
    }
}

impl ScheduleConfig {
    /// Parse the configured working window.
    pub fn working_hours(&self) -> Result<WorkingHours> {
        Ok(WorkingHours::parse(
            &self.working_hours_start,
            &self.working_hours_end,
        )?)
    }

    /// Check every setting the scheduling components would reject or misuse.
    pub fn validate(&self) -> Result<()> {
        self.working_hours()?;

        let out_of_range = |key: &str, message: String| ConfigError::InvalidValue {
            key: format!("schedule.{key}"),
            message,
        };
        if !(1..=MAX_SEARCH_HORIZON_DAYS).contains(&i64::from(self.search_horizon_days)) {
            return Err(out_of_range(
                "search_horizon_days",
                format!("must be between 1 and {MAX_SEARCH_HORIZON_DAYS}"),
            )
            .into());
        }
        if self.default_duration_minutes == 0 {
            return Err(out_of_range("default_duration_minutes", "must be positive".into()).into());
        }
        Ok(())
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::InvalidValue {
            key: key.to_string(),
            message: "unknown config key".to_string(),
        };
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("not a leaf value".to_string()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(cfg)
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value has the wrong type,
    /// or the result fails [`ScheduleConfig::validate`].
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.schedule.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a value by dot-separated key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }
}
