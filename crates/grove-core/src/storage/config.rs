//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Storage slot key prefix
//! - Defaults applied to new habits
//! - Statistics windows
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::error::ConfigError;
use crate::stats::{DEFAULT_CHART_DAYS, DEFAULT_WEEK_DAYS};

/// Storage configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Prepended to every slot key; `grove_` matches the mobile app's layout.
    #[serde(default)]
    pub key_prefix: String,
}

/// Defaults for `habit add` when a field is not given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitDefaults {
    #[serde(default = "default_target_minutes")]
    pub default_target_minutes: u32,
    #[serde(default = "default_color")]
    pub default_color: String,
    #[serde(default = "default_icon")]
    pub default_icon: String,
}

/// Statistics configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_chart_days")]
    pub chart_days: u32,
    #[serde(default = "default_week_days")]
    pub week_days: u32,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub habits: HabitDefaults,
    #[serde(default)]
    pub stats: StatsConfig,
}

fn default_target_minutes() -> u32 {
    30
}
fn default_color() -> String {
    "#FF6B6B".into()
}
fn default_icon() -> String {
    "🏃".into()
}
fn default_chart_days() -> u32 {
    DEFAULT_CHART_DAYS
}
fn default_week_days() -> u32 {
    DEFAULT_WEEK_DAYS
}

impl Default for HabitDefaults {
    fn default() -> Self {
        Self {
            default_target_minutes: default_target_minutes(),
            default_color: default_color(),
            default_icon: default_icon(),
        }
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            chart_days: default_chart_days(),
            week_days: default_week_days(),
        }
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
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(ConfigError::UnknownKey(String::new()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("config.toml"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from disk, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path,
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })
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

    /// Set a config value by key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value has the wrong type.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.update(key, value)?;
        self.save()
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
