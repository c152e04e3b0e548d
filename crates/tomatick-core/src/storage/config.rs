//! TOML-based application configuration.
//!
//! Stores the user's settings:
//! - Focus and Break interval lengths (in minutes)
//! - Theme and sound preferences
//! - Engine tick interval
//!
//! Configuration is stored at `~/.config/tomatick/config.toml`. Only
//! settings live here; timer progress is never written to disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result, ValidationError};
use crate::timer::{Preferences, Theme, TimerConfig};

/// Accepted range for a duration entered by the user, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationBounds {
    pub field: &'static str,
    pub min_minutes: u64,
    pub max_minutes: u64,
}

impl DurationBounds {
    pub const FOCUS: Self = Self {
        field: "focus duration",
        min_minutes: 1,
        max_minutes: 60,
    };

    pub const BREAK: Self = Self {
        field: "break duration",
        min_minutes: 1,
        max_minutes: 30,
    };

    /// Check `minutes` and convert it to seconds.
    pub fn validate(&self, minutes: u64) -> Result<u64, ValidationError> {
        if minutes < self.min_minutes || minutes > self.max_minutes {
            return Err(ValidationError::OutOfRange {
                field: self.field,
                value: minutes,
                min: self.min_minutes,
                max: self.max_minutes,
            });
        }
        Ok(minutes * 60)
    }

    /// Pull `minutes` into range, the way a slider would.
    pub fn clamp(&self, minutes: u64) -> u64 {
        minutes.clamp(self.min_minutes, self.max_minutes)
    }
}

/// `[timer]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSection {
    #[serde(default = "default_focus_minutes")]
    pub focus_minutes: u64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u64,
}

/// `[preferences]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferencesConfig {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
}

/// `[engine]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/tomatick/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub preferences: PreferencesConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    /// Where this config was loaded from; `None` means the default location.
    #[serde(skip)]
    path: Option<PathBuf>,
}

fn default_focus_minutes() -> u64 {
    25
}
fn default_break_minutes() -> u64 {
    5
}
fn default_true() -> bool {
    true
}
fn default_tick_interval_ms() -> u64 {
    1000
}

impl Default for TimerSection {
    fn default() -> Self {
        Self {
            focus_minutes: default_focus_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            sound_enabled: true,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timer: TimerSection::default(),
            preferences: PreferencesConfig::default(),
            engine: EngineConfig::default(),
            path: None,
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

    fn set_json_value_by_path(root: &mut serde_json::Value, key: &str, value: &str) -> Result<()> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown().into());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|_| invalid(format!("expected true or false, got '{value}'")))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("expected a whole number, got '{value}'")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    return Err(invalid("cannot overwrite a whole section".into()).into());
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown().into())
    }

    fn default_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// The file this config reads from and writes to.
    pub fn path(&self) -> Result<PathBuf> {
        match &self.path {
            Some(path) => Ok(path.clone()),
            None => Self::default_path(),
        }
    }

    /// Load from the default location, writing defaults there if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    ///
    /// Durations are checked later by [`Config::timer_config`]; the engine
    /// section is checked here since nothing downstream can recover from it.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let mut cfg: Config =
                    toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                        path: path.to_path_buf(),
                        message: e.to_string(),
                    })?;
                cfg.validate_engine()?;
                cfg.path = Some(path.to_path_buf());
                Ok(cfg)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self {
                    path: Some(path.to_path_buf()),
                    ..Self::default()
                };
                cfg.save()?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to default configuration");
            Self::default()
        })
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key and save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed or
    /// falls outside the accepted range, or the config cannot be saved. The
    /// in-memory config is left untouched on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let mut updated: Config = serde_json::from_value(json).map_err(|e| {
            CoreError::from(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })
        })?;
        updated.validate()?;
        updated.path = self.path.clone();
        updated.save()?;
        *self = updated;
        Ok(())
    }

    /// Check every value against the input boundary.
    pub fn validate(&self) -> Result<()> {
        self.timer_config()?;
        self.validate_engine()?;
        Ok(())
    }

    /// A zero tick interval can never drive the timer.
    fn validate_engine(&self) -> Result<(), ConfigError> {
        if self.engine.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "engine.tick_interval_ms".into(),
                message: "must be positive".into(),
            });
        }
        Ok(())
    }

    /// Interval lengths in seconds, validated against [`DurationBounds`].
    pub fn timer_config(&self) -> Result<TimerConfig, ValidationError> {
        Ok(TimerConfig {
            focus_duration_secs: DurationBounds::FOCUS.validate(self.timer.focus_minutes)?,
            break_duration_secs: DurationBounds::BREAK.validate(self.timer.break_minutes)?,
        })
    }

    pub fn preferences(&self) -> Preferences {
        Preferences {
            theme: self.preferences.theme,
            sound_enabled: self.preferences.sound_enabled,
        }
    }

    pub fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.engine.tick_interval_ms)
    }
}
