//! TOML-based configuration file.
//!
//! Stores the two configured durations as four independent scalar keys,
//! plus the cue repeat policy:
//!
//! ```toml
//! [timer]
//! main_minutes = 1
//! main_seconds = 30
//! get_ready_minutes = 0
//! get_ready_seconds = 5
//!
//! [cues]
//! get_ready_repeats = 1
//! complete_repeats = 1
//! ```
//!
//! Configuration is stored at `~/.config/cuetimer/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toml::{Table, Value};
use tracing::{debug, warn};

use super::{data_dir, ConfigStore};
use crate::error::ConfigError;
use crate::timer::{CuePolicy, EditDraft, TimerConfiguration};

const TIMER_KEYS: [&str; 4] = ["main_minutes", "main_seconds", "get_ready_minutes", "get_ready_seconds"];

/// The `[timer]` section: durations split the way the edit form shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSection {
    pub main_minutes: u64,
    pub main_seconds: u64,
    pub get_ready_minutes: u64,
    pub get_ready_seconds: u64,
}

impl Default for TimerSection {
    fn default() -> Self {
        Self::from_configuration(&TimerConfiguration::default())
    }
}

impl TimerSection {
    pub fn from_configuration(config: &TimerConfiguration) -> Self {
        let draft = EditDraft::from_configuration(config);
        Self {
            main_minutes: draft.minutes,
            main_seconds: draft.seconds,
            get_ready_minutes: draft.get_ready_minutes,
            get_ready_seconds: draft.get_ready_seconds,
        }
    }

    pub fn configuration(&self) -> TimerConfiguration {
        EditDraft::clamped(
            saturating_i64(self.main_minutes),
            saturating_i64(self.main_seconds),
            saturating_i64(self.get_ready_minutes),
            saturating_i64(self.get_ready_seconds),
        )
        .to_configuration()
    }

    /// Read each key on its own. A missing, negative or non-numeric key
    /// keeps the default for that key only.
    fn from_table(table: Option<&Table>) -> Self {
        let defaults = Self::default();
        let defaults = [
            defaults.main_minutes,
            defaults.main_seconds,
            defaults.get_ready_minutes,
            defaults.get_ready_seconds,
        ];
        let mut values = defaults;
        for (slot, key) in values.iter_mut().zip(TIMER_KEYS) {
            match table.and_then(|t| t.get(key)) {
                Some(value) => match scalar(value) {
                    Some(n) => *slot = n,
                    None => warn!(key, ?value, "invalid stored value, using default"),
                },
                None => debug!(key, "key absent, using default"),
            }
        }
        Self {
            main_minutes: values[0],
            main_seconds: values[1],
            get_ready_minutes: values[2],
            get_ready_seconds: values[3],
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/cuetimer/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub timer: TimerSection,
    #[serde(default)]
    pub cues: CuePolicy,
}

impl Config {
    pub fn from_configuration(config: &TimerConfiguration, cues: CuePolicy) -> Self {
        Self {
            timer: TimerSection::from_configuration(config),
            cues,
        }
    }

    pub fn configuration(&self) -> TimerConfiguration {
        self.timer.configuration()
    }

    /// Parse a config file body.
    ///
    /// Only a syntactically broken document is an error. Individual keys
    /// fall back to defaults independently.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let root: Table = toml::from_str(content)?;
        let timer = TimerSection::from_table(root.get("timer").and_then(Value::as_table));
        let cues = match root.get("cues") {
            Some(section) => section.clone().try_into::<CuePolicy>().unwrap_or_else(|e| {
                warn!(error = %e, "invalid [cues] section, using defaults");
                CuePolicy::default()
            }),
            None => CuePolicy::default(),
        };
        Ok(Self { timer, cues })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }
}

/// File-backed [`ConfigStore`].
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<data_dir>/config.toml`.
    pub fn default_location() -> Result<Self, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/cuetimer"),
            message: e.to_string(),
        })?;
        Ok(Self::new(dir.join("config.toml")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn read_config(&self) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::LoadFailed {
            path: self.path.clone(),
            message: e.to_string(),
        })?;
        Config::from_toml_str(&content)
    }

    /// Read the whole file, returning defaults on any error.
    /// This is a convenience method that never fails.
    pub fn read_config_or_default(&self) -> Config {
        self.read_config().unwrap_or_default()
    }

    /// Persist to disk, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn write_config(&self, config: &Config) -> Result<(), ConfigError> {
        let content = config.to_toml_string()?;
        let save_failed = |e: std::io::Error| ConfigError::SaveFailed {
            path: self.path.clone(),
            message: e.to_string(),
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(save_failed)?;
        }
        std::fs::write(&self.path, content).map_err(save_failed)?;
        Ok(())
    }
}

impl ConfigStore for TomlConfigStore {
    fn load(&self) -> Option<TimerConfiguration> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no config file");
            return None;
        }
        match self.read_config() {
            Ok(config) => Some(config.configuration()),
            Err(e) => {
                warn!(error = %e, "config file unreadable, using defaults");
                None
            }
        }
    }

    /// Writes the `[timer]` keys and keeps whatever `[cues]` section is on disk.
    fn save(&self, config: &TimerConfiguration) -> Result<(), ConfigError> {
        let mut current = self.read_config_or_default();
        current.timer = TimerSection::from_configuration(config);
        self.write_config(&current)
    }
}

fn scalar(value: &Value) -> Option<u64> {
    match value {
        Value::Integer(n) => u64::try_from(*n).ok(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = cfg.to_toml_string().unwrap();
        let parsed = Config::from_toml_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.configuration(), TimerConfiguration::default());
    }

    #[test]
    fn missing_keys_fall_back_independently() {
        let parsed = Config::from_toml_str("[timer]\nmain_minutes = 2\nget_ready_seconds = 10\n").unwrap();
        assert_eq!(parsed.timer.main_minutes, 2);
        assert_eq!(parsed.timer.main_seconds, 30);
        assert_eq!(parsed.timer.get_ready_minutes, 0);
        assert_eq!(parsed.timer.get_ready_seconds, 10);
        assert_eq!(parsed.configuration(), TimerConfiguration::new(150, 10));
    }

    #[test]
    fn non_numeric_and_negative_keys_use_defaults() {
        let parsed = Config::from_toml_str(
            "[timer]\nmain_minutes = \"abc\"\nmain_seconds = -4\nget_ready_minutes = \"1\"\nget_ready_seconds = true\n",
        )
        .unwrap();
        assert_eq!(parsed.timer.main_minutes, 1);
        assert_eq!(parsed.timer.main_seconds, 30);
        assert_eq!(parsed.timer.get_ready_minutes, 1);
        assert_eq!(parsed.timer.get_ready_seconds, 5);
    }

    #[test]
    fn stored_seconds_over_59_are_clamped() {
        let parsed = Config::from_toml_str("[timer]\nmain_minutes = 0\nmain_seconds = 90\n").unwrap();
        assert_eq!(parsed.configuration().main_duration_secs, 59);
    }

    #[test]
    fn broken_document_is_a_parse_error() {
        let result = Config::from_toml_str("[timer\nmain_minutes = ");
        assert!(matches!(result, Err(ConfigError::ParseFailed(_))));
    }

    #[test]
    fn invalid_cues_section_uses_default_policy() {
        let parsed = Config::from_toml_str("[cues]\ncomplete_repeats = \"many\"\n").unwrap();
        assert_eq!(parsed.cues, CuePolicy::default());

        let parsed = Config::from_toml_str("[cues]\ncomplete_repeats = 3\n").unwrap();
        assert_eq!(parsed.cues.complete_repeats, 3);
        assert_eq!(parsed.cues.get_ready_repeats, 1);
    }

    #[test]
    fn store_load_returns_none_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlConfigStore::new(temp_dir.path().join("config.toml"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn store_load_returns_none_for_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert_eq!(TomlConfigStore::new(path).load(), None);
    }

    #[test]
    fn store_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlConfigStore::new(temp_dir.path().join("nested").join("config.toml"));
        store.save(&TimerConfiguration::new(125, 15)).unwrap();

        assert_eq!(store.load(), Some(TimerConfiguration::new(125, 15)));
        let written = std::fs::read_to_string(store.path()).unwrap();
        assert!(written.contains("main_minutes = 2"));
        assert!(written.contains("main_seconds = 5"));
    }

    #[test]
    fn store_save_keeps_cue_section() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[cues]\ncomplete_repeats = 3\n").unwrap();

        let store = TomlConfigStore::new(&path);
        store.save(&TimerConfiguration::new(30, 5)).unwrap();
        assert_eq!(store.read_config().unwrap().cues.complete_repeats, 3);
    }
}
