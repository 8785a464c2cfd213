mod config;

pub use config::{Config, TimerSection, TomlConfigStore};

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::ConfigError;
use crate::timer::TimerConfiguration;

/// Durable storage for the configured durations.
///
/// Loading is infallible from the caller's point of view: anything missing
/// or unreadable comes back as `None` and the engine uses its defaults.
/// Saving is best-effort; callers log failures and carry on.
pub trait ConfigStore {
    fn load(&self) -> Option<TimerConfiguration>;
    fn save(&self, config: &TimerConfiguration) -> Result<(), ConfigError>;
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    slot: Arc<Mutex<Option<TimerConfiguration>>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TimerConfiguration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(config))),
        }
    }
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Option<TimerConfiguration> {
        self.slot.lock().ok().and_then(|slot| *slot)
    }

    fn save(&self, config: &TimerConfiguration) -> Result<(), ConfigError> {
        let mut slot = self.slot.lock().map_err(|e| ConfigError::SaveFailed {
            path: PathBuf::from("<memory>"),
            message: e.to_string(),
        })?;
        *slot = Some(*config);
        Ok(())
    }
}

/// Returns `~/.config/cuetimer[-dev]/` based on CUETIMER_ENV.
///
/// Set CUETIMER_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("CUETIMER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("cuetimer-dev")
    } else {
        base_dir.join("cuetimer")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_starts_empty() {
        assert_eq!(MemoryConfigStore::new().load(), None);
    }

    #[test]
    fn memory_store_clones_share_slot() {
        let store = MemoryConfigStore::new();
        let other = store.clone();
        store.save(&TimerConfiguration::new(40, 4)).unwrap();
        assert_eq!(other.load(), Some(TimerConfiguration::new(40, 4)));
    }
}
