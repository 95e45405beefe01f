use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{NotestackError, NotestackResult};

pub const DEFAULT_UNDO_CAPACITY: usize = 10;
pub const DEFAULT_PLAN_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_TIMER_TICK_MS: u64 = 1000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub undo_capacity: Option<usize>,
    #[serde(default)]
    pub plan_debounce_ms: Option<u64>,
    #[serde(default)]
    pub timer_tick_ms: Option<u64>,
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/notestack/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("notestack/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("notestack\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    /// Load from the default location, falling back to defaults on any problem.
    pub fn load() -> Self {
        if let Some(config_path) = Self::config_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("Ignoring config at {}: {}", config_path.display(), e),
                }
            }
        }
        Self::default()
    }

    pub fn load_from(path: &Path) -> NotestackResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> NotestackResult<Self> {
        toml::from_str(content).map_err(|e| NotestackError::Config(e.to_string()))
    }

    pub fn effective_undo_capacity(&self) -> usize {
        self.undo_capacity
            .filter(|&c| c > 0)
            .unwrap_or(DEFAULT_UNDO_CAPACITY)
    }

    pub fn effective_plan_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.plan_debounce_ms.unwrap_or(DEFAULT_PLAN_DEBOUNCE_MS))
    }

    pub fn effective_timer_tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(
            self.timer_tick_ms
                .filter(|&ms| ms > 0)
                .unwrap_or(DEFAULT_TIMER_TICK_MS),
        )
    }

    pub fn effective_data_dir(&self) -> Option<PathBuf> {
        self.data_dir
            .clone()
            .or_else(|| dirs::data_dir().map(|dir| dir.join("notestack")))
    }
}
