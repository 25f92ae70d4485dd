use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::history::DEFAULT_MAX_ITEMS;
use crate::utils::paths::{get_config_path, get_history_path};

const MIN_POLL_INTERVAL_MS: u64 = 100;
const MAX_POLL_INTERVAL_MS: u64 = 5_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_max_items")]
    pub max_items: usize,

    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Write snapshots from a dedicated thread instead of inline.
    #[serde(default)]
    pub background_save: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub history_file: Option<PathBuf>,

    #[serde(default = "default_theme")]
    pub theme: String,
}

fn default_max_items() -> usize {
    DEFAULT_MAX_ITEMS
}

fn default_poll_interval_ms() -> u64 {
    500
}

fn default_theme() -> String {
    "default".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_items: default_max_items(),
            poll_interval_ms: default_poll_interval_ms(),
            background_save: false,
            history_file: None,
            theme: default_theme(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

        Ok(config.normalized())
    }

    /// Clamp tuning values into their supported ranges.
    pub fn normalized(mut self) -> Self {
        self.max_items = self.max_items.max(1);
        self.poll_interval_ms = self
            .poll_interval_ms
            .clamp(MIN_POLL_INTERVAL_MS, MAX_POLL_INTERVAL_MS);
        self
    }

    /// Apply command-line overrides on top of the file settings.
    pub fn with_overrides(
        mut self,
        history_file: Option<PathBuf>,
        max_items: Option<usize>,
        poll_interval_ms: Option<u64>,
    ) -> Self {
        if let Some(path) = history_file {
            self.history_file = Some(path);
        }
        if let Some(max_items) = max_items {
            self.max_items = max_items;
        }
        if let Some(interval) = poll_interval_ms {
            self.poll_interval_ms = interval;
        }
        self.normalized()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn history_path(&self) -> Result<PathBuf> {
        match &self.history_file {
            Some(path) => Ok(path.clone()),
            None => get_history_path(),
        }
    }
}
