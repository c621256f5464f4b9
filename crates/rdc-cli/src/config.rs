//! `~/.config/rdc/config.toml`.

use rdc_core::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("Failed to parse config file at {}: {source}", path.display())]
    Parse { path: PathBuf, source: toml::de::Error },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database file holding presets and scratch notes.
    pub data_path: PathBuf,
    /// Height of a `newline` spacer with amount 1.
    pub base_unit: f32,
    /// Rows shown by `preset list` without `--limit`.
    pub list_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: expand("~/.local/share/rdc/rotary.json"),
            base_unit: 4.0,
            list_limit: 10,
        }
    }
}

impl Config {
    /// Load from `config_path`; a missing file means all defaults.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Self, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;

        config.data_path = expand(&config.data_path.to_string_lossy());
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        expand("~/.config/rdc/config.toml")
    }

    pub fn layout(&self) -> LayoutConfig {
        LayoutConfig {
            base_unit: self.base_unit,
        }
    }
}

/// Expand `~` and environment variables; unknown variables leave the path as written.
fn expand(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}
