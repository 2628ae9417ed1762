//! Grid configuration persistence
//!
//! Stores user preferences in `~/.config/assetgrid/config.yaml`

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::DEFAULT_DATE_FORMAT;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,
    #[error("failed to read config at {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] serde_yaml::Error),
    #[error("failed to write config to {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Grid configuration that persists across sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Column separator for clipboard copy/paste
    #[serde(default = "default_column_separator")]
    pub column_separator: char,

    /// chrono format used to show, copy and parse date cells
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Upper bound on concurrent per-record update calls
    #[serde(default = "default_max_parallel_updates")]
    pub max_parallel_updates: usize,

    /// How long status messages stay visible
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
}

fn default_column_separator() -> char {
    '\t'
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

fn default_max_parallel_updates() -> usize {
    8
}

fn default_status_timeout_ms() -> u64 {
    4000
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_separator: default_column_separator(),
            date_format: default_date_format(),
            max_parallel_updates: default_max_parallel_updates(),
            status_timeout_ms: default_status_timeout_ms(),
        }
    }
}

impl GridConfig {
    /// Load config from the user config dir, or return defaults
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{}", e);
                Self::default()
            }
        }
    }

    /// Load config from an explicit path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(config.sanitized())
    }

    /// Save config to the user config dir
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = crate::config_paths::config_file().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Save config to an explicit path, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_millis(self.status_timeout_ms)
    }

    /// A zero-sized worker pool would never drain a batch, and a broken date
    /// format would fail every date cell
    pub(crate) fn sanitized(mut self) -> Self {
        if self.max_parallel_updates == 0 {
            tracing::warn!("max_parallel_updates must be at least 1, using 1");
            self.max_parallel_updates = 1;
        }
        if !is_valid_date_format(&self.date_format) {
            tracing::warn!(
                "invalid date_format `{}`, using {}",
                self.date_format,
                DEFAULT_DATE_FORMAT
            );
            self.date_format = default_date_format();
        }
        self
    }
}

fn is_valid_date_format(format: &str) -> bool {
    !format.is_empty() && StrftimeItems::new(format).all(|item| !matches!(item, Item::Error))
}
