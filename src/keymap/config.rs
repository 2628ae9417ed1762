//! YAML configuration parsing for keymaps
//!
//! Parses keymap.yaml files into Keybinding structs.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::binding::Keybinding;
use super::command::Command;
use super::context::Condition;
use super::types::Keystroke;

/// Errors that can occur when loading keymaps
#[derive(Debug, Error)]
pub enum KeymapError {
    #[error("failed to read keymap {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid keymap YAML: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

/// Root structure of a keymap YAML file
#[derive(Debug, Deserialize)]
pub struct KeymapConfig {
    pub bindings: Vec<BindingConfig>,
}

/// A single binding entry from YAML
#[derive(Debug, Deserialize)]
pub struct BindingConfig {
    pub key: String,
    pub command: String,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub when: Vec<Condition>,
}

/// Load keybindings from a YAML file
pub fn load_keymap_file(path: &Path) -> Result<Vec<Keybinding>, KeymapError> {
    let content = std::fs::read_to_string(path).map_err(|source| KeymapError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_keymap_yaml(&content)
}

/// Parse keybindings from a YAML string, skipping entries for other platforms
pub fn parse_keymap_yaml(yaml: &str) -> Result<Vec<Keybinding>, KeymapError> {
    let config: KeymapConfig = serde_yaml::from_str(yaml)?;
    let platform = current_platform();

    config
        .bindings
        .into_iter()
        .filter(|entry| entry.platform.as_deref().map_or(true, |p| p == platform))
        .map(|entry| {
            let keystroke: Keystroke = entry.key.parse()?;
            let command: Command = entry.command.parse()?;
            Ok(Keybinding::new(keystroke, command).when(entry.when))
        })
        .collect()
}

fn current_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else {
        "linux"
    }
}
