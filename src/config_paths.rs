//! Centralized configuration paths for assetgrid
//!
//! All config files live under:
//! - Unix/macOS: `~/.config/assetgrid/`
//! - Windows: `%APPDATA%\assetgrid\`

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "assetgrid";

/// Prefix of the daily-rolled log files (`assetgrid.log.YYYY-MM-DD`)
pub const LOG_FILE_PREFIX: &str = "assetgrid.log";

/// Base config directory for assetgrid
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/assetgrid`
///   - Else: `~/.config/assetgrid`
///
/// Windows:
///   - `%APPDATA%\assetgrid`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/assetgrid/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/assetgrid/keymap.yaml`
pub fn keymap_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("keymap.yaml"))
}

/// `~/.config/assetgrid/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no config directory available")
    })?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Ensure logs dir exists, returning it
pub fn ensure_logs_dir() -> std::io::Result<PathBuf> {
    let logs = ensure_config_dir()?.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}
