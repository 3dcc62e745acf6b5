//! Where tint keeps its files on disk
//!
//! Everything sits in one per-user directory (`~/.config/tint/` on
//! Unix/macOS, `%APPDATA%\tint\` on Windows): `config.yaml` beside it,
//! stored highlights under `state/` and rolling logs under `logs/`.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

const APP_DIR: &str = "tint";

/// Per-user directory holding config, state and logs
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/tint`
///   - Else: `~/.config/tint`
///
/// Windows:
///   - `%APPDATA%\tint`
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

/// `~/.config/tint/config.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.yaml"))
}

/// `~/.config/tint/state/` - persisted highlight blobs
pub fn state_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("state"))
}

/// `~/.config/tint/logs/`
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("logs"))
}

fn ensure_dir(path: &Path) -> Result<(), String> {
    fs::create_dir_all(path)
        .map_err(|e| format!("Failed to create directory {}: {}", path.display(), e))
}

/// Ensure the base config dir exists, returning it
pub fn ensure_config_dir() -> Result<PathBuf, String> {
    let dir = config_dir().ok_or_else(|| "No config directory available".to_string())?;
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Create the logs dir when missing
pub fn ensure_logs_dir() -> Result<PathBuf, String> {
    let config = ensure_config_dir()?;
    let logs = config.join("logs");
    ensure_dir(&logs)?;
    Ok(logs)
}
