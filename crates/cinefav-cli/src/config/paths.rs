//! Config file location.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory under the base config directory.
const APP_DIR: &str = "cinefav";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Picks the base config directory from `XDG_CONFIG_HOME`, then `HOME`.
fn config_home(xdg_config_home: Option<String>, home: Option<String>) -> Result<PathBuf> {
    if let Some(xdg) = xdg_config_home.filter(|v| Path::new(v).is_absolute()) {
        return Ok(PathBuf::from(xdg));
    }
    match home.filter(|v| !v.is_empty()) {
        Some(home) => Ok(Path::new(&home).join(".config")),
        None => bail!("neither XDG_CONFIG_HOME nor HOME is set"),
    }
}

/// Resolves the config file path.
///
/// `{dir}/config.toml` when `dir` is given, otherwise
/// `$XDG_CONFIG_HOME/cinefav/config.toml` (default `~/.config`).
///
/// # Errors
///
/// Returns an error if no base directory can be determined.
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = dir {
        return Ok(dir.join(CONFIG_FILE_NAME));
    }
    let base = config_home(
        std::env::var("XDG_CONFIG_HOME").ok(),
        std::env::var("HOME").ok(),
    )?;
    Ok(base.join(APP_DIR).join(CONFIG_FILE_NAME))
}
