//! Settings file discovery and parsing.
//!
//! Resolution order mirrors the invocation surface: an explicit `--config`
//! path wins, then the `SATINV_CONFIG` environment variable, then
//! `satinv.toml` in the working directory, then the XDG config directory.

use crate::settings::{RawSettings, Settings};
use satinv_core::constants::{CONFIG_ENV_VAR, CONFIG_FILENAME};
use satinv_core::{Error, Result};
use std::path::PathBuf;
use tracing::debug;

/// Builder-style loader that resolves and parses the settings file
#[derive(Debug, Default)]
pub struct SettingsLoader {
    path: Option<PathBuf>,
}

impl SettingsLoader {
    /// Create a loader using the default resolution order
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an explicit settings file instead of searching for one
    #[must_use]
    pub fn path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Resolve, read and validate the settings file
    pub fn load(self) -> Result<Settings> {
        let env_override = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let path = resolve_path(self.path, env_override)?;
        debug!(path = %path.display(), "loading settings");

        let content = std::fs::read_to_string(&path).map_err(|e| {
            Error::configuration(format!("cannot read settings file '{}': {e}", path.display()))
        })?;

        let raw: RawSettings = toml::from_str(&content).map_err(|e| {
            Error::configuration(format!("invalid settings file '{}': {e}", path.display()))
        })?;

        Settings::from_raw(raw)
    }
}

fn resolve_path(explicit: Option<PathBuf>, env_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env_override {
        return Ok(path);
    }

    let cwd_candidate = PathBuf::from(CONFIG_FILENAME);
    if cwd_candidate.is_file() {
        return Ok(cwd_candidate);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let xdg_candidate = config_dir.join("satinv").join("config.toml");
        if xdg_candidate.is_file() {
            return Ok(xdg_candidate);
        }
    }

    Err(Error::configuration(format!(
        "no settings file found: pass --config, set {CONFIG_ENV_VAR}, \
         or create {CONFIG_FILENAME} in the working directory"
    )))
}
