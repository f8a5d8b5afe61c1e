mod config;
mod settings;

pub use config::{Config, SessionConfig, UiConfig, DEFAULT_MINUTES};
pub use settings::{SettingsStore, KEY_COLOR, KEY_MINUTES, KEY_NOTIFICATIONS_ENABLED};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns `~/.config/shush[-dev]/` based on SHUSH_ENV.
///
/// Set SHUSH_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SHUSH_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("shush-dev")
    } else {
        base_dir.join("shush")
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
