//! [`KeyValueSettings`] backed by the TOML [`Config`].

use std::path::{Path, PathBuf};

use super::config::Config;
use crate::error::ConfigError;
use crate::scheduler::KeyValueSettings;

/// Last committed duration, in minutes.
pub const KEY_MINUTES: &str = "minutes";
/// Slider color, ARGB.
pub const KEY_COLOR: &str = "color";
/// Persistent notification (true) or toast (false) on commit.
pub const KEY_NOTIFICATIONS_ENABLED: &str = "notifications_enabled";

/// Reads and writes config keys by their dot path. When opened from a file,
/// every write is saved immediately.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    config: Config,
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Settings that are never written to disk.
    pub fn in_memory(config: Config) -> Self {
        Self { config, path: None }
    }

    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        Ok(Self {
            config: Config::load_from(path)?,
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens `config.toml` in the data directory.
    pub fn open_default() -> Result<Self, ConfigError> {
        Self::open(&super::data_dir()?.join("config.toml"))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = self.config.set(key, value) {
            tracing::warn!(key, %err, "ignoring settings write");
            return;
        }
        if let Some(path) = &self.path {
            if let Err(err) = self.config.save_to(path) {
                tracing::warn!(key, %err, "failed to persist settings");
            }
        }
    }
}

impl KeyValueSettings for SettingsStore {
    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.config
            .get(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) {
        self.write(key, &value.to_string());
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.config
            .get(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    fn set_bool(&mut self, key: &str, value: bool) {
        self.write(key, &value.to_string());
    }
}
