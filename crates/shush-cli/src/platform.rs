//! Collaborators for a desktop Linux terminal.
//!
//! - [`NmcliRadio`] switches Wi-Fi through NetworkManager's `nmcli`
//! - [`FileAlarms`] keeps the pending restore in `pending_restore.json`; the
//!   restore runs when `shush-cli radio restore --if-due` is invoked (from cron
//!   or a systemd timer)
//! - the console surfaces print to stderr

use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use shush_core::error::RadioError;
use shush_core::scheduler::{
    AlarmHandle, DeferredAction, DeferredActionScheduler, NotificationSurface, SessionEnd,
    SessionHost, TransientMessageSurface,
};
use shush_core::storage::data_dir;
use shush_core::{ConfigError, RadioControl};

const NMCLI: &str = "nmcli";

/// Wi-Fi radio controlled with `nmcli radio wifi [on|off]`.
#[derive(Debug, Default)]
pub struct NmcliRadio;

impl NmcliRadio {
    fn run(args: &[&str]) -> Result<String, RadioError> {
        let command = format!("{NMCLI} {}", args.join(" "));
        let output = Command::new(NMCLI)
            .args(args)
            .output()
            .map_err(|source| RadioError::Spawn {
                command: command.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(RadioError::Backend {
                command,
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl RadioControl for NmcliRadio {
    fn is_enabled(&self) -> Result<bool, RadioError> {
        match Self::run(&["radio", "wifi"])?.as_str() {
            "enabled" => Ok(true),
            "disabled" => Ok(false),
            other => Err(RadioError::UnknownState(other.to_string())),
        }
    }

    fn set_enabled(&mut self, enabled: bool) -> Result<(), RadioError> {
        Self::run(&["radio", "wifi", if enabled { "on" } else { "off" }]).map(|_| ())
    }
}

/// A restore waiting to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRestore {
    pub action: DeferredAction,
    pub at: DateTime<Local>,
}

impl PendingRestore {
    pub fn is_due(&self, now: DateTime<Local>) -> bool {
        self.at <= now
    }
}

/// One-shot alarms persisted to a JSON file. There is only one deferred
/// action, so the file holds at most one alarm.
#[derive(Debug, Clone)]
pub struct FileAlarms {
    path: PathBuf,
}

impl FileAlarms {
    pub fn at(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn open_default() -> Result<Self, ConfigError> {
        Ok(Self::at(&data_dir()?.join("pending_restore.json")))
    }

    pub fn pending(&self) -> Option<PendingRestore> {
        let content = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(pending) => Some(pending),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable pending restore");
                None
            }
        }
    }

    pub fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!("pending restore cleared"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(path = %self.path.display(), %err, "failed to clear pending restore"),
        }
    }
}

impl DeferredActionScheduler for FileAlarms {
    fn schedule_one_shot(&mut self, at: DateTime<Local>, action: DeferredAction) -> AlarmHandle {
        let pending = PendingRestore { action, at };
        let written = serde_json::to_string_pretty(&pending)
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&self.path, json).map_err(|e| e.to_string()));
        if let Err(err) = written {
            tracing::warn!(path = %self.path.display(), %err, "failed to persist pending restore");
        }
        AlarmHandle::for_action(action)
    }

    fn cancel(&mut self, handle: &AlarmHandle) {
        if self.pending().is_some_and(|p| p.action == handle.action) {
            self.clear();
        }
    }
}

/// Prints the status indicator to stderr. A terminal has nothing that
/// outlives the process, so dismissing is silent.
#[derive(Debug, Default)]
pub struct ConsoleNotifications;

impl NotificationSurface for ConsoleNotifications {
    fn show(&mut self, message: &str, primary_action: DeferredAction) {
        eprintln!("[notification] {message} ({})", primary_action.label());
    }

    fn dismiss(&mut self) {}
}

#[derive(Debug, Default)]
pub struct ConsoleMessages;

impl TransientMessageSurface for ConsoleMessages {
    fn show(&mut self, message: &str) {
        eprintln!("{message}");
    }
}

#[derive(Debug, Default)]
pub struct ConsoleHost {
    pub locked: bool,
}

impl SessionHost for ConsoleHost {
    fn is_locked_context(&self) -> bool {
        self.locked
    }

    // The linger is waited out by the caller once the queue has drained, so
    // the runtime is never blocked here.
    fn on_session_end(&mut self, end: &SessionEnd) {
        tracing::info!(session_id = %end.session_id, outcome = ?end.outcome, "session ended");
    }
}
