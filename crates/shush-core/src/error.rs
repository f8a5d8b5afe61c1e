//! Core error types for shush-core.
//!
//! This module defines the error hierarchy using thiserror. Most of the
//! session machinery never surfaces an error to the user: stale signals are
//! swallowed as no-ops and geometry faults are prevented by construction.

use std::path::PathBuf;
use thiserror::Error;
use uuid::Uuid;

/// Core error type for shush-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Geometry faults (programming errors, never expected at runtime)
    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    /// Session state machine errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Radio control errors
    #[error("Radio error: {0}")]
    Radio(#[from] RadioError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from the dial geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
    /// The queried point coincides with the dial center, so it has no angle.
    #[error("point ({x}, {y}) coincides with the dial center")]
    InvalidGeometry { x: i32, y: i32 },
}

/// Errors from the deferral scheduler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The session already left `Armed`; the operation lost a race against
    /// another terminating signal.
    #[error("session {session_id} is no longer armed")]
    StaleSession { session_id: Uuid },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The home directory or the data directory could not be resolved
    #[error("Failed to resolve data directory: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Errors reported by a [`RadioControl`](crate::radio::RadioControl) backend.
#[derive(Error, Debug)]
pub enum RadioError {
    /// The backend command could not be run
    #[error("failed to run radio backend '{command}': {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The backend ran but reported failure
    #[error("radio backend '{command}' failed: {message}")]
    Backend { command: String, message: String },

    /// The backend answered with something we could not interpret
    #[error("unrecognized radio state: {0}")]
    UnknownState(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
