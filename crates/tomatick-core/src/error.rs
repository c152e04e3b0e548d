//! Core error types for tomatick-core.
//!
//! The timer engine itself never fails; errors come from the configuration
//! layer, the input validation boundary and the notification port.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for tomatick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse errors
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Could not determine where configuration lives
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors raised at the input boundary.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Value outside the accepted range
    #[error("{field} must be between {min} and {max} minutes (got {value})")]
    OutOfRange {
        field: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },
}

/// Failure to deliver a completion cue. Never reaches the state machine.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The host has no way to produce the cue
    #[error("notification backend unavailable: {0}")]
    Unavailable(String),

    /// The backend was found but delivery failed
    #[error("notification failed: {0}")]
    Failed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
