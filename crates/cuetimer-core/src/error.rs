//! Core error types for cuetimer-core.
//!
//! The engine itself never fails. Errors only exist at the two I/O
//! boundaries: the configuration store and the cue sink. Both are recovered
//! locally by their callers.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cuetimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The timer runner is no longer accepting commands
    #[error("Timer runner has stopped")]
    RunnerStopped,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors reported by a cue sink.
#[derive(Error, Debug)]
pub enum CueError {
    /// The output device rejected the cue
    #[error("Failed to play {kind} cue: {message}")]
    PlaybackFailed { kind: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
