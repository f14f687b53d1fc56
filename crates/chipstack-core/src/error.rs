//! Core error types for chipstack-core.
//!
//! Scoring errors are raised synchronously before any computation. The timer
//! has exactly one failure mode that reaches the caller: the isolated
//! countdown task cannot be created. Invalid timer transitions are ignored,
//! not reported.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chipstack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Scoring engine rejected its input
    #[error("Scoring error: {0}")]
    Scoring(#[from] ScoringError),

    /// Timer engine could not be brought up
    #[error("Timer error: {0}")]
    Timer(#[from] TimerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scoring engine errors.
///
/// Every variant is an invalid-argument condition: the engine never clamps
/// bad input into range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScoringError {
    /// Session duration below zero
    #[error("Duration cannot be negative (got {minutes} minutes)")]
    NegativeDuration { minutes: f64 },

    /// Session duration is NaN or infinite
    #[error("Duration must be a finite number of minutes")]
    NonFiniteDuration,

    /// Quality rating outside 1..=5
    #[error("Quality rating must be between 1 and 5 (got {rating})")]
    QualityOutOfRange { rating: i64 },

    /// A rank table that breaks the ordering invariants
    #[error("Invalid rank table: {0}")]
    InvalidRankTable(String),

    /// Chip formula constants the formula cannot evaluate
    #[error("Invalid chip policy: {0}")]
    InvalidPolicy(String),
}

/// Timer engine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimerError {
    /// No async runtime is available to host the countdown task.
    #[error("Timer engine could not be initialized: {0}")]
    Initialization(String),
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
