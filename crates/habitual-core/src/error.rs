//! Core error types for habitual-core.
//!
//! Validation failures are raised where external data enters the engine's
//! data model. The recurrence queries themselves are total and never return
//! these errors.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::recurrence::TimeOfDay;

/// Core error type for habitual-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A stored habit record failed validation
    #[error("Invalid habit record '{id}': {source}")]
    InvalidRecord {
        id: String,
        #[source]
        source: ValidationError,
    },

    /// Lookup of an unknown habit or goal id
    #[error("No {kind} with id '{id}'")]
    NotFound { kind: &'static str, id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
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

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Zero-length or inverted time window
    #[error("Invalid time window: end ({end}) must be later than start ({start})")]
    InvalidWindow { start: TimeOfDay, end: TimeOfDay },

    /// Weekday, day of month or time string outside its domain
    #[error("Invalid value for '{field}': {message}")]
    InvalidRecurrenceValue { field: String, message: String },

    /// Habit ends before it starts
    #[error("Invalid active range: end date ({until}) is before start date ({from})")]
    InvalidActiveRange { from: NaiveDate, until: NaiveDate },

    /// Date range whose start is after its end
    #[error("Empty date range: {from} is after {to}")]
    EmptyRange { from: NaiveDate, to: NaiveDate },

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),
}

impl ValidationError {
    pub(crate) fn recurrence_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidRecurrenceValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
