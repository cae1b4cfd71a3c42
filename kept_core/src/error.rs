//! Error types for the kept_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for kept_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input was rejected
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// No habit with the given id exists
    #[error("No habit with id {0}")]
    HabitNotFound(i64),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

/// Rejections reported back to the caller instead of applying a change.
///
/// These are ordinary values: the tracker leaves its collections untouched
/// and the front end shows the message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Habit name cannot be empty")]
    EmptyName,

    #[error("A date is required")]
    MissingDate,

    #[error("Severity must be between 1 and 5, got {0}")]
    SeverityOutOfRange(u8),

    #[error("Cycle length must be between 1 and 365 days")]
    InvalidCycleLength,

    #[error("Period length must be at least 1 day and no longer than the cycle")]
    InvalidPeriodLength,

    #[error("Period ends ({end}) before it starts ({start})")]
    InvertedPeriod {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("Date is out of range")]
    DateOutOfRange,

    #[error("Invalid month: {0}")]
    InvalidMonth(String),

    #[error("Unknown {kind}: {value}")]
    UnknownTag { kind: &'static str, value: String },
}
