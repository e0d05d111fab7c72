//! Error types for calendar and event storage.

use thiserror::Error;

/// Errors that can occur in store operations.
#[derive(Error, Debug)]
pub enum CalendarsError {
    /// A required field is missing or malformed.
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl CalendarsError {
    pub fn validation(kind: &str, field: &str) -> Self {
        CalendarsError::Validation(format!("{kind} validation failed: {field} is required"))
    }
}

/// Result type alias for store operations.
pub type CalendarsResult<T> = Result<T, CalendarsError>;
