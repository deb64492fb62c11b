//! Error types for the OPEX alert engine.

use thiserror::Error;

/// Errors that can occur while loading a calendar or selecting alerts.
#[derive(Error, Debug)]
pub enum OpexError {
    /// The calendar source (or the tier definitions that travel with it) is unusable.
    #[error("Malformed calendar: {0}")]
    MalformedCalendar(String),

    /// The caller asked for something the selector does not support.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OpexError {
    pub fn is_malformed_calendar(&self) -> bool {
        matches!(self, OpexError::MalformedCalendar(_))
    }

    pub fn is_invalid_request(&self) -> bool {
        matches!(self, OpexError::InvalidRequest(_))
    }
}

/// Result type alias for OPEX operations.
pub type OpexResult<T> = Result<T, OpexError>;
