//! Error types for meetme-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeetError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("Invalid request config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MeetError>;
