//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for EventRelay
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EventRelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for EventRelay operations
pub type Result<T> = std::result::Result<T, EventRelayError>;

/// Reasons an event start value could not be turned into an instant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartTimeError {
    #[error("empty start time")]
    Empty,

    #[error("unrecognised start time format: {0:?}")]
    Unparseable(String),

    #[error("local time {0:?} does not exist in time zone {1}")]
    NonexistentLocalTime(String, String),
}
