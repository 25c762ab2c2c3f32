use thiserror::Error;

use crate::domain::SportEventKind;

/// Errors raised while parsing feed identifiers or mapping messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// Input does not follow the expected textual grammar
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Input is well-formed but semantically unacceptable
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Caller asked for an event kind the message id cannot represent
    #[error("Event {event_id} is a {actual:?} and cannot be mapped as {requested:?}")]
    IncompatibleEventKind {
        event_id: String,
        requested: SportEventKind,
        actual: SportEventKind,
    },
}

/// Result type for feed parsing and mapping operations
pub type Result<T> = std::result::Result<T, FeedError>;
