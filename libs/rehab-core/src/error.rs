//! Error types for rehab-core.

use thiserror::Error;

/// Result type alias using IdError.
pub type Result<T> = std::result::Result<T, IdError>;

/// Errors raised when a session id does not carry a usable ordinal suffix.
#[derive(Debug, Error)]
pub enum IdError {
    #[error("session id {id:?} has no ordinal suffix")]
    MissingOrdinal { id: String },

    #[error("session id {id:?} has a non-numeric ordinal {value:?}")]
    InvalidOrdinal { id: String, value: String },
}
