use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("identifier must not be empty")]
    EmptyId,

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}
