//! Error types for configuration backend access.

use thiserror::Error;

/// Errors that can occur while reading or writing configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The backend refused or failed the operation.
    #[error("configuration backend error: {0}")]
    Backend(String),

    /// A stored value could not be interpreted.
    #[error("invalid value at {key}: {value:?}")]
    InvalidValue { key: String, value: String },

    /// The key layout document could not be parsed.
    #[error("invalid key layout: {0}")]
    Layout(String),
}

/// Convenience type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
