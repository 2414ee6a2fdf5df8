//! Error types for configuration loading.

use thiserror::Error;

/// Result alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while loading or validating client configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A value was present but could not be accepted.
    #[error("invalid value for '{field}': {message}")]
    InvalidField {
        /// Field (or environment variable) that failed validation.
        field: String,
        /// Offending value.
        value: String,
        /// Human-readable reason.
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(
        field: impl Into<String>,
        value: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            field: field.into(),
            value: value.into(),
            message: message.into(),
        }
    }
}
