//! CLI error types.

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Missing required argument.
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    /// Unknown configuration key.
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value.
    #[error("Invalid {key}: {value}. {hint}")]
    InvalidValue {
        /// Configuration key.
        key: &'static str,
        /// Rejected value.
        value: String,
        /// What would have been accepted.
        hint: &'static str,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
