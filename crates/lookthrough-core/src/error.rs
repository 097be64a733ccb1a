//! Error types for the Lookthrough library.
//!
//! The variants follow how each failure is handled by a run:
//!
//! - [`LookthroughError::Format`] aborts the run (input shape is essential)
//! - [`LookthroughError::Schema`] and [`LookthroughError::Parse`] reject a
//!   single holdings table; the owning position is skipped
//! - [`LookthroughError::Invariant`] signals an impossible internal state and
//!   aborts the run

use thiserror::Error;

/// A specialized Result type for Lookthrough operations.
pub type LookthroughResult<T> = Result<T, LookthroughError>;

/// The main error type for Lookthrough operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookthroughError {
    /// Malformed input row or missing required field.
    #[error("Format error in {source_name}: {reason}")]
    Format {
        /// File or stream the row came from.
        source_name: String,
        /// Description of the problem.
        reason: String,
    },

    /// A parsed holdings table violates the holdings table contract.
    #[error("Schema error: {}", issues.join("; "))]
    Schema {
        /// Every violation found, in column order.
        issues: Vec<String>,
    },

    /// A single cell failed numeric or percent conversion.
    #[error("Parse error: invalid value {value:?}: {reason}")]
    Parse {
        /// The offending cell text.
        value: String,
        /// Why the conversion failed.
        reason: String,
    },

    /// Internal consistency check failed.
    #[error("Invariant violated: {reason}")]
    Invariant {
        /// Description of the violated invariant.
        reason: String,
    },

    /// I/O failure while reading or writing a file.
    #[error("I/O error: {0}")]
    Io(String),
}

impl LookthroughError {
    /// Creates a format error.
    #[must_use]
    pub fn format(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Format {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Creates a schema error from a list of violations.
    #[must_use]
    pub fn schema(issues: Vec<String>) -> Self {
        Self::Schema { issues }
    }

    /// Creates a parse error.
    #[must_use]
    pub fn parse(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invariant violation error.
    #[must_use]
    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::Invariant {
            reason: reason.into(),
        }
    }

    /// Returns true if this error should reject only the current holdings
    /// table rather than abort the run.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Schema { .. } | Self::Parse { .. } | Self::Io(_))
    }
}

impl From<std::io::Error> for LookthroughError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
