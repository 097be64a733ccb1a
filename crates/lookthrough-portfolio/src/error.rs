//! Error types for portfolio look-through.

use lookthrough_core::LookthroughError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that abort a look-through run.
///
/// Per-position problems are not errors; they are recorded as skips in the
/// [`crate::AggregationReport`].
#[derive(Error, Debug, Clone)]
pub enum PortfolioError {
    /// Input could not be read (malformed position or holdings file).
    #[error(transparent)]
    Input(#[from] LookthroughError),

    /// Rows were created, dropped or duplicated between two stages.
    #[error("Row count mismatch in {stage}: expected {expected}, got {actual}")]
    RowCountMismatch {
        /// The stage that broke conservation.
        stage: String,
        /// Rows going in.
        expected: usize,
        /// Rows coming out.
        actual: usize,
    },

    /// Dollar amounts did not sum to the input total.
    #[error("Amount mismatch in {stage}: expected {expected}, got {actual}")]
    AmountMismatch {
        /// The stage that broke conservation.
        stage: String,
        /// Total going in.
        expected: Decimal,
        /// Total coming out.
        actual: Decimal,
    },

    /// A row ended up in no group or in several.
    #[error("Row {row} assigned to {count} groups")]
    UnassignedRow {
        /// Index of the row in the flat table.
        row: usize,
        /// Number of groups containing it.
        count: usize,
    },
}

impl PortfolioError {
    /// Creates a row count mismatch error.
    #[must_use]
    pub fn row_count(stage: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::RowCountMismatch {
            stage: stage.into(),
            expected,
            actual,
        }
    }

    /// Creates an amount mismatch error.
    #[must_use]
    pub fn amount(stage: impl Into<String>, expected: Decimal, actual: Decimal) -> Self {
        Self::AmountMismatch {
            stage: stage.into(),
            expected,
            actual,
        }
    }

    /// Returns true if the error is an internal invariant violation rather
    /// than bad input.
    #[must_use]
    pub fn is_invariant(&self) -> bool {
        match self {
            Self::Input(e) => matches!(e, LookthroughError::Invariant { .. }),
            _ => true,
        }
    }
}
