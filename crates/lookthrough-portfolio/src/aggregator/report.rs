//! Per-position outcomes of an aggregation run.

use std::fmt;

use lookthrough_core::LookthroughError;
use serde::Serialize;

/// Why a position contributed no rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No parser is registered for the position's issuer.
    MissingIssuer {
        /// The unknown issuer key.
        issuer: String,
    },
    /// The holdings store has no file for the fund.
    MissingFile,
    /// The holdings file was rejected (contract, parse or I/O failure).
    Rejected(LookthroughError),
    /// Short position skipped because shorts are ignored.
    ShortIgnored,
}

impl SkipReason {
    /// Short category label used in the run summary.
    #[must_use]
    pub fn category(&self) -> &'static str {
        match self {
            SkipReason::MissingIssuer { .. } => "missing issuer",
            SkipReason::MissingFile => "missing file",
            SkipReason::Rejected(_) => "rejected",
            SkipReason::ShortIgnored => "short ignored",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingIssuer { issuer } => write!(f, "missing issuer {issuer:?}"),
            SkipReason::MissingFile => f.write_str("missing holdings file"),
            SkipReason::Rejected(err) => write!(f, "holdings rejected: {err}"),
            SkipReason::ShortIgnored => f.write_str("short position ignored"),
        }
    }
}

/// What happened to one position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Holdings were scaled and appended.
    Processed {
        /// Number of holding rows contributed.
        rows: usize,
    },
    /// The position was skipped.
    Skipped(SkipReason),
}

/// Outcome for one position, in processing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionOutcome {
    /// Position ticker.
    pub ticker: String,
    /// Position issuer.
    pub issuer: String,
    /// Position account.
    pub account: String,
    /// Result.
    pub status: OutcomeStatus,
}

/// Summary of an aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationReport {
    /// Outcomes in processing order.
    pub outcomes: Vec<PositionOutcome>,
}

/// Counts derived from an [`AggregationReport`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportCounts {
    /// Positions that contributed rows.
    pub processed: usize,
    /// Positions skipped for any reason.
    pub skipped: usize,
    /// Skipped for an unregistered issuer.
    pub missing_issuer: usize,
    /// Skipped for a missing stored file.
    pub missing_file: usize,
    /// Skipped because the holdings file was rejected.
    pub rejected: usize,
    /// Skipped short positions.
    pub short_ignored: usize,
    /// Rows contributed in total.
    pub rows: usize,
}

impl AggregationReport {
    /// Records an outcome.
    pub fn push(&mut self, outcome: PositionOutcome) {
        self.outcomes.push(outcome);
    }

    /// Skipped outcomes only.
    pub fn skipped(&self) -> impl Iterator<Item = (&PositionOutcome, &SkipReason)> {
        self.outcomes.iter().filter_map(|o| match &o.status {
            OutcomeStatus::Skipped(reason) => Some((o, reason)),
            OutcomeStatus::Processed { .. } => None,
        })
    }

    /// Tallies outcomes by category.
    #[must_use]
    pub fn counts(&self) -> ReportCounts {
        let mut counts = ReportCounts::default();
        for outcome in &self.outcomes {
            match &outcome.status {
                OutcomeStatus::Processed { rows } => {
                    counts.processed += 1;
                    counts.rows += rows;
                }
                OutcomeStatus::Skipped(reason) => {
                    counts.skipped += 1;
                    match reason {
                        SkipReason::MissingIssuer { .. } => counts.missing_issuer += 1,
                        SkipReason::MissingFile => counts.missing_file += 1,
                        SkipReason::Rejected(_) => counts.rejected += 1,
                        SkipReason::ShortIgnored => counts.short_ignored += 1,
                    }
                }
            }
        }
        counts
    }

    /// One-line end-of-run summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let c = self.counts();
        let mut line = format!(
            "{} positions processed ({} holding rows), {} skipped",
            c.processed, c.rows, c.skipped
        );
        let parts: Vec<String> = [
            (c.missing_issuer, "missing issuer"),
            (c.missing_file, "missing file"),
            (c.rejected, "rejected"),
            (c.short_ignored, "short ignored"),
        ]
        .iter()
        .filter(|(n, _)| *n > 0)
        .map(|(n, label)| format!("{n} {label}"))
        .collect();
        if !parts.is_empty() {
            line.push_str(&format!(" ({})", parts.join(", ")));
        }
        line
    }
}
