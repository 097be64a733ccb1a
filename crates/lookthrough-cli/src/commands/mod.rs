//! CLI command implementations.

pub mod collect;
pub mod config;
pub mod issuers;
pub mod store;

// Re-export submodules for convenience
pub use collect::CollectArgs;
pub use config::ConfigArgs;
pub use store::StoreArgs;

use chrono::NaiveDate;

use crate::error::{CliError, CliResult};

/// Parses a date string in YYYY-MM-DD format.
pub fn parse_date(s: &str) -> CliResult<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CliError::InvalidDate(s.to_string()))
}
