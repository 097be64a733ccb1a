//! # Lookthrough Portfolio
//!
//! Disaggregates a portfolio of fund positions down to the securities the
//! funds hold, and merges rows that refer to the same security even when
//! issuers report it under different identifiers.
//!
//! ## Design Philosophy
//!
//! - **Collaborators behind traits**: holdings files come through
//!   [`HoldingsStore`](lookthrough_core::HoldingsStore) and
//!   [`ParserRegistry`](lookthrough_core::ParserRegistry); no I/O here
//! - **Exact money**: every amount is a [`Decimal`](rust_decimal::Decimal),
//!   so totals are conserved exactly across every stage
//! - **Skips, not failures**: a missing issuer, missing file or rejected
//!   holdings table skips one position and is recorded in the report
//! - **Config-driven parallelism**: optional rayon fan-out of fetch-and-parse
//!
//! ## Pipeline
//!
//! 1. [`aggregator`]: scale each fund's fractions by position size into one
//!    flat table of [`ResolvedHoldingRow`]s
//! 2. [`resolution`]: connect rows to shared identifiers and take connected
//!    components as resolved securities
//! 3. [`exposure`]: sum, label and rank each group; tag detail rows
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use lookthrough_portfolio::prelude::*;
//!
//! let config = AggregationConfig::default();
//! let run = Lookthrough::run(&positions, &store, &registry, &config)?;
//! for row in run.head(10) {
//!     println!("{:>12} {:<8} {}", row.amount, row.symbol, row.name);
//! }
//! println!("{}", run.report.summary());
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel`: Enable rayon-based parallel fetch-and-parse for large portfolios

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod error;
pub mod exposure;
pub mod parallel;
pub mod pipeline;
pub mod resolution;
pub mod types;

pub use error::{PortfolioError, PortfolioResult};

pub use types::{AggregationConfig, ResolvedHoldingRow, AMOUNT_SCALE};

pub use aggregator::{
    AggregationReport, OutcomeStatus, PortfolioAggregator, PositionOutcome, ReportCounts,
    SkipReason,
};

pub use resolution::{
    identifier_keys, resolve, resolve_components, Group, IdentifierKey, IdentityGraph,
    IdentityNode, MatchStats,
};

pub use exposure::{aggregate_exposure, canonical_name, AggregateRow, AnnotatedRow, Exposure};

pub use parallel::maybe_parallel_map;
pub use pipeline::Lookthrough;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::aggregator::{AggregationReport, PortfolioAggregator, SkipReason};
    pub use crate::error::{PortfolioError, PortfolioResult};
    pub use crate::exposure::{AggregateRow, AnnotatedRow};
    pub use crate::pipeline::Lookthrough;
    pub use crate::resolution::{Group, IdentifierKey, MatchStats};
    pub use crate::types::{AggregationConfig, ResolvedHoldingRow};

    pub use lookthrough_core::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use rust_decimal_macros::dec;
    use std::path::{Path, PathBuf};

    struct OneFile;

    impl HoldingsStore for OneFile {
        fn latest(&self, ticker: &str) -> LookthroughResult<Option<PathBuf>> {
            Ok(Some(PathBuf::from(format!("{ticker}.csv"))))
        }
    }

    fn spdr(_: &Path) -> LookthroughResult<Table> {
        Table::with_rows(
            ["fraction", "asstype", "ticker", "name"],
            vec![
                vec!["0.07".into(), "Equity".into(), "AAPL".into(), "Apple Inc".into()],
                vec!["0.06".into(), "Equity".into(), "MSFT".into(), "Microsoft Corp".into()],
            ],
        )
    }

    #[test]
    fn test_prelude_covers_a_run() {
        let registry = ParserRegistry::new().with("SPDR", spdr);
        let positions = vec![Position::new("SPY", "SPDR", "Brokerage", dec!(450), dec!(10))];

        let run = Lookthrough::run(
            &positions,
            &OneFile,
            &registry,
            &AggregationConfig::sequential(),
        )
        .unwrap();

        assert_eq!(run.summary.len(), 2);
        assert_eq!(run.total, dec!(585));
    }
}
