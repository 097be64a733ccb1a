//! Portfolio aggregation.
//!
//! Walks the investor's positions, pulls each fund's holdings through the
//! store and issuer parser, and scales every holding's fraction into an
//! absolute dollar amount. The result is one flat table across all funds.
//!
//! Fetch-and-parse per position is independent and may run in parallel;
//! scaling and concatenation happen after every position has finished.

mod report;

pub use report::{AggregationReport, OutcomeStatus, PositionOutcome, ReportCounts, SkipReason};

use lookthrough_core::{
    validate_holdings, HoldingsStore, HoldingsTable, LookthroughError, ParserRegistry, Position,
};
use tracing::{debug, info, warn};

use crate::error::PortfolioResult;
use crate::parallel::maybe_parallel_map;
use crate::types::{AggregationConfig, ResolvedHoldingRow};

/// Scales fund holdings by position size and concatenates them.
///
/// # Example
///
/// ```rust,ignore
/// let aggregator = PortfolioAggregator::new(&store, &registry, &config);
/// let (rows, report) = aggregator.aggregate(&positions)?;
/// println!("{}", report.summary());
/// ```
pub struct PortfolioAggregator<'a> {
    store: &'a dyn HoldingsStore,
    registry: &'a ParserRegistry,
    config: &'a AggregationConfig,
}

impl<'a> PortfolioAggregator<'a> {
    /// Creates an aggregator over the given collaborators.
    #[must_use]
    pub fn new(
        store: &'a dyn HoldingsStore,
        registry: &'a ParserRegistry,
        config: &'a AggregationConfig,
    ) -> Self {
        Self {
            store,
            registry,
            config,
        }
    }

    /// Aggregates all positions into one flat table of dollar exposures.
    ///
    /// Positions are processed in `(issuer, ticker)` order. Positions that
    /// cannot be resolved are skipped and recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns an error only for input that aborts the run: a malformed
    /// holdings file row shape or an internal invariant violation.
    pub fn aggregate(
        &self,
        positions: &[Position],
    ) -> PortfolioResult<(Vec<ResolvedHoldingRow>, AggregationReport)> {
        let mut ordered: Vec<&Position> = positions.iter().collect();
        ordered.sort_by(|a, b| a.processing_key().cmp(&b.processing_key()));

        let loaded = maybe_parallel_map(&ordered, self.config, |p| self.load(p));

        let mut rows = Vec::new();
        let mut report = AggregationReport::default();
        for (position, result) in ordered.into_iter().zip(loaded) {
            let status = match result? {
                Ok(holdings) => {
                    let count = holdings.len();
                    append_scaled(&mut rows, position, holdings);
                    debug!(ticker = %position.ticker, rows = count, "Aggregated position");
                    OutcomeStatus::Processed { rows: count }
                }
                Err(reason) => {
                    warn!(
                        ticker = %position.ticker,
                        issuer = %position.issuer,
                        account = %position.account,
                        reason = %reason,
                        "Skipping position"
                    );
                    OutcomeStatus::Skipped(reason)
                }
            };
            report.push(PositionOutcome {
                ticker: position.ticker.clone(),
                issuer: position.issuer.clone(),
                account: position.account.clone(),
                status,
            });
        }

        info!("{}", report.summary());
        Ok((rows, report))
    }

    /// Resolves the holdings table for one position.
    ///
    /// The outer result carries run-aborting errors; the inner one a skip.
    fn load(&self, position: &Position) -> PortfolioResult<Result<HoldingsTable, SkipReason>> {
        if self.config.ignore_shorts && position.is_short() {
            return Ok(Err(SkipReason::ShortIgnored));
        }

        if position.is_direct() {
            return Ok(Ok(HoldingsTable::direct(&position.ticker)));
        }

        let Some(parser) = self.registry.get(&position.issuer) else {
            return Ok(Err(SkipReason::MissingIssuer {
                issuer: position.issuer.clone(),
            }));
        };

        let path = match self.store.latest(&position.ticker) {
            Ok(Some(path)) => path,
            Ok(None) => return Ok(Err(SkipReason::MissingFile)),
            Err(e) => return reject(e),
        };

        debug!(ticker = %position.ticker, path = %path.display(), "Parsing holdings");
        let holdings = match parser.parse(&path).and_then(|t| validate_holdings(&t)) {
            Ok(holdings) => holdings,
            Err(e) => return reject(e),
        };

        if !holdings.fractions_within(self.config.fraction_tolerance) {
            warn!(
                ticker = %position.ticker,
                total = %holdings.total_fraction(),
                "Holdings fractions do not sum to 1; amounts are not rescaled"
            );
        }

        Ok(Ok(holdings))
    }
}

fn reject(err: LookthroughError) -> PortfolioResult<Result<HoldingsTable, SkipReason>> {
    if err.is_recoverable() {
        Ok(Err(SkipReason::Rejected(err)))
    } else {
        Err(err.into())
    }
}

fn append_scaled(rows: &mut Vec<ResolvedHoldingRow>, position: &Position, holdings: HoldingsTable) {
    let dollar_amount = position.dollar_amount();
    rows.reserve(holdings.len());
    for holding in holdings.rows {
        let id = rows.len();
        rows.push(ResolvedHoldingRow::from_holding(
            id,
            holding,
            &position.ticker,
            &position.account,
            dollar_amount,
        ));
    }
}
