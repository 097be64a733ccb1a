//! End-to-end look-through run.

use lookthrough_core::{HoldingsStore, LookthroughError, ParserRegistry, Position};
use rust_decimal::Decimal;

use crate::aggregator::{AggregationReport, PortfolioAggregator};
use crate::error::{PortfolioError, PortfolioResult};
use crate::exposure::{aggregate_exposure, AggregateRow, AnnotatedRow};
use crate::resolution::{resolve, Group, MatchStats};
use crate::types::{AggregationConfig, ResolvedHoldingRow, AMOUNT_SCALE};

/// Result of a complete look-through run.
///
/// `groups`, `summary` and the `group` column of `detail` share one
/// numbering: group 0 is the largest exposure.
#[derive(Debug, Clone)]
pub struct Lookthrough {
    /// The flat table of scaled holdings, indexed by row id.
    pub rows: Vec<ResolvedHoldingRow>,
    /// Resolved groups in canonical order.
    pub groups: Vec<Group>,
    /// One row per resolved security, largest exposure first.
    pub summary: Vec<AggregateRow>,
    /// Every flat row tagged with its group id.
    pub detail: Vec<AnnotatedRow>,
    /// Per-position outcomes.
    pub report: AggregationReport,
    /// Matching statistics.
    pub stats: MatchStats,
    /// Total dollar exposure.
    pub total: Decimal,
}

impl Lookthrough {
    /// Runs aggregation, resolution and canonicalization.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed input that aborts the run or for any
    /// violated conservation invariant.
    pub fn run(
        positions: &[Position],
        store: &dyn HoldingsStore,
        registry: &ParserRegistry,
        config: &AggregationConfig,
    ) -> PortfolioResult<Self> {
        let (rows, report) =
            PortfolioAggregator::new(store, registry, config).aggregate(positions)?;
        Self::from_rows(rows, report)
    }

    /// Resolves and aggregates an already built flat table.
    ///
    /// Amounts are rounded to [`AMOUNT_SCALE`] places before any sum is
    /// taken.
    ///
    /// # Errors
    ///
    /// Returns an error if row ids do not match their positions or if a
    /// conservation invariant is violated.
    pub fn from_rows(
        mut rows: Vec<ResolvedHoldingRow>,
        report: AggregationReport,
    ) -> PortfolioResult<Self> {
        if let Some((index, row)) = rows.iter().enumerate().find(|(i, r)| r.id != *i) {
            return Err(LookthroughError::invariant(format!(
                "row at index {index} carries id {}",
                row.id
            ))
            .into());
        }

        for row in &mut rows {
            row.amount = row.amount.round_dp(AMOUNT_SCALE);
        }

        let (groups, stats) = resolve(&rows)?;
        let exposure = aggregate_exposure(&rows, groups)?;

        let total: Decimal = rows.iter().map(|r| r.amount).sum();
        let summary_total: Decimal = exposure.summary.iter().map(|r| r.amount).sum();
        if summary_total != total {
            return Err(PortfolioError::amount("pipeline", total, summary_total));
        }

        Ok(Self {
            rows,
            groups: exposure.groups,
            summary: exposure.summary,
            detail: exposure.detail,
            report,
            stats,
            total,
        })
    }

    /// Member rows of a group, in id order.
    pub fn group_rows(&self, group: usize) -> impl Iterator<Item = &ResolvedHoldingRow> + '_ {
        self.groups
            .get(group)
            .into_iter()
            .flat_map(|g| g.rows.iter().map(|&i| &self.rows[i]))
    }

    /// The first `n` summary rows.
    #[must_use]
    pub fn head(&self, n: usize) -> &[AggregateRow] {
        &self.summary[..n.min(self.summary.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookthrough_core::{AssetType, Identifiers};
    use rust_decimal_macros::dec;

    fn row(id: usize, ticker: &str, amount: Decimal) -> ResolvedHoldingRow {
        ResolvedHoldingRow {
            id,
            etf: "FUND".into(),
            account: "A".into(),
            asstype: AssetType::Equity,
            identifiers: Identifiers::new().with_ticker(ticker),
            amount,
        }
    }

    #[test]
    fn test_from_rows() {
        let rows = vec![row(0, "A", dec!(1)), row(1, "B", dec!(3)), row(2, "A", dec!(4))];
        let run = Lookthrough::from_rows(rows, AggregationReport::default()).unwrap();

        assert_eq!(run.total, dec!(8));
        assert_eq!(run.summary.len(), 2);
        assert_eq!(run.head(1)[0].symbol, "A");
        assert_eq!(run.head(10).len(), 2);
        assert_eq!(run.group_rows(0).count(), 2);
        assert_eq!(run.group_rows(7).count(), 0);
    }

    #[test]
    fn test_misnumbered_rows_rejected() {
        let rows = vec![row(0, "A", dec!(1)), row(5, "B", dec!(3))];
        let err = Lookthrough::from_rows(rows, AggregationReport::default()).unwrap_err();
        assert!(err.is_invariant());
    }

    #[test]
    fn test_non_terminating_amounts_conserve() {
        // Thirty-first parts of an odd dollar amount, spread over tickers
        // that resolve into a handful of groups.
        let unit = dec!(1234.57) / Decimal::from(31);
        let rows: Vec<_> = (0..31)
            .map(|i| row(i, ["A", "B", "C", "D", "E"][i % 5], unit * Decimal::from(i as u64 + 1)))
            .collect();
        let run = Lookthrough::from_rows(rows, AggregationReport::default()).unwrap();

        let summary: Decimal = run.summary.iter().map(|r| r.amount).sum();
        let detail: Decimal = run.detail.iter().map(|r| r.amount).sum();
        assert_eq!(summary, run.total);
        assert_eq!(detail, run.total);
        assert!(run.rows.iter().all(|r| r.amount.scale() <= AMOUNT_SCALE));
        assert_eq!(run.summary.len(), 5);
    }
}
