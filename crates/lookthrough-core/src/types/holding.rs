//! Holdings table contract types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{AssetType, Identifiers};

/// One constituent security inside a fund's holdings disclosure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingRow {
    /// Share of the fund's total value (nominally in [0, 1]).
    pub fraction: Decimal,
    /// Asset class.
    pub asstype: AssetType,
    /// Whatever identifiers the issuer published.
    pub identifiers: Identifiers,
}

impl HoldingRow {
    /// Creates a new holding row.
    #[must_use]
    pub fn new(fraction: Decimal, asstype: AssetType, identifiers: Identifiers) -> Self {
        Self {
            fraction,
            asstype,
            identifiers,
        }
    }
}

/// A validated holdings disclosure for one fund.
///
/// Built either by [`crate::contract::validate_holdings`] from a parser's
/// output table or synthesized for a direct holding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingsTable {
    /// The holding rows, in the order the issuer listed them.
    pub rows: Vec<HoldingRow>,
}

impl HoldingsTable {
    /// Creates a table from rows.
    #[must_use]
    pub fn new(rows: Vec<HoldingRow>) -> Self {
        Self { rows }
    }

    /// Synthesizes the degenerate one-security fund for a direct holding:
    /// 100% Equity, with the ticker used as both ticker and name.
    #[must_use]
    pub fn direct(ticker: &str) -> Self {
        Self::new(vec![HoldingRow::new(
            Decimal::ONE,
            AssetType::Equity,
            Identifiers::new().with_ticker(ticker).with_name(ticker),
        )])
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all fractions.
    #[must_use]
    pub fn total_fraction(&self) -> Decimal {
        self.rows.iter().map(|r| r.fraction).sum()
    }

    /// Returns true if the fractions sum to 1 within `tolerance`.
    ///
    /// Issuer files are often slightly incomplete; callers warn rather than
    /// rescale when this fails.
    #[must_use]
    pub fn fractions_within(&self, tolerance: Decimal) -> bool {
        (self.total_fraction() - Decimal::ONE).abs() <= tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_direct_table() {
        let table = HoldingsTable::direct("AAPL");
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.fraction, Decimal::ONE);
        assert_eq!(row.asstype, AssetType::Equity);
        assert_eq!(row.identifiers.ticker, "AAPL");
        assert_eq!(row.identifiers.name, "AAPL");
    }

    #[test]
    fn test_fraction_tolerance() {
        let table = HoldingsTable::new(vec![
            HoldingRow::new(dec!(0.60), AssetType::Equity, Identifiers::new().with_ticker("A")),
            HoldingRow::new(dec!(0.39), AssetType::Equity, Identifiers::new().with_ticker("B")),
        ]);
        assert_eq!(table.total_fraction(), dec!(0.99));
        assert!(table.fractions_within(dec!(0.02)));
        assert!(!table.fractions_within(dec!(0.005)));
    }
}
