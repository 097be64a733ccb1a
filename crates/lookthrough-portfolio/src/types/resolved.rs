//! Holding rows scaled to dollar exposure.

use std::fmt;

use lookthrough_core::{AssetType, HoldingRow, Identifiers};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decimal places kept on dollar amounts.
///
/// Fractions derived from market values rarely terminate, and unquantized
/// products at full precision make sums depend on summation order.
pub const AMOUNT_SCALE: u32 = 12;

/// A fund holding attributed to a portfolio position.
///
/// `amount` is the absolute dollar exposure (`fraction` times the position's
/// dollar amount), rounded to [`AMOUNT_SCALE`] places. The fraction itself
/// is not kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedHoldingRow {
    /// Sequential id assigned when the flat table is built; equal to the
    /// row's index in that table.
    pub id: usize,
    /// Owning fund ticker.
    pub etf: String,
    /// Account of the owning position.
    pub account: String,
    /// Asset class.
    pub asstype: AssetType,
    /// Issuer-provided identifiers.
    pub identifiers: Identifiers,
    /// Signed dollar exposure.
    pub amount: Decimal,
}

impl ResolvedHoldingRow {
    /// Scales a holding row by a position's dollar amount.
    #[must_use]
    pub fn from_holding(
        id: usize,
        holding: HoldingRow,
        etf: &str,
        account: &str,
        dollar_amount: Decimal,
    ) -> Self {
        Self {
            id,
            etf: etf.to_string(),
            account: account.to_string(),
            asstype: holding.asstype,
            identifiers: holding.identifiers,
            amount: (holding.fraction * dollar_amount).round_dp(AMOUNT_SCALE),
        }
    }
}

impl fmt::Display for ResolvedHoldingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids = &self.identifiers;
        write!(
            f,
            "#{} etf={} account={} asstype={} name={:?} ticker={:?} sedol={:?} isin={:?} cusip={:?} amount={}",
            self.id,
            self.etf,
            self.account,
            self.asstype,
            ids.name,
            ids.ticker,
            ids.sedol,
            ids.isin,
            ids.cusip,
            self.amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_holding_scales_amount() {
        let holding = HoldingRow::new(
            dec!(0.07),
            AssetType::Equity,
            Identifiers::new().with_ticker("AAPL"),
        );
        let row = ResolvedHoldingRow::from_holding(3, holding, "SPY", "Brokerage", dec!(4500));
        assert_eq!(row.amount, dec!(315));
        assert_eq!(row.etf, "SPY");
        assert_eq!(row.id, 3);
        assert!(row.to_string().contains("AAPL"));
    }

    #[test]
    fn test_short_position_propagates_sign() {
        let holding = HoldingRow::new(dec!(0.25), AssetType::Equity, Identifiers::new());
        let row = ResolvedHoldingRow::from_holding(0, holding, "QQQ", "Margin", dec!(-1000));
        assert_eq!(row.amount, dec!(-250));
    }

    #[test]
    fn test_non_terminating_fraction_is_quantized() {
        let third = Decimal::ONE / Decimal::from(3);
        let holding = HoldingRow::new(third, AssetType::Equity, Identifiers::new());
        let row = ResolvedHoldingRow::from_holding(0, holding, "QQQ", "Brokerage", dec!(100));
        assert_eq!(row.amount, dec!(33.333333333333));
        assert!(row.amount.scale() <= AMOUNT_SCALE);
    }
}
