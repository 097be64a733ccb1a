//! Portfolio position.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of the investor's portfolio.
///
/// An empty `issuer` means the position is itself the underlying security
/// rather than a fund to look through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// Fund (or security) symbol.
    pub ticker: String,
    /// Key into the parser registry; empty for direct holdings.
    pub issuer: String,
    /// Grouping label, e.g. the brokerage account.
    pub account: String,
    /// Per-unit price.
    pub price: Decimal,
    /// Signed unit count; negative for short positions.
    pub quantity: Decimal,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub fn new(
        ticker: impl Into<String>,
        issuer: impl Into<String>,
        account: impl Into<String>,
        price: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            ticker: ticker.into(),
            issuer: issuer.into(),
            account: account.into(),
            price,
            quantity,
        }
    }

    /// Signed dollar amount of the position.
    #[must_use]
    pub fn dollar_amount(&self) -> Decimal {
        self.price * self.quantity
    }

    /// Returns true if the position directly holds a single security.
    #[must_use]
    pub fn is_direct(&self) -> bool {
        self.issuer.is_empty()
    }

    /// Returns true for short positions.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.quantity.is_sign_negative() && !self.quantity.is_zero()
    }

    /// Sort key used to process positions in a reproducible order.
    #[must_use]
    pub fn processing_key(&self) -> (&str, &str) {
        (&self.issuer, &self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_dollar_amount_preserves_sign() {
        let long = Position::new("SPY", "SPDR", "Brokerage", dec!(450), dec!(10));
        assert_eq!(long.dollar_amount(), dec!(4500));
        assert!(!long.is_short());

        let short = Position::new("QQQ", "PowerShares", "Margin", dec!(380.25), dec!(-4));
        assert_eq!(short.dollar_amount(), dec!(-1521.00));
        assert!(short.is_short());
    }

    #[test]
    fn test_direct_holding() {
        let pos = Position::new("AAPL", "", "IRA", dec!(190), dec!(3));
        assert!(pos.is_direct());
    }
}
