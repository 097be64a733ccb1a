//! Per-issuer holdings file parsers.
//!
//! Each parser turns one issuer's download into a string [`Table`] in
//! holdings contract shape (`fraction`, `asstype`, identifier columns). The
//! aggregator validates the result, so parsers only reshape.
//!
//! Issuers that publish market values rather than weights get their
//! fractions from [`fraction_from_market_value`].

mod americanfunds;
mod contract;
mod globalx;
mod powershares;
mod spdr;
mod vanguard;

pub use americanfunds::AmericanFundsParser;
pub use contract::ContractCsvParser;
pub use globalx::GlobalXParser;
pub use powershares::PowerSharesParser;
pub use spdr::SpdrParser;
pub use vanguard::VanguardParser;

use lookthrough_core::normalize::parse_money;
use lookthrough_core::{LookthroughError, LookthroughResult, ParserRegistry, Table};
use rust_decimal::Decimal;

/// Registry with every file parser under its issuer key.
#[must_use]
pub fn default_registry() -> ParserRegistry {
    ParserRegistry::new()
        .with(ContractCsvParser::ISSUER, ContractCsvParser)
        .with(VanguardParser::ISSUER, VanguardParser)
        .with(PowerSharesParser::ISSUER, PowerSharesParser)
        .with(AmericanFundsParser::ISSUER, AmericanFundsParser)
        .with(GlobalXParser::ISSUER, GlobalXParser)
        .with(SpdrParser::ISSUER, SpdrParser)
}

/// Adds a `fraction` column from a market value column.
///
/// Negative market values count as zero, so
/// `fraction = max(0, mv) / sum(max(0, mv))`.
///
/// # Errors
///
/// `Parse` if a market value is not a dollar amount; `Schema` if the
/// positive market values sum to zero.
pub fn fraction_from_market_value(table: Table, column: &str) -> LookthroughResult<Table> {
    let values = table
        .values(column)?
        .map(|v| parse_money(v).map(|mv| mv.max(Decimal::ZERO)))
        .collect::<LookthroughResult<Vec<Decimal>>>()?;

    let total: Decimal = values.iter().copied().sum();
    if total.is_zero() {
        return Err(LookthroughError::schema(vec![format!(
            "column '{column}' has no positive market value"
        )]));
    }

    let mut fractions = values.into_iter().map(|mv| (mv / total).normalize().to_string());
    Ok(table.create("fraction", |_| fractions.next().unwrap_or_default()))
}
