//! Invesco PowerShares holdings downloads.

use std::path::Path;

use lookthrough_core::{AssetType, HoldingsParser, LookthroughResult, Table};

use super::fraction_from_market_value;
use crate::reader::{read_table, require_columns};

/// Parser for PowerShares holdings CSVs.
///
/// The file reports market values; every holding is equity. `Security Num`
/// is the CUSIP.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerSharesParser;

impl PowerSharesParser {
    /// Registry key.
    pub const ISSUER: &'static str = "PowerShares";
}

impl HoldingsParser for PowerSharesParser {
    fn parse(&self, path: &Path) -> LookthroughResult<Table> {
        let table = read_table(path)?;
        require_columns(&table, &["holding_ticker", "security_num", "name", "marketvalue"])?;

        fraction_from_market_value(table, "marketvalue")?
            .create("asstype", |_| AssetType::Equity.to_string())
            .rename("holding_ticker", "ticker")?
            .rename("security_num", "cusip")?
            .select(&["fraction", "asstype", "name", "ticker", "cusip"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookthrough_core::validate_holdings;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_parse_download() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "Fund Ticker,Security Num,Holding Ticker,Shares/Par Value,MarketValue,Weight,Name\n\
             QQQ,037833100,AAPL ,100,\"$3,000.00\",8.9,Apple Inc\n\
             QQQ,594918104,MSFT,50,\"$1,000.00\",8.1,Microsoft Corp\n"
        )
        .unwrap();

        let holdings = validate_holdings(&PowerSharesParser.parse(file.path()).unwrap()).unwrap();
        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings.rows[0].identifiers.ticker, "AAPL");
        assert_eq!(holdings.rows[0].identifiers.cusip, "037833100");
        assert_eq!(holdings.rows[0].fraction, dec!(0.75));
        assert_eq!(holdings.total_fraction(), dec!(1));
    }

    #[test]
    fn test_layout_change_is_recoverable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Ticker,Weight\nAAPL,1").unwrap();
        let err = PowerSharesParser.parse(file.path()).unwrap_err();
        assert!(err.is_recoverable());
    }
}
