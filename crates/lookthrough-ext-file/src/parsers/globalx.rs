//! Global X holdings downloads.

use std::path::Path;

use lookthrough_core::{AssetType, HoldingsParser, LookthroughResult, Table};

use super::fraction_from_market_value;
use crate::reader::{parse_records, read_text, require_columns, table_from_records};

/// Leading cells of the disclaimer lines appended to the download.
const FOOTER_PREFIXES: [&str; 2] = [
    "Fund Holdings Data",
    "The information contained herein",
];

/// Parser for Global X holdings CSVs.
///
/// The first line is a fund title and the file ends with disclaimer text;
/// both are dropped before the table is read.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlobalXParser;

impl GlobalXParser {
    /// Registry key.
    pub const ISSUER: &'static str = "GlobalX";
}

impl HoldingsParser for GlobalXParser {
    fn parse(&self, path: &Path) -> LookthroughResult<Table> {
        let source = path.display().to_string();
        parse_download(&source, &read_text(path)?)
    }
}

fn parse_download(source: &str, text: &str) -> LookthroughResult<Table> {
    let body = text.split_once('\n').map_or("", |(_, rest)| rest);
    let records: Vec<Vec<String>> = parse_records(source, body, true)?
        .into_iter()
        .filter(|r| !is_footer(r))
        .collect();

    let table = table_from_records(source, records)?;
    require_columns(&table, &["ticker", "name", "sedol", "market_value"])?;

    fraction_from_market_value(table, "market_value")?
        .create("asstype", |_| AssetType::Equity.to_string())
        .select(&["fraction", "asstype", "name", "ticker", "sedol"])
}

fn is_footer(record: &[String]) -> bool {
    match record.first() {
        None => true,
        Some(first) => {
            record.iter().all(String::is_empty)
                || FOOTER_PREFIXES.iter().any(|p| first.starts_with(p))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lookthrough_core::{validate_holdings, LookthroughError};
    use rust_decimal_macros::dec;

    const DOWNLOAD: &str = "\
Global X SuperDividend ETF
% of Net Assets,Ticker,Name,SEDOL,Market Price ($),Shares Held,Market Value ($)
1.20,T,AT&T Inc,2831811,17.00,\"1,000\",\"17,000.00\"
0.90,VZ,Verizon Communications,2090571,40.00,75,\"3,000.00\"
,,,,,,
Fund Holdings Data as of 01/31/2024
\"The information contained herein is for informational purposes only\"
";

    #[test]
    fn test_parse_download() {
        let table = parse_download("sdiv.csv", DOWNLOAD).unwrap();
        let holdings = validate_holdings(&table).unwrap();

        assert_eq!(holdings.len(), 2);
        assert_eq!(holdings.rows[0].identifiers.ticker, "T");
        assert_eq!(holdings.rows[0].identifiers.sedol, "2831811");
        assert_eq!(holdings.rows[0].fraction, dec!(0.85));
        assert_eq!(holdings.rows[1].fraction, dec!(0.15));
        assert!(holdings.rows.iter().all(|r| r.asstype == AssetType::Equity));
    }

    #[test]
    fn test_title_only_file_is_format_error() {
        let err = parse_download("sdiv.csv", "Global X SuperDividend ETF\n").unwrap_err();
        assert!(matches!(err, LookthroughError::Format { .. }));
    }
}
