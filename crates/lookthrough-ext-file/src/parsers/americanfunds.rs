//! American Funds quarterly holdings.

use std::path::Path;

use lookthrough_core::{AssetType, HoldingsParser, LookthroughError, LookthroughResult, Table};

use super::fraction_from_market_value;
use crate::reader::{read_table, require_columns};

/// Parser for American Funds holdings tables.
///
/// Only names are published, so these rows match other funds through the
/// name key alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmericanFundsParser;

impl AmericanFundsParser {
    /// Registry key.
    pub const ISSUER: &'static str = "AmericanFunds";
}

fn asset_type(label: &str) -> LookthroughResult<String> {
    let asstype = match label {
        "Equity" => AssetType::Equity,
        "Fixed Income" => AssetType::FixedIncome,
        "Short Term" => AssetType::ShortTerm,
        other => {
            return Err(LookthroughError::schema(vec![format!(
                "unknown asset type {other:?}"
            )]))
        }
    };
    Ok(asstype.to_string())
}

impl HoldingsParser for AmericanFundsParser {
    fn parse(&self, path: &Path) -> LookthroughResult<Table> {
        let table = read_table(path)?;
        require_columns(&table, &["security_name", "asset_type", "market_value"])?;

        fraction_from_market_value(table, "market_value")?
            .map("asset_type", asset_type)?
            .rename("asset_type", "asstype")?
            .rename("security_name", "name")?
            .select(&["fraction", "asstype", "name"])
    }
}
