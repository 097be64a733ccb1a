//! Holdings table contract.
//!
//! Every issuer parser must produce a table with the required columns
//! `fraction` and `asstype`, plus at least one identifier column from
//! `name`, `ticker`, `sedol`, `isin`, `cusip`. No other columns are allowed.
//! [`validate_holdings`] checks that contract and converts the string table
//! into a typed [`HoldingsTable`], filling absent identifier columns with
//! empty strings so every row shares one schema.

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{LookthroughError, LookthroughResult};
use crate::table::Table;
use crate::types::{AssetType, HoldingRow, HoldingsTable, Identifiers};

/// Columns every holdings table must carry.
pub const REQUIRED_COLUMNS: [&str; 2] = ["fraction", "asstype"];

/// Optional identifier columns.
pub const IDENTIFIER_COLUMNS: [&str; 5] = ["name", "ticker", "sedol", "isin", "cusip"];

/// Validates a parser's output against the contract and converts it.
///
/// # Errors
///
/// - [`LookthroughError::Schema`] listing every unexpected column, missing
///   required column and out-of-range `asstype` value, or the absence of
///   any identifier
/// - [`LookthroughError::Parse`] if any `fraction` cell is not numeric; the
///   whole table is rejected
pub fn validate_holdings(table: &Table) -> LookthroughResult<HoldingsTable> {
    check_schema(table)?;

    let fraction_idx = index(table, "fraction")?;
    let asstype_idx = index(table, "asstype")?;
    let id_columns: Vec<(usize, &str)> = IDENTIFIER_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name).map(|i| (i, *name)))
        .collect();

    let mut rows = Vec::with_capacity(table.len());
    for cells in table.rows() {
        let fraction = parse_fraction(&cells[fraction_idx])?;
        let asstype = AssetType::from_str(&cells[asstype_idx])?;
        let mut identifiers = Identifiers::new();
        for &(idx, name) in &id_columns {
            identifiers.set_column(name, cells[idx].trim().to_string());
        }
        rows.push(HoldingRow::new(fraction, asstype, identifiers));
    }

    Ok(HoldingsTable::new(rows))
}

/// Checks column names, asset types and identifier presence.
///
/// All violations are collected before failing.
pub fn check_schema(table: &Table) -> LookthroughResult<()> {
    let mut issues = Vec::new();

    for column in table.columns() {
        let known = REQUIRED_COLUMNS.contains(&column.as_str())
            || IDENTIFIER_COLUMNS.contains(&column.as_str());
        if !known {
            issues.push(format!("unexpected column '{column}'"));
        }
    }

    for required in REQUIRED_COLUMNS {
        if !table.has_column(required) {
            issues.push(format!("missing required column '{required}'"));
        }
    }

    if let Some(idx) = table.column_index("asstype") {
        let invalid: BTreeSet<&str> = table
            .rows()
            .iter()
            .map(|r| r[idx].as_str())
            .filter(|v| AssetType::from_str(v).is_err())
            .collect();
        for value in invalid {
            issues.push(format!("invalid asstype {value:?}"));
        }
    }

    let id_indexes: Vec<usize> = IDENTIFIER_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();
    if id_indexes.is_empty() {
        issues.push(format!(
            "no identifier column (expected one of {})",
            IDENTIFIER_COLUMNS.join(", ")
        ));
    } else if !table
        .rows()
        .iter()
        .any(|r| id_indexes.iter().any(|&i| !r[i].trim().is_empty()))
    {
        issues.push("no row carries a non-empty identifier".to_string());
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(LookthroughError::schema(issues))
    }
}

fn index(table: &Table, name: &str) -> LookthroughResult<usize> {
    table
        .column_index(name)
        .ok_or_else(|| LookthroughError::schema(vec![format!("missing required column '{name}'")]))
}

fn parse_fraction(text: &str) -> LookthroughResult<Decimal> {
    let trimmed = text.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| LookthroughError::parse(text, e.to_string()))
}
