//! CSV to [`Table`] reading.

use std::path::Path;

use lookthrough_core::{LookthroughError, LookthroughResult, Table};

/// Coerces a raw header into a column identifier.
///
/// `%` becomes `pct`, every other non-alphanumeric run becomes a single
/// `_`, and the result is trimmed of `_` and lower-cased. An empty header
/// becomes `colNN`.
#[must_use]
pub fn normalize_header(index: usize, name: &str) -> String {
    let replaced = name.replace('%', "pct");
    let mut out = String::with_capacity(replaced.len());
    for c in replaced.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') {
            out.push('_');
        }
    }
    let trimmed = out.trim_matches('_');
    if trimmed.is_empty() {
        format!("col{index:02}")
    } else {
        trimmed.to_string()
    }
}

/// Reads a CSV file with a header row into a table with normalized headers.
///
/// # Errors
///
/// I/O failures are `Io`; ragged rows or undecodable text are `Format`.
pub fn read_table(path: &Path) -> LookthroughResult<Table> {
    let text = read_text(path)?;
    parse_table(&path.display().to_string(), &text)
}

/// Reads a whole file as text, dropping a leading byte order mark.
pub(crate) fn read_text(path: &Path) -> LookthroughResult<String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| LookthroughError::Io(format!("{}: {e}", path.display())))?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Parses CSV text whose first record is the header.
pub(crate) fn parse_table(source: &str, text: &str) -> LookthroughResult<Table> {
    table_from_records(source, parse_records(source, text, false)?)
}

/// Splits CSV text into records. Blank lines are skipped.
///
/// With `flexible`, records may differ in length; otherwise a ragged row
/// is a format error.
pub(crate) fn parse_records(
    source: &str,
    text: &str,
    flexible: bool,
) -> LookthroughResult<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(flexible)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(source, &e))?;
        records.push(record.iter().map(|c| c.trim().to_string()).collect());
    }
    Ok(records)
}

/// Builds a table from records, the first being the header.
pub(crate) fn table_from_records(
    source: &str,
    records: Vec<Vec<String>>,
) -> LookthroughResult<Table> {
    let mut iter = records.into_iter();
    let Some(header) = iter.next() else {
        return Err(LookthroughError::format(source, "empty file"));
    };
    let columns: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, h)| normalize_header(i, h))
        .collect();

    let mut table = Table::new(columns);
    for (line, row) in iter.enumerate() {
        if row.len() != table.columns().len() {
            return Err(LookthroughError::format(
                source,
                format!(
                    "record {} has {} fields, header has {}",
                    line + 2,
                    row.len(),
                    table.columns().len()
                ),
            ));
        }
        table.push_row(row)?;
    }
    Ok(table)
}

fn csv_error(source: &str, err: &csv::Error) -> LookthroughError {
    match err.kind() {
        csv::ErrorKind::Io(e) => LookthroughError::Io(format!("{source}: {e}")),
        _ => LookthroughError::format(source, err.to_string()),
    }
}

/// Checks that columns a parser needs are present.
///
/// A missing column means the issuer changed its file layout; the holdings
/// table is rejected rather than the run aborted.
pub(crate) fn require_columns(table: &Table, names: &[&str]) -> LookthroughResult<()> {
    let issues: Vec<String> = names
        .iter()
        .filter(|n| !table.has_column(n))
        .map(|n| format!("missing source column '{n}'"))
        .collect();
    if issues.is_empty() {
        Ok(())
    } else {
        Err(LookthroughError::schema(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header(0, "Market Value ($)"), "market_value");
        assert_eq!(normalize_header(0, "% of funds"), "pct_of_funds");
        assert_eq!(normalize_header(0, "Holding Ticker"), "holding_ticker");
        assert_eq!(normalize_header(0, "SEDOL"), "sedol");
        assert_eq!(normalize_header(3, ""), "col03");
        assert_eq!(normalize_header(7, "--"), "col07");
    }

    #[test]
    fn test_parse_table_trims_and_normalizes() {
        let table = parse_table("t.csv", "Ticker, Weight %\nAAPL , 7\n\nMSFT,6\n").unwrap();
        assert_eq!(
            table.columns(),
            &["ticker".to_string(), "weight_pct".to_string()]
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0][0], "AAPL");
    }

    #[test]
    fn test_ragged_is_format_error() {
        let err = parse_table("t.csv", "a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, LookthroughError::Format { .. }));
        assert!(parse_table("t.csv", "").is_err());
    }

    #[test]
    fn test_require_columns_is_schema_error() {
        let table = parse_table("t.csv", "name,market_value\nX,1\n").unwrap();
        assert!(require_columns(&table, &["name"]).is_ok());
        assert!(matches!(
            require_columns(&table, &["name", "asset_type"]),
            Err(LookthroughError::Schema { .. })
        ));
    }
}
