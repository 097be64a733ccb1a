//! State Street SPDR holdings workbooks.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use lookthrough_core::normalize::parse_money;
use lookthrough_core::{AssetType, HoldingsParser, LookthroughError, LookthroughResult, Table};
use rust_decimal::Decimal;
use tracing::error;

use crate::reader::{require_columns, table_from_records};

/// Parser for SPDR "All Holdings" workbooks.
///
/// The first sheet carries a few title lines, a header row and the
/// holdings, followed by disclaimers. The header is the first row with
/// more than two filled cells; holdings run until a row with at most one.
/// Weights are percentages, rescaled so they sum to one.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpdrParser;

impl SpdrParser {
    /// Registry key.
    pub const ISSUER: &'static str = "SPDR";
}

impl HoldingsParser for SpdrParser {
    fn parse(&self, path: &Path) -> LookthroughResult<Table> {
        let source = path.display().to_string();
        let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(&source, e))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LookthroughError::format(&source, "workbook has no sheets"))?
            .map_err(|e| workbook_error(&source, e))?;
        parse_rows(&source, range.rows())
    }
}

fn workbook_error(source: &str, err: calamine::Error) -> LookthroughError {
    match err {
        calamine::Error::Io(e) => LookthroughError::Io(format!("{source}: {e}")),
        other => LookthroughError::format(source, other.to_string()),
    }
}

fn filled(row: &[String]) -> usize {
    row.iter().filter(|c| !c.is_empty()).count()
}

/// Header and holdings rows of a sheet, padded to the header width.
fn sheet_records<'a, I>(rows: I) -> Vec<Vec<String>>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let mut rows = rows
        .into_iter()
        .map(|row| row.iter().map(|c| c.to_string().trim().to_string()).collect::<Vec<_>>());

    let Some(header) = rows.by_ref().find(|r| filled(r) > 2) else {
        return Vec::new();
    };
    let width = header.len();
    let mut records = vec![header];
    for mut row in rows.take_while(|r| filled(r) > 1) {
        row.resize(width, String::new());
        records.push(row);
    }
    records
}

pub(crate) fn parse_rows<'a, I>(source: &str, rows: I) -> LookthroughResult<Table>
where
    I: IntoIterator<Item = &'a [Data]>,
{
    let records = sheet_records(rows);
    if records.is_empty() {
        return Err(LookthroughError::schema(vec![format!("{source}: no header row")]));
    }
    let table = table_from_records(source, records)?;
    require_columns(&table, &["name", "identifier", "weight"])?;

    let weights = table
        .values("weight")?
        .map(parse_money)
        .collect::<LookthroughResult<Vec<Decimal>>>()?;
    let total: Decimal = weights.iter().copied().sum();
    if total.is_zero() {
        return Err(LookthroughError::schema(vec![
            "column 'weight' sums to zero".to_string(),
        ]));
    }
    if total < Decimal::from(99) || total > Decimal::from(101) {
        error!(source, total = %total, "SPDR weights do not sum to 100");
    }
    let mut fractions = weights.into_iter().map(|w| (w / total).normalize().to_string());

    let table = table
        .create("fraction", |_| fractions.next().unwrap_or_default())
        .create("asstype", |_| AssetType::Equity.to_string());

    // Newer workbooks carry a ticker column next to the CUSIP identifier.
    let table = if table.has_column("ticker") {
        table.rename("identifier", "cusip")?
    } else {
        table.rename("identifier", "ticker")?
    };

    let mut columns = vec!["fraction", "asstype", "name", "ticker"];
    columns.extend(["cusip", "sedol"].into_iter().filter(|c| table.has_column(c)));
    table.select(&columns)
}
