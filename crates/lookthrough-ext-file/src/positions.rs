//! File-backed position sources.
//!
//! Two formats are read:
//!
//! - the plain portfolio CSV with `ticker, account, issuer, price, quantity`
//! - a ledger export, selected with a `ledger:` path prefix
//!
//! A malformed portfolio aborts the run, so every failure here surfaces as
//! a `Format` error.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lookthrough_core::normalize::parse_money;
use lookthrough_core::{LookthroughError, LookthroughResult, Position, PositionSource, Table};
use rust_decimal::Decimal;
use tracing::debug;

use crate::reader::read_table;

/// Path prefix selecting the ledger export reader.
pub const LEDGER_PREFIX: &str = "ledger:";

/// Alias for [`LEDGER_PREFIX`].
pub const BEANCOUNT_PREFIX: &str = "beancount:";

const PLAIN_COLUMNS: [&str; 5] = ["ticker", "account", "issuer", "price", "quantity"];

const EXPORT_COLUMNS: [&str; 8] = [
    "account_abbrev",
    "currency",
    "cost_currency",
    "export",
    "number",
    "issuer",
    "price_file",
    "rate_file",
];

fn format_error(source: &str, err: LookthroughError) -> LookthroughError {
    match err {
        LookthroughError::Format { reason, .. } => LookthroughError::format(source, reason),
        other => LookthroughError::format(source, other.to_string()),
    }
}

fn number(source: &str, text: &str) -> LookthroughResult<Decimal> {
    parse_money(text).map_err(|e| format_error(source, e))
}

fn load(path: &Path) -> LookthroughResult<(String, Table)> {
    let source = path.display().to_string();
    let table = read_table(path).map_err(|e| format_error(&source, e))?;
    Ok((source, table))
}

/// Reader for the plain portfolio CSV.
#[derive(Debug, Clone)]
pub struct CsvPositionSource {
    path: PathBuf,
}

impl CsvPositionSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl PositionSource for CsvPositionSource {
    fn positions(&self) -> LookthroughResult<Vec<Position>> {
        let (source, table) = load(&self.path)?;
        table
            .require(&PLAIN_COLUMNS)
            .map_err(|e| format_error(&source, e))?;
        let projected = table.select(&PLAIN_COLUMNS)?;

        let positions = projected
            .rows()
            .iter()
            .map(|row| {
                Ok(Position::new(
                    row[0].as_str(),
                    row[2].as_str(),
                    row[1].as_str(),
                    number(&source, &row[3])?,
                    number(&source, &row[4])?,
                ))
            })
            .collect::<LookthroughResult<Vec<_>>>()?;

        debug!(source = %source, positions = positions.len(), "Read portfolio");
        Ok(positions)
    }
}

/// Reader for ledger exports.
///
/// Lots of the same security at the same price in the same account are
/// merged into one position.
#[derive(Debug, Clone)]
pub struct ExportedPositionSource {
    path: PathBuf,
    ignore_options: bool,
}

impl ExportedPositionSource {
    /// Creates a source reading `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ignore_options: false,
        }
    }

    /// Drops rows whose `assetcls` is `Options`.
    #[must_use]
    pub fn ignore_options(mut self, ignore: bool) -> Self {
        self.ignore_options = ignore;
        self
    }
}

/// Ticker of an export row: the `export` symbol without its exchange, or
/// the currency itself when it differs from the cost currency.
fn export_ticker<'a>(export: &'a str, currency: &'a str, cost_currency: &str) -> &'a str {
    if export.is_empty() {
        if currency == cost_currency {
            ""
        } else {
            currency
        }
    } else {
        match export.split_once(':') {
            Some((_, symbol)) if !symbol.is_empty() => symbol,
            Some((exchange, _)) => exchange,
            None => export,
        }
    }
}

/// Empty numeric cells default to one.
fn number_or_one(source: &str, text: &str) -> LookthroughResult<Decimal> {
    if text.is_empty() {
        Ok(Decimal::ONE)
    } else {
        number(source, text)
    }
}

impl PositionSource for ExportedPositionSource {
    fn positions(&self) -> LookthroughResult<Vec<Position>> {
        let (source, mut table) = load(&self.path)?;
        table
            .require(&EXPORT_COLUMNS)
            .map_err(|e| format_error(&source, e))?;

        if self.ignore_options {
            if let Some(cls) = table.column_index("assetcls") {
                table = table.filter(|row| row[cls] != "Options");
            }
        }
        let projected = table.select(&EXPORT_COLUMNS)?;

        // (ticker, issuer, account, price) -> quantity
        let mut lots: BTreeMap<(String, String, String, Decimal), Decimal> = BTreeMap::new();
        for row in projected.rows() {
            let ticker = export_ticker(&row[3], &row[1], &row[2]);
            if ticker.is_empty() {
                continue;
            }
            let price = number_or_one(&source, &row[6])? * number_or_one(&source, &row[7])?;
            let quantity = number(&source, &row[4])?;
            *lots
                .entry((
                    ticker.to_string(),
                    row[5].clone(),
                    row[0].clone(),
                    price.normalize(),
                ))
                .or_default() += quantity;
        }

        let positions: Vec<Position> = lots
            .into_iter()
            .map(|((ticker, issuer, account, price), quantity)| {
                Position::new(ticker, issuer, account, price, quantity)
            })
            .collect();
        debug!(source = %source, positions = positions.len(), "Read ledger export");
        Ok(positions)
    }
}

/// Opens the position source named by `location`.
///
/// `ledger:<path>` or `beancount:<path>` reads a ledger export; anything
/// else is a plain portfolio CSV.
#[must_use]
pub fn open_position_source(location: &str, ignore_options: bool) -> Box<dyn PositionSource> {
    let export = location
        .strip_prefix(LEDGER_PREFIX)
        .or_else(|| location.strip_prefix(BEANCOUNT_PREFIX));
    match export {
        Some(path) => Box::new(ExportedPositionSource::new(path).ignore_options(ignore_options)),
        None => Box::new(CsvPositionSource::new(location)),
    }
}
