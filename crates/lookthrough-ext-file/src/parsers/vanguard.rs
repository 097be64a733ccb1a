//! Vanguard holdings exports.
//!
//! The export is one CSV file holding several tables separated by blank
//! lines. Each table is introduced by a single-cell title row naming the
//! asset class.

use std::path::Path;

use lookthrough_core::normalize::{empty_dashes, parse_percent};
use lookthrough_core::{AssetType, HoldingsParser, LookthroughError, LookthroughResult, Table};
use tracing::{debug, warn};

use crate::reader::{parse_records, read_text, require_columns, table_from_records};

const COLUMNS: [&str; 5] = ["fraction", "asstype", "name", "ticker", "sedol"];

/// Parser for Vanguard's sectioned holdings export.
#[derive(Debug, Clone, Copy, Default)]
pub struct VanguardParser;

impl VanguardParser {
    /// Registry key.
    pub const ISSUER: &'static str = "Vanguard";
}

impl HoldingsParser for VanguardParser {
    fn parse(&self, path: &Path) -> LookthroughResult<Table> {
        let source = path.display().to_string();
        parse_export(&source, &read_text(path)?)
    }
}

fn parse_export(source: &str, text: &str) -> LookthroughResult<Table> {
    let mut out = Table::new(COLUMNS);
    let mut sections = 0;

    for (index, section) in split_sections(text).into_iter().enumerate() {
        let records = parse_records(source, &section, true)?;
        if records.len() < 2 {
            continue;
        }
        if records[0].len() != 1 || records[1].len() == 1 {
            warn!(source, section = index, "Skipping untitled section");
            continue;
        }

        let title = records[0][0].as_str();
        let Some(kind) = Section::from_title(title) else {
            warn!(source, title, "Skipping unknown section");
            continue;
        };
        let table = table_from_records(source, records[1..].to_vec())?;
        append(&mut out, &table, kind)?;
        debug!(source, title, rows = table.len(), "Parsed section");
        sections += 1;
    }

    if sections == 0 {
        return Err(LookthroughError::schema(vec![
            "no Equity, Fixed income or Short-term reserves section".to_string(),
        ]));
    }
    Ok(out)
}

/// Splits text at blank lines.
fn split_sections(text: &str) -> Vec<String> {
    let mut sections = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
        } else {
            current.push_str(line);
            current.push('\n');
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }
    sections
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Equity,
    FixedIncome,
    ShortTermReserves,
}

impl Section {
    fn from_title(title: &str) -> Option<Self> {
        match title {
            "Equity" => Some(Section::Equity),
            "Fixed income" => Some(Section::FixedIncome),
            "Short-term reserves" => Some(Section::ShortTermReserves),
            _ => None,
        }
    }

    fn asstype(self) -> AssetType {
        match self {
            Section::Equity => AssetType::Equity,
            Section::FixedIncome => AssetType::FixedIncome,
            Section::ShortTermReserves => AssetType::ShortTerm,
        }
    }

    fn required(self) -> &'static [&'static str] {
        match self {
            Section::Equity => &["ticker", "holdings", "pct_of_funds"],
            Section::FixedIncome => &["sedol", "holdings", "pct_of_funds"],
            Section::ShortTermReserves => &["holdings", "pct_of_funds"],
        }
    }
}

/// Appends one section's rows in contract shape.
fn append(out: &mut Table, table: &Table, section: Section) -> LookthroughResult<()> {
    require_columns(table, section.required())?;
    let pct = table.column_index("pct_of_funds");
    let holdings = table.column_index("holdings");
    let ticker = table.column_index("ticker");
    let sedol = table.column_index("sedol");

    for row in table.rows() {
        let get = |idx: Option<usize>| idx.map_or("", |i| row[i].as_str());
        let fraction = parse_percent(get(pct))?;
        let (ticker, sedol) = match section {
            Section::Equity => (get(ticker), ""),
            Section::FixedIncome => ("", empty_dashes(get(sedol))),
            // Cash from every fund shares one ticker so it aggregates.
            Section::ShortTermReserves => ("CASH", ""),
        };
        out.push_row(vec![
            fraction.to_string(),
            section.asstype().to_string(),
            get(holdings).to_string(),
            ticker.to_string(),
            sedol.to_string(),
        ])?;
    }
    Ok(())
}
