//! Result sinks: summary and detail CSV files and the debug group listing.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use lookthrough_portfolio::{AggregateRow, AnnotatedRow, Lookthrough};
use serde::Serialize;
use tracing::info;

use crate::error::{FileError, FileResult};

/// Summary CSV columns.
pub const SUMMARY_COLUMNS: [&str; 4] = ["symbol", "asstype", "name", "amount"];

/// Detail CSV columns.
pub const DETAIL_COLUMNS: [&str; 10] = [
    "group", "etf", "account", "asstype", "name", "ticker", "sedol", "isin", "cusip", "amount",
];

/// Writes rows under an explicit header, so an empty table still gets one.
fn write_csv<W, T>(out: W, header: &[&str], rows: &[T], label: &str) -> FileResult<()>
where
    W: Write,
    T: Serialize,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(out);
    let to_err = |e: csv::Error| FileError::csv(label, e.to_string());

    writer.write_record(header).map_err(to_err)?;
    for row in rows {
        writer.serialize(row).map_err(to_err)?;
    }
    writer
        .flush()
        .map_err(|e| FileError::io(label, e))
}

/// Writes the summary table as CSV.
pub fn write_summary_csv<W: Write>(out: W, rows: &[AggregateRow]) -> FileResult<()> {
    write_csv(out, &SUMMARY_COLUMNS, rows, "summary")
}

/// Writes the annotated detail table as CSV.
pub fn write_detail_csv<W: Write>(out: W, rows: &[AnnotatedRow]) -> FileResult<()> {
    write_csv(out, &DETAIL_COLUMNS, rows, "detail")
}

fn create(path: &Path) -> FileResult<BufWriter<File>> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|e| FileError::io(path, e))
}

/// Writes the summary table to a file.
pub fn write_summary_file(path: &Path, rows: &[AggregateRow]) -> FileResult<()> {
    write_summary_csv(create(path)?, rows)?;
    info!(path = %path.display(), rows = rows.len(), "Wrote summary");
    Ok(())
}

/// Writes the detail table to a file.
pub fn write_detail_file(path: &Path, rows: &[AnnotatedRow]) -> FileResult<()> {
    write_detail_csv(create(path)?, rows)?;
    info!(path = %path.display(), rows = rows.len(), "Wrote detail");
    Ok(())
}

/// Lists each group with its member rows and the identifiers that linked
/// them. Meant for reading, not parsing.
pub fn write_debug_groups<W: Write>(mut out: W, run: &Lookthrough) -> io::Result<()> {
    for (index, (group, summary)) in run.groups.iter().zip(&run.summary).enumerate() {
        writeln!(
            out,
            "group {index}: {} [{}] {} amount={}",
            summary.symbol, summary.asstype, summary.name, summary.amount
        )?;
        for row in run.group_rows(index) {
            writeln!(out, "{row}")?;
        }
        for key in &group.identifiers {
            writeln!(out, "    {key}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}

/// Writes the debug listing to a file.
pub fn write_debug_file(path: &Path, run: &Lookthrough) -> FileResult<()> {
    write_debug_groups(create(path)?, run).map_err(|e| FileError::io(path, e))
}
