//! Output formatting utilities.

use colored::Colorize;
use lookthrough_portfolio::Lookthrough;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;

/// Formats and prints output based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints data as a formatted table, numeric rank and amount columns
/// right-aligned.
fn print_table<T: Tabled>(data: &[T]) -> anyhow::Result<()> {
    if data.is_empty() {
        println!("Nothing to show.");
        return Ok(());
    }

    let mut table = Table::new(data);
    table.with(Style::rounded());
    if T::LENGTH > 2 {
        table
            .with(Modify::new(Columns::first()).with(Alignment::right()))
            .with(Modify::new(Columns::last()).with(Alignment::right()))
            .with(Modify::new(Columns::single(T::LENGTH - 2)).with(Alignment::right()));
    }

    println!("{table}");
    Ok(())
}

/// Prints data as JSON.
fn print_json<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Formats a dollar amount to cents.
pub fn format_amount(amount: &Decimal) -> String {
    format!("{:.2}", amount)
}

/// Formats a fraction as a percentage.
pub fn format_weight(weight: &Decimal) -> String {
    format!("{:.2}%", *weight * Decimal::ONE_HUNDRED)
}

/// Prints the end-of-run lines: position outcomes, then match statistics.
pub fn print_run_footer(run: &Lookthrough) {
    print_info(&run.report.summary());
    print_info(&format!(
        "{} securities from {} holding rows, {} matched across rows ({:.1}%), total {}",
        run.stats.groups,
        run.stats.rows,
        run.stats.matched_groups,
        run.stats.match_ratio() * 100.0,
        format_amount(&run.total)
    ));
    for (reason, count) in skipped_by_reason(run) {
        print_warning(&format!("{count} skipped: {reason}"));
    }
}

/// Distinct skip reasons with their counts, most frequent first.
fn skipped_by_reason(run: &Lookthrough) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for (_, reason) in run.report.skipped() {
        let text = reason.to_string();
        match counts.iter_mut().find(|(r, _)| *r == text) {
            Some((_, n)) => *n += 1,
            None => counts.push((text, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Prints a success message.
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message);
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}
