//! Collect command implementation.
//!
//! Looks through every fund in a portfolio and reports exposure per
//! underlying security.

use anyhow::{Context, Result};
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::Tabled;
use tracing::info;

use lookthrough_ext_file::{
    default_registry, open_position_source, write_debug_file, write_detail_file,
    write_summary_file, DatedDirectoryStore,
};
use lookthrough_portfolio::{AggregateRow, AggregationConfig, Lookthrough};

use super::config::Settings;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::{format_amount, format_weight, print_output, print_run_footer, print_warning};

/// Arguments for the collect command.
#[derive(Args, Debug)]
pub struct CollectArgs {
    /// Portfolio CSV, or `ledger:<file>` (alias `beancount:<file>`) for a ledger export
    pub portfolio: String,

    /// Holdings store directory (defaults to the configured `dbdir`)
    #[arg(long, env = "LOOKTHROUGH_DBDIR")]
    pub dbdir: Option<PathBuf>,

    /// Skip short positions instead of propagating negative exposure
    #[arg(long)]
    pub ignore_shorts: bool,

    /// Drop option lots from a ledger export
    #[arg(long)]
    pub ignore_options: bool,

    /// Parse holdings files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Write the summary table to this CSV file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Write the annotated detail table to this CSV file
    #[arg(long)]
    pub detail: Option<PathBuf>,

    /// Write the group listing to this text file
    #[arg(long)]
    pub debug: Option<PathBuf>,

    /// Print only the largest N securities
    #[arg(long)]
    pub head: Option<usize>,
}

/// One printed summary line.
#[derive(Debug, Serialize, Tabled)]
pub struct SummaryLine {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Symbol")]
    pub symbol: String,
    #[tabled(rename = "Type")]
    pub asstype: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Amount", display_with = "format_amount")]
    pub amount: Decimal,
    #[tabled(rename = "Weight", display_with = "format_weight")]
    pub weight: Decimal,
}

impl SummaryLine {
    fn new(rank: usize, row: &AggregateRow, total: Decimal) -> Self {
        let weight = if total.is_zero() {
            Decimal::ZERO
        } else {
            (row.amount / total).round_dp(6)
        };
        Self {
            rank,
            symbol: row.symbol.clone(),
            asstype: row.asstype.clone(),
            name: row.name.clone(),
            amount: row.amount,
            weight,
        }
    }
}

fn aggregation_config(args: &CollectArgs, settings: &Settings) -> AggregationConfig {
    AggregationConfig::default()
        .with_ignore_shorts(args.ignore_shorts || settings.ignore_shorts)
        .with_fraction_tolerance(settings.fraction_tolerance)
        .with_parallel(settings.parallel && !args.sequential)
}

/// Execute the collect command.
pub fn execute(args: CollectArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let dbdir = args
        .dbdir
        .clone()
        .or_else(|| settings.dbdir.clone())
        .ok_or_else(|| CliError::MissingArgument("--dbdir (or `config set dbdir`)".to_string()))?;

    let positions = open_position_source(&args.portfolio, args.ignore_options)
        .positions()
        .with_context(|| format!("reading portfolio {}", args.portfolio))?;
    if positions.is_empty() {
        print_warning("Portfolio has no positions");
    }

    info!(
        portfolio = %args.portfolio,
        dbdir = %dbdir.display(),
        positions = positions.len(),
        "Collecting holdings"
    );

    let store = DatedDirectoryStore::new(dbdir);
    let config = aggregation_config(&args, settings);
    let run = Lookthrough::run(&positions, &store, &default_registry(), &config)?;
    info!(
        rows = run.rows.len(),
        groups = run.groups.len(),
        total = %run.total,
        "Collect finished"
    );

    if let Some(path) = &args.summary {
        write_summary_file(path, &run.summary)?;
    }
    if let Some(path) = &args.detail {
        write_detail_file(path, &run.detail)?;
    }
    if let Some(path) = &args.debug {
        write_debug_file(path, &run)?;
    }

    let head = args.head.or(settings.head).unwrap_or(run.summary.len());
    let lines: Vec<SummaryLine> = run
        .head(head)
        .iter()
        .enumerate()
        .map(|(i, row)| SummaryLine::new(i, row, run.total))
        .collect();
    print_output(&lines, format)?;

    print_run_footer(&run);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(amount: Decimal) -> AggregateRow {
        AggregateRow {
            symbol: "AAPL".into(),
            asstype: "Equity".into(),
            name: "Apple Inc".into(),
            amount,
        }
    }

    #[test]
    fn test_summary_line_weight() {
        let line = SummaryLine::new(0, &row(Decimal::new(250, 0)), Decimal::new(1000, 0));
        assert_eq!(line.weight, Decimal::new(25, 2));
        assert_eq!(format_weight(&line.weight), "25.00%");
        assert_eq!(format_amount(&line.amount), "250.00");

        let line = SummaryLine::new(0, &row(Decimal::ONE), Decimal::ZERO);
        assert_eq!(line.weight, Decimal::ZERO);
    }
}
