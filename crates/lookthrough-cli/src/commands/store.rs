//! Store command implementation.
//!
//! Reads and fills the dated-directory holdings store. Downloading is done
//! elsewhere; `import` files what was downloaded.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use std::path::PathBuf;

use lookthrough_core::HoldingsStore;
use lookthrough_ext_file::DatedDirectoryStore;

use super::config::Settings;
use super::parse_date;
use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::output::print_success;

/// Arguments for the store command.
#[derive(Args, Debug)]
pub struct StoreArgs {
    /// Holdings store directory (defaults to the configured `dbdir`)
    #[arg(long, env = "LOOKTHROUGH_DBDIR", global = true)]
    pub dbdir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: StoreCommand,
}

/// Store subcommands.
#[derive(Subcommand, Debug)]
pub enum StoreCommand {
    /// Print the latest stored holdings file for a fund
    Latest {
        /// Fund ticker
        ticker: String,
    },

    /// Copy a downloaded holdings file into the store
    Import {
        /// Fund ticker
        ticker: String,

        /// Downloaded file
        file: PathBuf,

        /// Download date, YYYY-MM-DD (defaults to today)
        #[arg(long)]
        date: Option<String>,
    },
}

/// Execute the store command.
pub fn execute(args: StoreArgs, settings: &Settings, format: OutputFormat) -> Result<()> {
    let dbdir = args
        .dbdir
        .or_else(|| settings.dbdir.clone())
        .ok_or_else(|| CliError::MissingArgument("--dbdir (or `config set dbdir`)".to_string()))?;
    let store = DatedDirectoryStore::new(dbdir);

    match args.command {
        StoreCommand::Latest { ticker } => execute_latest(&store, &ticker, format),
        StoreCommand::Import { ticker, file, date } => {
            let date = match date {
                Some(d) => parse_date(&d)?,
                None => chrono::Local::now().date_naive(),
            };
            execute_import(&store, &ticker, &file, date)
        }
    }
}

fn execute_latest(store: &DatedDirectoryStore, ticker: &str, format: OutputFormat) -> Result<()> {
    let Some(path) = store.latest(ticker)? else {
        bail!("No stored holdings for {ticker} under {}", store.root().display());
    };

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "ticker": ticker,
                "path": path.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Table | OutputFormat::Csv => println!("{}", path.display()),
    }
    Ok(())
}

fn execute_import(
    store: &DatedDirectoryStore,
    ticker: &str,
    file: &std::path::Path,
    date: NaiveDate,
) -> Result<()> {
    let stored = store.import(ticker, date, file)?;
    print_success(&format!("Stored {} as {}", file.display(), stored.display()));
    Ok(())
}
