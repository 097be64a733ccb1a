//! Lookthrough CLI - Command-line interface for fund holdings look-through.
//!
//! # Usage
//!
//! ```bash
//! # Store a downloaded holdings file
//! lookthrough store import VTI ~/Downloads/vti.csv --dbdir ~/holdings
//!
//! # Look through a portfolio
//! lookthrough collect portfolio.csv --dbdir ~/holdings --head 20
//!
//! # Read positions from a ledger export and write the detail table
//! lookthrough collect ledger:export.csv --detail detail.csv
//!
//! # Remember the store location
//! lookthrough config set dbdir ~/holdings
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands, OutputFormat};
use commands::config::Settings;

fn init_logging(quiet: bool, verbose: bool) {
    let default = if verbose {
        "debug"
    } else if quiet {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Logs go to stderr; stdout carries results.
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

/// Stored settings, with the format flag taking precedence.
fn load_settings(format: Option<OutputFormat>) -> Result<(Settings, OutputFormat)> {
    let settings = Settings::load()?;
    let format = format.unwrap_or(settings.format);
    Ok((settings, format))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.quiet, cli.verbose);

    match cli.command {
        // Config commands must work even when the stored file is unreadable.
        Commands::Config(args) => commands::config::execute(args, cli.format.unwrap_or_default())?,
        Commands::Collect(args) => {
            let (settings, format) = load_settings(cli.format)?;
            commands::collect::execute(args, &settings, format)?;
        }
        Commands::Store(args) => {
            let (settings, format) = load_settings(cli.format)?;
            commands::store::execute(args, &settings, format)?;
        }
        Commands::Issuers => {
            let (_, format) = load_settings(cli.format)?;
            commands::issuers::execute(format)?;
        }
    }

    Ok(())
}
