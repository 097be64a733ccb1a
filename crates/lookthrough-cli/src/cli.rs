//! CLI argument definitions.

use clap::{Parser, Subcommand, ValueEnum};

use crate::commands::{CollectArgs, ConfigArgs, StoreArgs};

/// Lookthrough - What do your funds actually own?
#[derive(Parser)]
#[command(name = "lookthrough")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the configured `default_format`)
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log debug detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Look through a portfolio's funds and report exposure per security
    Collect(CollectArgs),

    /// Inspect or fill the holdings store
    Store(StoreArgs),

    /// List issuers with a registered holdings parser
    Issuers,

    /// Manage configurations
    Config(ConfigArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
}

impl OutputFormat {
    /// Parses a stored format name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "table" => Some(Self::Table),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}
