//! Issuers command implementation.

use anyhow::Result;
use serde::Serialize;
use tabled::Tabled;

use lookthrough_ext_file::default_registry;

use crate::cli::OutputFormat;
use crate::output::print_output;

/// A registered issuer.
#[derive(Debug, Serialize, Tabled)]
pub struct IssuerLine {
    #[tabled(rename = "Issuer")]
    pub issuer: String,
}

/// Execute the issuers command.
pub fn execute(format: OutputFormat) -> Result<()> {
    let lines: Vec<IssuerLine> = default_registry()
        .issuers()
        .map(|issuer| IssuerLine {
            issuer: issuer.to_string(),
        })
        .collect();
    print_output(&lines, format)
}
