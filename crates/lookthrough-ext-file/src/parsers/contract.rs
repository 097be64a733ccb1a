//! Holdings files already in contract shape.

use std::path::Path;

use lookthrough_core::{HoldingsParser, LookthroughResult, Table};

use crate::reader::read_table;

/// Reads a CSV whose columns already follow the holdings contract.
///
/// Useful for hand-maintained holdings of funds whose issuer has no parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContractCsvParser;

impl ContractCsvParser {
    /// Registry key.
    pub const ISSUER: &'static str = "Contract";
}

impl HoldingsParser for ContractCsvParser {
    fn parse(&self, path: &Path) -> LookthroughResult<Table> {
        read_table(path)
    }
}
