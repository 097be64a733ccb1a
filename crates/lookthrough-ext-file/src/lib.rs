//! # Lookthrough Ext File
//!
//! File-backed collaborators for the look-through engine.
//!
//! This crate provides the default implementations used by the command line:
//! - CSV and ledger-export position sources
//! - A dated-directory holdings store
//! - Per-issuer holdings parsers, CSV and spreadsheet, and their registry
//! - Summary, detail and debug output sinks
//!
//! Downloading holdings files is left to other tools; files are imported
//! into the store and read back from there.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod output;
pub mod parsers;
pub mod positions;
pub mod reader;
pub mod store;

pub use error::{FileError, FileResult};
pub use output::{
    write_debug_file, write_debug_groups, write_detail_csv, write_detail_file,
    write_summary_csv, write_summary_file,
};
pub use parsers::{
    default_registry, AmericanFundsParser, ContractCsvParser, GlobalXParser, PowerSharesParser,
    SpdrParser, VanguardParser,
};
pub use positions::{open_position_source, CsvPositionSource, ExportedPositionSource};
pub use store::DatedDirectoryStore;
