//! # Lookthrough Core
//!
//! Core types, normalization utilities and collaborator traits for
//! disaggregating fund-of-fund holdings down to their underlying securities.
//!
//! - **Types**: [`Position`], [`HoldingRow`], [`HoldingsTable`], [`AssetType`], [`Identifiers`]
//! - **Normalization**: dollar amounts, percentages and name keys ([`normalize`])
//! - **Contract**: validation of issuer parser output ([`contract`])
//! - **Traits**: position sources, holdings store, issuer parsers ([`traits`])
//!
//! ## Example
//!
//! ```rust
//! use lookthrough_core::prelude::*;
//!
//! let table = Table::with_rows(
//!     ["fraction", "asstype", "ticker"],
//!     vec![vec!["1.0".into(), "Equity".into(), "AAPL".into()]],
//! )?;
//! let holdings = validate_holdings(&table)?;
//! assert_eq!(holdings.rows[0].identifiers.ticker, "AAPL");
//! # Ok::<(), LookthroughError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod contract;
pub mod error;
pub mod normalize;
pub mod table;
pub mod traits;
pub mod types;

pub use contract::validate_holdings;
pub use error::{LookthroughError, LookthroughResult};
pub use table::Table;
pub use traits::{HoldingsParser, HoldingsStore, ParserRegistry, PositionSource};
pub use types::{AssetType, HoldingRow, HoldingsTable, IdentifierKind, Identifiers, Position};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::contract::validate_holdings;
    pub use crate::error::{LookthroughError, LookthroughResult};
    pub use crate::normalize::{empty_dashes, normalize_name, parse_money, parse_percent};
    pub use crate::table::Table;
    pub use crate::traits::{HoldingsParser, HoldingsStore, ParserRegistry, PositionSource};
    pub use crate::types::{
        AssetType, HoldingRow, HoldingsTable, IdentifierKind, Identifiers, Position,
    };
    pub use rust_decimal::Decimal;
}
