//! Domain types for holdings look-through.
//!
//! - [`Position`]: One line of the investor's portfolio
//! - [`AssetType`]: The enumerated asset classes a holding may carry
//! - [`Identifiers`]: The partial identifier bundle an issuer publishes
//! - [`HoldingRow`] / [`HoldingsTable`]: A fund's validated holdings disclosure

mod asset_type;
mod holding;
mod identifiers;
mod position;

pub use asset_type::AssetType;
pub use holding::{HoldingRow, HoldingsTable};
pub use identifiers::{IdentifierKind, Identifiers};
pub use position::Position;
