//! Domain types for portfolio look-through.
//!
//! - [`ResolvedHoldingRow`]: A fund holding scaled to a dollar exposure
//! - [`AggregationConfig`]: Configuration for the aggregation run

mod config;
mod resolved;

pub use config::AggregationConfig;
pub use resolved::{ResolvedHoldingRow, AMOUNT_SCALE};
