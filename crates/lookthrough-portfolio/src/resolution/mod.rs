//! Entity resolution over shared identifiers.
//!
//! Every holding row becomes a node, as does every distinct identifier value
//! (ticker, CUSIP, ISIN, SEDOL, or asset-type-scoped normalized name). Rows
//! are connected to the identifiers they carry, and each connected component
//! is one real-world security. Matches propagate transitively: a row sharing
//! a ticker with a second row that shares a CUSIP with a third puts all three
//! in one group.
//!
//! # Example
//!
//! ```rust,ignore
//! use lookthrough_portfolio::resolution::*;
//!
//! let graph = IdentityGraph::build(&rows);
//! let groups = resolve_components(&graph)?;
//! let stats = MatchStats::from_groups(&groups);
//! ```

mod components;
mod graph;

pub use components::{resolve_components, Group, MatchStats};
pub use graph::{identifier_keys, IdentifierKey, IdentityGraph, IdentityNode};

use tracing::info;

use crate::error::PortfolioResult;
use crate::types::ResolvedHoldingRow;

/// Builds the identity graph over a flat table and partitions it.
///
/// # Errors
///
/// Returns an invariant error if the partition does not cover every row
/// exactly once.
pub fn resolve(rows: &[ResolvedHoldingRow]) -> PortfolioResult<(Vec<Group>, MatchStats)> {
    let graph = IdentityGraph::build(rows);
    let groups = resolve_components(&graph)?;
    let stats = MatchStats::from_groups(&groups);

    info!(
        rows = stats.rows,
        identifiers = graph.identifier_count(),
        groups = stats.groups,
        matched = stats.matched_groups,
        match_ratio = stats.match_ratio(),
        "Resolved holdings"
    );
    info!(by_size = ?stats.by_size, "Group size distribution");

    Ok((groups, stats))
}
