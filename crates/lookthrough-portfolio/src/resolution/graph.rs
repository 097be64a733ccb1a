//! Bipartite identity graph between holding rows and identifier values.

use std::collections::HashMap;
use std::fmt;

use lookthrough_core::normalize::{is_present, normalize_name};
use lookthrough_core::{AssetType, IdentifierKind};
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::Serialize;

use crate::types::ResolvedHoldingRow;

/// An identifier value that rows can share.
///
/// Codes are kept exactly as published. Name keys carry the asset type so
/// that an equity and a bond with the same normalized name stay apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum IdentifierKey {
    /// A ticker, CUSIP, ISIN or SEDOL value.
    Code {
        /// Which code column the value came from.
        kind: IdentifierKind,
        /// The raw value.
        value: String,
    },
    /// A normalized name scoped by asset type.
    Name {
        /// Asset type of the row carrying the name.
        asstype: AssetType,
        /// Output of [`normalize_name`].
        key: String,
    },
}

impl IdentifierKey {
    /// The identifier kind of this key.
    #[must_use]
    pub fn kind(&self) -> IdentifierKind {
        match self {
            IdentifierKey::Code { kind, .. } => *kind,
            IdentifierKey::Name { .. } => IdentifierKind::NameKey,
        }
    }
}

impl fmt::Display for IdentifierKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierKey::Code { kind, value } => write!(f, "{kind}={value:?}"),
            IdentifierKey::Name { asstype, key } => write!(f, "name_key=({asstype}, {key:?})"),
        }
    }
}

/// A node of the identity graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityNode {
    /// A holding row, by its index in the flat table.
    Row(usize),
    /// A shared identifier value.
    Identifier(IdentifierKey),
}

/// Returns the identifier keys a row links to.
///
/// Codes are compared trimmed. Blank and placeholder codes produce no key,
/// nor does a name that normalizes to nothing.
#[must_use]
pub fn identifier_keys(row: &ResolvedHoldingRow) -> Vec<IdentifierKey> {
    let ids = &row.identifiers;
    let mut keys: Vec<IdentifierKey> = IdentifierKind::CODES
        .iter()
        .filter(|kind| is_present(ids.get(**kind)))
        .map(|kind| IdentifierKey::Code {
            kind: *kind,
            value: ids.get(*kind).trim().to_string(),
        })
        .collect();

    if is_present(&ids.name) {
        let key = normalize_name(&ids.name);
        if !key.is_empty() {
            keys.push(IdentifierKey::Name {
                asstype: row.asstype,
                key,
            });
        }
    }

    keys
}

/// Undirected graph connecting each row to the identifiers it carries.
///
/// Row nodes are inserted first, so the node index of row `i` is `i`.
/// Identifier nodes are deduplicated by key. Two rows end up in the same
/// component exactly when a chain of shared identifiers links them.
#[derive(Debug, Clone)]
pub struct IdentityGraph {
    graph: UnGraph<IdentityNode, ()>,
    rows: usize,
    identifiers: HashMap<IdentifierKey, NodeIndex>,
}

impl IdentityGraph {
    /// Builds the graph over a flat table.
    ///
    /// Every row gets a node even when it carries no identifier.
    #[must_use]
    pub fn build(rows: &[ResolvedHoldingRow]) -> Self {
        let mut graph = UnGraph::with_capacity(rows.len() * 2, rows.len() * 3);
        for idx in 0..rows.len() {
            graph.add_node(IdentityNode::Row(idx));
        }

        let mut identifiers: HashMap<IdentifierKey, NodeIndex> = HashMap::new();
        for (idx, row) in rows.iter().enumerate() {
            let row_node = NodeIndex::new(idx);
            for key in identifier_keys(row) {
                let id_node = *identifiers
                    .entry(key)
                    .or_insert_with_key(|k| graph.add_node(IdentityNode::Identifier(k.clone())));
                graph.add_edge(row_node, id_node, ());
            }
        }

        Self {
            graph,
            rows: rows.len(),
            identifiers,
        }
    }

    /// Number of row nodes.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of distinct identifier nodes.
    #[must_use]
    pub fn identifier_count(&self) -> usize {
        self.identifiers.len()
    }

    /// Total number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of row-identifier edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The node at an index.
    #[must_use]
    pub fn node(&self, index: usize) -> Option<&IdentityNode> {
        self.graph.node_weight(NodeIndex::new(index))
    }

    /// Edges as pairs of node indices.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// Identifier keys touched by a row.
    pub fn identifiers_of(&self, row: usize) -> impl Iterator<Item = &IdentifierKey> + '_ {
        self.graph
            .neighbors(NodeIndex::new(row))
            .filter_map(|n| match &self.graph[n] {
                IdentityNode::Identifier(key) => Some(key),
                IdentityNode::Row(_) => None,
            })
    }

    /// Node index of an identifier, if any row carries it.
    #[must_use]
    pub fn identifier_node(&self, key: &IdentifierKey) -> Option<usize> {
        self.identifiers.get(key).map(|n| n.index())
    }
}
