//! Connected components of the identity graph.

use std::collections::{BTreeMap, HashMap};

use petgraph::unionfind::UnionFind;
use serde::Serialize;

use super::graph::{IdentityGraph, IdentityNode, IdentifierKey};
use crate::error::{PortfolioError, PortfolioResult};

/// One resolved security: the rows judged to be the same security and the
/// identifiers that linked them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Group {
    /// Row indices into the flat table, ascending.
    pub rows: Vec<usize>,
    /// Identifier values touched by the rows, in first-seen order.
    pub identifiers: Vec<IdentifierKey>,
}

impl Group {
    /// Number of member rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the group has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Partitions the graph into groups.
///
/// Groups come back ordered by their lowest row index, and each group's
/// rows ascend, so the result depends only on the graph.
///
/// # Errors
///
/// Returns an invariant error if any row is missing from the partition or
/// appears in more than one group.
pub fn resolve_components(graph: &IdentityGraph) -> PortfolioResult<Vec<Group>> {
    let node_count = graph.node_count();
    let mut sets = UnionFind::<usize>::new(node_count);
    for (a, b) in graph.edges() {
        sets.union(a, b);
    }
    let labels = sets.into_labeling();

    let mut slot: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();
    for (index, label) in labels.iter().enumerate() {
        let at = *slot.entry(*label).or_insert_with(|| {
            groups.push(Group::default());
            groups.len() - 1
        });
        match graph.node(index) {
            Some(IdentityNode::Row(row)) => groups[at].rows.push(*row),
            Some(IdentityNode::Identifier(key)) => groups[at].identifiers.push(key.clone()),
            None => {}
        }
    }

    // Identifier nodes always hang off a row, so no group is row-less.
    groups.retain(|g| !g.is_empty());
    check_partition(&groups, graph.row_count())?;
    Ok(groups)
}

fn check_partition(groups: &[Group], rows: usize) -> PortfolioResult<()> {
    let mut seen = vec![0usize; rows];
    let mut assigned = 0;
    for group in groups {
        for &row in &group.rows {
            if row >= rows {
                return Err(PortfolioError::row_count("resolution", rows, row + 1));
            }
            seen[row] += 1;
            assigned += 1;
        }
    }
    if let Some((row, &count)) = seen.iter().enumerate().find(|(_, c)| **c != 1) {
        return Err(PortfolioError::UnassignedRow { row, count });
    }
    if assigned != rows {
        return Err(PortfolioError::row_count("resolution", rows, assigned));
    }
    Ok(())
}

/// How well rows matched across funds.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStats {
    /// Rows in the flat table.
    pub rows: usize,
    /// Number of groups.
    pub groups: usize,
    /// Groups with more than one row.
    pub matched_groups: usize,
    /// Number of groups of each size.
    pub by_size: BTreeMap<usize, usize>,
}

impl MatchStats {
    /// Computes statistics for a partition.
    #[must_use]
    pub fn from_groups(groups: &[Group]) -> Self {
        let mut by_size = BTreeMap::new();
        for group in groups {
            *by_size.entry(group.len()).or_insert(0) += 1;
        }
        Self {
            rows: groups.iter().map(Group::len).sum(),
            groups: groups.len(),
            matched_groups: groups.iter().filter(|g| g.len() > 1).count(),
            by_size,
        }
    }

    /// Share of groups with more than one row (0 when there are none).
    #[must_use]
    pub fn match_ratio(&self) -> f64 {
        if self.groups == 0 {
            0.0
        } else {
            self.matched_groups as f64 / self.groups as f64
        }
    }
}
