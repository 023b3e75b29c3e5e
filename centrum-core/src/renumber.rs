//! Mapping between original vertex identifiers and a dense index range.
//!
//! Dense indices follow ascending original-id order, so a table produced in
//! dense order is already sorted by vertex id.

use crate::graph::{Edge, VertexId};

/// Bijection between original vertex ids and `0..len`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct RenumberMap {
    originals: Vec<VertexId>,
}

impl RenumberMap {
    /// Collects every endpoint referenced by `edges`.
    pub(crate) fn from_edges(edges: &[Edge]) -> Self {
        let mut originals: Vec<VertexId> = edges
            .iter()
            .flat_map(|edge| [edge.source(), edge.target()])
            .collect();
        Self::from_unsorted(&mut originals)
    }

    /// Builds a map from a set of ids that may be unsorted or repeated.
    pub(crate) fn from_unsorted(ids: &mut Vec<VertexId>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        Self {
            originals: std::mem::take(ids),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.originals.len()
    }

    pub(crate) fn dense(&self, vertex: VertexId) -> Option<usize> {
        self.originals.binary_search(&vertex).ok()
    }

    pub(crate) fn original(&self, dense: usize) -> Option<VertexId> {
        self.originals.get(dense).copied()
    }

    pub(crate) fn originals(&self) -> &[VertexId] {
        &self.originals
    }
}
