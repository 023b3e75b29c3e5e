//! Single-node graph model.
//!
//! Vertices keep their original identifiers at the API boundary and are
//! renumbered into a dense range internally. Adjacency is stored in
//! compressed sparse row form.

use std::{
    fmt,
    hash::{DefaultHasher, Hash, Hasher},
};

use tracing::{debug, instrument};

use crate::{
    csr::{Adjacency, Csr},
    error::GraphError,
    renumber::RenumberMap,
};

/// Original identifier of a vertex as it appears in a dataset.
///
/// # Examples
/// ```
/// use centrum_core::VertexId;
///
/// let vertex = VertexId::new(7);
/// assert_eq!(vertex.get(), 7);
/// assert_eq!(vertex.to_string(), "7");
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexId(u32);

impl VertexId {
    /// Wraps a raw vertex identifier.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for VertexId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A weighted edge between two original vertex identifiers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    source: VertexId,
    target: VertexId,
    weight: f32,
}

impl Edge {
    /// Creates an edge.
    #[must_use]
    pub const fn new(source: VertexId, target: VertexId, weight: f32) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Creates an edge with unit weight.
    #[must_use]
    pub const fn unweighted(source: u32, target: u32) -> Self {
        Self::new(VertexId::new(source), VertexId::new(target), 1.0)
    }

    /// Returns the source endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn source(&self) -> VertexId { self.source }

    /// Returns the target endpoint.
    #[must_use]
    #[rustfmt::skip]
    pub const fn target(&self) -> VertexId { self.target }

    /// Returns the edge weight. Betweenness is computed on hop counts, so the
    /// weight is carried for fidelity with the input only.
    #[must_use]
    #[rustfmt::skip]
    pub const fn weight(&self) -> f32 { self.weight }
}

/// An ordered list of edges loaded from a dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeList {
    edges: Vec<Edge>,
}

impl EdgeList {
    /// Wraps a vector of edges.
    #[must_use]
    pub const fn new(edges: Vec<Edge>) -> Self {
        Self { edges }
    }

    /// Returns the edges in input order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether the list holds no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Consumes the list, returning the edges.
    #[must_use]
    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }

    /// Order-sensitive digest of the edges and their weights. Stable within
    /// one process only.
    ///
    /// # Examples
    /// ```
    /// use centrum_core::{Edge, EdgeList};
    ///
    /// let a: EdgeList = [Edge::unweighted(0, 1)].into_iter().collect();
    /// let b: EdgeList = [Edge::unweighted(1, 0)].into_iter().collect();
    /// assert_eq!(a.fingerprint(), a.clone().fingerprint());
    /// assert_ne!(a.fingerprint(), b.fingerprint());
    /// ```
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.edges.len().hash(&mut hasher);
        for edge in &self.edges {
            edge.source.hash(&mut hasher);
            edge.target.hash(&mut hasher);
            edge.weight.to_bits().hash(&mut hasher);
        }
        hasher.finish()
    }
}

impl FromIterator<Edge> for EdgeList {
    fn from_iter<I: IntoIterator<Item = Edge>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// In-memory graph handle used by the single-node engine.
///
/// # Examples
/// ```
/// use centrum_core::{Edge, EdgeList, Graph};
///
/// let edges: EdgeList = [Edge::unweighted(10, 20), Edge::unweighted(20, 30)]
///     .into_iter()
///     .collect();
/// let graph = Graph::from_edges(&edges, false)?;
/// assert_eq!(graph.vertex_count(), 3);
/// assert_eq!(graph.arc_count(), 4);
/// assert!(!graph.is_directed());
/// # Ok::<(), centrum_core::GraphError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Graph {
    directed: bool,
    renumber: RenumberMap,
    adjacency: Csr,
}

impl Graph {
    /// Builds a graph from an edge list.
    ///
    /// Undirected graphs store both arcs of every edge. Duplicate arcs are
    /// collapsed and self-loops are dropped from the adjacency while their
    /// vertex stays in the vertex set.
    ///
    /// # Errors
    /// Returns [`GraphError::EmptyGraph`] when `edges` is empty.
    #[instrument(name = "graph.build", err, skip(edges), fields(edges = edges.len()))]
    pub fn from_edges(edges: &EdgeList, directed: bool) -> Result<Self, GraphError> {
        if edges.is_empty() {
            return Err(GraphError::EmptyGraph);
        }
        let renumber = RenumberMap::from_edges(edges.edges());
        let arcs = dense_arcs(edges.edges(), &renumber, directed);
        let adjacency = Csr::build(0, renumber.len(), arcs);
        debug!(
            vertices = renumber.len(),
            arcs = adjacency.arc_count(),
            directed,
            "built single-node graph"
        );
        Ok(Self {
            directed,
            renumber,
            adjacency,
        })
    }

    /// Returns whether the graph is directed.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.renumber.len()
    }

    /// Returns the number of stored arcs (twice the edge count for
    /// undirected graphs without self-loops).
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.adjacency.arc_count()
    }

    /// Returns the vertex identifiers in ascending order.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        self.renumber.originals()
    }

    /// Returns the original identifiers adjacent to `vertex`, or `None` when
    /// the vertex is unknown.
    #[must_use]
    pub fn neighbors(&self, vertex: VertexId) -> Option<Vec<VertexId>> {
        let dense = self.renumber.dense(vertex)?;
        Some(
            self.adjacency
                .row(dense)
                .iter()
                .filter_map(|&target| self.renumber.original(target))
                .collect(),
        )
    }

    pub(crate) const fn renumber(&self) -> &RenumberMap {
        &self.renumber
    }
}

impl Adjacency for Graph {
    fn vertex_count(&self) -> usize {
        self.renumber.len()
    }

    fn successors(&self, vertex: usize) -> &[usize] {
        self.adjacency.row(vertex)
    }
}

/// Maps edges to dense `(source, target)` arcs, symmetrising undirected input
/// and dropping self-loops.
pub(crate) fn dense_arcs(
    edges: &[Edge],
    renumber: &RenumberMap,
    directed: bool,
) -> Vec<(usize, usize)> {
    let mut arcs = Vec::with_capacity(if directed { edges.len() } else { edges.len() * 2 });
    for edge in edges {
        let (Some(source), Some(target)) = (
            renumber.dense(edge.source()),
            renumber.dense(edge.target()),
        ) else {
            continue;
        };
        if source == target {
            continue;
        }
        arcs.push((source, target));
        if !directed {
            arcs.push((target, source));
        }
    }
    arcs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn edges(pairs: &[(u32, u32)]) -> EdgeList {
        pairs
            .iter()
            .map(|&(source, target)| Edge::unweighted(source, target))
            .collect()
    }

    #[rstest]
    fn fingerprint_tracks_content() {
        let short = edges(&[(0, 1), (1, 2)]);
        let long = edges(&[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(short.fingerprint(), edges(&[(0, 1), (1, 2)]).fingerprint());
        assert_ne!(short.fingerprint(), long.fingerprint());
        let reweighted = EdgeList::new(vec![
            Edge::new(VertexId::new(0), VertexId::new(1), 2.0),
            Edge::unweighted(1, 2),
        ]);
        assert_ne!(short.fingerprint(), reweighted.fingerprint());
    }

    #[rstest]
    fn rejects_empty_edge_list() {
        let err = Graph::from_edges(&EdgeList::default(), true).expect_err("empty must fail");
        assert_eq!(err, GraphError::EmptyGraph);
    }

    #[rstest]
    #[case::directed(true, 2)]
    #[case::undirected(false, 4)]
    fn arc_count_reflects_direction(#[case] directed: bool, #[case] expected: usize) {
        let graph = Graph::from_edges(&edges(&[(1, 2), (2, 3)]), directed).expect("graph builds");
        assert_eq!(graph.arc_count(), expected);
    }

    #[rstest]
    fn duplicates_and_self_loops_are_collapsed() {
        let graph = Graph::from_edges(&edges(&[(1, 2), (1, 2), (2, 2), (3, 1)]), true)
            .expect("graph builds");
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.arc_count(), 2);
        assert_eq!(
            graph.neighbors(VertexId::new(2)),
            Some(Vec::new()),
            "self-loop must not appear in adjacency",
        );
    }

    #[rstest]
    fn vertices_are_sorted_by_original_id() {
        let graph = Graph::from_edges(&edges(&[(30, 10), (20, 30)]), false).expect("graph builds");
        let ids: Vec<u32> = graph.vertices().iter().map(|v| v.get()).collect();
        assert_eq!(ids, vec![10, 20, 30]);
        assert_eq!(
            graph.neighbors(VertexId::new(30)),
            Some(vec![VertexId::new(10), VertexId::new(20)]),
        );
        assert_eq!(graph.neighbors(VertexId::new(99)), None);
    }
}
