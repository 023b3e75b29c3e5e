//! Result tables mapping vertices to centrality scores.

use std::collections::BTreeSet;

use crate::graph::VertexId;

/// Vertex-to-score table produced by either engine.
///
/// Row order is not significant until [`ResultTable::sorted_by_vertex`]
/// normalises it; comparisons are always made on sorted tables.
///
/// # Examples
/// ```
/// use centrum_core::{ResultTable, VertexId};
///
/// let table = ResultTable::from_rows(vec![
///     (VertexId::new(2), 0.5),
///     (VertexId::new(1), 0.25),
/// ])
/// .sorted_by_vertex();
/// assert_eq!(table.vertices(), &[VertexId::new(1), VertexId::new(2)]);
/// assert_eq!(table.scores(), &[0.25, 0.5]);
/// assert_eq!(table.score(VertexId::new(2)), Some(0.5));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResultTable {
    vertices: Vec<VertexId>,
    scores: Vec<f64>,
}

impl ResultTable {
    /// Builds a table from `(vertex, score)` rows in any order.
    #[must_use]
    pub fn from_rows(rows: Vec<(VertexId, f64)>) -> Self {
        let (vertices, scores) = rows.into_iter().unzip();
        Self { vertices, scores }
    }

    /// Builds a table from parallel columns.
    ///
    /// Returns `None` when the columns differ in length.
    #[must_use]
    pub fn from_columns(vertices: Vec<VertexId>, scores: Vec<f64>) -> Option<Self> {
        (vertices.len() == scores.len()).then_some(Self { vertices, scores })
    }

    /// Returns the table with rows ordered by ascending vertex id.
    #[must_use]
    pub fn sorted_by_vertex(self) -> Self {
        if self.is_sorted() {
            return self;
        }
        let mut rows: Vec<(VertexId, f64)> = self.into_rows();
        rows.sort_by_key(|&(vertex, _)| vertex);
        Self::from_rows(rows)
    }

    /// Returns whether rows are ordered by ascending vertex id.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.vertices.windows(2).all(|pair| pair[0] <= pair[1])
    }

    /// Returns the vertex column.
    #[must_use]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Returns the score column.
    #[must_use]
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Looks up the score of `vertex`.
    #[must_use]
    pub fn score(&self, vertex: VertexId) -> Option<f64> {
        self.vertices
            .iter()
            .position(|&candidate| candidate == vertex)
            .and_then(|index| self.scores.get(index).copied())
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns the set of vertices covered by the table.
    #[must_use]
    pub fn vertex_set(&self) -> BTreeSet<VertexId> {
        self.vertices.iter().copied().collect()
    }

    /// Iterates over `(vertex, score)` rows in table order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexId, f64)> + '_ {
        self.vertices.iter().copied().zip(self.scores.iter().copied())
    }

    fn into_rows(self) -> Vec<(VertexId, f64)> {
        self.vertices.into_iter().zip(self.scores).collect()
    }
}
