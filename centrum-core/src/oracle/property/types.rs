//! Fixture types for oracle property tests.

use std::num::NonZeroUsize;

use crate::{graph::EdgeList, oracle::ParamCombo};

/// Shape of a generated graph.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum Topology {
    /// Roughly `1.5n` random edges.
    Sparse,
    /// Edge probability between 0.5 and 0.9.
    Dense,
    /// Two or more components with no edges between them.
    Disconnected,
    /// One hub joined to every other vertex.
    Star,
    /// A simple path, the longest shortest paths for its size.
    Path,
}

/// Generated input for one property case.
#[derive(Clone, Debug)]
pub(super) struct OracleFixture {
    /// Edges with non-contiguous vertex ids.
    pub edges: EdgeList,
    /// Topology the edges were drawn from.
    pub topology: Topology,
    /// Number of distinct vertices.
    pub vertex_count: usize,
    /// Parameters for the case; subset sizes never exceed `vertex_count`.
    pub params: ParamCombo,
    /// Workers for the distributed engine.
    pub workers: NonZeroUsize,
    /// Ingestion chunk size, in edges.
    pub chunk_size: NonZeroUsize,
}
