//! Engine seams used by the oracle.
//!
//! The oracle never calls the graph engines directly; it goes through
//! [`ReferenceEngine`] and [`DistributedEngine`]. The in-process engines in
//! this crate implement both, and tests substitute faulty doubles to exercise
//! the oracle's verdicts.

use std::num::NonZeroUsize;

use crate::{
    centrality::{CentralityParams, betweenness_centrality},
    dataset::DistributedFrame,
    distributed::{Cluster, DistributedGraph, DistributedResultFuture, GraphOptions},
    error::{DistributedError, GraphError},
    graph::{EdgeList, Graph, VertexId},
    result::ResultTable,
    sampling::select_random_vertices,
    subset::VertexSubset,
};

/// Single-node graph engine.
pub trait ReferenceEngine {
    /// Graph handle produced by [`ReferenceEngine::build_graph`].
    type Graph;

    /// Builds a graph from a whole edge list.
    ///
    /// # Errors
    /// Returns [`GraphError`] when the edges do not form a graph.
    fn build_graph(&self, edges: &EdgeList, directed: bool) -> Result<Self::Graph, GraphError>;

    /// Number of vertices in `graph`.
    fn vertex_count(&self, graph: &Self::Graph) -> usize;

    /// Draws `count` distinct vertices, deterministically for a fixed seed.
    ///
    /// # Errors
    /// Returns [`GraphError::SampleTooLarge`] when `count` exceeds the
    /// vertex count.
    fn sample_vertices(
        &self,
        graph: &Self::Graph,
        seed: Option<u64>,
        count: usize,
    ) -> Result<Vec<VertexId>, GraphError>;

    /// Computes betweenness centrality.
    ///
    /// # Errors
    /// Returns [`GraphError`] when `subset` cannot be resolved.
    fn centrality(
        &self,
        graph: &Self::Graph,
        subset: &VertexSubset,
        params: &CentralityParams,
    ) -> Result<ResultTable, GraphError>;
}

/// A distributed result that is reduced on demand.
pub trait PendingResult {
    /// Waits for every worker and reduces their partials.
    ///
    /// # Errors
    /// Returns [`DistributedError`] when a worker fails to report.
    fn compute(self) -> Result<ResultTable, DistributedError>;
}

/// Multi-worker graph engine.
pub trait DistributedEngine {
    /// Graph handle produced by [`DistributedEngine::build_graph`].
    type Graph;
    /// Future returned by [`DistributedEngine::centrality`].
    type Pending: PendingResult;

    /// Number of workers, used to size ingestion chunks.
    fn workers(&self) -> NonZeroUsize;

    /// Builds a partitioned graph from a chunked frame.
    ///
    /// # Errors
    /// Returns [`DistributedError`] when the options or frame are rejected.
    fn build_graph(
        &self,
        frame: &DistributedFrame,
        options: &GraphOptions,
    ) -> Result<Self::Graph, DistributedError>;

    /// Submits a betweenness computation without waiting for it.
    ///
    /// # Errors
    /// Returns [`DistributedError`] when the computation cannot start.
    fn centrality(
        &self,
        graph: &Self::Graph,
        subset: &VertexSubset,
        params: &CentralityParams,
    ) -> Result<Self::Pending, DistributedError>;
}

/// The in-process single-node engine.
#[derive(Clone, Copy, Debug, Default)]
pub struct SingleNodeEngine;

impl ReferenceEngine for SingleNodeEngine {
    type Graph = Graph;

    fn build_graph(&self, edges: &EdgeList, directed: bool) -> Result<Graph, GraphError> {
        Graph::from_edges(edges, directed)
    }

    fn vertex_count(&self, graph: &Graph) -> usize {
        graph.vertex_count()
    }

    fn sample_vertices(
        &self,
        graph: &Graph,
        seed: Option<u64>,
        count: usize,
    ) -> Result<Vec<VertexId>, GraphError> {
        select_random_vertices(graph, seed, count)
    }

    fn centrality(
        &self,
        graph: &Graph,
        subset: &VertexSubset,
        params: &CentralityParams,
    ) -> Result<ResultTable, GraphError> {
        betweenness_centrality(graph, subset, params)
    }
}

/// The in-process distributed engine backed by a [`Cluster`].
#[derive(Clone, Debug)]
pub struct ClusterEngine {
    cluster: Cluster,
}

impl ClusterEngine {
    /// Wraps an existing cluster.
    #[must_use]
    pub const fn new(cluster: Cluster) -> Self {
        Self { cluster }
    }

    /// Starts a cluster with `workers` threads.
    ///
    /// # Errors
    /// Returns [`DistributedError::PoolBuild`] when the pool cannot start.
    pub fn with_workers(workers: NonZeroUsize) -> Result<Self, DistributedError> {
        Cluster::new(workers).map(Self::new)
    }

    /// The underlying cluster.
    #[must_use]
    pub const fn cluster(&self) -> &Cluster {
        &self.cluster
    }
}

impl PendingResult for DistributedResultFuture {
    fn compute(self) -> Result<ResultTable, DistributedError> {
        Self::compute(self)
    }
}

impl DistributedEngine for ClusterEngine {
    type Graph = DistributedGraph;
    type Pending = DistributedResultFuture;

    fn workers(&self) -> NonZeroUsize {
        self.cluster.workers()
    }

    fn build_graph(
        &self,
        frame: &DistributedFrame,
        options: &GraphOptions,
    ) -> Result<DistributedGraph, DistributedError> {
        DistributedGraph::from_frame(&self.cluster, frame, options)
    }

    fn centrality(
        &self,
        graph: &DistributedGraph,
        subset: &VertexSubset,
        params: &CentralityParams,
    ) -> Result<DistributedResultFuture, DistributedError> {
        graph.betweenness_centrality(&self.cluster, subset, params)
    }
}
