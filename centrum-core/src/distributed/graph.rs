//! Partitioned graph built from a chunked frame.

use std::{
    ops::Range,
    sync::{Arc, mpsc},
};

use rayon::prelude::*;
use tracing::{debug, instrument, trace};

use crate::{
    centrality::{
        CentralityParams,
        brandes::{Workspace, accumulate},
    },
    csr::{Adjacency, Csr},
    dataset::DistributedFrame,
    error::{DistributedError, GraphError},
    graph::{VertexId, dense_arcs},
    renumber::RenumberMap,
    subset::{VertexSubset, resolve_sources},
};

use super::{
    Cluster,
    future::{DistributedResultFuture, Reduction, WorkerReport},
};

/// Construction options for a [`DistributedGraph`].
///
/// The defaults match how the harness builds its graphs: undirected,
/// renumbered, with the transposed adjacency stored.
///
/// # Examples
/// ```
/// use centrum_core::GraphOptions;
///
/// let options = GraphOptions::default().with_directed(true);
/// assert!(options.directed());
/// assert!(options.renumber());
/// assert!(options.store_transposed());
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GraphOptions {
    directed: bool,
    renumber: bool,
    store_transposed: bool,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            directed: false,
            renumber: true,
            store_transposed: true,
        }
    }
}

impl GraphOptions {
    /// Sets whether edges are one-way.
    #[must_use]
    pub const fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Sets whether vertex ids are renumbered into a dense range.
    #[must_use]
    pub const fn with_renumber(mut self, renumber: bool) -> Self {
        self.renumber = renumber;
        self
    }

    /// Sets whether each partition also stores its in-edges.
    #[must_use]
    pub const fn with_store_transposed(mut self, store_transposed: bool) -> Self {
        self.store_transposed = store_transposed;
        self
    }

    /// Whether edges are one-way.
    #[must_use]
    pub const fn directed(&self) -> bool {
        self.directed
    }

    /// Whether vertex ids are renumbered.
    #[must_use]
    pub const fn renumber(&self) -> bool {
        self.renumber
    }

    /// Whether in-edges are stored.
    #[must_use]
    pub const fn store_transposed(&self) -> bool {
        self.store_transposed
    }
}

#[derive(Debug)]
struct Partition {
    range: Range<usize>,
    forward: Csr,
    transposed: Option<Csr>,
}

/// Shared, immutable body of a distributed graph. Workers hold clones of the
/// `Arc` while they run.
#[derive(Debug)]
pub(crate) struct PartitionedGraph {
    directed: bool,
    renumber: RenumberMap,
    rows_per_partition: usize,
    partitions: Vec<Partition>,
}

impl PartitionedGraph {
    pub(crate) const fn is_directed(&self) -> bool {
        self.directed
    }

    pub(crate) fn vertices(&self) -> &[VertexId] {
        self.renumber.originals()
    }

    fn partition(&self, vertex: usize) -> Option<&Partition> {
        self.partitions
            .get(vertex / self.rows_per_partition)
            .filter(|partition| partition.range.contains(&vertex))
    }
}

impl Adjacency for PartitionedGraph {
    fn vertex_count(&self) -> usize {
        self.renumber.len()
    }

    fn successors(&self, vertex: usize) -> &[usize] {
        self.partition(vertex)
            .map_or(&[], |partition| partition.forward.row(vertex))
    }

    fn has_transposed(&self) -> bool {
        self.partitions
            .first()
            .is_some_and(|partition| partition.transposed.is_some())
    }

    fn predecessors(&self, vertex: usize) -> &[usize] {
        self.partition(vertex)
            .and_then(|partition| partition.transposed.as_ref())
            .map_or(&[], |transposed| transposed.row(vertex))
    }
}

/// Graph partitioned across the workers of a [`Cluster`].
///
/// Dropping the handle releases the partitions once in-flight computations
/// finish with them.
///
/// # Examples
/// ```
/// use centrum_core::{
///     CentralityParams, Cluster, DistributedFrame, DistributedGraph, Edge, EdgeChunk,
///     GraphOptions, VertexId, VertexSubset,
/// };
/// use std::num::NonZeroUsize;
///
/// let cluster = Cluster::new(NonZeroUsize::new(2).expect("non-zero"))?;
/// let frame = DistributedFrame::from_chunks(vec![
///     EdgeChunk::new(0, vec![Edge::unweighted(1, 2)]),
///     EdgeChunk::new(1, vec![Edge::unweighted(2, 3)]),
/// ]);
/// let graph = DistributedGraph::from_frame(&cluster, &frame, &GraphOptions::default())?;
/// let table = graph
///     .betweenness_centrality(&cluster, &VertexSubset::All, &CentralityParams::default())?
///     .compute()?;
/// assert_eq!(table.score(VertexId::new(2)), Some(1.0));
/// graph.release();
/// # Ok::<(), centrum_core::DistributedError>(())
/// ```
#[derive(Debug)]
pub struct DistributedGraph {
    inner: Arc<PartitionedGraph>,
}

impl DistributedGraph {
    /// Renumbers and partitions the edges of `frame` on the cluster's
    /// workers.
    ///
    /// # Errors
    /// Returns [`DistributedError::RenumberRequired`] when `options` disables
    /// renumbering and [`DistributedError::Graph`] wrapping
    /// [`GraphError::EmptyGraph`] when the frame holds no edges.
    #[instrument(
        name = "engine.ingest",
        err,
        skip(cluster, frame, options),
        fields(
            chunks = frame.chunk_count(),
            edges = frame.edge_count(),
            workers = cluster.workers().get(),
            directed = options.directed(),
            store_transposed = options.store_transposed(),
        ),
    )]
    pub fn from_frame(
        cluster: &Cluster,
        frame: &DistributedFrame,
        options: &GraphOptions,
    ) -> Result<Self, DistributedError> {
        if !options.renumber() {
            return Err(DistributedError::RenumberRequired);
        }
        if frame.edge_count() == 0 {
            return Err(GraphError::EmptyGraph.into());
        }
        let directed = options.directed();
        let workers = cluster.workers().get();

        let inner = cluster.install(|| {
            let mut ids: Vec<VertexId> = frame
                .chunks()
                .par_iter()
                .flat_map_iter(|chunk| {
                    chunk
                        .edges()
                        .iter()
                        .flat_map(|edge| [edge.source(), edge.target()])
                })
                .collect();
            let renumber = RenumberMap::from_unsorted(&mut ids);

            let arcs: Vec<(usize, usize)> = frame
                .chunks()
                .par_iter()
                .flat_map_iter(|chunk| dense_arcs(chunk.edges(), &renumber, directed))
                .collect();

            let vertex_count = renumber.len();
            let rows_per_partition = vertex_count.div_ceil(workers).max(1);
            let partitions: Vec<Partition> = (0..vertex_count)
                .step_by(rows_per_partition)
                .collect::<Vec<_>>()
                .into_par_iter()
                .map(|start| {
                    let range = start..(start + rows_per_partition).min(vertex_count);
                    build_partition(range, &arcs, options.store_transposed())
                })
                .collect();

            PartitionedGraph {
                directed,
                renumber,
                rows_per_partition,
                partitions,
            }
        });

        debug!(
            vertices = inner.vertex_count(),
            partitions = inner.partitions.len(),
            "partitioned distributed graph"
        );
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Returns whether the graph is directed.
    #[must_use]
    pub fn is_directed(&self) -> bool {
        self.inner.is_directed()
    }

    /// Returns the number of vertices across all partitions.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }

    /// Returns the number of partitions.
    #[must_use]
    pub fn partition_count(&self) -> usize {
        self.inner.partitions.len()
    }

    /// Returns whether partitions store in-edges.
    #[must_use]
    pub fn stores_transposed(&self) -> bool {
        self.inner.has_transposed()
    }

    /// Returns the number of stored arcs across all partitions.
    #[must_use]
    pub fn arc_count(&self) -> usize {
        self.inner
            .partitions
            .iter()
            .map(|partition| partition.forward.arc_count())
            .sum()
    }

    /// Starts a betweenness computation and returns without waiting for it.
    ///
    /// Sources are dealt round-robin across the cluster's workers. Each
    /// worker accumulates dependencies for its sources into a partial score
    /// vector; [`DistributedResultFuture::compute`] sums and rescales them.
    ///
    /// # Errors
    /// Returns [`DistributedError::Graph`] when `subset` cannot be resolved
    /// against the graph.
    #[instrument(
        name = "engine.submit",
        err,
        skip(self, cluster, subset, params),
        fields(workers = cluster.workers().get(), subset = %subset),
    )]
    pub fn betweenness_centrality(
        &self,
        cluster: &Cluster,
        subset: &VertexSubset,
        params: &CentralityParams,
    ) -> Result<DistributedResultFuture, DistributedError> {
        let sources = resolve_sources(subset, &self.inner.renumber, params.seed())?;
        let workers = cluster.workers().get();
        let (sender, receiver) = mpsc::channel();

        for worker in 0..workers {
            let assigned: Vec<usize> = sources
                .dense
                .iter()
                .copied()
                .skip(worker)
                .step_by(workers)
                .collect();
            let graph = Arc::clone(&self.inner);
            let sender = sender.clone();
            let endpoints = params.endpoints();
            cluster.spawn(move || {
                let vertex_count = graph.vertex_count();
                let mut workspace = Workspace::new(vertex_count);
                let mut scores = vec![0.0_f64; vertex_count];
                for &source in &assigned {
                    accumulate(graph.as_ref(), source, endpoints, &mut workspace, &mut scores);
                }
                trace!(worker, sources = assigned.len(), "worker finished");
                // The receiver may already be gone if the future was dropped.
                let _ = sender.send(WorkerReport::new(worker, scores));
            });
        }
        drop(sender);

        let reduction = Reduction::new(
            Arc::clone(&self.inner),
            sources.dense.len(),
            sources.sampled,
            *params,
        );
        Ok(DistributedResultFuture::new(receiver, workers, reduction))
    }

    /// Releases the partitions held by this handle.
    pub fn release(self) {
        drop(self);
    }

    #[cfg(test)]
    pub(crate) fn shared(&self) -> Arc<PartitionedGraph> {
        Arc::clone(&self.inner)
    }
}

impl Drop for DistributedGraph {
    fn drop(&mut self) {
        trace!(
            partitions = self.inner.partitions.len(),
            in_flight = Arc::strong_count(&self.inner) - 1,
            "released distributed graph"
        );
    }
}

fn build_partition(
    range: Range<usize>,
    arcs: &[(usize, usize)],
    store_transposed: bool,
) -> Partition {
    let rows = range.len();
    let owned: Vec<(usize, usize)> = arcs
        .iter()
        .copied()
        .filter(|(source, _)| range.contains(source))
        .collect();
    let forward = Csr::build(range.start, rows, owned);
    let transposed = store_transposed.then(|| {
        let incoming: Vec<(usize, usize)> = arcs
            .iter()
            .filter(|(_, target)| range.contains(target))
            .map(|&(source, target)| (target, source))
            .collect();
        Csr::build(range.start, rows, incoming)
    });
    Partition {
        range,
        forward,
        transposed,
    }
}
