//! Pending distributed results and their reduction.

use std::sync::{Arc, mpsc::Receiver};

use tracing::{debug, instrument, warn};

use crate::{
    centrality::{CentralityParams, rescale},
    error::DistributedError,
    result::ResultTable,
};

use super::graph::PartitionedGraph;

/// Partial scores from one worker, indexed by dense vertex.
#[derive(Debug)]
pub(crate) struct WorkerReport {
    worker: usize,
    scores: Vec<f64>,
}

impl WorkerReport {
    pub(crate) const fn new(worker: usize, scores: Vec<f64>) -> Self {
        Self { worker, scores }
    }
}

/// Everything the reduction needs besides the partials.
#[derive(Debug)]
pub(crate) struct Reduction {
    graph: Arc<PartitionedGraph>,
    source_count: usize,
    sampled: bool,
    params: CentralityParams,
}

impl Reduction {
    pub(crate) const fn new(
        graph: Arc<PartitionedGraph>,
        source_count: usize,
        sampled: bool,
        params: CentralityParams,
    ) -> Self {
        Self {
            graph,
            source_count,
            sampled,
            params,
        }
    }
}

/// Handle to a betweenness computation running on a cluster.
///
/// Nothing is reduced until [`DistributedResultFuture::compute`] is called.
#[derive(Debug)]
#[must_use = "a distributed computation yields nothing until computed"]
pub struct DistributedResultFuture {
    receiver: Receiver<WorkerReport>,
    expected: usize,
    reduction: Reduction,
}

impl DistributedResultFuture {
    pub(crate) const fn new(
        receiver: Receiver<WorkerReport>,
        expected: usize,
        reduction: Reduction,
    ) -> Self {
        Self {
            receiver,
            expected,
            reduction,
        }
    }

    /// Number of worker reports the computation waits for.
    #[must_use]
    pub const fn expected_reports(&self) -> usize {
        self.expected
    }

    /// Blocks until every worker has reported, then sums the partials in
    /// worker order, rescales them, and maps them back to original vertex
    /// ids.
    ///
    /// # Errors
    /// Returns [`DistributedError::WorkerLost`] when a worker stops without
    /// reporting.
    #[instrument(name = "engine.compute", err, skip(self), fields(workers = self.expected))]
    pub fn compute(self) -> Result<ResultTable, DistributedError> {
        let Self {
            receiver,
            expected,
            reduction,
        } = self;

        let mut reports = Vec::with_capacity(expected);
        while reports.len() < expected {
            match receiver.recv() {
                Ok(report) => reports.push(report),
                Err(_) => {
                    warn!(received = reports.len(), expected, "worker channel closed early");
                    return Err(DistributedError::WorkerLost {
                        received: reports.len(),
                        expected,
                    });
                }
            }
        }
        reports.sort_by_key(|report| report.worker);

        let graph = &reduction.graph;
        let vertices = graph.vertices();
        let mut totals = vec![0.0_f64; vertices.len()];
        for report in &reports {
            for (total, partial) in totals.iter_mut().zip(&report.scores) {
                *total += partial;
            }
        }
        rescale(
            &mut totals,
            reduction.source_count,
            reduction.sampled,
            graph.is_directed(),
            &reduction.params,
        );
        debug!(
            reports = reports.len(),
            sources = reduction.source_count,
            "reduced distributed partials"
        );

        let rows = vertices.iter().copied().zip(totals).collect();
        Ok(ResultTable::from_rows(rows).sorted_by_vertex())
    }
}
