//! The equivalence oracle.
//!
//! For a dataset and a [`ParamCombo`] the oracle computes a reference result
//! on the single-node engine, computes the same centrality on the distributed
//! engine from a chunked ingestion of the same data, and asserts that both
//! tables agree row by row within a [`Tolerance`].
//!
//! Reference results are memoised per dataset identity and combination in a
//! [`ReferenceCache`] owned by the oracle. Graph handles are built fresh for
//! every case and dropped when the case ends.

mod builder;
mod cache;
mod compare;
mod params;
#[cfg(test)]
mod property;
mod report;
#[cfg(test)]
mod tests;

use std::{num::NonZeroUsize, sync::Arc};

use tracing::{info, instrument, warn};

use crate::{
    dataset::{Dataset, chunk_size_for},
    distributed::GraphOptions,
    engine::{ClusterEngine, DistributedEngine, PendingResult, ReferenceEngine, SingleNodeEngine},
    error::{GraphError, OracleError, Result},
    result::ResultTable,
    subset::VertexSubset,
};

pub use self::{
    builder::OracleBuilder,
    cache::{ReferenceCache, ReferenceRun},
    compare::{ComparisonReport, MAX_REPORTED, Mismatch, Tolerance, compare_tables},
    params::{ParamCombo, ParamMatrix},
    report::{CaseOutcome, MatrixReport},
};

/// Validates a distributed engine against a single-node reference.
///
/// # Examples
/// ```no_run
/// use centrum_core::{Dataset, OracleBuilder, ParamCombo};
///
/// fn check(dataset: &impl Dataset) -> Result<(), centrum_core::OracleError> {
///     let oracle = OracleBuilder::new().build()?;
///     let params = ParamCombo::default().with_directed(true).with_subset(Some(15), Some(42));
///     let report = oracle.validate(dataset, &params)?;
///     assert!(report.is_pass());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct EquivalenceOracle<R = SingleNodeEngine, D = ClusterEngine> {
    reference: R,
    distributed: D,
    tolerance: Tolerance,
    chunk_size: Option<NonZeroUsize>,
    store_transposed: bool,
    cache: ReferenceCache,
}

impl<R, D> EquivalenceOracle<R, D>
where
    R: ReferenceEngine,
    D: DistributedEngine,
{
    /// Tolerance used for every comparison.
    #[must_use]
    pub const fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Worker count of the distributed engine.
    #[must_use]
    pub fn workers(&self) -> NonZeroUsize {
        self.distributed.workers()
    }

    /// The reference memo table.
    #[must_use]
    pub const fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Runs one case and returns the comparison when both engines agree.
    ///
    /// # Errors
    /// Returns [`OracleError::ShapeMismatch`] or
    /// [`OracleError::ToleranceViolation`] when the engines disagree, and the
    /// dataset, reference, or distributed variants when a step fails.
    #[instrument(
        name = "oracle.validate",
        err,
        skip(self, dataset, params),
        fields(dataset = dataset.name(), params = %params),
    )]
    pub fn validate<S>(&self, dataset: &S, params: &ParamCombo) -> Result<ComparisonReport>
    where
        S: Dataset + ?Sized,
    {
        let reference = self.reference(dataset, params)?;
        let distributed = self.distributed(dataset, params, reference.subset())?;
        let report = compare_tables(reference.table(), &distributed, self.tolerance)?;
        info!(compared = report.compared(), "distributed result matches reference");
        Ok(report)
    }

    /// Computes, or fetches from the memo table, the reference run of a
    /// case: builds the single-node graph, resolves the source subset, and
    /// runs the reference engine.
    ///
    /// # Errors
    /// Returns [`OracleError::Dataset`] when the edges cannot be loaded and
    /// [`OracleError::Reference`] when the reference engine fails.
    #[instrument(
        name = "oracle.reference",
        err,
        skip(self, dataset, params),
        fields(dataset = dataset.name(), params = %params),
    )]
    pub fn reference<S>(&self, dataset: &S, params: &ParamCombo) -> Result<Arc<ReferenceRun>>
    where
        S: Dataset + ?Sized,
    {
        let name = dataset.name();
        let identity = dataset.identity();
        self.cache.get_or_try_insert(name, &identity, params, || {
            let edges = dataset.load_edges().map_err(|error| OracleError::Dataset {
                dataset: Arc::from(name),
                error,
            })?;
            let reference_error = |error| OracleError::Reference {
                dataset: Arc::from(name),
                error,
            };
            let graph = self
                .reference
                .build_graph(&edges, params.directed())
                .map_err(reference_error)?;
            let subset = self.resolve_subset(&graph, params).map_err(reference_error)?;
            let table = self
                .reference
                .centrality(&graph, &subset, &params.centrality_params())
                .map_err(reference_error)?;
            Ok(ReferenceRun::new(
                subset,
                table,
                self.reference.vertex_count(&graph),
            ))
        })
    }

    /// Resolves the source subset `k` of a case against the single-node
    /// graph.
    ///
    /// Without a subset size every vertex is a source. Otherwise a seeded
    /// sample is drawn and converted to the case's representation; the
    /// `Count` representation replaces the sample with the full vertex
    /// count so both engines evaluate every source.
    ///
    /// # Errors
    /// Returns [`GraphError::SampleTooLarge`] when the subset size exceeds
    /// the vertex count.
    pub fn resolve_subset(
        &self,
        graph: &R::Graph,
        params: &ParamCombo,
    ) -> core::result::Result<VertexSubset, GraphError> {
        let Some(size) = params.subset_size() else {
            return Ok(VertexSubset::All);
        };
        let sample = self
            .reference
            .sample_vertices(graph, params.subset_seed(), size)?;
        Ok(params
            .vertex_list()
            .represent(sample, self.reference.vertex_count(graph)))
    }

    /// Ingests `dataset` in chunks, builds the distributed graph, and
    /// computes centrality for `subset`. The graph is released before
    /// returning, whether or not the computation succeeded.
    ///
    /// # Errors
    /// Returns [`OracleError::Dataset`] when ingestion fails and
    /// [`OracleError::Distributed`] when the engine fails.
    #[instrument(
        name = "oracle.distributed",
        err,
        skip(self, dataset, params, subset),
        fields(dataset = dataset.name(), params = %params, subset = %subset),
    )]
    pub fn distributed<S>(
        &self,
        dataset: &S,
        params: &ParamCombo,
        subset: &VertexSubset,
    ) -> Result<ResultTable>
    where
        S: Dataset + ?Sized,
    {
        let name = dataset.name();
        let dataset_error = |error| OracleError::Dataset {
            dataset: Arc::from(name),
            error,
        };
        let distributed_error = |error| OracleError::Distributed {
            dataset: Arc::from(name),
            error,
        };

        let chunk_size = match self.chunk_size {
            Some(chunk_size) => chunk_size,
            None => chunk_size_for(
                dataset.input_size().map_err(dataset_error)?,
                self.distributed.workers(),
            ),
        };
        let frame = dataset.ingest_chunked(chunk_size).map_err(dataset_error)?;
        let options = GraphOptions::default()
            .with_directed(params.directed())
            .with_store_transposed(self.store_transposed);
        let graph = self
            .distributed
            .build_graph(&frame, &options)
            .map_err(distributed_error)?;
        let table = self
            .distributed
            .centrality(&graph, subset, &params.centrality_params())
            .and_then(PendingResult::compute)
            .map_err(distributed_error)?;
        Ok(table.sorted_by_vertex())
    }

    /// Validates every combination of `matrix`, continuing past failures.
    #[instrument(
        name = "oracle.matrix",
        skip(self, dataset, matrix),
        fields(dataset = dataset.name(), cases = matrix.len()),
    )]
    pub fn validate_matrix<S>(&self, dataset: &S, matrix: &ParamMatrix) -> MatrixReport
    where
        S: Dataset + ?Sized,
    {
        let cases: Vec<CaseOutcome> = matrix
            .combinations()
            .into_iter()
            .map(|params| CaseOutcome {
                params,
                result: self.validate(dataset, &params),
            })
            .collect();
        let report = MatrixReport::new(Arc::from(dataset.name()), cases);
        if report.all_passed() {
            info!(passed = report.passed(), "parameter matrix passed");
        } else {
            warn!(
                passed = report.passed(),
                failed = report.cases().len() - report.passed(),
                "parameter matrix has failures"
            );
        }
        report
    }

    /// Drops the memoised reference runs of every dataset named `dataset`.
    pub fn invalidate(&self, dataset: &str) -> usize {
        self.cache.invalidate(dataset)
    }

    /// Drops every memoised reference run.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}
