//! Unit tests for the equivalence oracle.

use std::{
    borrow::Cow,
    num::NonZeroUsize,
    sync::atomic::{AtomicUsize, Ordering},
};

use rstest::{fixture, rstest};

use super::*;
use crate::{
    centrality::CentralityParams,
    dataset::DistributedFrame,
    distributed::DistributedGraph,
    error::{DatasetError, DistributedError, OracleErrorCode},
    graph::{EdgeList, VertexId},
    subset::VertexListType,
    test_utils::{MemoryDataset, edge_list},
};

fn workers(count: usize) -> NonZeroUsize {
    NonZeroUsize::new(count).expect("worker count must be non-zero")
}

#[fixture]
fn oracle() -> EquivalenceOracle {
    OracleBuilder::new()
        .with_workers(workers(3))
        .build()
        .expect("oracle builds")
}

#[fixture]
fn karate() -> MemoryDataset {
    MemoryDataset::karate()
}

/// Counts whole-file loads so memoisation can be observed.
struct CountingDataset {
    inner: MemoryDataset,
    loads: AtomicUsize,
}

impl CountingDataset {
    fn new(inner: MemoryDataset) -> Self {
        Self {
            inner,
            loads: AtomicUsize::new(0),
        }
    }

    fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl Dataset for CountingDataset {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn identity(&self) -> Cow<'_, str> {
        self.inner.identity()
    }

    fn input_size(&self) -> core::result::Result<u64, DatasetError> {
        self.inner.input_size()
    }

    fn load_edges(&self) -> core::result::Result<EdgeList, DatasetError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.inner.load_edges()
    }

    fn ingest_chunked(
        &self,
        chunk_size: NonZeroUsize,
    ) -> core::result::Result<DistributedFrame, DatasetError> {
        self.inner.ingest_chunked(chunk_size)
    }
}

#[derive(Clone, Copy, Debug)]
enum Fault {
    Skew,
    DropVertex,
}

/// Distributed engine that corrupts the results of a real cluster.
struct FaultyEngine {
    inner: ClusterEngine,
    fault: Fault,
}

struct FaultyResult {
    inner: crate::distributed::DistributedResultFuture,
    fault: Fault,
}

impl PendingResult for FaultyResult {
    fn compute(self) -> core::result::Result<ResultTable, DistributedError> {
        let table = self.inner.compute()?;
        let mut rows: Vec<(VertexId, f64)> = table.iter().collect();
        match self.fault {
            Fault::Skew => {
                if let Some(row) = rows.first_mut() {
                    row.1 += 1.0;
                }
            }
            Fault::DropVertex => {
                rows.pop();
            }
        }
        Ok(ResultTable::from_rows(rows))
    }
}

impl DistributedEngine for FaultyEngine {
    type Graph = DistributedGraph;
    type Pending = FaultyResult;

    fn workers(&self) -> NonZeroUsize {
        self.inner.workers()
    }

    fn build_graph(
        &self,
        frame: &DistributedFrame,
        options: &GraphOptions,
    ) -> core::result::Result<DistributedGraph, DistributedError> {
        self.inner.build_graph(frame, options)
    }

    fn centrality(
        &self,
        graph: &DistributedGraph,
        subset: &VertexSubset,
        params: &CentralityParams,
    ) -> core::result::Result<FaultyResult, DistributedError> {
        Ok(FaultyResult {
            inner: self.inner.centrality(graph, subset, params)?,
            fault: self.fault,
        })
    }
}

fn faulty_oracle(fault: Fault) -> EquivalenceOracle<SingleNodeEngine, FaultyEngine> {
    let inner = ClusterEngine::with_workers(workers(2)).expect("cluster starts");
    OracleBuilder::new()
        .build_with(SingleNodeEngine, FaultyEngine { inner, fault })
        .expect("oracle builds")
}

#[rstest]
#[case::undirected_full(ParamCombo::default())]
#[case::directed_sampled(ParamCombo::default().with_directed(true).with_subset(Some(15), Some(42)))]
#[case::normalized_endpoints(ParamCombo::default().with_normalized(true).with_endpoints(true))]
#[case::frame(
    ParamCombo::default()
        .with_subset(Some(15), Some(42))
        .with_vertex_list(VertexListType::Frame)
)]
#[case::unseeded(ParamCombo::default().with_directed(true).with_subset(Some(15), None))]
#[case::count(
    ParamCombo::default()
        .with_subset(Some(15), Some(42))
        .with_vertex_list(VertexListType::Count)
)]
fn karate_cases_pass(
    oracle: EquivalenceOracle,
    karate: MemoryDataset,
    #[case] params: ParamCombo,
) {
    let report = oracle.validate(&karate, &params).expect("engines agree");
    assert_eq!(report.compared(), 34);
    assert!(report.is_pass());
}

#[rstest]
fn sampled_subset_is_shared_with_the_distributed_run(
    oracle: EquivalenceOracle,
    karate: MemoryDataset,
) {
    let params = ParamCombo::default()
        .with_directed(true)
        .with_subset(Some(15), Some(42));
    let run = oracle.reference(&karate, &params).expect("reference runs");
    let VertexSubset::List(sample) = run.subset() else {
        panic!("expected a list subset, got {:?}", run.subset());
    };
    assert_eq!(sample.len(), 15);

    let graph = SingleNodeEngine
        .build_graph(&karate.load_edges().expect("loads"), true)
        .expect("builds");
    let again = oracle.resolve_subset(&graph, &params).expect("resolves");
    assert_eq!(&again, run.subset());
}

#[rstest]
fn count_representation_matches_full_run(oracle: EquivalenceOracle, karate: MemoryDataset) {
    let count = ParamCombo::default()
        .with_subset(Some(15), Some(42))
        .with_vertex_list(VertexListType::Count);
    let full = ParamCombo::default();
    let count_run = oracle.reference(&karate, &count).expect("runs");
    let full_run = oracle.reference(&karate, &full).expect("runs");
    assert_eq!(count_run.subset(), &VertexSubset::Count(34));
    assert_eq!(full_run.subset(), &VertexSubset::All);
    assert_eq!(count_run.table(), full_run.table());
}

#[rstest]
fn reference_runs_are_memoised(oracle: EquivalenceOracle) {
    let dataset = CountingDataset::new(MemoryDataset::karate());
    let params = ParamCombo::default().with_normalized(true);
    oracle.validate(&dataset, &params).expect("passes");
    oracle.validate(&dataset, &params).expect("passes");
    assert_eq!(dataset.loads(), 1);
    assert_eq!(oracle.cache().len(), 1);

    assert_eq!(oracle.invalidate("karate"), 1);
    oracle.validate(&dataset, &params).expect("passes");
    assert_eq!(dataset.loads(), 2);

    oracle.clear_cache();
    assert!(oracle.cache().is_empty());
}

#[rstest]
fn same_name_datasets_get_their_own_reference(oracle: EquivalenceOracle) {
    let short = MemoryDataset::new("edges", edge_list(&[(0, 1), (1, 2)]));
    let long = MemoryDataset::new("edges", edge_list(&[(0, 1), (1, 2), (2, 3), (3, 4)]));
    let params = ParamCombo::default();
    let first = oracle.validate(&short, &params).expect("short path agrees");
    let second = oracle.validate(&long, &params).expect("long path agrees");
    assert_eq!(first.compared(), 3);
    assert_eq!(second.compared(), 5);
    assert_eq!(oracle.cache().len(), 2);
    assert_eq!(oracle.invalidate("edges"), 2);
}

#[rstest]
fn skewed_score_is_a_tolerance_violation(karate: MemoryDataset) {
    let err = faulty_oracle(Fault::Skew)
        .validate(&karate, &ParamCombo::default())
        .expect_err("skewed result must fail");
    let OracleError::ToleranceViolation { report } = &err else {
        panic!("expected a tolerance violation, got {err:?}");
    };
    assert_eq!(report.mismatch_count(), 1);
    let mismatch = report.mismatches()[0];
    assert_eq!(mismatch.vertex, VertexId::new(0));
    assert!((mismatch.distributed - mismatch.reference - 1.0).abs() < 1e-9);
    assert!(err.is_assertion());
}

#[rstest]
fn missing_vertex_is_a_shape_mismatch(karate: MemoryDataset) {
    let err = faulty_oracle(Fault::DropVertex)
        .validate(&karate, &ParamCombo::default())
        .expect_err("short result must fail");
    assert_eq!(
        err,
        OracleError::ShapeMismatch {
            reference: 34,
            distributed: 33,
            missing: vec![VertexId::new(33)],
            extra: Vec::new(),
        }
    );
}

#[rstest]
fn matrix_keeps_going_after_failures(karate: MemoryDataset) {
    let matrix = ParamMatrix::default()
        .with_directed(vec![false])
        .with_normalized(vec![false])
        .with_endpoints(vec![false, true])
        .with_subset_seeds(vec![Some(42)])
        .with_subset_sizes(vec![None])
        .with_vertex_lists(vec![VertexListType::List]);
    let report = faulty_oracle(Fault::Skew).validate_matrix(&karate, &matrix);
    assert_eq!(report.cases().len(), 2);
    assert_eq!(report.passed(), 0);
    assert!(report.failures().all(|case| {
        matches!(&case.result, Err(err) if err.code() == OracleErrorCode::ToleranceViolation)
    }));
    assert!(report.to_string().starts_with("karate: 0 of 2 cases passed"));
}

#[rstest]
fn full_matrix_passes_on_karate(oracle: EquivalenceOracle, karate: MemoryDataset) {
    let report = oracle.validate_matrix(&karate, &ParamMatrix::default());
    assert!(report.all_passed(), "{report}");
    assert_eq!(report.passed(), 64);
}

#[rstest]
#[case(1)]
#[case(7)]
#[case(500)]
fn chunk_size_override_does_not_change_the_verdict(karate: MemoryDataset, #[case] chunk: usize) {
    let oracle = OracleBuilder::new()
        .with_workers(workers(2))
        .with_chunk_size(NonZeroUsize::new(chunk))
        .with_store_transposed(false)
        .build()
        .expect("oracle builds");
    let params = ParamCombo::default().with_directed(true).with_endpoints(true);
    oracle.validate(&karate, &params).expect("engines agree");
}

#[rstest]
#[case(-1e-5, 1e-8)]
#[case(1e-5, f64::NAN)]
fn builder_rejects_invalid_tolerances(#[case] rtol: f64, #[case] atol: f64) {
    let err = OracleBuilder::new()
        .with_tolerance(rtol, atol)
        .build()
        .expect_err("tolerance must be rejected");
    assert_eq!(err.code(), OracleErrorCode::InvalidTolerance);
}

#[rstest]
fn empty_dataset_is_a_dataset_failure(oracle: EquivalenceOracle) {
    let dataset = MemoryDataset::new("empty", EdgeList::default());
    let err = oracle
        .validate(&dataset, &ParamCombo::default())
        .expect_err("empty dataset must fail");
    assert_eq!(
        err,
        OracleError::Dataset {
            dataset: "empty".into(),
            error: DatasetError::Empty,
        }
    );
}

#[rstest]
fn oversized_subset_is_a_reference_failure(oracle: EquivalenceOracle) {
    let dataset = MemoryDataset::new("path", edge_list(&[(0, 1), (1, 2)]));
    let err = oracle
        .validate(&dataset, &ParamCombo::default().with_subset(Some(15), Some(42)))
        .expect_err("three vertices cannot yield fifteen");
    assert_eq!(
        err,
        OracleError::Reference {
            dataset: "path".into(),
            error: GraphError::SampleTooLarge {
                requested: 15,
                available: 3,
            },
        }
    );
    assert!(oracle.cache().is_empty());
}

#[rstest]
fn explicit_frame_reaches_both_engines(oracle: EquivalenceOracle, karate: MemoryDataset) {
    let subset = VertexSubset::Frame(crate::subset::VertexFrame::from_vertices(&[
        VertexId::new(0),
        VertexId::new(33),
    ]));
    let params = ParamCombo::default().with_normalized(true);
    let table = oracle
        .distributed(&karate, &params, &subset)
        .expect("distributed run succeeds");
    assert_eq!(table.len(), 34);
    assert!(table.is_sorted());
}
