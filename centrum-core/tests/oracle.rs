//! Tests for the public equivalence oracle API.

mod common;

use std::num::NonZeroUsize;

use centrum_core::{
    CentralityParams, Cluster, Dataset, DistributedFrame, DistributedGraph, EquivalenceOracle,
    Graph, GraphOptions, OracleBuilder, OracleError, ParamCombo, ParamMatrix, ReferenceEngine,
    SingleNodeEngine, VertexId, VertexListType, VertexSubset, betweenness_centrality,
};
use centrum_test_support::tracing::RecordingLayer;
use common::InMemory;
use rstest::{fixture, rstest};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

fn workers(count: usize) -> NonZeroUsize {
    NonZeroUsize::new(count).expect("worker count must be non-zero")
}

#[fixture]
fn karate() -> InMemory {
    InMemory::karate()
}

#[fixture]
fn oracle() -> EquivalenceOracle {
    OracleBuilder::new()
        .with_workers(workers(2))
        .build()
        .expect("oracle builds")
}

#[rstest]
fn builder_defaults() {
    let oracle = OracleBuilder::new()
        .with_workers(workers(4))
        .build()
        .expect("defaults valid");
    assert_eq!(oracle.tolerance().rtol(), 1e-5);
    assert_eq!(oracle.tolerance().atol(), 1e-8);
    assert_eq!(oracle.workers().get(), 4);
    assert!(oracle.cache().is_empty());
}

#[rstest]
fn datasets_sharing_a_name_are_memoised_separately(oracle: EquivalenceOracle) {
    let params = ParamCombo::default();
    let short = InMemory::new("edges", &[(0, 1), (1, 2)]);
    let long = InMemory::new("edges", &[(0, 1), (1, 2), (2, 3), (3, 4)]);
    assert_ne!(short.identity(), long.identity());

    let first = oracle.validate(&short, &params).expect("short path agrees");
    let second = oracle.validate(&long, &params).expect("long path agrees");
    assert_eq!(first.compared(), 3);
    assert_eq!(second.compared(), 5);
    let run = oracle.reference(&long, &params).expect("memoised run");
    assert_eq!(run.vertex_count(), 5);
}

#[rstest]
fn undirected_full_run_matches_known_scores(oracle: EquivalenceOracle, karate: InMemory) {
    let params = ParamCombo::default().with_normalized(true);
    let report = oracle.validate(&karate, &params).expect("engines agree");
    assert_eq!(report.compared(), 34);

    let run = oracle.reference(&karate, &params).expect("memoised run");
    let table = run.table();
    let instructor = table.score(VertexId::new(0)).expect("vertex 0 scored");
    let president = table.score(VertexId::new(33)).expect("vertex 33 scored");
    assert!((instructor - 0.437_635_281_385_281_5).abs() < 1e-9);
    assert!((president - 0.304_074_975_949_976).abs() < 1e-9);
    assert!(table.scores().iter().all(|score| (0.0..=1.0).contains(score)));
}

#[rstest]
fn directed_sample_of_fifteen_passes(oracle: EquivalenceOracle, karate: InMemory) {
    let params = ParamCombo::default()
        .with_directed(true)
        .with_subset(Some(15), Some(42));
    let report = oracle.validate(&karate, &params).expect("engines agree");
    assert!(report.is_pass());

    let run = oracle.reference(&karate, &params).expect("memoised run");
    assert_eq!(run.subset().explicit_vertices().map(|v| v.len()), Some(15));
    assert_eq!(run.vertex_count(), 34);
}

#[rstest]
fn count_representation_covers_every_vertex(oracle: EquivalenceOracle, karate: InMemory) {
    let count = ParamCombo::default()
        .with_subset(Some(15), Some(42))
        .with_vertex_list(VertexListType::Count);
    oracle.validate(&karate, &count).expect("engines agree");
    let run = oracle.reference(&karate, &count).expect("memoised run");
    assert_eq!(run.subset(), &VertexSubset::Count(34));

    let full = oracle
        .reference(&karate, &ParamCombo::default())
        .expect("full run");
    assert_eq!(run.table(), full.table());
}

#[rstest]
fn distributed_graph_agrees_with_single_node_graph(karate: InMemory) {
    let cluster = Cluster::new(workers(3)).expect("cluster starts");
    let frame: DistributedFrame = karate.ingest_chunked(workers(10)).expect("ingests");
    assert_eq!(frame.chunk_count(), 8);
    let graph = DistributedGraph::from_frame(&cluster, &frame, &GraphOptions::default())
        .expect("builds");
    assert_eq!(graph.vertex_count(), 34);
    assert_eq!(graph.partition_count(), 3);

    let params = CentralityParams::new(false, true);
    let distributed = graph
        .betweenness_centrality(&cluster, &VertexSubset::All, &params)
        .expect("submits")
        .compute()
        .expect("computes");
    graph.release();

    let edges = karate.load_edges().expect("loads");
    let single = Graph::from_edges(&edges, false).expect("builds");
    let reference = betweenness_centrality(&single, &VertexSubset::All, &params).expect("runs");
    for ((vertex, expected), (other, actual)) in reference.iter().zip(distributed.iter()) {
        assert_eq!(vertex, other);
        assert!((expected - actual).abs() <= 1e-9, "vertex {vertex}");
    }
}

#[rstest]
fn sampling_is_reproducible_through_the_engine_trait(karate: InMemory) {
    let edges = karate.load_edges().expect("loads");
    let graph = SingleNodeEngine.build_graph(&edges, true).expect("builds");
    let first = SingleNodeEngine
        .sample_vertices(&graph, Some(42), 15)
        .expect("samples");
    let again = SingleNodeEngine
        .sample_vertices(&graph, Some(42), 15)
        .expect("samples");
    assert_eq!(first, again);
    assert_eq!(first.len(), 15);
}

#[rstest]
fn restricted_matrix_passes_on_karate(oracle: EquivalenceOracle, karate: InMemory) {
    let matrix = ParamMatrix::default()
        .with_subset_seeds(vec![Some(42)])
        .with_vertex_lists(vec![VertexListType::List]);
    assert_eq!(matrix.len(), 16);
    let report = oracle.validate_matrix(&karate, &matrix);
    assert!(report.all_passed(), "{report}");
    assert_eq!(report.dataset(), "karate");
    assert_eq!(report.to_string(), "karate: 16 of 16 cases passed");
}

#[rstest]
fn tiny_graph_fails_with_a_reference_error(oracle: EquivalenceOracle) {
    let path = InMemory::new("path", &[(0, 1), (1, 2)]);
    let err = oracle
        .validate(&path, &ParamCombo::default().with_subset(Some(15), Some(42)))
        .expect_err("sample larger than the graph");
    assert!(matches!(err, OracleError::Reference { .. }));
    assert!(!err.is_assertion());
}

#[rstest]
fn validate_records_span_tree(oracle: EquivalenceOracle, karate: InMemory) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let params = ParamCombo::default().with_directed(true);

    tracing::subscriber::with_default(subscriber, || oracle.validate(&karate, &params))
        .expect("engines agree");

    let validate = layer
        .span("oracle.validate")
        .expect("oracle.validate span must exist");
    assert_eq!(validate.field("dataset"), Some("karate"));
    assert_eq!(validate.field("params"), Some(params.to_string().as_str()));
    assert_eq!(validate.parent, None);

    for (name, parent) in [
        ("oracle.reference", "oracle.validate"),
        ("oracle.distributed", "oracle.validate"),
        ("engine.reference", "oracle.reference"),
        ("engine.ingest", "oracle.distributed"),
        ("engine.submit", "oracle.distributed"),
        ("engine.compute", "oracle.distributed"),
    ] {
        let span = layer
            .span(name)
            .unwrap_or_else(|| panic!("{name} span must exist"));
        assert_eq!(span.parent.as_deref(), Some(parent), "parent of {name}");
    }
    let ingest = layer.span("engine.ingest").expect("engine.ingest span");
    assert_eq!(ingest.field("directed"), Some("true"));

    let events = layer.events_with_message("distributed result matches reference");
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].level, Level::INFO);
    assert_eq!(events[0].field("compared"), Some("34"));
}

#[rstest]
fn failed_matrix_logs_a_warning(oracle: EquivalenceOracle) {
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());
    let path = InMemory::new("path", &[(0, 1), (1, 2)]);
    let matrix = ParamMatrix::single(ParamCombo::default().with_subset(Some(15), Some(42)));

    let report = tracing::subscriber::with_default(subscriber, || {
        oracle.validate_matrix(&path, &matrix)
    });
    assert_eq!(report.passed(), 0);

    let warnings = layer.events_with_message("parameter matrix has failures");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].level, Level::WARN);
    assert_eq!(warnings[0].field("failed"), Some("1"));
}
