//! Property 2: repeated runs are deterministic.
//!
//! A full-set reference run is identical across fresh oracles, a seeded
//! sample resolves to the same subset every time, and a distributed run on a
//! fixed worker count reproduces its scores bit for bit.

use proptest::{
    prop_assert_eq,
    test_runner::{TestCaseError, TestCaseResult},
};

use crate::{
    engine::{ReferenceEngine, SingleNodeEngine},
    oracle::{EquivalenceOracle, OracleBuilder, ParamCombo},
    test_utils::MemoryDataset,
};

use super::types::OracleFixture;

fn fresh_oracle(fixture: &OracleFixture) -> Result<EquivalenceOracle, TestCaseError> {
    OracleBuilder::new()
        .with_workers(fixture.workers)
        .with_chunk_size(Some(fixture.chunk_size))
        .build()
        .map_err(|err| TestCaseError::fail(format!("oracle failed to build: {err}")))
}

pub(super) fn run_determinism_property(fixture: &OracleFixture) -> TestCaseResult {
    let dataset = MemoryDataset::new("generated", fixture.edges.clone());
    let fail = |stage: &str, err: &dyn std::fmt::Display| {
        TestCaseError::fail(format!("{stage}: {err} (topology={:?})", fixture.topology))
    };

    let full = ParamCombo::default()
        .with_directed(fixture.params.directed())
        .with_normalized(fixture.params.normalized())
        .with_endpoints(fixture.params.endpoints());
    let first = fresh_oracle(fixture)?
        .reference(&dataset, &full)
        .map_err(|err| fail("first reference", &err))?;
    let second = fresh_oracle(fixture)?
        .reference(&dataset, &full)
        .map_err(|err| fail("second reference", &err))?;
    prop_assert_eq!(first.table(), second.table());

    let oracle = fresh_oracle(fixture)?;
    if fixture.params.subset_seed().is_some() {
        let graph = SingleNodeEngine
            .build_graph(&fixture.edges, fixture.params.directed())
            .map_err(|err| fail("graph", &err))?;
        let once = oracle
            .resolve_subset(&graph, &fixture.params)
            .map_err(|err| fail("subset", &err))?;
        let twice = oracle
            .resolve_subset(&graph, &fixture.params)
            .map_err(|err| fail("subset", &err))?;
        prop_assert_eq!(once, twice);
    }

    let run = oracle
        .reference(&dataset, &fixture.params)
        .map_err(|err| fail("reference", &err))?;
    let left = oracle
        .distributed(&dataset, &fixture.params, run.subset())
        .map_err(|err| fail("first distributed", &err))?;
    let right = oracle
        .distributed(&dataset, &fixture.params, run.subset())
        .map_err(|err| fail("second distributed", &err))?;
    prop_assert_eq!(left, right);
    Ok(())
}
