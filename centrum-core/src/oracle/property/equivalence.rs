//! Property 1: the distributed engine agrees with the single-node engine.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{oracle::OracleBuilder, test_utils::MemoryDataset};

use super::types::OracleFixture;

/// Validates the fixture's parameter combination through the oracle and
/// checks that every vertex was compared.
pub(super) fn run_equivalence_property(fixture: &OracleFixture) -> TestCaseResult {
    let context = || {
        format!(
            "topology={:?}, vertices={}, edges={}, workers={}, chunk={}, params=[{}]",
            fixture.topology,
            fixture.vertex_count,
            fixture.edges.len(),
            fixture.workers,
            fixture.chunk_size,
            fixture.params,
        )
    };
    let oracle = OracleBuilder::new()
        .with_workers(fixture.workers)
        .with_chunk_size(Some(fixture.chunk_size))
        .build()
        .map_err(|err| TestCaseError::fail(format!("oracle failed to build: {err}")))?;
    let dataset = MemoryDataset::new("generated", fixture.edges.clone());

    let report = oracle
        .validate(&dataset, &fixture.params)
        .map_err(|err| TestCaseError::fail(format!("[{}] {err} ({})", err.code(), context())))?;

    if report.compared() != fixture.vertex_count {
        return Err(TestCaseError::fail(format!(
            "compared {} rows, expected {} ({})",
            report.compared(),
            fixture.vertex_count,
            context(),
        )));
    }
    Ok(())
}
