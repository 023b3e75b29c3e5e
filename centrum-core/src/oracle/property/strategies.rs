//! Strategy builders for oracle property tests.

use std::num::NonZeroUsize;

use proptest::prelude::*;
use rand::{Rng, SeedableRng, rngs::SmallRng, seq::SliceRandom};

use crate::{
    graph::Edge,
    oracle::ParamCombo,
    subset::VertexListType,
};

use super::types::{OracleFixture, Topology};

const MIN_VERTICES: usize = 4;
const MAX_VERTICES: usize = 40;
/// Gap between consecutive vertex ids, so renumbering is exercised.
const ID_STRIDE: u32 = 3;

pub(super) fn oracle_fixture_strategy() -> impl Strategy<Value = OracleFixture> {
    (
        prop_oneof![
            Just(Topology::Sparse),
            Just(Topology::Dense),
            Just(Topology::Disconnected),
            Just(Topology::Star),
            Just(Topology::Path),
        ],
        any::<u64>(),
    )
        .prop_map(|(topology, seed)| {
            let mut rng = SmallRng::seed_from_u64(seed);
            generate_fixture(topology, &mut rng)
        })
}

/// Generates a fixture for a specific topology.
pub(super) fn generate_fixture(topology: Topology, rng: &mut SmallRng) -> OracleFixture {
    let vertex_count = rng.gen_range(MIN_VERTICES..=MAX_VERTICES);
    let mut pairs = match topology {
        Topology::Sparse => sparse(vertex_count, rng),
        Topology::Dense => dense(vertex_count, rng),
        Topology::Disconnected => disconnected(vertex_count, rng),
        Topology::Star => (1..vertex_count).map(|leaf| (0, leaf)).collect(),
        Topology::Path => (1..vertex_count).map(|v| (v - 1, v)).collect(),
    };
    // A vertex only exists if some edge mentions it.
    let mut covered = vec![false; vertex_count];
    for &(source, target) in &pairs {
        covered[source] = true;
        covered[target] = true;
    }
    for (vertex, _) in covered.iter().enumerate().filter(|(_, seen)| !**seen) {
        pairs.push((vertex, (vertex + 1) % vertex_count));
    }
    pairs.shuffle(rng);

    let edges = pairs
        .into_iter()
        .map(|(source, target)| Edge::unweighted(vertex_id(source), vertex_id(target)))
        .collect();

    let subset_size = rng.gen_bool(0.5).then(|| rng.gen_range(1..=vertex_count));
    let subset_seed = rng.gen_bool(0.7).then(|| rng.r#gen::<u64>());
    let vertex_list = match rng.gen_range(0..3) {
        0 => VertexListType::List,
        1 => VertexListType::Frame,
        _ => VertexListType::Count,
    };
    let params = ParamCombo::default()
        .with_directed(rng.gen_bool(0.5))
        .with_normalized(rng.gen_bool(0.5))
        .with_endpoints(rng.gen_bool(0.5))
        .with_subset(subset_size, subset_seed)
        .with_vertex_list(vertex_list);

    OracleFixture {
        edges,
        topology,
        vertex_count,
        params,
        workers: non_zero(rng.gen_range(1..=6)),
        chunk_size: non_zero(rng.gen_range(1..=16)),
    }
}

fn vertex_id(dense: usize) -> u32 {
    u32::try_from(dense).map_or(u32::MAX, |id| id * ID_STRIDE + 1)
}

fn non_zero(value: usize) -> NonZeroUsize {
    NonZeroUsize::new(value).unwrap_or(NonZeroUsize::MIN)
}

fn sparse(vertex_count: usize, rng: &mut SmallRng) -> Vec<(usize, usize)> {
    let edge_count = vertex_count * 3 / 2;
    (0..edge_count)
        .map(|_| (rng.gen_range(0..vertex_count), rng.gen_range(0..vertex_count)))
        .collect()
}

fn dense(vertex_count: usize, rng: &mut SmallRng) -> Vec<(usize, usize)> {
    let probability = rng.gen_range(0.5..=0.9);
    let mut pairs = Vec::new();
    for source in 0..vertex_count {
        for target in 0..vertex_count {
            if source != target && rng.gen_bool(probability) {
                pairs.push((source, target));
            }
        }
    }
    pairs
}

fn disconnected(vertex_count: usize, rng: &mut SmallRng) -> Vec<(usize, usize)> {
    let components = rng.gen_range(2..=(vertex_count / 2).max(2));
    let mut pairs = Vec::new();
    for vertex in 1..vertex_count {
        let component = vertex % components;
        // Chain each vertex to an earlier member of its component, if any.
        if vertex >= components {
            let anchor = component + components * rng.gen_range(0..vertex / components);
            if anchor < vertex {
                pairs.push((anchor, vertex));
            }
        }
    }
    pairs
}
