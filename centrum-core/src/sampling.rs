//! Seeded vertex sampling.

use rand::{SeedableRng, rngs::SmallRng, seq::index};
use tracing::{debug, instrument};

use crate::{
    error::GraphError,
    graph::{Graph, VertexId},
};

/// Draws `amount` distinct indices from `0..len` in draw order.
///
/// A fixed `seed` always yields the same indices; `None` seeds from OS
/// entropy.
pub(crate) fn sample_indices(
    len: usize,
    amount: usize,
    seed: Option<u64>,
) -> Result<Vec<usize>, GraphError> {
    if amount > len {
        return Err(GraphError::SampleTooLarge {
            requested: amount,
            available: len,
        });
    }
    let mut rng = match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    Ok(index::sample(&mut rng, len, amount).into_iter().collect())
}

/// Draws a pseudo-random sample of `count` distinct vertices from `graph`.
///
/// The sample is returned in draw order.
///
/// # Errors
/// Returns [`GraphError::SampleTooLarge`] when `count` exceeds the number of
/// vertices.
///
/// # Examples
/// ```
/// use centrum_core::{Edge, EdgeList, Graph, select_random_vertices};
///
/// let edges: EdgeList = (0..10).map(|v| Edge::unweighted(v, v + 1)).collect();
/// let graph = Graph::from_edges(&edges, false)?;
/// let first = select_random_vertices(&graph, Some(42), 4)?;
/// let again = select_random_vertices(&graph, Some(42), 4)?;
/// assert_eq!(first.len(), 4);
/// assert_eq!(first, again);
/// # Ok::<(), centrum_core::GraphError>(())
/// ```
#[instrument(name = "graph.sample", err, skip(graph), fields(vertices = graph.vertex_count()))]
pub fn select_random_vertices(
    graph: &Graph,
    seed: Option<u64>,
    count: usize,
) -> Result<Vec<VertexId>, GraphError> {
    let indices = sample_indices(graph.vertex_count(), count, seed)?;
    let sample: Vec<VertexId> = indices
        .into_iter()
        .filter_map(|dense| graph.renumber().original(dense))
        .collect();
    debug!(sampled = sample.len(), "selected random vertices");
    Ok(sample)
}
