//! Betweenness centrality on the single-node graph.
//!
//! The reference engine runs Brandes accumulation sequentially from every
//! selected source and then applies the rescaling shared with the
//! distributed engine.

pub(crate) mod brandes;

use tracing::{debug, instrument};

use crate::{
    error::GraphError,
    graph::Graph,
    result::ResultTable,
    subset::{VertexSubset, resolve_sources},
};

use self::brandes::{Workspace, accumulate};

/// Scalar options of a betweenness computation.
///
/// # Examples
/// ```
/// use centrum_core::CentralityParams;
///
/// let params = CentralityParams::new(true, false).with_seed(Some(42));
/// assert!(params.normalized());
/// assert!(!params.endpoints());
/// assert_eq!(params.seed(), Some(42));
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct CentralityParams {
    normalized: bool,
    endpoints: bool,
    seed: Option<u64>,
}

impl CentralityParams {
    /// Creates parameters without a seed.
    #[must_use]
    pub const fn new(normalized: bool, endpoints: bool) -> Self {
        Self {
            normalized,
            endpoints,
            seed: None,
        }
    }

    /// Sets the seed used when an engine samples sources itself.
    #[must_use]
    pub const fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// Whether scores are normalised by the number of vertex pairs.
    #[must_use]
    pub const fn normalized(&self) -> bool {
        self.normalized
    }

    /// Whether path endpoints count towards the score.
    #[must_use]
    pub const fn endpoints(&self) -> bool {
        self.endpoints
    }

    /// Seed for engine-internal sampling.
    #[must_use]
    pub const fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Returns the factor applied to raw Brandes scores, if any.
///
/// Normalisation divides by the number of ordered vertex pairs that can
/// contain the vertex. Unnormalised undirected scores are halved because each
/// path is discovered from both ends. Sampled sources scale by
/// `vertex_count / source_count`.
pub(crate) fn scale_factor(
    vertex_count: usize,
    source_count: usize,
    sampled: bool,
    directed: bool,
    params: &CentralityParams,
) -> Option<f64> {
    let n = vertex_count as f64;
    let base = if params.normalized {
        if params.endpoints {
            (vertex_count >= 2).then(|| 1.0 / (n * (n - 1.0)))
        } else {
            (vertex_count > 2).then(|| 1.0 / ((n - 1.0) * (n - 2.0)))
        }
    } else if directed {
        None
    } else {
        Some(0.5)
    };
    base.map(|scale| {
        if sampled && source_count > 0 {
            scale * n / source_count as f64
        } else {
            scale
        }
    })
}

/// Multiplies every score by the applicable [`scale_factor`].
pub(crate) fn rescale(
    scores: &mut [f64],
    source_count: usize,
    sampled: bool,
    directed: bool,
    params: &CentralityParams,
) {
    if let Some(scale) = scale_factor(scores.len(), source_count, sampled, directed, params) {
        for score in scores {
            *score *= scale;
        }
    }
}

/// Computes betweenness centrality on a single-node [`Graph`].
///
/// `subset` selects the source vertices (`k`). The table covers every vertex
/// of the graph and is ordered by vertex id.
///
/// # Errors
/// Returns [`GraphError::UnknownVertex`] when an explicit source is not in the
/// graph, [`GraphError::SampleTooLarge`] or [`GraphError::EmptySubset`] when
/// the subset cannot be resolved.
///
/// # Examples
/// ```
/// use centrum_core::{CentralityParams, Edge, EdgeList, Graph, VertexId, VertexSubset};
/// use centrum_core::betweenness_centrality;
///
/// // Path 1 - 2 - 3: only the middle vertex lies between others.
/// let edges: EdgeList = [Edge::unweighted(1, 2), Edge::unweighted(2, 3)].into_iter().collect();
/// let graph = Graph::from_edges(&edges, false)?;
/// let table = betweenness_centrality(&graph, &VertexSubset::All, &CentralityParams::default())?;
/// assert_eq!(table.score(VertexId::new(2)), Some(1.0));
/// assert_eq!(table.score(VertexId::new(1)), Some(0.0));
/// # Ok::<(), centrum_core::GraphError>(())
/// ```
#[instrument(
    name = "engine.reference",
    err,
    skip(graph, subset, params),
    fields(
        vertices = graph.vertex_count(),
        directed = graph.is_directed(),
        subset = %subset,
        normalized = params.normalized(),
        endpoints = params.endpoints(),
    ),
)]
pub fn betweenness_centrality(
    graph: &Graph,
    subset: &VertexSubset,
    params: &CentralityParams,
) -> Result<ResultTable, GraphError> {
    let sources = resolve_sources(subset, graph.renumber(), params.seed())?;
    let vertex_count = graph.vertex_count();
    let mut scores = vec![0.0_f64; vertex_count];
    let mut workspace = Workspace::new(vertex_count);
    for &source in &sources.dense {
        accumulate(graph, source, params.endpoints(), &mut workspace, &mut scores);
    }
    rescale(
        &mut scores,
        sources.dense.len(),
        sources.sampled,
        graph.is_directed(),
        params,
    );
    debug!(sources = sources.dense.len(), "reference accumulation complete");

    let rows = graph.vertices().iter().copied().zip(scores).collect();
    Ok(ResultTable::from_rows(rows).sorted_by_vertex())
}
