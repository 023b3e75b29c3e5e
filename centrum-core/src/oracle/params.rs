//! Parameter combinations and the matrices that enumerate them.

use std::fmt;

use crate::{centrality::CentralityParams, subset::VertexListType};

/// One test case's parameters. Immutable and hashable so it can key the
/// reference memo table.
///
/// # Examples
/// ```
/// use centrum_core::{ParamCombo, VertexListType};
///
/// let combo = ParamCombo::default()
///     .with_directed(true)
///     .with_subset(Some(15), Some(42))
///     .with_vertex_list(VertexListType::Frame);
/// assert_eq!(
///     combo.to_string(),
///     "directed=true normalized=false endpoints=false seed=42 size=15 vertex_list=frame",
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ParamCombo {
    directed: bool,
    normalized: bool,
    endpoints: bool,
    subset_seed: Option<u64>,
    subset_size: Option<usize>,
    vertex_list: VertexListType,
}

impl ParamCombo {
    /// Sets whether the graph is directed.
    #[must_use]
    pub const fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }

    /// Sets whether scores are normalised.
    #[must_use]
    pub const fn with_normalized(mut self, normalized: bool) -> Self {
        self.normalized = normalized;
        self
    }

    /// Sets whether endpoints are counted.
    #[must_use]
    pub const fn with_endpoints(mut self, endpoints: bool) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Sets the sample size and the seed used to draw it.
    #[must_use]
    pub const fn with_subset(mut self, size: Option<usize>, seed: Option<u64>) -> Self {
        self.subset_size = size;
        self.subset_seed = seed;
        self
    }

    /// Sets how a drawn sample is handed to the engines.
    #[must_use]
    pub const fn with_vertex_list(mut self, vertex_list: VertexListType) -> Self {
        self.vertex_list = vertex_list;
        self
    }

    /// Whether the graph is directed.
    #[must_use]
    pub const fn directed(&self) -> bool {
        self.directed
    }

    /// Whether scores are normalised.
    #[must_use]
    pub const fn normalized(&self) -> bool {
        self.normalized
    }

    /// Whether endpoints are counted.
    #[must_use]
    pub const fn endpoints(&self) -> bool {
        self.endpoints
    }

    /// Seed for the subset sample, also forwarded to both engines.
    #[must_use]
    pub const fn subset_seed(&self) -> Option<u64> {
        self.subset_seed
    }

    /// Number of sampled source vertices; `None` uses every vertex.
    #[must_use]
    pub const fn subset_size(&self) -> Option<usize> {
        self.subset_size
    }

    /// Representation of the sampled subset.
    #[must_use]
    pub const fn vertex_list(&self) -> VertexListType {
        self.vertex_list
    }

    /// The scalar options handed to both engines.
    #[must_use]
    pub const fn centrality_params(&self) -> CentralityParams {
        CentralityParams::new(self.normalized, self.endpoints).with_seed(self.subset_seed)
    }
}

impl fmt::Display for ParamCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "directed={} normalized={} endpoints={} seed=",
            self.directed, self.normalized, self.endpoints
        )?;
        match self.subset_seed {
            Some(seed) => write!(f, "{seed}")?,
            None => f.write_str("none")?,
        }
        f.write_str(" size=")?;
        match self.subset_size {
            Some(size) => write!(f, "{size}")?,
            None => f.write_str("none")?,
        }
        write!(f, " vertex_list={}", self.vertex_list)
    }
}

/// Cartesian product of parameter axes.
///
/// The default matrix covers directed × normalized × endpoints × seed
/// {42, none} × size {none, 15} × {list, frame}: 64 combinations.
///
/// # Examples
/// ```
/// use centrum_core::ParamMatrix;
///
/// assert_eq!(ParamMatrix::default().len(), 64);
/// let narrow = ParamMatrix::default().with_directed(vec![false]).with_subset_sizes(vec![None]);
/// assert_eq!(narrow.combinations().len(), 16);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParamMatrix {
    directed: Vec<bool>,
    normalized: Vec<bool>,
    endpoints: Vec<bool>,
    subset_seeds: Vec<Option<u64>>,
    subset_sizes: Vec<Option<usize>>,
    vertex_lists: Vec<VertexListType>,
}

impl Default for ParamMatrix {
    fn default() -> Self {
        Self {
            directed: vec![true, false],
            normalized: vec![false, true],
            endpoints: vec![false, true],
            subset_seeds: vec![Some(42), None],
            subset_sizes: vec![None, Some(15)],
            vertex_lists: vec![VertexListType::List, VertexListType::Frame],
        }
    }
}

impl ParamMatrix {
    /// A matrix holding exactly one combination.
    #[must_use]
    pub fn single(combo: ParamCombo) -> Self {
        Self {
            directed: vec![combo.directed],
            normalized: vec![combo.normalized],
            endpoints: vec![combo.endpoints],
            subset_seeds: vec![combo.subset_seed],
            subset_sizes: vec![combo.subset_size],
            vertex_lists: vec![combo.vertex_list],
        }
    }

    /// Replaces the directedness axis.
    #[must_use]
    pub fn with_directed(mut self, axis: Vec<bool>) -> Self {
        self.directed = axis;
        self
    }

    /// Replaces the normalisation axis.
    #[must_use]
    pub fn with_normalized(mut self, axis: Vec<bool>) -> Self {
        self.normalized = axis;
        self
    }

    /// Replaces the endpoints axis.
    #[must_use]
    pub fn with_endpoints(mut self, axis: Vec<bool>) -> Self {
        self.endpoints = axis;
        self
    }

    /// Replaces the subset seed axis.
    #[must_use]
    pub fn with_subset_seeds(mut self, axis: Vec<Option<u64>>) -> Self {
        self.subset_seeds = axis;
        self
    }

    /// Replaces the subset size axis.
    #[must_use]
    pub fn with_subset_sizes(mut self, axis: Vec<Option<usize>>) -> Self {
        self.subset_sizes = axis;
        self
    }

    /// Replaces the vertex-list representation axis.
    #[must_use]
    pub fn with_vertex_lists(mut self, axis: Vec<VertexListType>) -> Self {
        self.vertex_lists = axis;
        self
    }

    /// Number of combinations; zero when any axis is empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.directed.len()
            * self.normalized.len()
            * self.endpoints.len()
            * self.subset_seeds.len()
            * self.subset_sizes.len()
            * self.vertex_lists.len()
    }

    /// Whether the matrix yields no combinations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination, with the directedness axis varying slowest.
    #[must_use]
    pub fn combinations(&self) -> Vec<ParamCombo> {
        let mut combos = Vec::with_capacity(self.len());
        for &directed in &self.directed {
            for &normalized in &self.normalized {
                for &endpoints in &self.endpoints {
                    for &seed in &self.subset_seeds {
                        for &size in &self.subset_sizes {
                            for &vertex_list in &self.vertex_lists {
                                combos.push(
                                    ParamCombo::default()
                                        .with_directed(directed)
                                        .with_normalized(normalized)
                                        .with_endpoints(endpoints)
                                        .with_subset(size, seed)
                                        .with_vertex_list(vertex_list),
                                );
                            }
                        }
                    }
                }
            }
        }
        combos
    }
}
