//! Representations of the source-vertex subset `k` handed to both engines.
//!
//! A sampled subset can travel as a plain list, as a single-column frame, or
//! as a bare count. Conversion from a drawn sample into each representation is
//! explicit, one function per variant, so neither engine branches on how the
//! caller happened to store the ids.

use std::{fmt, sync::Arc};

use crate::{error::GraphError, graph::VertexId, renumber::RenumberMap, sampling};

/// Columnar vertex list: one named `u32` column.
///
/// # Examples
/// ```
/// use centrum_core::{VertexFrame, VertexId};
///
/// let frame = VertexFrame::from_vertices(&[VertexId::new(3), VertexId::new(1)]);
/// assert_eq!(frame.column(), "vertex");
/// assert_eq!(frame.values(), &[3, 1]);
/// assert_eq!(frame.to_vertices(), vec![VertexId::new(3), VertexId::new(1)]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VertexFrame {
    column: Arc<str>,
    values: Vec<u32>,
}

impl VertexFrame {
    /// Column name used by [`VertexFrame::from_vertices`].
    pub const VERTEX_COLUMN: &'static str = "vertex";

    /// Builds a frame holding `vertices` in the default `vertex` column.
    #[must_use]
    pub fn from_vertices(vertices: &[VertexId]) -> Self {
        Self {
            column: Arc::from(Self::VERTEX_COLUMN),
            values: vertices.iter().map(|vertex| vertex.get()).collect(),
        }
    }

    /// Returns the column name.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Returns the raw column values.
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether the frame has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Materialises the column as vertex ids.
    #[must_use]
    pub fn to_vertices(&self) -> Vec<VertexId> {
        self.values.iter().copied().map(VertexId::new).collect()
    }
}

/// The `k` argument of a betweenness computation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum VertexSubset {
    /// Every vertex is a source.
    All,
    /// Explicit sources held as a plain sequence.
    List(Vec<VertexId>),
    /// Explicit sources held as a columnar frame.
    Frame(VertexFrame),
    /// Number of sources the engine samples on its own. A count at least as
    /// large as the vertex count selects every vertex.
    Count(usize),
}

impl VertexSubset {
    /// Returns the explicit source ids carried by `List` and `Frame`.
    #[must_use]
    pub fn explicit_vertices(&self) -> Option<Vec<VertexId>> {
        match self {
            Self::List(vertices) => Some(vertices.clone()),
            Self::Frame(frame) => Some(frame.to_vertices()),
            Self::All | Self::Count(_) => None,
        }
    }

    /// Returns whether the subset covers all `vertex_count` vertices.
    #[must_use]
    pub const fn is_exhaustive(&self, vertex_count: usize) -> bool {
        match self {
            Self::All => true,
            Self::Count(count) => *count >= vertex_count,
            Self::List(_) | Self::Frame(_) => false,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::List(_) => "list",
            Self::Frame(_) => "frame",
            Self::Count(_) => "count",
        }
    }
}

impl fmt::Display for VertexSubset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::List(vertices) => write!(f, "list[{}]", vertices.len()),
            Self::Frame(frame) => write!(f, "frame[{}]", frame.len()),
            Self::Count(count) => write!(f, "count({count})"),
        }
    }
}

/// Representation requested for a sampled vertex subset.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum VertexListType {
    /// Plain sequence of ids.
    #[default]
    List,
    /// Single-column frame of ids.
    Frame,
    /// A bare count instead of explicit ids.
    Count,
}

impl VertexListType {
    /// Converts a drawn sample into the requested representation.
    ///
    /// `Count` discards the sample and selects all `vertex_count` vertices:
    /// engines sample a bare count independently, so forcing exhaustive
    /// evaluation is the only way both sides see the same sources.
    ///
    /// # Examples
    /// ```
    /// use centrum_core::{VertexId, VertexListType, VertexSubset};
    ///
    /// let sample = vec![VertexId::new(4), VertexId::new(2)];
    /// assert_eq!(
    ///     VertexListType::List.represent(sample.clone(), 10),
    ///     VertexSubset::List(sample.clone()),
    /// );
    /// assert_eq!(VertexListType::Count.represent(sample, 10), VertexSubset::Count(10));
    /// ```
    #[must_use]
    pub fn represent(self, sample: Vec<VertexId>, vertex_count: usize) -> VertexSubset {
        match self {
            Self::List => as_list(sample),
            Self::Frame => as_frame(&sample),
            Self::Count => as_full_count(vertex_count),
        }
    }

    /// Short label used in logs and CLI arguments.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Frame => "frame",
            Self::Count => "count",
        }
    }
}

impl fmt::Display for VertexListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn as_list(sample: Vec<VertexId>) -> VertexSubset {
    VertexSubset::List(sample)
}

fn as_frame(sample: &[VertexId]) -> VertexSubset {
    VertexSubset::Frame(VertexFrame::from_vertices(sample))
}

const fn as_full_count(vertex_count: usize) -> VertexSubset {
    VertexSubset::Count(vertex_count)
}

/// Source vertices resolved to dense indices.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Sources {
    pub(crate) dense: Vec<usize>,
    /// Whether the sources are a strict sample, which rescales scores by
    /// `n / k`.
    pub(crate) sampled: bool,
}

/// Resolves `subset` against a renumbered vertex set.
///
/// `Count` below the vertex count draws an engine-internal sample seeded by
/// `seed`.
pub(crate) fn resolve_sources(
    subset: &VertexSubset,
    renumber: &RenumberMap,
    seed: Option<u64>,
) -> Result<Sources, GraphError> {
    let vertex_count = renumber.len();
    let (dense, sampled) = match subset {
        VertexSubset::All => ((0..vertex_count).collect(), false),
        VertexSubset::Count(count) if *count >= vertex_count => {
            ((0..vertex_count).collect(), false)
        }
        VertexSubset::Count(count) => (sampling::sample_indices(vertex_count, *count, seed)?, true),
        VertexSubset::List(vertices) => (dense_ids(vertices, renumber)?, true),
        VertexSubset::Frame(frame) => (dense_ids(&frame.to_vertices(), renumber)?, true),
    };
    if dense.is_empty() {
        return Err(GraphError::EmptySubset);
    }
    Ok(Sources { dense, sampled })
}

fn dense_ids(vertices: &[VertexId], renumber: &RenumberMap) -> Result<Vec<usize>, GraphError> {
    vertices
        .iter()
        .map(|&vertex| {
            renumber
                .dense(vertex)
                .ok_or(GraphError::UnknownVertex { vertex })
        })
        .collect()
}
