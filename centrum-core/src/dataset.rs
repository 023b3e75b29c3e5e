//! Dataset abstractions consumed by the oracle.
//!
//! A dataset is loaded twice per test case: once whole for the single-node
//! engine and once in chunks for the distributed engine. Implementations live
//! in provider crates.

use std::{borrow::Cow, num::NonZeroUsize};

use crate::{
    error::DatasetError,
    graph::{Edge, EdgeList},
};

/// One ingested block of a dataset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeChunk {
    index: usize,
    edges: Vec<Edge>,
}

impl EdgeChunk {
    /// Creates a chunk with its position in the dataset.
    #[must_use]
    pub const fn new(index: usize, edges: Vec<Edge>) -> Self {
        Self { index, edges }
    }

    /// Position of the chunk within its frame.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Edges held by the chunk, in input order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// An edge list split into ordered chunks, as produced by chunked ingestion.
///
/// # Examples
/// ```
/// use centrum_core::{DistributedFrame, Edge, EdgeChunk};
///
/// let frame = DistributedFrame::from_chunks(vec![
///     EdgeChunk::new(1, vec![Edge::unweighted(2, 3)]),
///     EdgeChunk::new(0, vec![Edge::unweighted(1, 2)]),
/// ]);
/// assert_eq!(frame.chunk_count(), 2);
/// assert_eq!(frame.edge_count(), 2);
/// assert_eq!(frame.chunks()[0].index(), 0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistributedFrame {
    chunks: Vec<EdgeChunk>,
}

impl DistributedFrame {
    /// Builds a frame, ordering chunks by index.
    #[must_use]
    pub fn from_chunks(mut chunks: Vec<EdgeChunk>) -> Self {
        chunks.sort_by_key(EdgeChunk::index);
        Self { chunks }
    }

    /// Returns the chunks in index order.
    #[must_use]
    pub fn chunks(&self) -> &[EdgeChunk] {
        &self.chunks
    }

    /// Returns the number of chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Returns the total number of edges across chunks.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.chunks.iter().map(|chunk| chunk.edges.len()).sum()
    }

    /// Concatenates the chunks back into a single edge list.
    #[must_use]
    pub fn to_edge_list(&self) -> EdgeList {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.edges.iter().copied())
            .collect()
    }
}

/// Source of graph edges for both computation paths.
pub trait Dataset {
    /// Human-readable dataset name, used in logs, reports, and for
    /// invalidating memoised runs.
    fn name(&self) -> &str;

    /// Identity of the input behind the dataset. The reference memo table
    /// is keyed on it, so two datasets with equal identities must yield the
    /// same edges; names alone may collide.
    fn identity(&self) -> Cow<'_, str>;

    /// Size of the input in the units [`Dataset::ingest_chunked`] splits on
    /// (bytes for file-backed datasets).
    ///
    /// # Errors
    /// Returns [`DatasetError`] when the size cannot be determined.
    fn input_size(&self) -> Result<u64, DatasetError>;

    /// Loads the whole dataset for the single-node engine.
    ///
    /// # Errors
    /// Returns [`DatasetError`] when the data cannot be read or parsed.
    fn load_edges(&self) -> Result<EdgeList, DatasetError>;

    /// Loads the dataset in blocks of roughly `chunk_size` input units.
    ///
    /// # Errors
    /// Returns [`DatasetError`] when the data cannot be read or parsed.
    fn ingest_chunked(&self, chunk_size: NonZeroUsize) -> Result<DistributedFrame, DatasetError>;
}

/// Auto chunk size: the input split evenly across workers, rounded up.
///
/// # Examples
/// ```
/// use centrum_core::chunk_size_for;
/// use std::{borrow::Cow, num::NonZeroUsize};
///
/// let workers = NonZeroUsize::new(4).expect("non-zero");
/// assert_eq!(chunk_size_for(10, workers).get(), 3);
/// assert_eq!(chunk_size_for(0, workers).get(), 1);
/// ```
#[must_use]
pub fn chunk_size_for(input_size: u64, workers: NonZeroUsize) -> NonZeroUsize {
    let per_worker = input_size.div_ceil(workers.get() as u64);
    let size = usize::try_from(per_worker).unwrap_or(usize::MAX);
    NonZeroUsize::new(size).unwrap_or(NonZeroUsize::MIN)
}
