//! File-backed [`Dataset`] implementation.

use std::{
    borrow::Cow,
    fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use centrum_core::{Dataset, DatasetError, DistributedFrame, EdgeList};
use tracing::{debug, instrument};

use crate::{
    chunks::{parse_blocks, split_blocks},
    errors::EdgeListError,
    layout::{EdgeListLayout, ResolvedLayout},
    parse::parse_block,
};

/// A delimited edge-list file read according to an [`EdgeListLayout`].
///
/// # Examples
/// ```no_run
/// use centrum_core::Dataset;
/// use centrum_providers_edgelist::{EdgeListDataset, EdgeListLayout};
///
/// let karate = EdgeListDataset::new("karate", "datasets/karate.csv", EdgeListLayout::default())?;
/// let edges = karate.load_edges()?;
/// assert_eq!(edges.len(), 156);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct EdgeListDataset {
    name: Arc<str>,
    path: PathBuf,
    layout: EdgeListLayout,
    resolved: ResolvedLayout,
}

impl EdgeListDataset {
    /// Describes the file at `path`. The file is not opened until a load.
    ///
    /// # Errors
    /// Returns [`EdgeListError::MissingColumn`] or
    /// [`EdgeListError::NonIntegerVertex`] when `layout` is unusable.
    pub fn new(
        name: impl Into<Arc<str>>,
        path: impl Into<PathBuf>,
        layout: EdgeListLayout,
    ) -> Result<Self, EdgeListError> {
        let resolved = layout.resolve()?;
        Ok(Self {
            name: name.into(),
            path: path.into(),
            layout,
            resolved,
        })
    }

    /// Location of the edge-list file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Layout the file is parsed with.
    #[must_use]
    pub fn layout(&self) -> &EdgeListLayout {
        &self.layout
    }

    fn read(&self) -> Result<String, EdgeListError> {
        let bytes = fs::read(&self.path).map_err(|source| EdgeListError::Io {
            path: self.path.clone(),
            source,
        })?;
        String::from_utf8(bytes).map_err(|_| EdgeListError::InvalidUtf8 {
            path: self.path.clone(),
        })
    }
}

impl Dataset for EdgeListDataset {
    fn name(&self) -> &str {
        &self.name
    }

    fn identity(&self) -> Cow<'_, str> {
        let path = fs::canonicalize(&self.path).unwrap_or_else(|_| self.path.clone());
        Cow::Owned(format!("{}#{:?}", path.display(), self.layout))
    }

    fn input_size(&self) -> Result<u64, DatasetError> {
        let metadata = fs::metadata(&self.path).map_err(|source| EdgeListError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(metadata.len())
    }

    #[instrument(
        name = "provider.load",
        err,
        skip(self),
        fields(dataset = %self.name, path = %self.path.display()),
    )]
    fn load_edges(&self) -> Result<EdgeList, DatasetError> {
        let text = self.read()?;
        let edges = parse_block(&text, 1, &self.resolved)?;
        if edges.is_empty() {
            return Err(DatasetError::Empty);
        }
        debug!(edges = edges.len(), "loaded edge list");
        Ok(EdgeList::new(edges))
    }

    #[instrument(
        name = "provider.ingest",
        err,
        skip(self),
        fields(dataset = %self.name, path = %self.path.display()),
    )]
    fn ingest_chunked(&self, chunk_size: NonZeroUsize) -> Result<DistributedFrame, DatasetError> {
        let text = self.read()?;
        let blocks = split_blocks(&text, chunk_size);
        let frame = DistributedFrame::from_chunks(parse_blocks(&text, &blocks, &self.resolved)?);
        if frame.edge_count() == 0 {
            return Err(DatasetError::Empty);
        }
        debug!(
            chunks = frame.chunk_count(),
            edges = frame.edge_count(),
            "ingested edge list"
        );
        Ok(frame)
    }
}
