//! Registry of known datasets and where they live on disk.

use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{dataset::EdgeListDataset, errors::EdgeListError, layout::EdgeListLayout};

/// Environment variable overriding the dataset directory.
pub const DATASET_ROOT_ENV_KEY: &str = "CENTRUM_DATASET_ROOT";

/// Dataset directory used when [`DATASET_ROOT_ENV_KEY`] is unset.
pub const DEFAULT_DATASET_ROOT: &str = "datasets";

/// Metadata for one catalogued dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    name: Arc<str>,
    file: PathBuf,
    vertex_count: usize,
    line_count: usize,
    layout: EdgeListLayout,
}

impl CatalogEntry {
    /// Describes `file`, relative to the catalog root, with its expected
    /// vertex and record counts.
    #[must_use]
    pub fn new(
        name: impl Into<Arc<str>>,
        file: impl Into<PathBuf>,
        vertex_count: usize,
        line_count: usize,
        layout: EdgeListLayout,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            vertex_count,
            line_count,
            layout,
        }
    }

    /// Zachary's karate club: 34 vertices, every undirected edge stored in
    /// both directions.
    #[must_use]
    pub fn karate() -> Self {
        Self::new("karate", "karate.csv", 34, 156, EdgeListLayout::default())
    }

    /// Lusseau's bottlenose dolphin network: 62 vertices and 159 undirected
    /// edges, each stored in both directions.
    #[must_use]
    pub fn dolphins() -> Self {
        Self::new("dolphins", "dolphins.csv", 62, 318, EdgeListLayout::default())
    }

    /// Catalog name of the dataset.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// File name relative to the catalog root.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Number of distinct vertices in the file.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Number of edge records in the file.
    #[must_use]
    pub const fn line_count(&self) -> usize {
        self.line_count
    }

    /// Layout the file is parsed with.
    #[must_use]
    pub fn layout(&self) -> &EdgeListLayout {
        &self.layout
    }
}

/// Datasets available under a root directory.
///
/// # Examples
/// ```
/// use centrum_providers_edgelist::Catalog;
///
/// let catalog = Catalog::builtin("datasets");
/// let karate = catalog.get("karate")?;
/// assert_eq!(karate.vertex_count(), 34);
/// assert_eq!(catalog.get("dolphins")?.vertex_count(), 62);
/// assert!(catalog.get("netscience").is_err());
/// # Ok::<(), centrum_providers_edgelist::EdgeListError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Catalog {
    root: PathBuf,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    /// Creates an empty catalog rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: Vec::new(),
        }
    }

    /// Creates a catalog rooted at `root` holding the built-in datasets.
    #[must_use]
    pub fn builtin(root: impl Into<PathBuf>) -> Self {
        Self::new(root)
            .with_entry(CatalogEntry::karate())
            .with_entry(CatalogEntry::dolphins())
    }

    /// Built-in catalog rooted at `CENTRUM_DATASET_ROOT`, or `datasets`.
    #[must_use]
    pub fn from_env() -> Self {
        let root = env::var_os(DATASET_ROOT_ENV_KEY)
            .map_or_else(|| PathBuf::from(DEFAULT_DATASET_ROOT), PathBuf::from);
        Self::builtin(root)
    }

    /// Adds `entry`, replacing any entry of the same name.
    #[must_use]
    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.entries.retain(|existing| existing.name != entry.name);
        self.entries.push(entry);
        self
    }

    /// Directory entry files are resolved against.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Looks up an entry by name.
    ///
    /// # Errors
    /// Returns [`EdgeListError::UnknownDataset`] for names not in the catalog.
    pub fn get(&self, name: &str) -> Result<&CatalogEntry, EdgeListError> {
        self.entries
            .iter()
            .find(|entry| &*entry.name == name)
            .ok_or_else(|| EdgeListError::UnknownDataset {
                name: name.to_owned(),
            })
    }

    /// Opens the named dataset.
    ///
    /// # Errors
    /// Returns [`EdgeListError::UnknownDataset`] for names not in the catalog
    /// and layout errors from [`EdgeListDataset::new`].
    pub fn dataset(&self, name: &str) -> Result<EdgeListDataset, EdgeListError> {
        let entry = self.get(name)?;
        EdgeListDataset::new(
            Arc::clone(&entry.name),
            self.root.join(&entry.file),
            entry.layout.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn builtin_catalog_lists_shipped_datasets() {
        let catalog = Catalog::builtin("/data");
        let names: Vec<&str> = catalog.entries().iter().map(CatalogEntry::name).collect();
        assert_eq!(names, vec!["karate", "dolphins"]);
        let dataset = catalog.dataset("karate").expect("karate is catalogued");
        assert_eq!(dataset.path(), Path::new("/data/karate.csv"));
        let dataset = catalog.dataset("dolphins").expect("dolphins is catalogued");
        assert_eq!(dataset.path(), Path::new("/data/dolphins.csv"));
    }

    #[rstest]
    fn entries_replace_by_name() {
        let catalog = Catalog::builtin("data").with_entry(CatalogEntry::new(
            "karate",
            "karate-renamed.csv",
            34,
            156,
            EdgeListLayout::default(),
        ));
        assert_eq!(catalog.entries().len(), 2);
        let entry = catalog.get("karate").expect("present");
        assert_eq!(entry.file(), Path::new("karate-renamed.csv"));
    }

    #[rstest]
    fn unknown_names_are_rejected() {
        let err = Catalog::builtin("data")
            .dataset("netscience")
            .expect_err("netscience is not shipped");
        assert!(matches!(err, EdgeListError::UnknownDataset { name } if name == "netscience"));
    }
}
