//! Memo table of reference results.
//!
//! Every parameter combination of a dataset needs its own reference run, and
//! repeated validations of the same combination reuse it. Entries are
//! immutable once inserted and are only removed by explicit invalidation.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::trace;

use crate::{error::Result, result::ResultTable, subset::VertexSubset};

use super::params::ParamCombo;

/// A reference computation: the subset it used and its sorted table.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceRun {
    subset: VertexSubset,
    table: ResultTable,
    vertex_count: usize,
}

impl ReferenceRun {
    pub(crate) fn new(subset: VertexSubset, table: ResultTable, vertex_count: usize) -> Self {
        Self {
            subset,
            table: table.sorted_by_vertex(),
            vertex_count,
        }
    }

    /// The resolved source subset, handed unchanged to the distributed run.
    #[must_use]
    pub const fn subset(&self) -> &VertexSubset {
        &self.subset
    }

    /// Scores sorted by vertex id.
    #[must_use]
    pub const fn table(&self) -> &ResultTable {
        &self.table
    }

    /// Vertex count of the single-node graph.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
struct CacheKey {
    dataset: Arc<str>,
    identity: Arc<str>,
    params: ParamCombo,
}

impl CacheKey {
    fn new(dataset: &str, identity: &str, params: &ParamCombo) -> Self {
        Self {
            dataset: Arc::from(dataset),
            identity: Arc::from(identity),
            params: *params,
        }
    }
}

/// Concurrent memo table keyed by dataset identity and [`ParamCombo`].
///
/// The dataset name is stored alongside so every run of a dataset can be
/// invalidated at once.
#[derive(Debug, Default)]
pub struct ReferenceCache {
    entries: DashMap<CacheKey, Arc<ReferenceRun>>,
}

impl ReferenceCache {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached run, if any.
    #[must_use]
    pub fn get(
        &self,
        dataset: &str,
        identity: &str,
        params: &ParamCombo,
    ) -> Option<Arc<ReferenceRun>> {
        let key = CacheKey::new(dataset, identity, params);
        self.entries.get(&key).map(|entry| Arc::clone(entry.value()))
    }

    /// Returns the cached run or computes and stores it.
    ///
    /// `compute` runs without holding any lock. If two callers race on the
    /// same key, the first insertion wins and both receive it.
    ///
    /// # Errors
    /// Propagates the error returned by `compute`; nothing is cached then.
    pub fn get_or_try_insert(
        &self,
        dataset: &str,
        identity: &str,
        params: &ParamCombo,
        compute: impl FnOnce() -> Result<ReferenceRun>,
    ) -> Result<Arc<ReferenceRun>> {
        let key = CacheKey::new(dataset, identity, params);
        if let Some(hit) = self.entries.get(&key) {
            record_hit();
            trace!(dataset, %params, "reference cache hit");
            return Ok(Arc::clone(hit.value()));
        }
        record_miss();
        let run = Arc::new(compute()?);
        let stored = self.entries.entry(key).or_insert(run);
        Ok(Arc::clone(stored.value()))
    }

    /// Drops every entry named `dataset`, whatever its identity, returning
    /// how many were removed.
    pub fn invalidate(&self, dataset: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|key, _| &*key.dataset != dataset);
        before.saturating_sub(self.entries.len())
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached runs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(feature = "metrics")]
fn record_hit() {
    metrics::counter!("reference_cache_hits").increment(1);
}

#[cfg(not(feature = "metrics"))]
const fn record_hit() {}

#[cfg(feature = "metrics")]
fn record_miss() {
    metrics::counter!("reference_cache_misses").increment(1);
}

#[cfg(not(feature = "metrics"))]
const fn record_miss() {}
