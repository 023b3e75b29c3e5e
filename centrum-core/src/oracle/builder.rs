//! Builder for [`EquivalenceOracle`].

use std::num::NonZeroUsize;

use crate::{
    distributed::default_workers,
    engine::{ClusterEngine, DistributedEngine, ReferenceEngine, SingleNodeEngine},
    error::{OracleError, Result},
};

use super::{EquivalenceOracle, cache::ReferenceCache, compare::Tolerance};

/// Configures and constructs [`EquivalenceOracle`] instances.
///
/// # Examples
/// ```
/// use centrum_core::OracleBuilder;
/// use std::num::NonZeroUsize;
///
/// let oracle = OracleBuilder::new()
///     .with_workers(NonZeroUsize::new(3).expect("non-zero"))
///     .with_tolerance(1e-6, 1e-9)
///     .build()?;
/// assert_eq!(oracle.tolerance().rtol(), 1e-6);
/// assert_eq!(oracle.workers().get(), 3);
/// # Ok::<(), centrum_core::OracleError>(())
/// ```
#[derive(Clone, Debug)]
pub struct OracleBuilder {
    workers: Option<NonZeroUsize>,
    rtol: f64,
    atol: f64,
    chunk_size: Option<NonZeroUsize>,
    store_transposed: bool,
}

impl Default for OracleBuilder {
    fn default() -> Self {
        Self {
            workers: None,
            rtol: Tolerance::DEFAULT_RTOL,
            atol: Tolerance::DEFAULT_ATOL,
            chunk_size: None,
            store_transposed: true,
        }
    }
}

impl OracleBuilder {
    /// Creates a builder with default tolerances, auto-sized chunks, and the
    /// transposed adjacency enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the worker count of the in-process cluster. Defaults to
    /// `CENTRUM_WORKERS` or two.
    #[must_use]
    pub const fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the closeness tolerances; validated by [`OracleBuilder::build`].
    #[must_use]
    pub const fn with_tolerance(mut self, rtol: f64, atol: f64) -> Self {
        self.rtol = rtol;
        self.atol = atol;
        self
    }

    /// Overrides the ingestion chunk size. `None` splits the input evenly
    /// across workers.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: Option<NonZeroUsize>) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Sets whether distributed graphs store their transposed adjacency.
    #[must_use]
    pub const fn with_store_transposed(mut self, store_transposed: bool) -> Self {
        self.store_transposed = store_transposed;
        self
    }

    /// Validates the configuration and starts the in-process engines.
    ///
    /// # Errors
    /// Returns [`OracleError::InvalidTolerance`] for negative or non-finite
    /// tolerances and [`OracleError::Cluster`] when the worker pool cannot
    /// start.
    pub fn build(self) -> Result<EquivalenceOracle> {
        let tolerance = Tolerance::new(self.rtol, self.atol)?;
        let workers = self.workers.unwrap_or_else(default_workers);
        let cluster =
            ClusterEngine::with_workers(workers).map_err(|error| OracleError::Cluster { error })?;
        Ok(self.assemble(tolerance, SingleNodeEngine, cluster))
    }

    /// Validates the configuration and wraps caller-supplied engines. The
    /// worker count is taken from `distributed`.
    ///
    /// # Errors
    /// Returns [`OracleError::InvalidTolerance`] for negative or non-finite
    /// tolerances.
    pub fn build_with<R, D>(self, reference: R, distributed: D) -> Result<EquivalenceOracle<R, D>>
    where
        R: ReferenceEngine,
        D: DistributedEngine,
    {
        let tolerance = Tolerance::new(self.rtol, self.atol)?;
        Ok(self.assemble(tolerance, reference, distributed))
    }

    fn assemble<R, D>(
        self,
        tolerance: Tolerance,
        reference: R,
        distributed: D,
    ) -> EquivalenceOracle<R, D> {
        EquivalenceOracle {
            reference,
            distributed,
            tolerance,
            chunk_size: self.chunk_size,
            store_transposed: self.store_transposed,
            cache: ReferenceCache::new(),
        }
    }
}
