//! Simulated distributed engine.
//!
//! A [`Cluster`] owns a dedicated worker pool. Graphs are ingested from a
//! chunked [`crate::DistributedFrame`], renumbered, and partitioned by
//! contiguous vertex ranges. Betweenness sources are dealt round-robin to the
//! workers, each of which reports a partial score vector; the reduction
//! happens when the caller computes the returned future.

mod future;
mod graph;

use std::{env, num::NonZeroUsize, sync::Arc};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, error, warn};

use crate::error::DistributedError;

pub use self::{
    future::DistributedResultFuture,
    graph::{DistributedGraph, GraphOptions},
};

/// Environment variable overriding the default worker count.
pub const WORKERS_ENV_KEY: &str = "CENTRUM_WORKERS";

/// Worker count used when neither the caller nor the environment picks one.
pub const DEFAULT_WORKERS: NonZeroUsize = NonZeroUsize::MIN.saturating_add(1);

/// Returns the worker count from [`WORKERS_ENV_KEY`], or
/// [`DEFAULT_WORKERS`] when unset or invalid.
#[must_use]
pub fn default_workers() -> NonZeroUsize {
    let Ok(raw) = env::var(WORKERS_ENV_KEY) else {
        return DEFAULT_WORKERS;
    };
    raw.trim().parse::<NonZeroUsize>().unwrap_or_else(|_| {
        warn!(
            env = WORKERS_ENV_KEY,
            raw = %raw,
            default = DEFAULT_WORKERS.get(),
            "invalid worker count override; using default",
        );
        DEFAULT_WORKERS
    })
}

/// A pool of worker threads standing in for a multi-node cluster.
///
/// Cloning a cluster shares the same pool.
///
/// # Examples
/// ```
/// use centrum_core::Cluster;
/// use std::num::NonZeroUsize;
///
/// let cluster = Cluster::new(NonZeroUsize::new(3).expect("non-zero"))?;
/// assert_eq!(cluster.workers().get(), 3);
/// # Ok::<(), centrum_core::DistributedError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Cluster {
    pool: Arc<ThreadPool>,
    workers: NonZeroUsize,
}

impl Cluster {
    /// Starts a pool with `workers` threads named `centrum-worker-{i}`.
    ///
    /// A panicking job is logged and its worker keeps serving; the job's
    /// result channel closes, which the waiting future reports as a lost
    /// worker.
    ///
    /// # Errors
    /// Returns [`DistributedError::PoolBuild`] when the threads cannot be
    /// spawned.
    pub fn new(workers: NonZeroUsize) -> Result<Self, DistributedError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers.get())
            .thread_name(|index| format!("centrum-worker-{index}"))
            .panic_handler(|_| error!("distributed worker job panicked"))
            .build()
            .map_err(|err| DistributedError::PoolBuild {
                message: Arc::from(err.to_string()),
            })?;
        debug!(workers = workers.get(), "started worker pool");
        Ok(Self {
            pool: Arc::new(pool),
            workers,
        })
    }

    /// Starts a pool sized by [`default_workers`].
    ///
    /// # Errors
    /// Returns [`DistributedError::PoolBuild`] when the threads cannot be
    /// spawned.
    pub fn from_env() -> Result<Self, DistributedError> {
        Self::new(default_workers())
    }

    /// Number of workers in the pool.
    #[must_use]
    pub const fn workers(&self) -> NonZeroUsize {
        self.workers
    }

    /// Runs `op` inside the pool so rayon parallel iterators use its threads.
    pub(crate) fn install<R: Send>(&self, op: impl FnOnce() -> R + Send) -> R {
        self.pool.install(op)
    }

    /// Queues a detached job on the pool.
    pub(crate) fn spawn(&self, job: impl FnOnce() + Send + 'static) {
        self.pool.spawn(job);
    }
}
