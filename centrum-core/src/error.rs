//! Error types for the centrum core library.
//!
//! Each enum mirrors one failure domain of the harness: loading a dataset,
//! building or traversing a single-node graph, running the distributed
//! engine, and the oracle's own verdicts. Every enum exposes a stable code for
//! logs and exit-status mapping.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{graph::VertexId, oracle::ComparisonReport};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident
                    $( { $($fields:tt)* } )?
                    $( ( $($tuple:tt)* ) )?
                    => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(
                        Self::$ErrVariant $( { $($fields)* } )? $( ( $($tuple)* ) )?
                            => $CodeTy::$CodeVariant,
                    )+
                }
            }
        }
    };
}

/// An error produced while reading a [`crate::Dataset`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DatasetError {
    /// The backing storage could not be read.
    #[error("failed to read `{path}`: {message}")]
    Io {
        /// Location that failed to load.
        path: Arc<str>,
        /// Rendered operating system error.
        message: Arc<str>,
    },
    /// A record could not be split into the expected columns.
    #[error("line {line}: {reason}")]
    Malformed {
        /// One-based line number of the offending record.
        line: usize,
        /// Why the record was rejected.
        reason: Arc<str>,
    },
    /// A field did not parse as its declared column type.
    #[error("line {line}: column `{column}` has invalid value `{value}`")]
    InvalidValue {
        /// One-based line number of the offending record.
        line: usize,
        /// Column whose value was rejected.
        column: Arc<str>,
        /// Raw field text.
        value: Arc<str>,
    },
    /// The column layout cannot describe an edge list.
    #[error("invalid edge-list layout: {reason}")]
    InvalidLayout {
        /// Why the layout was rejected.
        reason: Arc<str>,
    },
    /// The dataset contained no edges.
    #[error("dataset contains no edges")]
    Empty,
}

define_error_codes! {
    /// Stable codes describing [`DatasetError`] variants.
    enum DatasetErrorCode for DatasetError {
        /// The backing storage could not be read.
        Io => Io { .. } => "DATASET_IO",
        /// A record could not be split into the expected columns.
        Malformed => Malformed { .. } => "DATASET_MALFORMED",
        /// A field did not parse as its declared column type.
        InvalidValue => InvalidValue { .. } => "DATASET_INVALID_VALUE",
        /// The column layout cannot describe an edge list.
        InvalidLayout => InvalidLayout { .. } => "DATASET_INVALID_LAYOUT",
        /// The dataset contained no edges.
        Empty => Empty => "DATASET_EMPTY",
    }
}

/// An error produced by graph construction, sampling, or the single-node
/// centrality engine.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum GraphError {
    /// A graph cannot be built from an empty edge list.
    #[error("cannot build a graph from an empty edge list")]
    EmptyGraph,
    /// A requested vertex is not part of the graph.
    #[error("vertex {vertex} is not present in the graph")]
    UnknownVertex {
        /// Vertex id that failed to resolve.
        vertex: VertexId,
    },
    /// A sample asked for more vertices than the graph holds.
    #[error("cannot sample {requested} vertices from a graph with {available}")]
    SampleTooLarge {
        /// Number of vertices requested.
        requested: usize,
        /// Number of vertices present.
        available: usize,
    },
    /// A vertex subset selected no sources.
    #[error("vertex subset selects no source vertices")]
    EmptySubset,
}

define_error_codes! {
    /// Stable codes describing [`GraphError`] variants.
    enum GraphErrorCode for GraphError {
        /// A graph cannot be built from an empty edge list.
        EmptyGraph => EmptyGraph => "GRAPH_EMPTY",
        /// A requested vertex is not part of the graph.
        UnknownVertex => UnknownVertex { .. } => "GRAPH_UNKNOWN_VERTEX",
        /// A sample asked for more vertices than the graph holds.
        SampleTooLarge => SampleTooLarge { .. } => "GRAPH_SAMPLE_TOO_LARGE",
        /// A vertex subset selected no sources.
        EmptySubset => EmptySubset => "GRAPH_EMPTY_SUBSET",
    }
}

/// An error produced by the distributed engine.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DistributedError {
    /// The worker pool could not be created.
    #[error("failed to start worker pool: {message}")]
    PoolBuild {
        /// Rendered pool construction failure.
        message: Arc<str>,
    },
    /// Distributed graphs must be renumbered before partitioning.
    #[error("distributed graphs require renumbering to be enabled")]
    RenumberRequired,
    /// A worker stopped before reporting its partial result.
    #[error("worker pool lost contact after {received} of {expected} partial results")]
    WorkerLost {
        /// Number of partial results received before the failure.
        received: usize,
        /// Number of partial results the computation waited for.
        expected: usize,
    },
    /// Graph-level validation failed on the distributed path.
    #[error("distributed graph operation failed: {0}")]
    Graph(#[from] GraphError),
}

define_error_codes! {
    /// Stable codes describing [`DistributedError`] variants.
    enum DistributedErrorCode for DistributedError {
        /// The worker pool could not be created.
        PoolBuild => PoolBuild { .. } => "DISTRIBUTED_POOL_BUILD",
        /// Distributed graphs must be renumbered before partitioning.
        RenumberRequired => RenumberRequired => "DISTRIBUTED_RENUMBER_REQUIRED",
        /// A worker stopped before reporting its partial result.
        WorkerLost => WorkerLost { .. } => "DISTRIBUTED_WORKER_LOST",
        /// Graph-level validation failed on the distributed path.
        Graph => Graph(..) => "DISTRIBUTED_GRAPH",
    }
}

/// Error type produced when configuring or running the
/// [`crate::EquivalenceOracle`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum OracleError {
    /// Tolerances must be finite and non-negative.
    #[error("tolerance must be finite and non-negative (rtol={rtol}, atol={atol})")]
    InvalidTolerance {
        /// Relative tolerance supplied by the caller.
        rtol: f64,
        /// Absolute tolerance supplied by the caller.
        atol: f64,
    },
    /// The distributed engine could not be started.
    #[error("failed to start the distributed engine: {error}")]
    Cluster {
        #[source]
        /// Underlying pool error.
        error: DistributedError,
    },
    /// The dataset failed to load on either path.
    #[error("dataset `{dataset}` failed to load: {error}")]
    Dataset {
        /// Dataset that failed.
        dataset: Arc<str>,
        #[source]
        /// Underlying loader error.
        error: DatasetError,
    },
    /// The single-node reference computation failed.
    #[error("reference computation on `{dataset}` failed: {error}")]
    Reference {
        /// Dataset under validation.
        dataset: Arc<str>,
        #[source]
        /// Underlying graph engine error.
        error: GraphError,
    },
    /// The distributed computation failed.
    #[error("distributed computation on `{dataset}` failed: {error}")]
    Distributed {
        /// Dataset under validation.
        dataset: Arc<str>,
        #[source]
        /// Underlying distributed engine error.
        error: DistributedError,
    },
    /// The two result tables cover different vertex sets.
    #[error(
        "result tables disagree on vertex set: reference has {reference} rows, distributed has {distributed} (missing {missing:?}, extra {extra:?})"
    )]
    ShapeMismatch {
        /// Row count of the reference table.
        reference: usize,
        /// Row count of the distributed table.
        distributed: usize,
        /// Vertices present in the reference table only (truncated).
        missing: Vec<VertexId>,
        /// Vertices present in the distributed table only (truncated).
        extra: Vec<VertexId>,
    },
    /// At least one score pair failed the closeness test.
    #[error("{report}")]
    ToleranceViolation {
        /// Comparison details including both values for each mismatch.
        report: ComparisonReport,
    },
}

define_error_codes! {
    /// Stable codes describing [`OracleError`] variants.
    enum OracleErrorCode for OracleError {
        /// Tolerances must be finite and non-negative.
        InvalidTolerance => InvalidTolerance { .. } => "ORACLE_INVALID_TOLERANCE",
        /// The distributed engine could not be started.
        ClusterStart => Cluster { .. } => "ORACLE_CLUSTER_START",
        /// The dataset failed to load on either path.
        DatasetFailure => Dataset { .. } => "ORACLE_DATASET_FAILURE",
        /// The single-node reference computation failed.
        ReferenceFailure => Reference { .. } => "ORACLE_REFERENCE_FAILURE",
        /// The distributed computation failed.
        DistributedFailure => Distributed { .. } => "ORACLE_DISTRIBUTED_FAILURE",
        /// The two result tables cover different vertex sets.
        ShapeMismatch => ShapeMismatch { .. } => "ORACLE_SHAPE_MISMATCH",
        /// At least one score pair failed the closeness test.
        ToleranceViolation => ToleranceViolation { .. } => "ORACLE_TOLERANCE_VIOLATION",
    }
}

impl OracleError {
    /// Returns `true` when the error is an equivalence verdict rather than an
    /// execution failure.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::ShapeMismatch { .. } | Self::ToleranceViolation { .. }
        )
    }
}

/// Convenient alias for results returned by the oracle.
pub type Result<T> = core::result::Result<T, OracleError>;
