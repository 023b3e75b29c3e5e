//! Centrum core library: single-node and distributed betweenness centrality
//! and the oracle that checks them against each other.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod centrality;
mod csr;
mod dataset;
mod distributed;
mod engine;
mod error;
mod graph;
mod oracle;
mod renumber;
mod result;
mod sampling;
mod subset;
#[cfg(test)]
mod test_utils;

pub use crate::{
    centrality::{CentralityParams, betweenness_centrality},
    dataset::{Dataset, DistributedFrame, EdgeChunk, chunk_size_for},
    distributed::{
        Cluster, DEFAULT_WORKERS, DistributedGraph, DistributedResultFuture, GraphOptions,
        WORKERS_ENV_KEY, default_workers,
    },
    engine::{
        ClusterEngine, DistributedEngine, PendingResult, ReferenceEngine, SingleNodeEngine,
    },
    error::{
        DatasetError, DatasetErrorCode, DistributedError, DistributedErrorCode, GraphError,
        GraphErrorCode, OracleError, OracleErrorCode, Result,
    },
    graph::{Edge, EdgeList, Graph, VertexId},
    oracle::{
        CaseOutcome, ComparisonReport, EquivalenceOracle, MAX_REPORTED, MatrixReport, Mismatch,
        OracleBuilder, ParamCombo, ParamMatrix, ReferenceCache, ReferenceRun, Tolerance,
        compare_tables,
    },
    result::ResultTable,
    sampling::select_random_vertices,
    subset::{VertexFrame, VertexListType, VertexSubset},
};
