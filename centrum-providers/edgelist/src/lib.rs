//! Delimited edge-list provider implementing the core `Dataset` trait.
//!
//! Files hold one edge per line. Whole-file loading feeds the single-node
//! engine; chunked ingestion splits the file into newline-aligned byte blocks
//! that are parsed in parallel for the distributed engine.

mod catalog;
mod chunks;
mod dataset;
mod errors;
mod layout;
mod parse;

pub use catalog::{Catalog, CatalogEntry, DATASET_ROOT_ENV_KEY, DEFAULT_DATASET_ROOT};
pub use dataset::EdgeListDataset;
pub use errors::EdgeListError;
pub use layout::{ColumnSpec, ColumnType, EdgeListLayout};
