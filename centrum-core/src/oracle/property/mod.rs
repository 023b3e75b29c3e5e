//! Property-based tests for the equivalence oracle.
//!
//! Generates random graphs across several topologies and checks that the
//! distributed engine agrees with the single-node engine for arbitrary
//! parameter combinations, worker counts, and chunk sizes, and that repeated
//! runs are deterministic.

mod determinism;
mod equivalence;
mod strategies;
mod types;
