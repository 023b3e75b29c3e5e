//! Support library for the centrum CLI binary.
//!
//! Re-exports the CLI and logging modules so doctests and tests can exercise
//! the command pipeline without forking a subprocess.

pub mod cli;
pub mod logging;
