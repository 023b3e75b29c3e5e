//! Command-line interface for the equivalence oracle.
//!
//! `validate` checks one parameter combination against an edge-list file;
//! `matrix` runs the default parameter matrix.

mod commands;

pub use commands::{
    Cli, CliError, Command, DatasetArgs, ExecutionSummary, MatrixCommand, ValidateCommand,
    VertexListArg, render_summary, run_cli,
};
