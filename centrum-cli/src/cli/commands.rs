//! Command implementations and argument parsing for the centrum CLI.

use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use centrum_core::{
    ComparisonReport, Dataset, DatasetErrorCode, EquivalenceOracle, MatrixReport, OracleBuilder,
    OracleError, OracleErrorCode, ParamCombo, ParamMatrix, VertexListType,
};
use centrum_providers_edgelist::{Catalog, EdgeListDataset, EdgeListError, EdgeListLayout};
use clap::{Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "centrum",
    about = "Check distributed betweenness centrality against a single-node reference."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Validate one parameter combination.
    Validate(ValidateCommand),
    /// Validate every combination of the default parameter matrix.
    Matrix(MatrixCommand),
}

/// Dataset and engine options shared by every command.
#[derive(Debug, Args, Clone)]
pub struct DatasetArgs {
    /// Path to a delimited `src dst wgt` edge list, or a catalogued dataset
    /// name resolved under `CENTRUM_DATASET_ROOT`.
    pub path: PathBuf,

    /// Field delimiter.
    #[arg(long, default_value_t = ' ')]
    pub delimiter: char,

    /// Override name for the dataset (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,

    /// Number of distributed workers (defaults to `CENTRUM_WORKERS` or 2).
    #[arg(long)]
    pub workers: Option<NonZeroUsize>,

    /// Ingestion chunk size in bytes (defaults to the file size split
    /// evenly across workers).
    #[arg(long = "chunk-size")]
    pub chunk_size: Option<NonZeroUsize>,
}

/// Options accepted by the `validate` command.
#[derive(Debug, Args, Clone)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub dataset: DatasetArgs,

    /// Treat edges as directed.
    #[arg(long)]
    pub directed: bool,

    /// Normalise scores.
    #[arg(long)]
    pub normalized: bool,

    /// Count path endpoints.
    #[arg(long)]
    pub endpoints: bool,

    /// Number of sampled source vertices (defaults to every vertex).
    #[arg(long = "subset-size")]
    pub subset_size: Option<usize>,

    /// Seed for source sampling (defaults to entropy).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Representation of the sampled sources handed to the engines.
    #[arg(long = "vertex-list", value_enum, default_value_t = VertexListArg::List)]
    pub vertex_list: VertexListArg,
}

impl ValidateCommand {
    /// Parameter combination described by the flags.
    #[must_use]
    pub fn params(&self) -> ParamCombo {
        ParamCombo::default()
            .with_directed(self.directed)
            .with_normalized(self.normalized)
            .with_endpoints(self.endpoints)
            .with_subset(self.subset_size, self.seed)
            .with_vertex_list(self.vertex_list.into())
    }
}

/// Options accepted by the `matrix` command.
#[derive(Debug, Args, Clone)]
pub struct MatrixCommand {
    #[command(flatten)]
    pub dataset: DatasetArgs,
}

/// Command-line spelling of [`VertexListType`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum VertexListArg {
    /// Plain list of vertex ids.
    List,
    /// Single-column vertex frame.
    Frame,
    /// Vertex count; both engines evaluate every source.
    Count,
}

impl From<VertexListArg> for VertexListType {
    fn from(arg: VertexListArg) -> Self {
        match arg {
            VertexListArg::List => Self::List,
            VertexListArg::Frame => Self::Frame,
            VertexListArg::Count => Self::Count,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The dataset could not be described or located.
    #[error(transparent)]
    Dataset(#[from] EdgeListError),
    /// Oracle configuration, execution, or verdict failed.
    #[error(transparent)]
    Oracle(#[from] OracleError),
    /// At least one combination of a matrix run failed.
    #[error("{failed} of {total} cases failed on `{dataset}`")]
    MatrixFailures {
        /// Dataset the matrix ran against.
        dataset: String,
        /// Number of failing cases.
        failed: usize,
        /// Number of cases run.
        total: usize,
    },
}

impl CliError {
    /// Stable oracle code, when the failure came from the oracle.
    #[must_use]
    pub const fn code(&self) -> Option<OracleErrorCode> {
        match self {
            Self::Oracle(err) => Some(err.code()),
            _ => None,
        }
    }

    /// Stable dataset code, when the dataset could not be opened or loaded.
    #[must_use]
    pub const fn dataset_code(&self) -> Option<DatasetErrorCode> {
        match self {
            Self::Dataset(err) => Some(err.dataset_code()),
            Self::Oracle(OracleError::Dataset { error, .. }) => Some(error.code()),
            _ => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// A single combination passed.
    Validate {
        /// Dataset name.
        dataset: String,
        /// Validated combination.
        params: ParamCombo,
        /// Row-by-row comparison.
        report: ComparisonReport,
    },
    /// A matrix ran to completion; individual cases may have failed.
    Matrix(MatrixReport),
}

impl ExecutionSummary {
    /// Whether every validated case passed.
    #[must_use]
    pub fn passed(&self) -> bool {
        match self {
            Self::Validate { .. } => true,
            Self::Matrix(report) => report.all_passed(),
        }
    }

    /// Converts a summary with failing cases into an error.
    ///
    /// # Errors
    /// Returns [`CliError::MatrixFailures`] when a matrix case failed.
    pub fn ensure_passed(&self) -> Result<(), CliError> {
        match self {
            Self::Matrix(report) if !report.all_passed() => Err(CliError::MatrixFailures {
                dataset: report.dataset().to_owned(),
                failed: report.cases().len() - report.passed(),
                total: report.cases().len(),
            }),
            _ => Ok(()),
        }
    }
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when the dataset cannot be opened, the oracle cannot
/// start, or a `validate` case fails.
///
/// # Examples
/// ```no_run
/// # use centrum_cli::cli::{Cli, run_cli};
/// # use clap::Parser;
/// let cli = Cli::parse_from(["centrum", "validate", "datasets/karate.csv", "--directed"]);
/// let summary = run_cli(cli)?;
/// assert!(summary.passed());
/// # Ok::<(), centrum_cli::cli::CliError>(())
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    let span = Span::current();
    match cli.command {
        Command::Validate(command) => {
            span.record("command", field::display("validate"));
            run_validate(command)
        }
        Command::Matrix(command) => {
            span.record("command", field::display("matrix"));
            run_matrix(command)
        }
    }
}

#[instrument(
    name = "cli.validate",
    err,
    skip(command),
    fields(path = %command.dataset.path.display(), params = field::Empty),
)]
pub(super) fn run_validate(command: ValidateCommand) -> Result<ExecutionSummary, CliError> {
    let params = command.params();
    Span::current().record("params", field::display(&params));
    let dataset = open_dataset(&command.dataset)?;
    let oracle = build_oracle(&command.dataset)?;
    let report = oracle.validate(&dataset, &params)?;
    info!(
        dataset = dataset.name(),
        compared = report.compared(),
        "validation passed"
    );
    Ok(ExecutionSummary::Validate {
        dataset: dataset.name().to_owned(),
        params,
        report,
    })
}

#[instrument(
    name = "cli.matrix",
    err,
    skip(command),
    fields(path = %command.dataset.path.display()),
)]
pub(super) fn run_matrix(command: MatrixCommand) -> Result<ExecutionSummary, CliError> {
    let dataset = open_dataset(&command.dataset)?;
    let oracle = build_oracle(&command.dataset)?;
    let report = oracle.validate_matrix(&dataset, &ParamMatrix::default());
    if !report.all_passed() {
        warn!(
            dataset = report.dataset(),
            passed = report.passed(),
            total = report.cases().len(),
            "matrix finished with failures"
        );
    }
    Ok(ExecutionSummary::Matrix(report))
}

fn build_oracle(args: &DatasetArgs) -> Result<EquivalenceOracle, CliError> {
    let mut builder = OracleBuilder::new().with_chunk_size(args.chunk_size);
    if let Some(workers) = args.workers {
        builder = builder.with_workers(workers);
    }
    Ok(builder.build()?)
}

/// Opens `args.path` as an edge list. When no such file exists the path is
/// looked up as a catalog name instead.
pub(super) fn open_dataset(args: &DatasetArgs) -> Result<EdgeListDataset, CliError> {
    if !args.path.exists()
        && let Some(name) = args.path.to_str()
    {
        let catalog = Catalog::from_env();
        let entry = catalog.get(name)?;
        let layout = entry.layout().clone().with_delimiter(args.delimiter);
        let dataset = EdgeListDataset::new(
            args.name.as_deref().unwrap_or(entry.name()),
            catalog.root().join(entry.file()),
            layout,
        )?;
        return Ok(dataset);
    }
    let layout = EdgeListLayout::default().with_delimiter(args.delimiter);
    let name = derive_dataset_name(&args.path, args.name.as_deref());
    Ok(EdgeListDataset::new(name, args.path.clone(), layout)?)
}

pub(super) fn derive_dataset_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "dataset".to_owned())
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Validate {
            dataset,
            params,
            report,
        } => {
            writeln!(writer, "dataset: {dataset}")?;
            writeln!(writer, "params: {params}")?;
            writeln!(
                writer,
                "tolerance: rtol={} atol={}",
                report.tolerance().rtol(),
                report.tolerance().atol()
            )?;
            writeln!(writer, "compared: {}", report.compared())?;
            writeln!(writer, "result: pass")?;
        }
        ExecutionSummary::Matrix(report) => {
            for case in report.cases() {
                let verdict = if case.passed() { "pass" } else { "FAIL" };
                writeln!(writer, "{verdict}\t{}", case.params)?;
            }
            writeln!(writer, "{report}")?;
        }
    }
    Ok(())
}
