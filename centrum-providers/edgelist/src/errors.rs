use std::{io, path::PathBuf, sync::Arc};

use centrum_core::{DatasetError, DatasetErrorCode};
use thiserror::Error;

/// Errors raised while describing, locating, or parsing an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    #[error("failed to read `{path}`: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("`{path}` is not valid UTF-8")]
    InvalidUtf8 { path: PathBuf },
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: column `{column}` has invalid value `{value}`")]
    InvalidValue {
        line: usize,
        column: Arc<str>,
        value: String,
    },
    #[error("column `{column}` is not declared by the layout")]
    MissingColumn { column: Arc<str> },
    #[error("column `{column}` must hold integer vertex ids but is declared {actual}")]
    NonIntegerVertex { column: Arc<str>, actual: &'static str },
    #[error("dataset `{name}` is not in the catalog")]
    UnknownDataset { name: String },
}

impl EdgeListError {
    /// Code of the [`DatasetError`] this error converts into.
    #[must_use]
    pub const fn dataset_code(&self) -> DatasetErrorCode {
        match self {
            Self::Io { .. } | Self::InvalidUtf8 { .. } | Self::UnknownDataset { .. } => {
                DatasetErrorCode::Io
            }
            Self::ColumnCount { .. } => DatasetErrorCode::Malformed,
            Self::InvalidValue { .. } => DatasetErrorCode::InvalidValue,
            Self::MissingColumn { .. } | Self::NonIntegerVertex { .. } => {
                DatasetErrorCode::InvalidLayout
            }
        }
    }
}

impl From<EdgeListError> for DatasetError {
    fn from(error: EdgeListError) -> Self {
        match error {
            EdgeListError::Io { path, source } => Self::Io {
                path: Arc::from(path.display().to_string()),
                message: Arc::from(source.to_string()),
            },
            EdgeListError::InvalidUtf8 { path } => Self::Io {
                path: Arc::from(path.display().to_string()),
                message: Arc::from("stream did not contain valid UTF-8"),
            },
            EdgeListError::ColumnCount {
                line,
                expected,
                found,
            } => Self::Malformed {
                line,
                reason: Arc::from(format!("expected {expected} columns, found {found}")),
            },
            EdgeListError::InvalidValue {
                line,
                column,
                value,
            } => Self::InvalidValue {
                line,
                column,
                value: Arc::from(value),
            },
            err @ (EdgeListError::MissingColumn { .. }
            | EdgeListError::NonIntegerVertex { .. }) => Self::InvalidLayout {
                reason: Arc::from(err.to_string()),
            },
            EdgeListError::UnknownDataset { name } => Self::Io {
                path: Arc::from(name),
                message: Arc::from("dataset is not in the catalog"),
            },
        }
    }
}
