//! Column layout of a delimited edge list.

use std::{fmt, sync::Arc};

use crate::errors::EdgeListError;

/// Declared type of one column.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ColumnType {
    Int32,
    Int64,
    Float32,
    Float64,
}

impl ColumnType {
    /// Lower-case name as used in layout descriptions.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
        }
    }

    /// Whether values of this type can name vertices.
    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self, Self::Int32 | Self::Int64)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed column.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct ColumnSpec {
    name: Arc<str>,
    ty: ColumnType,
}

impl ColumnSpec {
    /// Declares a column called `name` holding values of type `ty`.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: ColumnType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn ty(&self) -> ColumnType {
        self.ty
    }
}

/// Describes how each line of an edge-list file splits into columns and
/// which columns hold the source, destination, and optional weight.
///
/// # Examples
/// ```
/// use centrum_providers_edgelist::{ColumnType, EdgeListLayout};
///
/// let layout = EdgeListLayout::default();
/// assert_eq!(layout.delimiter(), ' ');
/// assert_eq!(layout.columns().len(), 3);
/// assert_eq!(layout.columns()[2].ty(), ColumnType::Float32);
/// assert_eq!(layout.weight(), Some("wgt"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct EdgeListLayout {
    delimiter: char,
    columns: Vec<ColumnSpec>,
    source: Arc<str>,
    destination: Arc<str>,
    weight: Option<Arc<str>>,
}

impl Default for EdgeListLayout {
    /// Space-delimited `src dst wgt` with `int32 int32 float32` columns.
    fn default() -> Self {
        Self {
            delimiter: ' ',
            columns: vec![
                ColumnSpec::new("src", ColumnType::Int32),
                ColumnSpec::new("dst", ColumnType::Int32),
                ColumnSpec::new("wgt", ColumnType::Float32),
            ],
            source: Arc::from("src"),
            destination: Arc::from("dst"),
            weight: Some(Arc::from("wgt")),
        }
    }
}

impl EdgeListLayout {
    /// Creates a layout whose first two columns are the source and
    /// destination and which carries no weight column.
    #[must_use]
    pub fn new(delimiter: char, columns: Vec<ColumnSpec>) -> Self {
        let name = |index: usize| {
            columns
                .get(index)
                .map_or_else(|| Arc::from(""), |column| Arc::clone(&column.name))
        };
        let source = name(0);
        let destination = name(1);
        Self {
            delimiter,
            source,
            destination,
            columns,
            weight: None,
        }
    }

    /// Sets the field delimiter. Any whitespace delimiter splits on runs of
    /// whitespace.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Names the column holding source vertices.
    #[must_use]
    pub fn with_source(mut self, column: impl Into<Arc<str>>) -> Self {
        self.source = column.into();
        self
    }

    /// Names the column holding destination vertices.
    #[must_use]
    pub fn with_destination(mut self, column: impl Into<Arc<str>>) -> Self {
        self.destination = column.into();
        self
    }

    /// Names the weight column; `None` gives every edge unit weight.
    #[must_use]
    pub fn with_weight(mut self, column: Option<Arc<str>>) -> Self {
        self.weight = column;
        self
    }

    #[must_use]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[must_use]
    pub fn weight(&self) -> Option<&str> {
        self.weight.as_deref()
    }

    /// Resolves the named columns to positions.
    ///
    /// # Errors
    /// Returns [`EdgeListError::MissingColumn`] when a named column is not
    /// declared and [`EdgeListError::NonIntegerVertex`] when the source or
    /// destination column is not an integer type.
    pub(crate) fn resolve(&self) -> Result<ResolvedLayout, EdgeListError> {
        let position = |name: &Arc<str>| {
            self.columns
                .iter()
                .position(|column| column.name == *name)
                .ok_or_else(|| EdgeListError::MissingColumn {
                    column: Arc::clone(name),
                })
        };
        let vertex_column = |name: &Arc<str>| {
            let index = position(name)?;
            let ty = self.columns[index].ty;
            if ty.is_integer() {
                Ok(index)
            } else {
                Err(EdgeListError::NonIntegerVertex {
                    column: Arc::clone(name),
                    actual: ty.as_str(),
                })
            }
        };
        Ok(ResolvedLayout {
            delimiter: self.delimiter,
            columns: self.columns.clone(),
            source: vertex_column(&self.source)?,
            destination: vertex_column(&self.destination)?,
            weight: self.weight.as_ref().map(&position).transpose()?,
        })
    }
}

/// A validated layout with column positions.
#[derive(Clone, Debug)]
pub(crate) struct ResolvedLayout {
    pub(crate) delimiter: char,
    pub(crate) columns: Vec<ColumnSpec>,
    pub(crate) source: usize,
    pub(crate) destination: usize,
    pub(crate) weight: Option<usize>,
}
