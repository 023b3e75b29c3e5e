//! Elementwise comparison of two result tables.

use std::fmt;

use crate::{
    error::{OracleError, Result},
    graph::VertexId,
    result::ResultTable,
};

/// Number of mismatching rows or vertices kept for diagnostics.
pub const MAX_REPORTED: usize = 16;

/// Closeness test `|a - b| <= atol + rtol * |b|`, with `b` the reference
/// value.
///
/// Identical values, including equal infinities, are always close; NaN is
/// never close to anything.
///
/// # Examples
/// ```
/// use centrum_core::Tolerance;
///
/// let tolerance = Tolerance::default();
/// assert!(tolerance.is_close(1.000_001, 1.0));
/// assert!(!tolerance.is_close(1.001, 1.0));
/// assert!(!tolerance.is_close(f64::NAN, f64::NAN));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    rtol: f64,
    atol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rtol: Self::DEFAULT_RTOL,
            atol: Self::DEFAULT_ATOL,
        }
    }
}

impl Tolerance {
    /// Default relative tolerance.
    pub const DEFAULT_RTOL: f64 = 1e-5;
    /// Default absolute tolerance.
    pub const DEFAULT_ATOL: f64 = 1e-8;

    /// Creates a tolerance.
    ///
    /// # Errors
    /// Returns [`OracleError::InvalidTolerance`] when either bound is
    /// negative or not finite.
    pub fn new(rtol: f64, atol: f64) -> Result<Self> {
        let valid = |value: f64| value.is_finite() && value >= 0.0;
        if valid(rtol) && valid(atol) {
            Ok(Self { rtol, atol })
        } else {
            Err(OracleError::InvalidTolerance { rtol, atol })
        }
    }

    /// Relative tolerance.
    #[must_use]
    pub const fn rtol(&self) -> f64 {
        self.rtol
    }

    /// Absolute tolerance.
    #[must_use]
    pub const fn atol(&self) -> f64 {
        self.atol
    }

    /// Tests `actual` against `expected`.
    #[must_use]
    pub fn is_close(&self, actual: f64, expected: f64) -> bool {
        if actual == expected {
            return true;
        }
        if !actual.is_finite() || !expected.is_finite() {
            return false;
        }
        (actual - expected).abs() <= self.atol + self.rtol * expected.abs()
    }
}

/// A row whose scores failed the closeness test.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mismatch {
    /// Vertex of the row.
    pub vertex: VertexId,
    /// Single-node score.
    pub reference: f64,
    /// Distributed score.
    pub distributed: f64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "vertex {}: reference={} distributed={} (diff {:e})",
            self.vertex,
            self.reference,
            self.distributed,
            (self.distributed - self.reference).abs()
        )
    }
}

/// Outcome of comparing two tables that cover the same vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct ComparisonReport {
    compared: usize,
    mismatch_count: usize,
    mismatches: Vec<Mismatch>,
    tolerance: Tolerance,
}

impl ComparisonReport {
    /// Rows compared.
    #[must_use]
    pub const fn compared(&self) -> usize {
        self.compared
    }

    /// Rows that failed the closeness test.
    #[must_use]
    pub const fn mismatch_count(&self) -> usize {
        self.mismatch_count
    }

    /// The first failing rows, at most [`MAX_REPORTED`].
    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Tolerance the rows were compared with.
    #[must_use]
    pub const fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Whether every row was close.
    #[must_use]
    pub const fn is_pass(&self) -> bool {
        self.mismatch_count == 0
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of {} scores outside tolerance (rtol={}, atol={})",
            self.mismatch_count, self.compared, self.tolerance.rtol, self.tolerance.atol
        )?;
        for mismatch in &self.mismatches {
            write!(f, "\n  {mismatch}")?;
        }
        if self.mismatch_count > self.mismatches.len() {
            write!(f, "\n  ... {} more", self.mismatch_count - self.mismatches.len())?;
        }
        Ok(())
    }
}

/// Compares two tables row by row after checking they cover the same
/// vertices. Both tables are sorted by vertex first.
///
/// # Errors
/// Returns [`OracleError::ShapeMismatch`] when the vertex sets differ and
/// [`OracleError::ToleranceViolation`] when any pair is not close.
pub fn compare_tables(
    reference: &ResultTable,
    distributed: &ResultTable,
    tolerance: Tolerance,
) -> Result<ComparisonReport> {
    let reference = reference.clone().sorted_by_vertex();
    let distributed = distributed.clone().sorted_by_vertex();

    if reference.vertices() != distributed.vertices() {
        let expected = reference.vertex_set();
        let actual = distributed.vertex_set();
        return Err(OracleError::ShapeMismatch {
            reference: reference.len(),
            distributed: distributed.len(),
            missing: expected.difference(&actual).copied().take(MAX_REPORTED).collect(),
            extra: actual.difference(&expected).copied().take(MAX_REPORTED).collect(),
        });
    }

    let mut mismatch_count = 0;
    let mut mismatches = Vec::new();
    for ((vertex, expected), (_, actual)) in reference.iter().zip(distributed.iter()) {
        if tolerance.is_close(actual, expected) {
            continue;
        }
        mismatch_count += 1;
        if mismatches.len() < MAX_REPORTED {
            mismatches.push(Mismatch {
                vertex,
                reference: expected,
                distributed: actual,
            });
        }
    }

    let report = ComparisonReport {
        compared: reference.len(),
        mismatch_count,
        mismatches,
        tolerance,
    };
    if report.is_pass() {
        Ok(report)
    } else {
        Err(OracleError::ToleranceViolation { report })
    }
}
