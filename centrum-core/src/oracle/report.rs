//! Per-case outcomes of a matrix run.

use std::{fmt, sync::Arc};

use crate::error::OracleError;

use super::{compare::ComparisonReport, params::ParamCombo};

/// Result of validating one combination.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseOutcome {
    /// Parameters of the case.
    pub params: ParamCombo,
    /// Comparison on success, the verdict or execution failure otherwise.
    pub result: Result<ComparisonReport, OracleError>,
}

impl CaseOutcome {
    /// Whether the case passed.
    #[must_use]
    pub const fn passed(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of every combination of a [`super::ParamMatrix`] on one dataset,
/// in matrix order.
#[derive(Clone, Debug, PartialEq)]
pub struct MatrixReport {
    dataset: Arc<str>,
    cases: Vec<CaseOutcome>,
}

impl MatrixReport {
    pub(crate) const fn new(dataset: Arc<str>, cases: Vec<CaseOutcome>) -> Self {
        Self { dataset, cases }
    }

    /// Dataset the matrix ran against.
    #[must_use]
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Every case in matrix order.
    #[must_use]
    pub fn cases(&self) -> &[CaseOutcome] {
        &self.cases
    }

    /// Number of passing cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.cases.iter().filter(|case| case.passed()).count()
    }

    /// Cases that did not pass.
    pub fn failures(&self) -> impl Iterator<Item = &CaseOutcome> {
        self.cases.iter().filter(|case| !case.passed())
    }

    /// Whether every case passed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.cases.iter().all(CaseOutcome::passed)
    }
}

impl fmt::Display for MatrixReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} of {} cases passed",
            self.dataset,
            self.passed(),
            self.cases.len()
        )?;
        for case in self.failures() {
            if let Err(err) = &case.result {
                write!(f, "\n  [{}] {}: {}", err.code(), case.params, err)?;
            }
        }
        Ok(())
    }
}
