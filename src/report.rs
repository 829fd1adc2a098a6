//! Result types shared by every method family.
//!
//! Results are plain data: numbers, sequences and tagged enums that
//! serialize to JSON without any handle or callback inside. A result is built
//! once at the end of a call and never mutated afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{NumlabError, Result};
use crate::interp::SplineSegment;

/// Per-iteration snapshots, in iteration order.
pub type IterationTrace<T> = Vec<T>;

/// Iterative linear solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinearMethod {
    ConjugateGradient,
    Sor,
}

/// Scalar root finders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootMethod {
    NewtonRaphson,
    Bisection,
    Secant,
}

/// Interpolation schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    Lagrange,
    NewtonDividedDifference,
    NaturalCubicSpline,
}

/// How an iterative call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Tolerance met
    Converged,
    /// `max_iterations` reached without meeting the tolerance
    Exhausted,
    /// Aborted by a numerical failure, see [`Failure`]
    Failed,
}

/// Reason a call stopped in the middle of iterating.
///
/// A failure is reported inside the result, next to the partial trace, so the
/// caller still sees the iterations that led to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Failure {
    NumericalInstability { iteration: usize, message: String },
    FlatTangent { iteration: usize, x: f64, derivative: f64 },
    StagnantSecant { iteration: usize, x0: f64, x1: f64 },
    Evaluation { iteration: usize, x: f64, message: String },
}

impl Failure {
    /// Classify an error raised while iterating.
    pub fn from_error(error: NumlabError, iteration: usize) -> Self {
        match error {
            NumlabError::Evaluation { x, message } => Self::Evaluation { iteration, x, message },
            NumlabError::DerivativeNearZero { x, derivative } => Self::FlatTangent {
                iteration,
                x,
                derivative,
            },
            NumlabError::FlatTangent {
                iteration,
                x,
                derivative,
            } => Self::FlatTangent {
                iteration,
                x,
                derivative,
            },
            NumlabError::StagnantSecant { iteration, x0, x1 } => {
                Self::StagnantSecant { iteration, x0, x1 }
            }
            other => Self::NumericalInstability {
                iteration,
                message: other.to_string(),
            },
        }
    }

    /// The matching error value.
    pub fn into_error(self) -> NumlabError {
        match self {
            Self::NumericalInstability { iteration, message } => {
                NumlabError::NumericalInstability { iteration, message }
            }
            Self::FlatTangent {
                iteration,
                x,
                derivative,
            } => NumlabError::FlatTangent {
                iteration,
                x,
                derivative,
            },
            Self::StagnantSecant { iteration, x0, x1 } => {
                NumlabError::StagnantSecant { iteration, x0, x1 }
            }
            Self::Evaluation { x, message, .. } => NumlabError::Evaluation { x, message },
        }
    }
}

/// Outcome of a conjugate gradient or SOR solve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearSolution {
    pub method: LinearMethod,
    /// Final iterate; `None` when the solve failed
    pub solution: Option<Vec<f64>>,
    pub iterations: usize,
    pub converged: bool,
    /// Residual norm (CG) or update norm (SOR) of the last iteration
    pub final_error: Option<f64>,
    /// One error value per iteration
    pub errors: Vec<f64>,
    /// Solution vector after each iteration
    pub history: IterationTrace<Vec<f64>>,
    /// Relaxation factor, SOR only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omega: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl LinearSolution {
    pub fn status(&self) -> Status {
        status_of(self.converged, self.failure.is_some())
    }

    /// Turn a mid-iteration failure into an `Err`.
    pub fn into_result(self) -> Result<Self> {
        match self.failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(self),
        }
    }
}

/// One Newton, bisection or secant step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RootStep {
    Newton {
        index: usize,
        x: f64,
        fx: f64,
        dfx: f64,
        x_new: f64,
        error: f64,
    },
    Bisection {
        index: usize,
        a: f64,
        b: f64,
        c: f64,
        fc: f64,
        error: f64,
    },
    Secant {
        index: usize,
        x0: f64,
        x1: f64,
        x2: f64,
        fx1: f64,
        error: f64,
    },
}

impl RootStep {
    pub fn error(&self) -> f64 {
        match *self {
            Self::Newton { error, .. } | Self::Bisection { error, .. } | Self::Secant { error, .. } => error,
        }
    }
}

/// Outcome of a root search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootSolution {
    pub method: RootMethod,
    /// Best estimate; `None` when the search failed
    pub root: Option<f64>,
    /// `f(root)`, reported on convergence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f_root: Option<f64>,
    pub iterations: usize,
    pub converged: bool,
    pub final_error: Option<f64>,
    pub errors: Vec<f64>,
    pub history: IterationTrace<RootStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl RootSolution {
    pub fn status(&self) -> Status {
        status_of(self.converged, self.failure.is_some())
    }

    /// Turn a mid-iteration failure into an `Err`.
    pub fn into_result(self) -> Result<Self> {
        match self.failure {
            Some(failure) => Err(failure.into_error()),
            None => Ok(self),
        }
    }
}

fn status_of(converged: bool, failed: bool) -> Status {
    if failed {
        Status::Failed
    } else if converged {
        Status::Converged
    } else {
        Status::Exhausted
    }
}

/// Result of any iterative solve, tagged by method family.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum SolverResult {
    Linear(LinearSolution),
    Root(RootSolution),
}

impl SolverResult {
    pub fn iterations(&self) -> usize {
        match self {
            Self::Linear(s) => s.iterations,
            Self::Root(s) => s.iterations,
        }
    }

    pub fn final_error(&self) -> Option<f64> {
        match self {
            Self::Linear(s) => s.final_error,
            Self::Root(s) => s.final_error,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            Self::Linear(s) => s.status(),
            Self::Root(s) => s.status(),
        }
    }
}

impl From<LinearSolution> for SolverResult {
    fn from(solution: LinearSolution) -> Self {
        Self::Linear(solution)
    }
}

impl From<RootSolution> for SolverResult {
    fn from(solution: RootSolution) -> Self {
        Self::Root(solution)
    }
}

/// Evenly spaced samples of an interpolant, for plotting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledCurve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// An interpolant evaluated at a caller-supplied point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryValue {
    pub x: f64,
    pub y: f64,
}

/// Method-specific form of the interpolant.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Representation {
    /// Sum of basis polynomials, kept implicit
    LagrangeBasis,
    /// Divided-difference table; its first row holds the Newton coefficients
    DividedDifferences {
        table: Vec<Vec<f64>>,
        coefficients: Vec<f64>,
    },
    /// Cubic pieces between consecutive sorted nodes
    Spline { segments: Vec<SplineSegment> },
}

/// Outcome of an interpolation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterpolationResult {
    pub method: InterpolationMethod,
    pub x_points: Vec<f64>,
    pub y_points: Vec<f64>,
    /// Polynomial degree, for the global polynomial methods
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<usize>,
    pub representation: Representation,
    pub curve: SampledCurve,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_solution(failure: Option<Failure>, converged: bool) -> RootSolution {
        RootSolution {
            method: RootMethod::Secant,
            root: None,
            f_root: None,
            iterations: 0,
            converged,
            final_error: None,
            errors: Vec::new(),
            history: Vec::new(),
            failure,
        }
    }

    #[test]
    fn test_status() {
        assert_eq!(root_solution(None, true).status(), Status::Converged);
        assert_eq!(root_solution(None, false).status(), Status::Exhausted);
        let failure = Failure::StagnantSecant {
            iteration: 3,
            x0: 1.0,
            x1: 1.0,
        };
        assert_eq!(root_solution(Some(failure), false).status(), Status::Failed);
    }

    #[test]
    fn test_failure_becomes_error() {
        let failure = Failure::FlatTangent {
            iteration: 2,
            x: 0.0,
            derivative: 0.0,
        };
        let err = root_solution(Some(failure), false).into_result().unwrap_err();
        assert!(matches!(err, NumlabError::FlatTangent { iteration: 2, .. }));
    }

    #[test]
    fn test_derivative_error_is_flat_tangent() {
        let err = NumlabError::DerivativeNearZero {
            x: 1.0,
            derivative: 1e-14,
        };
        assert!(matches!(
            Failure::from_error(err, 4),
            Failure::FlatTangent { iteration: 4, .. }
        ));
    }

    #[test]
    fn test_serialized_shape() {
        let result = SolverResult::from(root_solution(None, true));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["family"], "root");
        assert_eq!(json["method"], "secant");
        assert!(json.get("failure").is_none());
    }
}
