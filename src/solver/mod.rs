//! Iterative solvers for dense linear systems `Ax = b`.
//!
//! ## Conjugate Gradient
//!
//! For symmetric positive-definite `A`. Each step moves along a search
//! direction that is A-conjugate to all previous ones; in exact arithmetic
//! the residual vanishes after at most `n` steps.
//!
//! ## Successive Over-Relaxation
//!
//! A Gauss-Seidel sweep blended with the previous iterate by the relaxation
//! factor ω. Rows are updated in place, so row `i` already sees the new
//! values of rows `0..i` from the same sweep. ω = 1 is plain Gauss-Seidel.
//!
//! Both solvers stop after `max_iterations` whether or not the tolerance was
//! met; an exhausted run is a normal, non-converged result.

mod cg;
mod matrix;
mod sor;

pub use cg::conjugate_gradient;
pub use matrix::{dot, max_abs_diff, Matrix};
pub use sor::sor;

use crate::error::{NumlabError, Result};

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default iteration ceiling for the linear solvers.
pub const DEFAULT_MAX_ITERATIONS: usize = 1000;

/// Default SOR relaxation factor.
pub const DEFAULT_OMEGA: f64 = 1.5;

/// Diagonal entries below this magnitude are treated as zero.
pub const PIVOT_EPSILON: f64 = 1e-15;

/// Smallest usable curvature `pᵀAp` in conjugate gradient.
pub const CURVATURE_EPSILON: f64 = 1e-30;

/// Configuration shared by the linear solvers.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverConfig {
    /// Stop once the error measure drops below this value.
    pub tolerance: f64,
    /// Hard ceiling on the number of iterations.
    pub max_iterations: usize,
    /// Starting point; the zero vector when `None`.
    pub initial_guess: Option<Vec<f64>>,
    /// Reject matrices with a non-positive diagonal before running CG.
    pub check_diagonal: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            initial_guess: None,
            check_diagonal: true,
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the convergence tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the maximum number of iterations.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Start from `x0` instead of the zero vector.
    pub fn with_initial_guess(mut self, x0: Vec<f64>) -> Self {
        self.initial_guess = Some(x0);
        self
    }

    /// Enable or disable the CG diagonal pre-check.
    pub fn with_diagonal_check(mut self, check: bool) -> Self {
        self.check_diagonal = check;
        self
    }

    fn validate(&self) -> Result<()> {
        validate_tolerance(self.tolerance)
    }
}

pub(crate) fn validate_tolerance(tolerance: f64) -> Result<()> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(NumlabError::invalid_parameter(
            "tolerance",
            format!("must be a positive number, got {}", tolerance),
        ));
    }
    Ok(())
}

/// Check shapes and finiteness of a linear system and build the starting vector.
fn prepare_system(a: &Matrix, b: &[f64], config: &SolverConfig) -> Result<Vec<f64>> {
    config.validate()?;

    if !a.is_square() {
        return Err(NumlabError::dimension_mismatch(format!(
            "matrix must be square, got {}x{}",
            a.rows(),
            a.cols()
        )));
    }
    let n = a.rows();
    if n == 0 {
        return Err(NumlabError::dimension_mismatch("matrix is empty"));
    }
    if b.len() != n {
        return Err(NumlabError::dimension_mismatch(format!(
            "vector has {} entries, matrix has {} rows",
            b.len(),
            n
        )));
    }
    if !a.is_finite() || b.iter().any(|v| !v.is_finite()) {
        return Err(NumlabError::invalid_parameter("system", "entries must be finite"));
    }

    match &config.initial_guess {
        Some(x0) if x0.len() != n => Err(NumlabError::dimension_mismatch(format!(
            "initial guess has {} entries, matrix has {} rows",
            x0.len(),
            n
        ))),
        Some(x0) if x0.iter().any(|v| !v.is_finite()) => Err(NumlabError::invalid_parameter(
            "initial_guess",
            "entries must be finite",
        )),
        Some(x0) => Ok(x0.clone()),
        None => Ok(vec![0.0; n]),
    }
}
