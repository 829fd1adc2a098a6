//! Scalar root finders.
//!
//! Every method follows the same shape: seed the state, iterate, and stop
//! in one of three ways:
//!
//! - **converged**: the step (or bracket half-width) fell below the tolerance
//! - **exhausted**: `max_iterations` steps ran without converging; the result
//!   still carries the best estimate and the last error
//! - **failed**: a degenerate step (flat tangent, flat secant, a formula that
//!   cannot be evaluated) stopped the search; the partial trace is kept
//!
//! The `find_root_*` functions take a formula string; the underlying
//! functions take anything implementing [`ScalarFunction`].

mod bisection;
mod newton;
mod secant;

pub use bisection::bisection;
pub use newton::newton_raphson;
pub use secant::secant;

use log::debug;

use crate::error::{NumlabError, Result};
use crate::expr::{Expression, ScalarFunction};
use crate::report::{RootMethod, RootSolution};
use crate::solver::validate_tolerance;

/// Default convergence tolerance.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default iteration ceiling for the root finders.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Secant denominators `|f(x1) − f(x0)|` below this value stop the search.
pub const FLAT_SECANT: f64 = 1e-12;

/// Configuration shared by the root finders.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootConfig {
    /// Convergence tolerance on the step size (or half-width for bisection).
    pub tolerance: f64,
    /// Hard ceiling on the number of iterations.
    pub max_iterations: usize,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl RootConfig {
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

    fn validate(&self) -> Result<()> {
        validate_tolerance(self.tolerance)
    }
}

/// Newton-Raphson on a formula in `x`.
pub fn find_root_newton(formula: &str, x0: f64, config: &RootConfig) -> Result<RootSolution> {
    newton_raphson(&compile(formula)?, x0, config)
}

/// Bisection on a formula in `x` over `[a, b]`.
pub fn find_root_bisection(formula: &str, a: f64, b: f64, config: &RootConfig) -> Result<RootSolution> {
    bisection(&compile(formula)?, a, b, config)
}

/// Secant method on a formula in `x` seeded with `x0` and `x1`.
pub fn find_root_secant(formula: &str, x0: f64, x1: f64, config: &RootConfig) -> Result<RootSolution> {
    secant(&compile(formula)?, x0, x1, config)
}

fn compile(formula: &str) -> Result<Expression> {
    let expr = Expression::parse(formula)?;
    debug!("Parsed f(x) = {}", expr.source());
    Ok(expr)
}

fn check_seed(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(NumlabError::invalid_parameter(
            name,
            format!("must be finite, got {}", value),
        ));
    }
    Ok(())
}

fn empty_solution(method: RootMethod) -> RootSolution {
    RootSolution {
        method,
        root: None,
        f_root: None,
        iterations: 0,
        converged: false,
        final_error: None,
        errors: Vec::new(),
        history: Vec::new(),
        failure: None,
    }
}

/// `f(root)` for the report; a failed evaluation is simply left out.
fn value_at<F: ScalarFunction + ?Sized>(f: &F, x: f64) -> Option<f64> {
    f.value(x).ok()
}
