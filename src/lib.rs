//! # Numlab Core
//!
//! Classical numerical methods with full iteration traces.
//!
//! This library provides:
//! - A safe expression language for scalar functions of one variable
//! - Iterative linear solvers (Conjugate Gradient, SOR)
//! - Scalar root finders (Newton-Raphson, Bisection, Secant)
//! - Interpolation (Lagrange, Newton divided differences, natural cubic spline)
//!
//! ## Architecture
//!
//! - [`expr`] - Formula lexer, parser and tree evaluator
//! - [`solver`] - Dense matrix type and the linear solvers
//! - [`roots`] - Root finders over any [`ScalarFunction`]
//! - [`interp`] - Point sets and interpolants
//! - [`report`] - Serializable results shared by every method
//! - [`problem`] - JSON problem descriptions and the records built from them
//!
//! ## Usage
//!
//! ### Native CLI
//!
//! ```bash
//! echo '{"method": "bisection", "formula": "x^2 - 2", "a": 0, "b": 2}' > sqrt2.json
//! numlab sqrt2.json --pretty
//! ```
//!
//! ### Library
//!
//! ```
//! use numlab_core::roots::{find_root_newton, RootConfig};
//!
//! let result = find_root_newton("x^3 - 2*x - 5", 2.0, &RootConfig::default()).unwrap();
//! assert!(result.converged);
//! assert!((result.root.unwrap() - 2.0945515).abs() < 1e-6);
//! ```
//!
//! ## Outcomes
//!
//! Bad input (mismatched dimensions, no sign change, repeated abscissas,
//! malformed formulas) fails with an error before any iteration runs.
//! Running out of iterations is not an error: the result reports
//! `converged: false` with the best estimate so far. A numerical breakdown
//! in the middle of a run keeps the partial trace and records the reason in
//! the result's `failure` field.

pub mod error;
pub mod expr;
pub mod interp;
pub mod problem;
pub mod report;
pub mod roots;
pub mod solver;

pub use error::{NumlabError, Result};
pub use expr::{Expression, ScalarFunction};
pub use problem::{MethodTag, Problem, ProblemRecord};
pub use report::{InterpolationResult, SolverResult, Status};

// WASM bindings
#[cfg(feature = "wasm")]
mod wasm;

#[cfg(feature = "wasm")]
pub use wasm::{solve_problem, solve_record};

/// True when `value` is not finite or its magnitude is below `epsilon`.
///
/// Every denominator the iterative methods divide by goes through this check.
pub(crate) fn near_zero(value: f64, epsilon: f64) -> bool {
    !value.is_finite() || value.abs() < epsilon
}
