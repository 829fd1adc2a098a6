//! Error types for the Numlab engine.
//!
//! This module provides a unified error type [`NumlabError`] that covers
//! formula parsing and evaluation, precondition checks on solver input,
//! and the numerical failures that terminate an iteration.

use thiserror::Error;

/// Result type alias using [`NumlabError`].
pub type Result<T> = std::result::Result<T, NumlabError>;

/// Unified error type for all Numlab operations.
#[derive(Error, Debug)]
pub enum NumlabError {
    // ============ Formula Errors ============
    /// The formula could not be tokenized or parsed
    #[error("Malformed formula at column {column}: {message}")]
    MalformedFormula { column: usize, message: String },

    /// The formula was evaluated but produced no usable real number
    #[error("Evaluation error at x = {x}: {message}")]
    Evaluation { x: f64, message: String },

    /// Numeric derivative too small to be used as a tangent slope
    #[error("Derivative near zero at x = {x} (f'(x) = {derivative:.2e})")]
    DerivativeNearZero { x: f64, derivative: f64 },

    // ============ Input Errors ============
    /// Matrix/vector or point-set dimensions do not agree
    #[error("Dimension mismatch: {message}")]
    DimensionMismatch { message: String },

    /// A diagonal entry used as a divisor is zero
    #[error("Zero diagonal entry at row {row} (value: {value:.2e})")]
    SingularDiagonal { row: usize, value: f64 },

    /// Two interpolation nodes share the same abscissa
    #[error("Duplicate abscissa x = {x} in point set")]
    DuplicateAbscissa { x: f64 },

    /// The function does not change sign over the bracket
    #[error("No sign change on [{a}, {b}] (f(a) = {fa:.4e}, f(b) = {fb:.4e})")]
    NoBracket { a: f64, b: f64, fa: f64, fb: f64 },

    /// Invalid tolerance, relaxation factor, or other parameter
    #[error("Invalid parameter '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    // ============ Iteration Errors ============
    /// A denominator collapsed towards zero or the iterate stopped being finite
    #[error("Numerical instability at iteration {iteration}: {message}")]
    NumericalInstability { iteration: usize, message: String },

    /// Newton-Raphson hit a horizontal tangent
    #[error("Flat tangent at x = {x} after {iteration} iterations (f'(x) = {derivative:.2e})")]
    FlatTangent {
        iteration: usize,
        x: f64,
        derivative: f64,
    },

    /// The secant line through the last two iterates is horizontal
    #[error("Stagnant secant between x0 = {x0} and x1 = {x1} after {iteration} iterations")]
    StagnantSecant { iteration: usize, x0: f64, x1: f64 },

    // ============ I/O Errors ============
    /// The problem description could not be decoded
    #[error("Invalid problem description: {source}")]
    InvalidProblem {
        #[from]
        source: serde_json::Error,
    },

    /// Error reading a problem file
    #[error("Failed to read problem file '{path}': {source}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl NumlabError {
    /// Create a malformed formula error
    pub fn malformed(column: usize, message: impl Into<String>) -> Self {
        Self::MalformedFormula {
            column,
            message: message.into(),
        }
    }

    /// Create an evaluation error
    pub fn evaluation(x: f64, message: impl Into<String>) -> Self {
        Self::Evaluation {
            x,
            message: message.into(),
        }
    }

    /// Create a dimension mismatch error
    pub fn dimension_mismatch(message: impl Into<String>) -> Self {
        Self::DimensionMismatch {
            message: message.into(),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Create a numerical instability error
    pub fn instability(iteration: usize, message: impl Into<String>) -> Self {
        Self::NumericalInstability {
            iteration,
            message: message.into(),
        }
    }

    /// True for both parse-time and run-time formula failures.
    pub fn is_evaluation_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedFormula { .. } | Self::Evaluation { .. }
        )
    }
}
