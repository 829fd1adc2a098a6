//! Problem validation.

use crate::error::{NumlabError, Result};

use super::Problem;

/// Validate a problem before solving it.
///
/// Checks:
/// - The matrix is non-empty and square, and the vector matches its size
/// - The formula is not blank
/// - `x` and `y` have the same length
/// - At least one iteration is allowed
///
/// Numerical preconditions (zero diagonal, missing sign change, repeated
/// abscissas) are left to the methods themselves.
pub fn validate_problem(problem: &Problem) -> Result<()> {
    match problem {
        Problem::ConjugateGradient {
            matrix,
            vector,
            max_iterations,
            ..
        }
        | Problem::Sor {
            matrix,
            vector,
            max_iterations,
            ..
        } => {
            validate_system(matrix, vector)?;
            validate_iterations(*max_iterations)
        }
        Problem::Newton {
            formula,
            max_iterations,
            ..
        }
        | Problem::Bisection {
            formula,
            max_iterations,
            ..
        }
        | Problem::Secant {
            formula,
            max_iterations,
            ..
        } => {
            if formula.trim().is_empty() {
                return Err(NumlabError::malformed(1, "formula is empty"));
            }
            validate_iterations(*max_iterations)
        }
        Problem::Lagrange { x, y, .. }
        | Problem::NewtonInterpolation { x, y, .. }
        | Problem::Spline { x, y, .. } => {
            if x.len() != y.len() {
                return Err(NumlabError::dimension_mismatch(format!(
                    "{} x values but {} y values",
                    x.len(),
                    y.len()
                )));
            }
            Ok(())
        }
    }
}

fn validate_system(matrix: &[Vec<f64>], vector: &[f64]) -> Result<()> {
    let n = matrix.len();
    if n == 0 {
        return Err(NumlabError::dimension_mismatch("matrix is empty"));
    }
    if let Some((i, row)) = matrix.iter().enumerate().find(|(_, row)| row.len() != n) {
        return Err(NumlabError::dimension_mismatch(format!(
            "matrix must be square: row {} has {} entries, expected {}",
            i,
            row.len(),
            n
        )));
    }
    if vector.len() != n {
        return Err(NumlabError::dimension_mismatch(format!(
            "vector has {} entries, matrix has {} rows",
            vector.len(),
            n
        )));
    }
    Ok(())
}

fn validate_iterations(max_iterations: usize) -> Result<()> {
    if max_iterations == 0 {
        return Err(NumlabError::invalid_parameter(
            "max_iterations",
            "at least one iteration is required",
        ));
    }
    Ok(())
}
