//! Successive over-relaxation.

use log::{debug, info, warn};

use super::matrix::{max_abs_diff, Matrix};
use super::{prepare_system, SolverConfig, PIVOT_EPSILON};
use crate::error::{NumlabError, Result};
use crate::near_zero;
use crate::report::{Failure, LinearMethod, LinearSolution};

/// Solve `Ax = b` by SOR with relaxation factor `omega`.
///
/// Each sweep updates `x[i] = (1-ω)x[i] + ω/A[i,i] (b[i] − Σ_{j≠i} A[i,j]x[j])`
/// row by row, in place. One sweep is one iteration. Converges when the
/// infinity norm of the change over a sweep drops below the tolerance.
///
/// `omega` must lie in the open interval (0, 2), outside of which SOR cannot
/// converge. Every diagonal entry must be nonzero.
pub fn sor(a: &Matrix, b: &[f64], omega: f64, config: &SolverConfig) -> Result<LinearSolution> {
    let mut x = prepare_system(a, b, config)?;
    let n = b.len();

    if !(omega > 0.0 && omega < 2.0) {
        return Err(NumlabError::invalid_parameter(
            "omega",
            format!("must lie in (0, 2), got {}", omega),
        ));
    }

    if let Some(row) = (0..n).find(|&i| near_zero(a.diagonal(i), PIVOT_EPSILON)) {
        return Err(NumlabError::SingularDiagonal {
            row,
            value: a.diagonal(row),
        });
    }

    let mut solution = LinearSolution {
        method: LinearMethod::Sor,
        solution: None,
        iterations: 0,
        converged: false,
        final_error: None,
        errors: Vec::new(),
        history: Vec::new(),
        omega: Some(omega),
        failure: None,
    };

    for iter in 0..config.max_iterations {
        let x_old = x.clone();

        for i in 0..n {
            let row = a.row(i);
            let sigma: f64 = (0..n).filter(|&j| j != i).map(|j| row[j] * x[j]).sum();
            x[i] = (1.0 - omega) * x[i] + (omega / row[i]) * (b[i] - sigma);
        }

        let change = max_abs_diff(&x, &x_old);
        if !change.is_finite() {
            warn!("SOR diverged at sweep {}", iter + 1);
            solution.iterations = iter;
            solution.failure = Some(Failure::NumericalInstability {
                iteration: iter + 1,
                message: "iterate is not finite, the sweep diverged".to_string(),
            });
            return Ok(solution);
        }

        solution.errors.push(change);
        solution.history.push(x.clone());
        solution.iterations = iter + 1;
        solution.final_error = Some(change);
        debug!("SOR sweep {}: max change = {:.6e}", iter + 1, change);

        if change < config.tolerance {
            info!("SOR (ω = {}) converged after {} sweeps", omega, iter + 1);
            solution.converged = true;
            solution.solution = Some(x);
            return Ok(solution);
        }
    }

    warn!(
        "SOR (ω = {}) did not converge after {} sweeps",
        omega, config.max_iterations
    );
    solution.solution = Some(x);
    Ok(solution)
}
