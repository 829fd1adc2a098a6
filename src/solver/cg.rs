//! Conjugate gradient iteration.

use log::{debug, info, warn};

use super::matrix::{dot, Matrix};
use super::{prepare_system, SolverConfig, CURVATURE_EPSILON};
use crate::error::{NumlabError, Result};
use crate::near_zero;
use crate::report::{Failure, LinearMethod, LinearSolution};

/// Solve `Ax = b` for symmetric positive-definite `A`.
///
/// Converges when the Euclidean residual norm `‖b − Ax‖` drops below the
/// tolerance. Symmetry is not verified; with `check_diagonal` set, a
/// non-positive diagonal entry (which rules out positive-definiteness) is
/// rejected up front. A vanishing curvature `pᵀAp` during the iteration
/// aborts with a [`Failure::NumericalInstability`].
pub fn conjugate_gradient(a: &Matrix, b: &[f64], config: &SolverConfig) -> Result<LinearSolution> {
    let mut x = prepare_system(a, b, config)?;
    let n = b.len();

    if config.check_diagonal {
        if let Some(i) = (0..n).find(|&i| a.diagonal(i) <= 0.0) {
            return Err(NumlabError::instability(
                0,
                format!(
                    "diagonal entry a[{}][{}] = {} is not positive, matrix is not positive-definite",
                    i,
                    i,
                    a.diagonal(i)
                ),
            ));
        }
    }

    let ax = a.mul_vec(&x);
    let mut r: Vec<f64> = b.iter().zip(&ax).map(|(bi, axi)| bi - axi).collect();
    let mut p = r.clone();
    let mut rs_old = dot(&r, &r);

    let mut solution = LinearSolution {
        method: LinearMethod::ConjugateGradient,
        solution: None,
        iterations: 0,
        converged: false,
        final_error: Some(rs_old.sqrt()),
        errors: Vec::new(),
        history: Vec::new(),
        omega: None,
        failure: None,
    };

    if rs_old.sqrt() < config.tolerance {
        info!("CG: initial guess already satisfies the tolerance");
        solution.converged = true;
        solution.solution = Some(x);
        return Ok(solution);
    }

    for iter in 0..config.max_iterations {
        let ap = a.mul_vec(&p);
        let curvature = dot(&p, &ap);
        if near_zero(curvature, CURVATURE_EPSILON) {
            let message = format!("pᵀAp = {:.3e}, matrix is not positive-definite", curvature);
            warn!("CG aborted at iteration {}: {}", iter + 1, message);
            solution.iterations = iter;
            solution.failure = Some(Failure::NumericalInstability {
                iteration: iter + 1,
                message,
            });
            return Ok(solution);
        }

        let alpha = rs_old / curvature;
        for i in 0..n {
            x[i] += alpha * p[i];
            r[i] -= alpha * ap[i];
        }
        let rs_new = dot(&r, &r);
        let residual = rs_new.sqrt();

        if !residual.is_finite() {
            warn!("CG aborted at iteration {}: residual is not finite", iter + 1);
            solution.iterations = iter;
            solution.failure = Some(Failure::NumericalInstability {
                iteration: iter + 1,
                message: "residual is not finite".to_string(),
            });
            return Ok(solution);
        }

        solution.errors.push(residual);
        solution.history.push(x.clone());
        solution.iterations = iter + 1;
        solution.final_error = Some(residual);
        debug!("CG iteration {}: residual = {:.6e}", iter + 1, residual);

        if residual < config.tolerance {
            info!("CG converged after {} iterations (residual {:.3e})", iter + 1, residual);
            solution.converged = true;
            solution.solution = Some(x);
            return Ok(solution);
        }

        let beta = rs_new / rs_old;
        for i in 0..n {
            p[i] = r[i] + beta * p[i];
        }
        rs_old = rs_new;
    }

    warn!(
        "CG did not converge after {} iterations (residual {:.3e})",
        config.max_iterations,
        solution.final_error.unwrap_or(f64::NAN)
    );
    solution.solution = Some(x);
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    fn spd_3x3() -> Matrix {
        Matrix::from_rows(&[
            vec![4.0, 1.0, 0.0],
            vec![1.0, 3.0, -1.0],
            vec![0.0, -1.0, 2.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_cg_spd() {
        let a = Matrix::from_rows(&[vec![4.0, 1.0], vec![1.0, 3.0]]).unwrap();
        let b = [1.0, 2.0];

        let result = conjugate_gradient(&a, &b, &SolverConfig::default()).unwrap();

        assert!(result.converged, "CG should converge for SPD matrix");
        assert!(result.iterations <= 2);
        let x = result.solution.unwrap();
        assert_abs_diff_eq!(x[0], 1.0 / 11.0, epsilon = 1e-8);
        assert_abs_diff_eq!(x[1], 7.0 / 11.0, epsilon = 1e-8);
        assert!(result.final_error.unwrap() < 1e-6);
    }

    #[test]
    fn test_cg_trace_is_one_entry_per_iteration() {
        let a = spd_3x3();
        let result = conjugate_gradient(&a, &[1.0, 2.0, 3.0], &SolverConfig::default()).unwrap();
        assert_eq!(result.history.len(), result.iterations);
        assert_eq!(result.errors.len(), result.iterations);
        assert_eq!(result.history.last(), result.solution.as_ref());
        assert_eq!(result.final_error, result.errors.last().copied());
    }

    #[test]
    fn test_cg_exhausts_without_error() {
        let a = spd_3x3();
        let config = SolverConfig::default().with_max_iterations(1);
        let result = conjugate_gradient(&a, &[1.0, 2.0, 3.0], &config).unwrap();
        assert_eq!(result.status(), Status::Exhausted);
        assert_eq!(result.iterations, 1);
        assert!(result.solution.is_some());
        assert!(result.final_error.unwrap() > 1e-6);
    }

    #[test]
    fn test_cg_zero_rhs_converges_immediately() {
        let result = conjugate_gradient(&spd_3x3(), &[0.0; 3], &SolverConfig::default()).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.solution.unwrap(), vec![0.0; 3]);
    }

    #[test]
    fn test_cg_initial_guess() {
        let a = spd_3x3();
        let b = a.mul_vec(&[1.0, -1.0, 2.0]);
        let config = SolverConfig::default().with_initial_guess(vec![1.0, -1.0, 2.0]);
        let result = conjugate_gradient(&a, &b, &config).unwrap();
        assert!(result.converged);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_cg_dimension_checks() {
        let a = Matrix::from_rows(&[vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let err = conjugate_gradient(&a, &[1.0, 2.0], &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, NumlabError::DimensionMismatch { .. }));

        let err = conjugate_gradient(&spd_3x3(), &[1.0, 2.0], &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, NumlabError::DimensionMismatch { .. }));

        let config = SolverConfig::default().with_initial_guess(vec![0.0]);
        let err = conjugate_gradient(&spd_3x3(), &[1.0, 2.0, 3.0], &config).unwrap_err();
        assert!(matches!(err, NumlabError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_cg_rejects_non_positive_diagonal() {
        let a = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, 0.0]]).unwrap();
        let err = conjugate_gradient(&a, &[1.0, 1.0], &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, NumlabError::NumericalInstability { iteration: 0, .. }));
    }

    #[test]
    fn test_cg_reports_vanishing_curvature() {
        // Indefinite: p = b = [1, 1] gives pᵀAp = 0
        let a = Matrix::from_rows(&[vec![0.0, 1.0], vec![1.0, -2.0]]).unwrap();
        let config = SolverConfig::default().with_diagonal_check(false);
        let result = conjugate_gradient(&a, &[1.0, 1.0], &config).unwrap();
        assert_eq!(result.status(), Status::Failed);
        assert!(result.solution.is_none());
        assert!(matches!(
            result.failure,
            Some(Failure::NumericalInstability { iteration: 1, .. })
        ));
    }

    fn spd_system() -> impl Strategy<Value = (Matrix, Vec<f64>)> {
        (2usize..6).prop_flat_map(|n| {
            (
                prop::collection::vec(-1.0f64..1.0, n * n),
                prop::collection::vec(-10.0f64..10.0, n),
            )
                .prop_map(move |(m, b)| {
                    // A = MᵀM + nI is symmetric positive-definite
                    let mut a = Matrix::identity(n);
                    for i in 0..n {
                        for j in 0..n {
                            let mtm: f64 = (0..n).map(|k| m[k * n + i] * m[k * n + j]).sum();
                            a.set(i, j, a.get(i, j) * n as f64 + mtm);
                        }
                    }
                    (a, b)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_cg_converges_on_spd((a, b) in spd_system()) {
            let config = SolverConfig::default().with_tolerance(1e-8);
            let result = conjugate_gradient(&a, &b, &config).unwrap();
            prop_assert!(result.converged);
            // n steps in exact arithmetic, allow a few extra for rounding
            prop_assert!(result.iterations <= a.rows() + 2);
            prop_assert!(result.final_error.unwrap() < 1e-8);

            let x = result.solution.unwrap();
            let ax = a.mul_vec(&x);
            for (lhs, rhs) in ax.iter().zip(&b) {
                prop_assert!((lhs - rhs).abs() < 1e-6);
            }
        }
    }
}
