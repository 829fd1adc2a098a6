//! Secant method.

use log::{debug, info, warn};

use super::{check_seed, empty_solution, value_at, RootConfig, FLAT_SECANT};
use crate::error::Result;
use crate::expr::ScalarFunction;
use crate::near_zero;
use crate::report::{Failure, RootMethod, RootSolution, RootStep};

/// Find a root of `f` from the seeds `x0` and `x1`.
///
/// Steps `x2 = x1 − f(x1)(x1 − x0)/(f(x1) − f(x0))` until `|x2 − x1| < tolerance`.
/// A secant line with `|f(x1) − f(x0)| < 1e-12` ends the search with
/// [`Failure::StagnantSecant`].
pub fn secant<F>(f: &F, x0: f64, x1: f64, config: &RootConfig) -> Result<RootSolution>
where
    F: ScalarFunction + ?Sized,
{
    config.validate()?;
    check_seed("x0", x0)?;
    check_seed("x1", x1)?;

    let mut solution = empty_solution(RootMethod::Secant);
    let (mut x0, mut x1) = (x0, x1);
    let mut f0 = None;

    for iter in 0..config.max_iterations {
        let values = match f0 {
            Some(f0) => f.value(x1).map(|f1| (f0, f1)),
            None => f.value(x0).and_then(|f0| f.value(x1).map(|f1| (f0, f1))),
        };
        let (fx0, fx1) = match values {
            Ok(values) => values,
            Err(err) => {
                let failure = Failure::from_error(err, iter);
                warn!("Secant stopped: {:?}", failure);
                solution.failure = Some(failure);
                return Ok(solution);
            }
        };

        let slope = fx1 - fx0;
        if near_zero(slope, FLAT_SECANT) {
            warn!("Secant line between {} and {} is flat", x0, x1);
            solution.failure = Some(Failure::StagnantSecant {
                iteration: iter,
                x0,
                x1,
            });
            return Ok(solution);
        }

        let x2 = x1 - fx1 * (x1 - x0) / slope;
        let error = (x2 - x1).abs();
        if !error.is_finite() {
            warn!("Secant step from {} is not finite", x1);
            solution.failure = Some(Failure::NumericalInstability {
                iteration: iter + 1,
                message: "secant step is not finite".to_string(),
            });
            return Ok(solution);
        }

        solution.history.push(RootStep::Secant {
            index: iter + 1,
            x0,
            x1,
            x2,
            fx1,
            error,
        });
        solution.errors.push(error);
        solution.iterations = iter + 1;
        solution.final_error = Some(error);
        debug!("Secant iteration {}: x2 = {}, step = {:.6e}", iter + 1, x2, error);

        if error < config.tolerance {
            info!("Secant converged to {} after {} iterations", x2, iter + 1);
            solution.converged = true;
            solution.root = Some(x2);
            solution.f_root = value_at(f, x2);
            return Ok(solution);
        }

        x0 = x1;
        x1 = x2;
        f0 = Some(fx1);
    }

    warn!("Secant did not converge after {} iterations", config.max_iterations);
    solution.root = Some(x1);
    Ok(solution)
}
