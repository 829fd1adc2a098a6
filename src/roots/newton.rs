//! Newton-Raphson with a finite-difference derivative.

use log::{debug, info, warn};

use super::{check_seed, empty_solution, value_at, RootConfig};
use crate::error::Result;
use crate::expr::ScalarFunction;
use crate::report::{Failure, RootMethod, RootSolution, RootStep};

/// Find a root of `f` starting from `x0`.
///
/// Steps `x_new = x − f(x)/f'(x)` until `|x_new − x| < tolerance`. A tangent
/// with `|f'(x)| < 1e-12` ends the search with [`Failure::FlatTangent`].
pub fn newton_raphson<F>(f: &F, x0: f64, config: &RootConfig) -> Result<RootSolution>
where
    F: ScalarFunction + ?Sized,
{
    config.validate()?;
    check_seed("x0", x0)?;

    let mut solution = empty_solution(RootMethod::NewtonRaphson);
    let mut x = x0;

    for iter in 0..config.max_iterations {
        let step = f.value(x).and_then(|fx| f.derivative(x).map(|dfx| (fx, dfx)));
        let (fx, dfx) = match step {
            Ok(values) => values,
            Err(err) => {
                let failure = Failure::from_error(err, iter);
                warn!("Newton-Raphson stopped at x = {}: {:?}", x, failure);
                solution.failure = Some(failure);
                return Ok(solution);
            }
        };

        let x_new = x - fx / dfx;
        let error = (x_new - x).abs();

        solution.history.push(RootStep::Newton {
            index: iter + 1,
            x,
            fx,
            dfx,
            x_new,
            error,
        });
        solution.errors.push(error);
        solution.iterations = iter + 1;
        solution.final_error = Some(error);
        debug!("Newton iteration {}: x = {}, f(x) = {:.6e}, step = {:.6e}", iter + 1, x, fx, error);

        if error < config.tolerance {
            info!("Newton-Raphson converged to {} after {} iterations", x_new, iter + 1);
            solution.converged = true;
            solution.root = Some(x_new);
            solution.f_root = value_at(f, x_new);
            return Ok(solution);
        }

        x = x_new;
    }

    warn!("Newton-Raphson did not converge after {} iterations", config.max_iterations);
    solution.root = Some(x);
    Ok(solution)
}
