//! Interval bisection.

use log::{debug, info, warn};

use super::{check_seed, empty_solution, RootConfig};
use crate::error::{NumlabError, Result};
use crate::expr::ScalarFunction;
use crate::report::{Failure, RootMethod, RootSolution, RootStep};

/// Find a root of `f` inside the bracket `[a, b]`.
///
/// `f(a)` and `f(b)` must not share a sign. An endpoint where `f` is exactly
/// zero is returned at once as a converged root. Each step halves the
/// bracket, keeping the half that still changes sign, and converges when the
/// half-width or `|f(c)|` drops below the tolerance.
///
/// The endpoints may be given in either order.
pub fn bisection<F>(f: &F, a: f64, b: f64, config: &RootConfig) -> Result<RootSolution>
where
    F: ScalarFunction + ?Sized,
{
    config.validate()?;
    check_seed("a", a)?;
    check_seed("b", b)?;

    let (mut a, mut b) = if a <= b { (a, b) } else { (b, a) };
    let mut fa = f.value(a)?;
    let fb = f.value(b)?;

    if fa != 0.0 && fb != 0.0 && (fa > 0.0) == (fb > 0.0) {
        return Err(NumlabError::NoBracket { a, b, fa, fb });
    }

    let mut solution = empty_solution(RootMethod::Bisection);

    if fa == 0.0 || fb == 0.0 {
        let root = if fa == 0.0 { a } else { b };
        info!("Bisection: endpoint {} is already a root", root);
        solution.converged = true;
        solution.root = Some(root);
        solution.f_root = Some(0.0);
        solution.final_error = Some(0.0);
        return Ok(solution);
    }

    for iter in 0..config.max_iterations {
        let c = a + (b - a) / 2.0;
        let fc = match f.value(c) {
            Ok(fc) => fc,
            Err(err) => {
                let failure = Failure::from_error(err, iter);
                warn!("Bisection stopped at c = {}: {:?}", c, failure);
                solution.failure = Some(failure);
                return Ok(solution);
            }
        };
        let error = (b - a) / 2.0;

        solution.history.push(RootStep::Bisection {
            index: iter + 1,
            a,
            b,
            c,
            fc,
            error,
        });
        solution.errors.push(error);
        solution.iterations = iter + 1;
        solution.final_error = Some(error);
        debug!("Bisection iteration {}: [{}, {}], f(c) = {:.6e}", iter + 1, a, b, fc);

        if error < config.tolerance || fc.abs() < config.tolerance {
            info!("Bisection converged to {} after {} iterations", c, iter + 1);
            solution.converged = true;
            solution.root = Some(c);
            solution.f_root = Some(fc);
            return Ok(solution);
        }

        if (fa < 0.0) != (fc < 0.0) {
            b = c;
        } else {
            a = c;
            fa = fc;
        }
    }

    warn!("Bisection did not converge after {} iterations", config.max_iterations);
    solution.root = Some(a + (b - a) / 2.0);
    Ok(solution)
}
