//! Polynomial and spline interpolation through a set of points.
//!
//! | Method | Representation | Evaluation |
//! |--------|----------------|------------|
//! | [`LagrangeInterpolator`] | implicit basis `L_k(x) = Π_{i≠k} (x−x_i)/(x_k−x_i)` | O(n²) |
//! | [`NewtonDividedDifference`] | divided-difference table | O(n), nested multiplication |
//! | [`NaturalCubicSpline`] | one cubic per interval, `S'' = 0` at both ends | O(log n) |
//!
//! Lagrange and Newton build the same degree `n − 1` polynomial. Every
//! interpolation call also samples the interpolant over `[min x, max x]` for
//! plotting and, when asked, evaluates it at a query point.

mod lagrange;
mod newton;
mod points;
mod spline;

pub use lagrange::LagrangeInterpolator;
pub use newton::NewtonDividedDifference;
pub use points::PointSet;
pub use spline::{NaturalCubicSpline, SplineSegment};

use crate::error::{NumlabError, Result};
use crate::report::{InterpolationResult, QueryValue, SampledCurve};

/// Samples in the plotting curve of the polynomial methods.
pub const PLOT_SAMPLES: usize = 100;

/// Samples in the plotting curve of the spline.
pub const SPLINE_PLOT_SAMPLES: usize = 200;

/// A function built from interpolation nodes.
pub trait Interpolant {
    /// Evaluate the interpolant at `x`.
    fn evaluate(&self, x: f64) -> f64;

    /// The nodes the interpolant passes through.
    fn points(&self) -> &PointSet;

    /// Evaluate at `count` evenly spaced points spanning the nodes.
    fn sample(&self, count: usize) -> SampledCurve {
        let points = self.points();
        let x = linspace(points.min_x(), points.max_x(), count);
        let y = x.iter().map(|&xi| self.evaluate(xi)).collect();
        SampledCurve { x, y }
    }
}

/// `count` evenly spaced values from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (count - 1) as f64;
            (0..count)
                .map(|i| if i == count - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// Fail with [`NumlabError::NumericalInstability`] on the first non-finite value.
///
/// Interpolation does not iterate, so the error reports iteration 0.
fn ensure_finite(values: &[f64], what: &str) -> Result<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(v) => Err(NumlabError::instability(0, format!("{} contains {}", what, v))),
        None => Ok(()),
    }
}

fn plot_curve<I: Interpolant>(interpolant: &I, count: usize) -> Result<SampledCurve> {
    let curve = interpolant.sample(count);
    ensure_finite(&curve.y, "sampled curve")?;
    Ok(curve)
}

fn evaluate_query<I: Interpolant>(interpolant: &I, query: Option<f64>) -> Result<Option<QueryValue>> {
    match query {
        Some(x) if !x.is_finite() => Err(NumlabError::invalid_parameter(
            "query",
            format!("must be finite, got {}", x),
        )),
        Some(x) => {
            let y = interpolant.evaluate(x);
            ensure_finite(&[y], "query value")?;
            Ok(Some(QueryValue { x, y }))
        }
        None => Ok(None),
    }
}

/// Lagrange interpolation through `(x[i], y[i])`.
pub fn interpolate_lagrange(x: &[f64], y: &[f64], query: Option<f64>) -> Result<InterpolationResult> {
    let interpolant = LagrangeInterpolator::new(PointSet::new(x.to_vec(), y.to_vec())?);
    interpolant.into_result(query)
}

/// Newton divided-difference interpolation through `(x[i], y[i])`.
pub fn interpolate_newton(x: &[f64], y: &[f64], query: Option<f64>) -> Result<InterpolationResult> {
    let interpolant = NewtonDividedDifference::new(PointSet::new(x.to_vec(), y.to_vec())?)?;
    interpolant.into_result(query)
}

/// Natural cubic spline through `(x[i], y[i])`.
pub fn interpolate_spline(x: &[f64], y: &[f64], query: Option<f64>) -> Result<InterpolationResult> {
    let interpolant = NaturalCubicSpline::new(PointSet::new(x.to_vec(), y.to_vec())?)?;
    interpolant.into_result(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    #[test]
    fn test_linspace() {
        assert_eq!(linspace(0.0, 1.0, 5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(linspace(2.0, 2.0, 3), vec![2.0, 2.0, 2.0]);
        assert_eq!(linspace(0.0, 1.0, 1), vec![0.0]);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }

    #[test]
    fn test_curve_sizes() {
        let x = [0.0, 1.0, 3.0];
        let y = [1.0, 2.0, 0.0];
        let lagrange = interpolate_lagrange(&x, &y, None).unwrap();
        let newton = interpolate_newton(&x, &y, None).unwrap();
        let spline = interpolate_spline(&x, &y, None).unwrap();
        assert_eq!(lagrange.curve.x.len(), PLOT_SAMPLES);
        assert_eq!(newton.curve.y.len(), PLOT_SAMPLES);
        assert_eq!(spline.curve.x.len(), SPLINE_PLOT_SAMPLES);
        assert_eq!(spline.curve.x[0], 0.0);
        assert_eq!(*spline.curve.x.last().unwrap(), 3.0);
    }

    #[test]
    fn test_query_only_when_requested() {
        let x = [0.0, 1.0];
        let y = [0.0, 2.0];
        assert!(interpolate_lagrange(&x, &y, None).unwrap().query.is_none());
        let q = interpolate_lagrange(&x, &y, Some(0.25)).unwrap().query.unwrap();
        assert_abs_diff_eq!(q.y, 0.5, epsilon = 1e-12);
        assert!(interpolate_newton(&x, &y, Some(f64::INFINITY)).is_err());
    }

    #[test]
    fn test_invalid_point_sets() {
        let err = interpolate_lagrange(&[0.0, 1.0], &[1.0], None).unwrap_err();
        assert!(matches!(err, NumlabError::DimensionMismatch { .. }));
        let err = interpolate_newton(&[0.0, 1.0, 0.0], &[1.0, 2.0, 3.0], None).unwrap_err();
        assert!(matches!(err, NumlabError::DuplicateAbscissa { .. }));
        let err = interpolate_spline(&[1.0, 1.0], &[1.0, 2.0], None).unwrap_err();
        assert!(matches!(err, NumlabError::DuplicateAbscissa { .. }));
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = interpolate_newton(&[0.0, 5e-324], &[0.0, 1e300], Some(0.0)).unwrap_err();
        assert!(matches!(err, NumlabError::NumericalInstability { .. }));

        let err = interpolate_lagrange(&[0.0, 1e-300, 1.0], &[1e300, -1e300, 1e300], None).unwrap_err();
        assert!(matches!(err, NumlabError::NumericalInstability { .. }));

        let err = interpolate_spline(&[0.0, 1e-300, 1.0], &[1e300, -1e300, 1e300], None).unwrap_err();
        assert!(matches!(err, NumlabError::NumericalInstability { .. }));
    }

    #[test]
    fn test_query_overflow_is_reported() {
        // Finite on [0, 1] but the cubic overflows far outside it
        let x = [0.0, 0.5, 1.0, 1.5];
        let y = [1e300, -1e300, 1e300, -1e300];
        assert!(interpolate_lagrange(&x, &y, None).is_ok());
        let err = interpolate_lagrange(&x, &y, Some(1e10)).unwrap_err();
        assert!(matches!(err, NumlabError::NumericalInstability { .. }));
    }

    fn point_set() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (2usize..7).prop_flat_map(|n| {
            (
                prop::collection::vec(0.5f64..1.0, n),
                prop::collection::vec(-5.0f64..5.0, n),
            )
                .prop_map(|(gaps, y)| {
                    // Cumulative gaps give distinct, well separated abscissas
                    let x: Vec<f64> = gaps
                        .iter()
                        .scan(0.0, |acc, g| {
                            *acc += g;
                            Some(*acc)
                        })
                        .collect();
                    (x, y)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_lagrange_and_newton_agree((x, y) in point_set()) {
            let lagrange = interpolate_lagrange(&x, &y, None).unwrap();
            let newton = interpolate_newton(&x, &y, None).unwrap();
            for (a, b) in lagrange.curve.y.iter().zip(&newton.curve.y) {
                prop_assert!((a - b).abs() <= 1e-6 * (1.0 + a.abs()));
            }
        }

        #[test]
        fn prop_interpolants_pass_through_nodes((x, y) in point_set()) {
            let lagrange = LagrangeInterpolator::new(PointSet::new(x.clone(), y.clone()).unwrap());
            let newton = NewtonDividedDifference::new(PointSet::new(x.clone(), y.clone()).unwrap()).unwrap();
            let spline = NaturalCubicSpline::new(PointSet::new(x.clone(), y.clone()).unwrap()).unwrap();
            for (&xk, &yk) in x.iter().zip(&y) {
                prop_assert!((lagrange.evaluate(xk) - yk).abs() < 1e-9);
                prop_assert!((newton.evaluate(xk) - yk).abs() < 1e-7);
                prop_assert!((spline.evaluate(xk) - yk).abs() < 1e-9);
            }
        }
    }
}
