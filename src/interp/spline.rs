//! Natural cubic spline.
//!
//! The second derivatives `M_i` at the nodes solve the tridiagonal system
//!
//! ```text
//! h_{i−1} M_{i−1} + 2 (h_{i−1} + h_i) M_i + h_i M_{i+1}
//!     = 6 ((y_{i+1} − y_i)/h_i − (y_i − y_{i−1})/h_{i−1})
//! ```
//!
//! for the interior nodes with `M_0 = M_{n−1} = 0`. The system is strictly
//! diagonally dominant, so the Thomas algorithm needs no pivoting.

use serde::Serialize;

use super::{ensure_finite, evaluate_query, plot_curve, Interpolant, PointSet, SPLINE_PLOT_SAMPLES};
use crate::error::{NumlabError, Result};
use crate::report::{InterpolationMethod, InterpolationResult, Representation};

/// One cubic piece `a + b t + c t² + d t³` with `t = x − x0`, valid on `[x0, x1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplineSegment {
    pub x0: f64,
    pub x1: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl SplineSegment {
    pub fn value(&self, x: f64) -> f64 {
        let t = x - self.x0;
        self.a + t * (self.b + t * (self.c + t * self.d))
    }

    pub fn derivative(&self, x: f64) -> f64 {
        let t = x - self.x0;
        self.b + t * (2.0 * self.c + t * 3.0 * self.d)
    }

    pub fn second_derivative(&self, x: f64) -> f64 {
        let t = x - self.x0;
        2.0 * self.c + 6.0 * self.d * t
    }
}

/// Piecewise cubic through the nodes with `S'' = 0` at both ends.
///
/// Nodes are kept sorted by `x`. Outside `[min x, max x]` the first or last
/// piece is extended.
#[derive(Debug, Clone, PartialEq)]
pub struct NaturalCubicSpline {
    points: PointSet,
    segments: Vec<SplineSegment>,
}

impl NaturalCubicSpline {
    /// Fit the spline. At least two nodes are required, and every
    /// coefficient must come out finite.
    pub fn new(points: PointSet) -> Result<Self> {
        if points.len() < 2 {
            return Err(NumlabError::invalid_parameter(
                "points",
                "a cubic spline needs at least two points",
            ));
        }

        let points = points.sorted();
        let moments = second_derivatives(points.x(), points.y());
        let (x, y) = (points.x(), points.y());

        let segments: Vec<SplineSegment> = (0..x.len() - 1)
            .map(|i| {
                let h = x[i + 1] - x[i];
                SplineSegment {
                    x0: x[i],
                    x1: x[i + 1],
                    a: y[i],
                    b: (y[i + 1] - y[i]) / h - h * (2.0 * moments[i] + moments[i + 1]) / 6.0,
                    c: moments[i] / 2.0,
                    d: (moments[i + 1] - moments[i]) / (6.0 * h),
                }
            })
            .collect();

        for s in &segments {
            ensure_finite(&[s.a, s.b, s.c, s.d], "spline coefficients")?;
        }

        Ok(Self { points, segments })
    }

    pub fn segments(&self) -> &[SplineSegment] {
        &self.segments
    }

    /// The piece covering `x`.
    pub fn segment_at(&self, x: f64) -> &SplineSegment {
        let idx = self.points.x().partition_point(|v| *v <= x);
        let last = self.segments.len() - 1;
        &self.segments[idx.saturating_sub(1).min(last)]
    }

    pub fn derivative(&self, x: f64) -> f64 {
        self.segment_at(x).derivative(x)
    }

    pub fn second_derivative(&self, x: f64) -> f64 {
        self.segment_at(x).second_derivative(x)
    }

    pub fn into_result(self, query: Option<f64>) -> Result<InterpolationResult> {
        let query = evaluate_query(&self, query)?;
        let curve = plot_curve(&self, SPLINE_PLOT_SAMPLES)?;
        let (x_points, y_points) = self.points.into_parts();

        Ok(InterpolationResult {
            method: InterpolationMethod::NaturalCubicSpline,
            x_points,
            y_points,
            degree: None,
            representation: Representation::Spline {
                segments: self.segments,
            },
            curve,
            query,
        })
    }
}

impl Interpolant for NaturalCubicSpline {
    fn evaluate(&self, x: f64) -> f64 {
        self.segment_at(x).value(x)
    }

    fn points(&self) -> &PointSet {
        &self.points
    }
}

/// Node second derivatives for sorted, distinct `x`.
fn second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut moments = vec![0.0; n];
    if n < 3 {
        return moments;
    }

    let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
    let m = n - 2;
    let mut diag = vec![0.0; m];
    let mut rhs = vec![0.0; m];

    // Forward elimination
    for k in 0..m {
        let i = k + 1;
        diag[k] = 2.0 * (h[i - 1] + h[i]);
        rhs[k] = 6.0 * ((y[i + 1] - y[i]) / h[i] - (y[i] - y[i - 1]) / h[i - 1]);
        if k > 0 {
            let factor = h[i - 1] / diag[k - 1];
            diag[k] -= factor * h[i - 1];
            rhs[k] -= factor * rhs[k - 1];
        }
    }

    // Back substitution
    for k in (0..m).rev() {
        let upper = if k + 1 < m { h[k + 1] * moments[k + 2] } else { 0.0 };
        moments[k + 1] = (rhs[k] - upper) / diag[k];
    }

    moments
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn spline(x: &[f64], y: &[f64]) -> NaturalCubicSpline {
        NaturalCubicSpline::new(PointSet::new(x.to_vec(), y.to_vec()).unwrap()).unwrap()
    }

    #[test]
    fn test_two_points_is_linear() {
        let s = spline(&[0.0, 2.0], &[1.0, 5.0]);
        assert_eq!(s.segments().len(), 1);
        assert_abs_diff_eq!(s.evaluate(0.5), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.derivative(1.7), 2.0, epsilon = 1e-12);
        assert_eq!(s.second_derivative(1.0), 0.0);
    }

    #[test]
    fn test_known_moments() {
        // Symmetric three-point case: M_1 = 6(−1 − 1) / 4 = −3
        let s = spline(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        assert_abs_diff_eq!(s.second_derivative(1.0), -3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s.evaluate(0.5), 0.6875, epsilon = 1e-12);
        assert_abs_diff_eq!(s.derivative(1.0), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_natural_boundary() {
        let s = spline(&[0.0, 1.0, 2.5, 3.0, 4.0], &[1.0, -2.0, 0.5, 3.0, 2.0]);
        assert_abs_diff_eq!(s.second_derivative(0.0), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(s.second_derivative(4.0), 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_continuity_at_knots() {
        let s = spline(&[0.0, 1.0, 2.5, 3.0, 4.0], &[1.0, -2.0, 0.5, 3.0, 2.0]);
        for pair in s.segments().windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            let knot = left.x1;
            assert_abs_diff_eq!(left.value(knot), right.value(knot), epsilon = 1e-10);
            assert_abs_diff_eq!(left.derivative(knot), right.derivative(knot), epsilon = 1e-10);
            assert_abs_diff_eq!(
                left.second_derivative(knot),
                right.second_derivative(knot),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let s = spline(&[2.0, 0.0, 1.0], &[0.0, 0.0, 1.0]);
        assert_eq!(s.points().x(), &[0.0, 1.0, 2.0]);
        assert_abs_diff_eq!(s.evaluate(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolates_end_pieces() {
        let s = spline(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]);
        let first = s.segments()[0];
        let last = s.segments()[1];
        assert_eq!(s.evaluate(-1.0), first.value(-1.0));
        assert_eq!(s.evaluate(3.0), last.value(3.0));
    }

    #[test]
    fn test_single_point_rejected() {
        let points = PointSet::new(vec![1.0], vec![1.0]).unwrap();
        assert!(matches!(
            NaturalCubicSpline::new(points),
            Err(NumlabError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_sampled_curve_endpoint_curvature() {
        let s = spline(&[0.0, 0.5, 1.5, 2.0], &[0.0, 2.0, -1.0, 1.0]);
        let result = s.clone().into_result(Some(0.75)).unwrap();
        assert_eq!(result.method, InterpolationMethod::NaturalCubicSpline);
        assert_eq!(result.degree, None);
        assert_eq!(result.curve.x.len(), SPLINE_PLOT_SAMPLES);

        let first = result.curve.x[0];
        let last = result.curve.x[SPLINE_PLOT_SAMPLES - 1];
        assert_abs_diff_eq!(s.second_derivative(first), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(s.second_derivative(last), 0.0, epsilon = 1e-10);
        assert_abs_diff_eq!(result.query.unwrap().y, s.evaluate(0.75), epsilon = 1e-15);

        match result.representation {
            Representation::Spline { segments } => assert_eq!(segments.len(), 3),
            other => panic!("unexpected representation {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_coefficients_are_rejected() {
        let points = PointSet::new(vec![0.0, 1e-300, 1.0], vec![1e300, -1e300, 1e300]).unwrap();
        assert!(matches!(
            NaturalCubicSpline::new(points),
            Err(NumlabError::NumericalInstability { .. })
        ));
    }
}
