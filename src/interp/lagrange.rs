//! Lagrange form of the interpolating polynomial.

use super::{evaluate_query, plot_curve, Interpolant, PointSet, PLOT_SAMPLES};
use crate::error::Result;
use crate::report::{InterpolationMethod, InterpolationResult, Representation};

/// Interpolating polynomial kept as `Σ y_k L_k(x)`.
#[derive(Debug, Clone, PartialEq)]
pub struct LagrangeInterpolator {
    points: PointSet,
}

impl LagrangeInterpolator {
    pub fn new(points: PointSet) -> Self {
        Self { points }
    }

    /// Degree of the polynomial, `n − 1`.
    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    /// The `k`-th basis polynomial at `x`.
    pub fn basis(&self, k: usize, x: f64) -> f64 {
        let xs = self.points.x();
        xs.iter()
            .enumerate()
            .filter(|&(i, _)| i != k)
            .map(|(_, &xi)| (x - xi) / (xs[k] - xi))
            .product()
    }

    /// Evaluate, sample and package as a result.
    pub fn into_result(self, query: Option<f64>) -> Result<InterpolationResult> {
        let query = evaluate_query(&self, query)?;
        let curve = plot_curve(&self, PLOT_SAMPLES)?;
        let degree = self.degree();
        let (x_points, y_points) = self.points.into_parts();

        Ok(InterpolationResult {
            method: InterpolationMethod::Lagrange,
            x_points,
            y_points,
            degree: Some(degree),
            representation: Representation::LagrangeBasis,
            curve,
            query,
        })
    }
}

impl Interpolant for LagrangeInterpolator {
    fn evaluate(&self, x: f64) -> f64 {
        self.points
            .y()
            .iter()
            .enumerate()
            .map(|(k, &yk)| yk * self.basis(k, x))
            .sum()
    }

    fn points(&self) -> &PointSet {
        &self.points
    }
}
