//! Newton form of the interpolating polynomial.

use super::{ensure_finite, evaluate_query, plot_curve, Interpolant, PointSet, PLOT_SAMPLES};
use crate::error::Result;
use crate::report::{InterpolationMethod, InterpolationResult, Representation};

/// Interpolating polynomial stored as a divided-difference table.
///
/// `table[i][j]` holds `f[x_i, …, x_{i+j}]`; entries with `i + j ≥ n` are
/// zero. Row 0 gives the coefficients of
/// `c_0 + c_1 (x − x_0) + … + c_{n−1} (x − x_0)…(x − x_{n−2})`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonDividedDifference {
    points: PointSet,
    table: Vec<Vec<f64>>,
}

impl NewtonDividedDifference {
    /// Build the table. Fails when a divided difference overflows.
    pub fn new(points: PointSet) -> Result<Self> {
        let n = points.len();
        let (x, y) = (points.x(), points.y());

        let mut table = vec![vec![0.0; n]; n];
        for (row, &yi) in table.iter_mut().zip(y) {
            row[0] = yi;
        }
        for j in 1..n {
            for i in 0..n - j {
                table[i][j] = (table[i + 1][j - 1] - table[i][j - 1]) / (x[i + j] - x[i]);
            }
        }

        for row in &table {
            ensure_finite(row, "divided-difference table")?;
        }

        Ok(Self { points, table })
    }

    pub fn degree(&self) -> usize {
        self.points.len() - 1
    }

    pub fn table(&self) -> &[Vec<f64>] {
        &self.table
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.table[0]
    }

    pub fn into_result(self, query: Option<f64>) -> Result<InterpolationResult> {
        let query = evaluate_query(&self, query)?;
        let curve = plot_curve(&self, PLOT_SAMPLES)?;
        let degree = self.degree();
        let coefficients = self.table[0].clone();
        let (x_points, y_points) = self.points.into_parts();

        Ok(InterpolationResult {
            method: InterpolationMethod::NewtonDividedDifference,
            x_points,
            y_points,
            degree: Some(degree),
            representation: Representation::DividedDifferences {
                table: self.table,
                coefficients,
            },
            curve,
            query,
        })
    }
}

impl Interpolant for NewtonDividedDifference {
    /// Nested multiplication from the highest coefficient down.
    fn evaluate(&self, x: f64) -> f64 {
        let xs = self.points.x();
        let coefficients = self.coefficients();
        let n = coefficients.len();
        let mut value = coefficients[n - 1];
        for k in (0..n - 1).rev() {
            value = value * (x - xs[k]) + coefficients[k];
        }
        value
    }

    fn points(&self) -> &PointSet {
        &self.points
    }
}
