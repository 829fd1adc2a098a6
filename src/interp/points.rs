//! Validated interpolation nodes.

use crate::error::{NumlabError, Result};

/// Ordered `(x, y)` pairs with pairwise distinct, finite abscissas.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    x: Vec<f64>,
    y: Vec<f64>,
}

impl PointSet {
    /// Validate and wrap the nodes.
    ///
    /// Fails when the sequences differ in length, are empty, hold a
    /// non-finite value, or repeat an abscissa.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Result<Self> {
        if x.len() != y.len() {
            return Err(NumlabError::dimension_mismatch(format!(
                "{} x values but {} y values",
                x.len(),
                y.len()
            )));
        }
        if x.is_empty() {
            return Err(NumlabError::invalid_parameter("points", "at least one point is required"));
        }
        if x.iter().chain(&y).any(|v| !v.is_finite()) {
            return Err(NumlabError::invalid_parameter("points", "coordinates must be finite"));
        }

        let mut sorted = x.clone();
        sorted.sort_by(f64::total_cmp);
        if let Some(pair) = sorted.windows(2).find(|w| w[0] == w[1]) {
            return Err(NumlabError::DuplicateAbscissa { x: pair[0] });
        }

        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn min_x(&self) -> f64 {
        self.x.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max_x(&self) -> f64 {
        self.x.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// The same points ordered by increasing `x`.
    pub fn sorted(&self) -> Self {
        let mut order: Vec<usize> = (0..self.len()).collect();
        order.sort_by(|&i, &j| self.x[i].total_cmp(&self.x[j]));
        Self {
            x: order.iter().map(|&i| self.x[i]).collect(),
            y: order.iter().map(|&i| self.y[i]).collect(),
        }
    }

    /// Split back into the coordinate sequences.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.x, self.y)
    }
}
