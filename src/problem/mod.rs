//! Problem descriptions and the records built from them.
//!
//! A [`Problem`] is the serializable input of one engine call. It is read
//! from JSON tagged by `method`; omitted parameters take the usual defaults
//! (tolerance `1e-6`, 1000 iterations for the linear solvers, 100 for the
//! root finders, ω = 1.5):
//!
//! ```json
//! { "method": "sor", "matrix": [[4, 1], [1, 3]], "vector": [1, 2], "omega": 1.2 }
//! ```
//!
//! Solving a problem yields an [`Outcome`]; together with a title, the
//! method tag and the input it forms a [`ProblemRecord`], the opaque unit a
//! history store keeps.

mod validate;

pub use validate::validate_problem;

use std::fmt;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::interp::{interpolate_lagrange, interpolate_newton, interpolate_spline};
use crate::report::{InterpolationResult, SolverResult};
use crate::roots::{self, find_root_bisection, find_root_newton, find_root_secant, RootConfig};
use crate::solver::{self, conjugate_gradient, sor, Matrix, SolverConfig};

fn default_linear_tolerance() -> f64 {
    solver::DEFAULT_TOLERANCE
}

fn default_linear_iterations() -> usize {
    solver::DEFAULT_MAX_ITERATIONS
}

fn default_omega() -> f64 {
    solver::DEFAULT_OMEGA
}

fn default_root_tolerance() -> f64 {
    roots::DEFAULT_TOLERANCE
}

fn default_root_iterations() -> usize {
    roots::DEFAULT_MAX_ITERATIONS
}

/// Input of a single engine call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Problem {
    ConjugateGradient {
        matrix: Vec<Vec<f64>>,
        vector: Vec<f64>,
        #[serde(default = "default_linear_tolerance")]
        tolerance: f64,
        #[serde(default = "default_linear_iterations")]
        max_iterations: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_guess: Option<Vec<f64>>,
    },
    Sor {
        matrix: Vec<Vec<f64>>,
        vector: Vec<f64>,
        #[serde(default = "default_omega")]
        omega: f64,
        #[serde(default = "default_linear_tolerance")]
        tolerance: f64,
        #[serde(default = "default_linear_iterations")]
        max_iterations: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        initial_guess: Option<Vec<f64>>,
    },
    Newton {
        formula: String,
        x0: f64,
        #[serde(default = "default_root_tolerance")]
        tolerance: f64,
        #[serde(default = "default_root_iterations")]
        max_iterations: usize,
    },
    Bisection {
        formula: String,
        a: f64,
        b: f64,
        #[serde(default = "default_root_tolerance")]
        tolerance: f64,
        #[serde(default = "default_root_iterations")]
        max_iterations: usize,
    },
    Secant {
        formula: String,
        x0: f64,
        x1: f64,
        #[serde(default = "default_root_tolerance")]
        tolerance: f64,
        #[serde(default = "default_root_iterations")]
        max_iterations: usize,
    },
    Lagrange {
        x: Vec<f64>,
        y: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<f64>,
    },
    NewtonInterpolation {
        x: Vec<f64>,
        y: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<f64>,
    },
    Spline {
        x: Vec<f64>,
        y: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        query: Option<f64>,
    },
}

/// Category under which a solved problem is filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MethodTag {
    #[serde(rename = "CG")]
    Cg,
    Sor,
    Roots,
    Interpolation,
}

impl MethodTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cg => "CG",
            Self::Sor => "SOR",
            Self::Roots => "ROOTS",
            Self::Interpolation => "INTERPOLATION",
        }
    }

    /// Title used when the caller does not supply one.
    pub fn default_title(&self) -> &'static str {
        match self {
            Self::Cg => "Conjugate Gradient",
            Self::Sor => "SOR Method",
            Self::Roots => "Root Finding",
            Self::Interpolation => "Interpolation",
        }
    }
}

impl fmt::Display for MethodTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of solving a [`Problem`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome {
    Solver(SolverResult),
    Interpolation(InterpolationResult),
}

impl Outcome {
    pub fn as_solver(&self) -> Option<&SolverResult> {
        match self {
            Self::Solver(result) => Some(result),
            Self::Interpolation(_) => None,
        }
    }

    pub fn as_interpolation(&self) -> Option<&InterpolationResult> {
        match self {
            Self::Interpolation(result) => Some(result),
            Self::Solver(_) => None,
        }
    }
}

/// A solved problem together with its input, ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemRecord {
    pub method: MethodTag,
    pub title: String,
    pub input: Problem,
    pub result: Outcome,
}

impl Problem {
    /// Decode a problem from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn method_tag(&self) -> MethodTag {
        match self {
            Self::ConjugateGradient { .. } => MethodTag::Cg,
            Self::Sor { .. } => MethodTag::Sor,
            Self::Newton { .. } | Self::Bisection { .. } | Self::Secant { .. } => MethodTag::Roots,
            Self::Lagrange { .. } | Self::NewtonInterpolation { .. } | Self::Spline { .. } => {
                MethodTag::Interpolation
            }
        }
    }

    /// Validate the input and run the requested method.
    pub fn solve(&self) -> Result<Outcome> {
        validate_problem(self)?;
        debug!("Solving {} problem", self.method_tag());

        let outcome = match self {
            Self::ConjugateGradient {
                matrix,
                vector,
                tolerance,
                max_iterations,
                initial_guess,
            } => {
                let a = Matrix::from_rows(matrix)?;
                let config = linear_config(*tolerance, *max_iterations, initial_guess);
                Outcome::Solver(conjugate_gradient(&a, vector, &config)?.into())
            }
            Self::Sor {
                matrix,
                vector,
                omega,
                tolerance,
                max_iterations,
                initial_guess,
            } => {
                let a = Matrix::from_rows(matrix)?;
                let config = linear_config(*tolerance, *max_iterations, initial_guess);
                Outcome::Solver(sor(&a, vector, *omega, &config)?.into())
            }
            Self::Newton {
                formula,
                x0,
                tolerance,
                max_iterations,
            } => {
                let config = root_config(*tolerance, *max_iterations);
                Outcome::Solver(find_root_newton(formula, *x0, &config)?.into())
            }
            Self::Bisection {
                formula,
                a,
                b,
                tolerance,
                max_iterations,
            } => {
                let config = root_config(*tolerance, *max_iterations);
                Outcome::Solver(find_root_bisection(formula, *a, *b, &config)?.into())
            }
            Self::Secant {
                formula,
                x0,
                x1,
                tolerance,
                max_iterations,
            } => {
                let config = root_config(*tolerance, *max_iterations);
                Outcome::Solver(find_root_secant(formula, *x0, *x1, &config)?.into())
            }
            Self::Lagrange { x, y, query } => Outcome::Interpolation(interpolate_lagrange(x, y, *query)?),
            Self::NewtonInterpolation { x, y, query } => {
                Outcome::Interpolation(interpolate_newton(x, y, *query)?)
            }
            Self::Spline { x, y, query } => Outcome::Interpolation(interpolate_spline(x, y, *query)?),
        };

        if let Outcome::Solver(result) = &outcome {
            info!(
                "{} problem finished: {:?} after {} iterations (final error {:?})",
                self.method_tag(),
                result.status(),
                result.iterations(),
                result.final_error()
            );
        }

        Ok(outcome)
    }

    /// Solve and wrap the input and result into a record.
    ///
    /// A blank or missing title falls back to [`MethodTag::default_title`].
    pub fn into_record(self, title: Option<&str>) -> Result<ProblemRecord> {
        let result = self.solve()?;
        let method = self.method_tag();
        let title = match title.map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => method.default_title().to_string(),
        };

        Ok(ProblemRecord {
            method,
            title,
            input: self,
            result,
        })
    }
}

fn linear_config(tolerance: f64, max_iterations: usize, initial_guess: &Option<Vec<f64>>) -> SolverConfig {
    let config = SolverConfig::new()
        .with_tolerance(tolerance)
        .with_max_iterations(max_iterations);
    match initial_guess {
        Some(x0) => config.with_initial_guess(x0.clone()),
        None => config,
    }
}

fn root_config(tolerance: f64, max_iterations: usize) -> RootConfig {
    RootConfig::new()
        .with_tolerance(tolerance)
        .with_max_iterations(max_iterations)
}

/// Read and decode a problem file.
#[cfg(feature = "cli")]
pub fn load_problem(path: &std::path::Path) -> Result<Problem> {
    let json = std::fs::read_to_string(path).map_err(|e| crate::error::NumlabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    Problem::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NumlabError;
    use crate::report::{LinearMethod, RootMethod};
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_defaults_from_json() {
        let problem = Problem::from_json(r#"{"method": "sor", "matrix": [[4, 1], [1, 3]], "vector": [1, 2]}"#).unwrap();
        assert_eq!(
            problem,
            Problem::Sor {
                matrix: vec![vec![4.0, 1.0], vec![1.0, 3.0]],
                vector: vec![1.0, 2.0],
                omega: 1.5,
                tolerance: 1e-6,
                max_iterations: 1000,
                initial_guess: None,
            }
        );

        let problem = Problem::from_json(r#"{"method": "secant", "formula": "x^2 - 2", "x0": 1, "x1": 2}"#).unwrap();
        match problem {
            Problem::Secant {
                tolerance,
                max_iterations,
                ..
            } => {
                assert_eq!(tolerance, 1e-6);
                assert_eq!(max_iterations, 100);
            }
            other => panic!("unexpected problem {:?}", other),
        }
    }

    #[test]
    fn test_unknown_method_rejected() {
        let err = Problem::from_json(r#"{"method": "gauss", "matrix": [[1]]}"#).unwrap_err();
        assert!(matches!(err, NumlabError::InvalidProblem { .. }));
    }

    #[test]
    fn test_method_tags() {
        let newton = Problem::Newton {
            formula: "x".into(),
            x0: 1.0,
            tolerance: 1e-6,
            max_iterations: 10,
        };
        assert_eq!(newton.method_tag(), MethodTag::Roots);
        assert_eq!(MethodTag::Cg.to_string(), "CG");
        assert_eq!(serde_json::to_string(&MethodTag::Interpolation).unwrap(), "\"INTERPOLATION\"");
        assert_eq!(serde_json::to_string(&MethodTag::Cg).unwrap(), "\"CG\"");
    }

    #[test]
    fn test_solve_dispatch() {
        let cg = Problem::from_json(r#"{"method": "conjugate_gradient", "matrix": [[4, 1], [1, 3]], "vector": [1, 2]}"#)
            .unwrap()
            .solve()
            .unwrap();
        match cg.as_solver() {
            Some(SolverResult::Linear(s)) => {
                assert_eq!(s.method, LinearMethod::ConjugateGradient);
                assert!(s.converged);
                let x = s.solution.as_ref().unwrap();
                assert_abs_diff_eq!(x[0], 1.0 / 11.0, epsilon = 1e-6);
                assert_abs_diff_eq!(x[1], 7.0 / 11.0, epsilon = 1e-6);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let bisection = Problem::from_json(r#"{"method": "bisection", "formula": "x^2 - 2", "a": 0, "b": 2}"#)
            .unwrap()
            .solve()
            .unwrap();
        match bisection.as_solver() {
            Some(SolverResult::Root(s)) => {
                assert_eq!(s.method, RootMethod::Bisection);
                assert_abs_diff_eq!(s.root.unwrap(), 2.0_f64.sqrt(), epsilon = 1e-6);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let spline = Problem::from_json(r#"{"method": "spline", "x": [0, 1, 2], "y": [0, 1, 0], "query": 0.5}"#)
            .unwrap()
            .solve()
            .unwrap();
        let spline = spline.as_interpolation().unwrap();
        assert_abs_diff_eq!(spline.query.unwrap().y, 0.6875, epsilon = 1e-12);
    }

    #[test]
    fn test_precondition_errors_surface() {
        let problem = Problem::from_json(r#"{"method": "bisection", "formula": "x^2 + 1", "a": -1, "b": 1}"#).unwrap();
        assert!(matches!(problem.solve(), Err(NumlabError::NoBracket { .. })));

        let problem = Problem::from_json(r#"{"method": "sor", "matrix": [[0, 1], [1, 2]], "vector": [1, 1]}"#).unwrap();
        assert!(matches!(
            problem.solve(),
            Err(NumlabError::SingularDiagonal { row: 0, .. })
        ));
    }

    #[test]
    fn test_record() {
        let problem = Problem::from_json(r#"{"method": "lagrange", "x": [0, 1], "y": [1, 3]}"#).unwrap();
        let record = problem.clone().into_record(Some("  ")).unwrap();
        assert_eq!(record.method, MethodTag::Interpolation);
        assert_eq!(record.title, "Interpolation");
        assert_eq!(record.input, problem);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["method"], "INTERPOLATION");
        assert_eq!(json["input"]["method"], "lagrange");
        assert_eq!(json["result"]["method"], "lagrange");
        assert_eq!(json["result"]["degree"], 1);
        assert!(json["result"].get("query").is_none());

        let record = Problem::from_json(r#"{"method": "newton", "formula": "x^3 - 2*x - 5", "x0": 2}"#)
            .unwrap()
            .into_record(Some("Cubic"))
            .unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["title"], "Cubic");
        assert_eq!(json["result"]["family"], "root");
        assert_eq!(json["result"]["converged"], true);
    }
}
