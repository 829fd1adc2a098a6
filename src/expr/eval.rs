//! Tree-walking evaluation and numeric differentiation.

use super::ast::{BinaryOp, Expr};
use super::lexer::Lexer;
use super::parser::Parser;
use super::{ScalarFunction, DEFAULT_VARIABLE, DERIVATIVE_STEP, FLAT_DERIVATIVE};
use crate::error::{NumlabError, Result};

/// A formula compiled once into an expression tree.
///
/// Parsing rejects every token outside the allow-list, so evaluating an
/// `Expression` never runs anything but arithmetic on `f64`.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    source: String,
    root: Expr,
}

impl Expression {
    /// Parse a formula in the variable `x`.
    pub fn parse(source: &str) -> Result<Self> {
        Self::parse_with_variable(source, DEFAULT_VARIABLE)
    }

    /// Parse a formula in a custom variable name.
    pub fn parse_with_variable(source: &str, variable: &str) -> Result<Self> {
        let root = Parser::new(Lexer::new(source), variable)?.parse()?;
        Ok(Self {
            source: source.to_string(),
            root,
        })
    }

    /// The formula text this expression was parsed from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate the formula at `x`.
    pub fn eval(&self, x: f64) -> Result<f64> {
        if !x.is_finite() {
            return Err(NumlabError::evaluation(x, "variable is not finite"));
        }
        eval_node(&self.root, x)
    }
}

impl ScalarFunction for Expression {
    fn value(&self, x: f64) -> Result<f64> {
        self.eval(x)
    }
}

impl std::str::FromStr for Expression {
    type Err = NumlabError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn eval_node(node: &Expr, x: f64) -> Result<f64> {
    let value = match node {
        Expr::Number(v) => *v,
        Expr::Variable => x,
        Expr::Neg(inner) => -eval_node(inner, x)?,
        Expr::Binary { op, lhs, rhs } => {
            let l = eval_node(lhs, x)?;
            let r = eval_node(rhs, x)?;
            match op {
                BinaryOp::Add => l + r,
                BinaryOp::Sub => l - r,
                BinaryOp::Mul => l * r,
                BinaryOp::Div => {
                    if r == 0.0 {
                        return Err(NumlabError::evaluation(x, "division by zero"));
                    }
                    l / r
                }
                BinaryOp::Pow => {
                    let p = l.powf(r);
                    if p.is_nan() {
                        return Err(NumlabError::evaluation(
                            x,
                            format!("{} ^ {} is not a real number", l, r),
                        ));
                    }
                    p
                }
            }
        }
        Expr::Call { func, arg } => {
            let a = eval_node(arg, x)?;
            if !func.in_domain(a) {
                return Err(NumlabError::evaluation(
                    x,
                    format!("{}({}) is outside the domain", func.name(), a),
                ));
            }
            func.apply(a)
        }
    };

    if !value.is_finite() {
        return Err(NumlabError::evaluation(x, "result is not finite"));
    }
    Ok(value)
}

/// Centered finite difference `(f(x+h) - f(x-h)) / 2h` with `h = 1e-8`.
///
/// Fails with [`NumlabError::DerivativeNearZero`] when `|f'(x)| < 1e-12`.
pub fn central_difference<F: ScalarFunction + ?Sized>(f: &F, x: f64) -> Result<f64> {
    let h = DERIVATIVE_STEP;
    let forward = f.value(x + h)?;
    let backward = f.value(x - h)?;
    let derivative = (forward - backward) / (2.0 * h);

    if !derivative.is_finite() {
        return Err(NumlabError::evaluation(x, "derivative is not finite"));
    }
    if derivative.abs() < FLAT_DERIVATIVE {
        return Err(NumlabError::DerivativeNearZero { x, derivative });
    }
    Ok(derivative)
}
