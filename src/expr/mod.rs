//! Formula language for the root finders.
//!
//! A formula is a real function of one free variable, written the way it is
//! typed into a calculator. It is parsed once into an [`Expr`] tree and then
//! evaluated recursively; nothing outside the grammar below is accepted.
//!
//! # Grammar Overview
//!
//! ```text
//! formula   = expr
//! expr      = term { ('+' | '-') term }
//! term      = unary { ('*' | '/') unary }
//! unary     = ('+' | '-') unary | power
//! power     = primary [ ('^' | '**') unary ]
//! primary   = number | variable | constant | function '(' expr ')' | '(' expr ')'
//!
//! number    = digit+ ['.' digit*] [('e'|'E') ['-'|'+'] digit+]
//! variable  = "x"  (configurable)
//! constant  = "pi" | "e"
//! function  = "sin" | "cos" | "tan" | "asin" | "acos" | "atan"
//!           | "sinh" | "cosh" | "tanh" | "exp" | "ln" | "log"
//!           | "log10" | "log2" | "sqrt" | "cbrt" | "abs"
//! ```
//!
//! Nesting is capped at [`MAX_NESTING`] levels; deeper formulas are
//! rejected as malformed.
//!
//! # Example
//!
//! ```
//! use numlab_core::expr::Expression;
//!
//! let f = Expression::parse("x**3 - 2*x - 5").unwrap();
//! assert_eq!(f.eval(2.0).unwrap(), -1.0);
//! ```

mod ast;
mod eval;
mod lexer;
mod parser;

pub use ast::{BinaryOp, Expr, Function};
pub use eval::{central_difference, Expression};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{Parser, MAX_NESTING};

use crate::error::{NumlabError, Result};

/// Variable name used by [`Expression::parse`].
pub const DEFAULT_VARIABLE: &str = "x";

/// Step of the finite-difference derivative.
pub const DERIVATIVE_STEP: f64 = 1e-8;

/// Derivatives smaller than this are treated as a flat tangent.
pub const FLAT_DERIVATIVE: f64 = 1e-12;

/// A real function of one real variable.
///
/// Implemented by [`Expression`] and by plain closures `Fn(f64) -> f64`, so
/// the root finders accept either a parsed formula or Rust code.
pub trait ScalarFunction {
    /// Evaluate the function. Non-finite results are errors.
    fn value(&self, x: f64) -> Result<f64>;

    /// Estimate `f'(x)`; defaults to [`central_difference`].
    fn derivative(&self, x: f64) -> Result<f64> {
        central_difference(self, x)
    }
}

impl<F> ScalarFunction for F
where
    F: Fn(f64) -> f64,
{
    fn value(&self, x: f64) -> Result<f64> {
        let y = self(x);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(NumlabError::evaluation(x, "result is not finite"))
        }
    }
}
