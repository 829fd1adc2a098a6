//! Recursive-descent parser for formulas.
//!
//! ```text
//! expr    = term { ('+' | '-') term }
//! term    = unary { ('*' | '/') unary }
//! unary   = ('+' | '-') unary | power
//! power   = primary [ ('^' | '**') unary ]
//! primary = number | variable | constant | function '(' expr ')' | '(' expr ')'
//! ```
//!
//! Exponentiation binds tighter than unary minus and is right-associative,
//! so `-x^2` is `-(x^2)` and `2^3^2` is `2^(3^2)`.

use super::ast::{constant, BinaryOp, Expr, Function};
use super::lexer::{parse_number, Lexer, Token, TokenKind};
use crate::error::{NumlabError, Result};

/// Deepest nesting accepted in a formula.
///
/// Counts parentheses, function calls, signs, exponents and every operator
/// in a chain, which bounds the depth of the parsed tree.
pub const MAX_NESTING: usize = 256;

/// Parser for formula strings.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    variable: &'a str,
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser. `variable` is the name of the free variable.
    pub fn new(mut lexer: Lexer<'a>, variable: &'a str) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            variable,
            depth: 0,
        })
    }

    /// Parse the entire formula.
    pub fn parse(&mut self) -> Result<Expr> {
        if self.current.kind == TokenKind::Eof {
            return Err(NumlabError::malformed(self.current.column, "empty formula"));
        }

        let expr = self.parse_expr()?;

        if self.current.kind != TokenKind::Eof {
            return Err(NumlabError::malformed(
                self.current.column,
                format!("unexpected '{}'", self.current.text),
            ));
        }

        Ok(expr)
    }

    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token> {
        if self.current.kind != kind {
            return Err(NumlabError::malformed(
                self.current.column,
                format!("expected {}, found {}", what, describe(&self.current)),
            ));
        }
        self.advance()
    }

    /// Enter one more level of nesting.
    fn nest(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(NumlabError::malformed(
                self.current.column,
                "formula nested too deeply",
            ));
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance()?;
            // Each operator in a chain deepens the left-leaning tree
            self.nest()?;
            let rhs = self.parse_term()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let depth = self.depth;
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance()?;
            self.nest()?;
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
        self.depth = depth;
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Minus => {
                self.advance()?;
                self.nest()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(Expr::Neg(Box::new(inner)))
            }
            TokenKind::Plus => {
                self.advance()?;
                self.nest()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;
        if self.current.kind == TokenKind::Caret {
            self.advance()?;
            self.nest()?;
            let exponent = self.parse_unary()?;
            self.depth -= 1;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.current.kind {
            TokenKind::Number => {
                let token = self.advance()?;
                Ok(Expr::Number(parse_number(&token)?))
            }
            TokenKind::Identifier => {
                let token = self.advance()?;
                self.parse_identifier(token)
            }
            TokenKind::OpenParen => {
                self.advance()?;
                self.nest()?;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::CloseParen, "')'")?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => Err(NumlabError::malformed(
                self.current.column,
                format!("expected a value, found {}", describe(&self.current)),
            )),
        }
    }

    fn parse_identifier(&mut self, token: Token) -> Result<Expr> {
        if token.text == self.variable {
            return Ok(Expr::Variable);
        }

        if let Some(func) = Function::from_name(&token.text) {
            self.expect(TokenKind::OpenParen, &format!("'(' after '{}'", func.name()))?;
            self.nest()?;
            let arg = self.parse_expr()?;
            self.expect(TokenKind::CloseParen, "')'")?;
            self.depth -= 1;
            return Ok(Expr::Call {
                func,
                arg: Box::new(arg),
            });
        }

        if let Some(value) = constant(&token.text) {
            return Ok(Expr::Number(value));
        }

        Err(NumlabError::malformed(
            token.column,
            format!("unknown identifier '{}'", token.text),
        ))
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => "end of formula".to_string(),
        _ => format!("'{}'", token.text),
    }
}
