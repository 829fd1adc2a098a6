//! Lexer (tokenizer) for formula strings.

use crate::error::{NumlabError, Result};

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// The token's text
    pub text: String,
    /// Column number (1-indexed)
    pub column: usize,
}

/// Token types in a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A numeric literal such as `2`, `0.5` or `1e-3`
    Number,
    /// A variable, constant or function name
    Identifier,
    /// '+'
    Plus,
    /// '-'
    Minus,
    /// '*'
    Star,
    /// '/'
    Slash,
    /// '^' or '**'
    Caret,
    /// Open parenthesis '('
    OpenParen,
    /// Close parenthesis ')'
    CloseParen,
    /// End of input
    Eof,
}

/// Lexer for tokenizing a single-line formula.
pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            column: 1,
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let start_column = self.column;
        let ch = match self.chars.peek().copied() {
            Some(ch) => ch,
            None => return Ok(self.token(TokenKind::Eof, String::new(), start_column)),
        };

        let token = match ch {
            '+' => self.single(TokenKind::Plus, start_column),
            '-' => self.single(TokenKind::Minus, start_column),
            '/' => self.single(TokenKind::Slash, start_column),
            '^' => self.single(TokenKind::Caret, start_column),
            '(' => self.single(TokenKind::OpenParen, start_column),
            ')' => self.single(TokenKind::CloseParen, start_column),
            '*' => {
                self.advance();
                if self.chars.peek() == Some(&'*') {
                    self.advance();
                    self.token(TokenKind::Caret, "**".to_string(), start_column)
                } else {
                    self.token(TokenKind::Star, "*".to_string(), start_column)
                }
            }
            '0'..='9' | '.' => {
                let text = self.read_number();
                self.token(TokenKind::Number, text, start_column)
            }
            _ if ch.is_alphabetic() || ch == '_' => {
                let text = self.read_identifier();
                self.token(TokenKind::Identifier, text, start_column)
            }
            _ => {
                return Err(NumlabError::malformed(
                    start_column,
                    format!("unexpected character '{}'", ch),
                ));
            }
        };

        Ok(token)
    }

    fn token(&self, kind: TokenKind, text: String, column: usize) -> Token {
        Token { kind, text, column }
    }

    fn single(&mut self, kind: TokenKind, column: usize) -> Token {
        let text = self.advance().map(String::from).unwrap_or_default();
        self.token(kind, text, column)
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        self.column += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut text = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        text
    }

    fn read_digits(&mut self, text: &mut String) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_ascii_digit() {
                text.push(ch);
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> String {
        let mut text = String::new();

        // Integer part
        self.read_digits(&mut text);

        // Decimal part
        if self.chars.peek() == Some(&'.') {
            text.push('.');
            self.advance();
            self.read_digits(&mut text);
        }

        // Exponent part, only when digits follow: `2e` stays `2` followed by `e`
        if matches!(self.chars.peek(), Some('e') | Some('E')) && self.exponent_follows() {
            if let Some(e) = self.advance() {
                text.push(e);
            }
            if let Some(&sign) = self.chars.peek() {
                if sign == '-' || sign == '+' {
                    text.push(sign);
                    self.advance();
                }
            }
            self.read_digits(&mut text);
        }

        text
    }

    fn exponent_follows(&self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        match ahead.next() {
            Some(ch) if ch.is_ascii_digit() => true,
            Some('+') | Some('-') => ahead.next().is_some_and(|ch| ch.is_ascii_digit()),
            _ => false,
        }
    }
}

/// Parse the text of a `Number` token.
pub fn parse_number(token: &Token) -> Result<f64> {
    token
        .text
        .parse::<f64>()
        .map_err(|_| NumlabError::malformed(token.column, format!("invalid number '{}'", token.text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Result<Vec<Token>> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_lexer_basic() {
        assert_eq!(
            kinds("x**3 - 2*x"),
            vec![
                TokenKind::Identifier,
                TokenKind::Caret,
                TokenKind::Number,
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Star,
                TokenKind::Identifier,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lexer_numbers() {
        let tokens = tokenize("1.5e-3 .25 2e").unwrap();
        assert_eq!(tokens[0].text, "1.5e-3");
        assert_eq!(tokens[1].text, ".25");
        assert_eq!(tokens[2].text, "2");
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
        assert_eq!(tokens[3].text, "e");
    }

    #[test]
    fn test_lexer_columns() {
        let tokens = tokenize("  sin(x)").unwrap();
        assert_eq!(tokens[0].column, 3);
        assert_eq!(tokens[1].column, 6);
    }

    #[test]
    fn test_lexer_rejects_foreign_characters() {
        let err = tokenize("x; import os").unwrap_err();
        assert!(matches!(err, NumlabError::MalformedFormula { column: 2, .. }));
    }
}
