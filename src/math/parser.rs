//! Recursive-descent evaluator.
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('+' | '-') unary | primary
//! primary := NUMBER | '(' expr ')'
//! ```

use super::error::MathError;
use super::lexer::{Spanned, Token};

/// Maximum parenthesis / sign nesting.
pub const MAX_DEPTH: usize = 64;

pub(super) struct Parser<'t> {
    tokens: &'t [Spanned],
    pos: usize,
    depth: usize,
}

impl<'t> Parser<'t> {
    pub(super) fn new(tokens: &'t [Spanned]) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Evaluate the whole token stream.
    pub(super) fn evaluate(mut self) -> Result<f64, MathError> {
        if self.tokens.is_empty() {
            return Err(MathError::Empty);
        }
        let value = self.expr()?;
        if let Some(extra) = self.peek() {
            return Err(unexpected(extra));
        }
        if value.is_finite() {
            Ok(value)
        } else {
            Err(MathError::NonFinite)
        }
    }

    fn peek(&self) -> Option<&'t Spanned> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<&'t Spanned> {
        let token = self.tokens.get(self.pos);
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        while let Some(op) = self.peek() {
            match op.token {
                Token::Plus => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Token::Minus => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;
        while let Some(op) = self.peek() {
            match op.token {
                Token::Star => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Token::Slash => {
                    self.pos += 1;
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(MathError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => break,
            }
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, MathError> {
        match self.peek().map(|s| s.token) {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.nested(Self::unary)?)
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.nested(Self::unary)
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<f64, MathError> {
        let spanned = self.next().ok_or(MathError::UnexpectedEnd)?;
        match spanned.token {
            Token::Number(n) => Ok(n),
            Token::LParen => {
                let value = self.nested(Self::expr)?;
                match self.next() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(value),
                    Some(other) => Err(unexpected(other)),
                    None => Err(MathError::UnexpectedEnd),
                }
            }
            _ => Err(unexpected(spanned)),
        }
    }

    fn nested(&mut self, rule: fn(&mut Self) -> Result<f64, MathError>) -> Result<f64, MathError> {
        if self.depth >= MAX_DEPTH {
            return Err(MathError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }
}

fn unexpected(spanned: &Spanned) -> MathError {
    MathError::UnexpectedToken {
        found: spanned.token.to_string(),
        pos: spanned.pos,
    }
}
