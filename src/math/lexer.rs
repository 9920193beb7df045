//! Tokenizer for arithmetic expressions.

use std::fmt;

use super::error::MathError;

/// Arithmetic token kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
        }
    }
}

/// A token and its byte offset in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub pos: usize,
}

/// Split an expression into tokens, skipping spaces.
///
/// # Errors
///
/// Returns an error for characters outside `0-9 . + - * / ( )` and space,
/// and for malformed numbers.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, MathError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let start = pos;
        let token = match bytes[pos] {
            b' ' => {
                pos += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                while pos < bytes.len() && (bytes[pos].is_ascii_digit() || bytes[pos] == b'.') {
                    pos += 1;
                }
                let text = &source[start..pos];
                let value = text.parse::<f64>().map_err(|_| MathError::InvalidNumber {
                    text: text.to_string(),
                    pos: start,
                })?;
                tokens.push(Spanned {
                    token: Token::Number(value),
                    pos: start,
                });
                continue;
            }
            _ => {
                let ch = source[start..].chars().next().unwrap_or('\u{fffd}');
                return Err(MathError::UnexpectedChar { ch, pos: start });
            }
        };
        tokens.push(Spanned { token, pos: start });
        pos += 1;
    }

    Ok(tokens)
}
