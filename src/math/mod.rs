//! Safe arithmetic evaluator for the `(math)` expression language.
//!
//! Supports numbers, `+ - * /`, unary signs and parentheses with the usual
//! precedence. Nothing else is recognised, so the evaluator cannot reach
//! variables, functions or any host code.

mod error;
mod lexer;
mod parser;

pub use error::MathError;
pub use lexer::{tokenize, Spanned, Token};
pub use parser::MAX_DEPTH;

/// Evaluate an arithmetic expression.
///
/// # Errors
///
/// Returns a [`MathError`] for disallowed characters, malformed input,
/// division by zero and overflow.
///
/// ```
/// assert_eq!(oplog::math::evaluate("2 + 3 * (4 - 1)").unwrap(), 11.0);
/// ```
pub fn evaluate(source: &str) -> Result<f64, MathError> {
    let tokens = tokenize(source)?;
    parser::Parser::new(&tokens).evaluate()
}
