//! Arithmetic evaluation errors.

/// Errors produced while tokenizing or evaluating an arithmetic expression.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Nothing to evaluate.
    #[error("Empty expression")]
    Empty,

    /// A character outside the arithmetic alphabet.
    #[error("Unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },

    /// A run of digits and dots that is not a number, e.g. `1.2.3`.
    #[error("Invalid number '{text}' at {pos}")]
    InvalidNumber { text: String, pos: usize },

    /// A token that does not fit the grammar at this point.
    #[error("Unexpected {found} at {pos}")]
    UnexpectedToken { found: String, pos: usize },

    /// Input ended where an operand or `)` was required.
    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    /// Parentheses nested deeper than the evaluator allows.
    #[error("Expression nested deeper than {limit} levels")]
    TooDeep { limit: usize },

    #[error("Division by zero")]
    DivisionByZero,

    /// The result overflowed to infinity.
    #[error("Result is not a finite number")]
    NonFinite,
}
