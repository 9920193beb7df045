//! Engine error types.

use crate::context::ObjectError;

/// A fault raised by an expression handler while evaluating one placeholder.
///
/// The engine folds these into "no value": the placeholder stays literal.
#[derive(thiserror::Error, Debug)]
pub enum HandlerError {
    /// An object method or accessor failed.
    #[error("Object access failed: {0}")]
    Object(#[from] ObjectError),

    /// The expression matched the handler's shape but could not be used.
    #[error("Invalid expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },

    /// Failure reported by a custom handler.
    #[error("{0}")]
    Custom(String),
}

/// Errors surfaced by [`TemplateEngine::try_render_all`](super::TemplateEngine::try_render_all).
#[derive(thiserror::Error, Debug)]
pub enum EngineError {
    /// The render loop itself failed; no template output can be trusted.
    #[error("Rendering {templates} template(s) aborted: {message}")]
    BatchFault { message: String, templates: usize },
}
