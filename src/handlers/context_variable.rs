//! `{key}`: direct context lookup.

use crate::context::Context;
use crate::engine::{HandlerError, TemplateEngine};

use super::ExpressionHandler;

/// Substitutes a top-level context value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextVariableHandler;

impl ContextVariableHandler {
    pub const NAME: &'static str = "context_variable";
}

impl ExpressionHandler for ContextVariableHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Context variable access: {variable}"
    }

    fn handle(
        &self,
        expression: &str,
        context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        Ok(context.get(expression).map(ToString::to_string))
    }
}
