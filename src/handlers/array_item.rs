//! `{key.index}`: one level into a list or map.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::Context;
use crate::engine::{HandlerError, TemplateEngine};

use super::ExpressionHandler;

static ARRAY_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z_][a-zA-Z0-9_]*)\.([a-zA-Z0-9_]+)$").expect("array item pattern is valid")
});

/// Reads `context[key][index]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayItemHandler;

impl ArrayItemHandler {
    pub const NAME: &'static str = "array_item";
}

impl ExpressionHandler for ArrayItemHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Array element access: {param.key}"
    }

    fn handle(
        &self,
        expression: &str,
        context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        let Some(caps) = ARRAY_ITEM_RE.captures(expression) else {
            return Ok(None);
        };
        let value = context
            .get(&caps[1])
            .filter(|container| container.is_container())
            .and_then(|container| container.item(&caps[2]));
        Ok(value.map(ToString::to_string))
    }
}
