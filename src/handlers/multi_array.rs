//! `{key.arr.index}`: pluck one member from every element of a collection.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::{Context, Value};
use crate::engine::{HandlerError, TemplateEngine};

use super::ExpressionHandler;

static MULTI_ARRAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z_][a-zA-Z0-9_]*)\.arr\.([a-zA-Z0-9_]+)$")
        .expect("multi array pattern is valid")
});

/// Maps `element[index]` over `context[key]` and serializes the surviving
/// values as a JSON array. Elements lacking the member are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MultiArrayHandler;

impl MultiArrayHandler {
    pub const NAME: &'static str = "multi_array";
}

impl ExpressionHandler for MultiArrayHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Multi-dimensional array access: {param.arr.key}"
    }

    fn handle(
        &self,
        expression: &str,
        context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        let Some(caps) = MULTI_ARRAY_RE.captures(expression) else {
            return Ok(None);
        };
        let index = &caps[2];
        let elements: Box<dyn Iterator<Item = &Value>> = match context.get(&caps[1]) {
            Some(Value::List(items)) => Box::new(items.iter()),
            Some(Value::Map(map)) => Box::new(map.values()),
            _ => return Ok(None),
        };

        let plucked: Vec<Value> = elements
            .filter(|element| element.is_container())
            .filter_map(|element| element.item(index).cloned())
            .collect();
        Ok(Some(Value::List(plucked).to_string()))
    }
}
