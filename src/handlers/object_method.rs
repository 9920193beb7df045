//! `{(obj)key.method(a,b)}`: call a method on a live object.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::Context;
use crate::engine::{HandlerError, ObjectResolver, TemplateEngine};

use super::ExpressionHandler;

static OBJECT_METHOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(obj\)([A-Za-z0-9_]+)\.([A-Za-z0-9_]+)\((.*)\)$")
        .expect("object method pattern is valid")
});

/// Calls a method with literal string arguments.
///
/// Arguments are split on commas and trimmed. A missing method, or one
/// returning null, declines.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectMethodHandler;

impl ObjectMethodHandler {
    pub const NAME: &'static str = "object_method";
}

impl ExpressionHandler for ObjectMethodHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Object method call: {(obj)service.method(arg1,arg2)}"
    }

    fn handle(
        &self,
        expression: &str,
        _context: &Context,
        engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        let Some(caps) = OBJECT_METHOD_RE.captures(expression) else {
            return Ok(None);
        };
        let resolver = engine.objects();
        let Some(object) = resolver.resolve(&caps[1]) else {
            return Ok(None);
        };
        let args = ObjectResolver::parse_arguments(&caps[3]);
        let value = resolver
            .call_method(object, &caps[2], &args)?
            .filter(|v| !v.is_null());
        Ok(value.map(|v| v.to_string()))
    }
}
