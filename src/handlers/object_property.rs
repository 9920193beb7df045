//! `{(obj)key.member}`: read a member of a live object.

use std::sync::LazyLock;

use regex::Regex;

use crate::context::Context;
use crate::engine::{HandlerError, TemplateEngine};

use super::ExpressionHandler;

static OBJECT_PROPERTY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\(obj\)([A-Za-z0-9_]+)\.([A-Za-z0-9_]+)$")
        .expect("object property pattern is valid")
});

/// Reads a member of the object the resolver finds for `key`.
///
/// See [`ObjectResolver::read_member`](crate::engine::ObjectResolver::read_member)
/// for the lookup priority.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectPropertyHandler;

impl ObjectPropertyHandler {
    pub const NAME: &'static str = "object_property";
}

impl ExpressionHandler for ObjectPropertyHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Object property access: {(obj)user.name}"
    }

    fn handle(
        &self,
        expression: &str,
        _context: &Context,
        engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        let Some(caps) = OBJECT_PROPERTY_RE.captures(expression) else {
            return Ok(None);
        };
        let resolver = engine.objects();
        let Some(object) = resolver.resolve(&caps[1]) else {
            return Ok(None);
        };
        let value = resolver.read_member(object, &caps[2])?;
        Ok(value.map(|v| v.to_string()))
    }
}
