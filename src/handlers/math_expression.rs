//! `{(math)expr}`: arithmetic over context variables.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::context::{format_number, Context, Value};
use crate::engine::{HandlerError, TemplateEngine};
use crate::math;

use super::ExpressionHandler;

/// Text substituted when an expression is rejected or fails to evaluate.
pub const MATH_ERROR_SENTINEL: &str = "math expression error";

static MATH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\(math\)(.+)$").expect("math pattern is valid"));

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+)").expect("variable pattern is valid"));

static ALLOWED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9+\-*/(). ]+$").expect("allow-list pattern is valid"));

/// What to substitute when the expression contains characters outside the
/// arithmetic allow-list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectPolicy {
    /// Substitute [`MATH_ERROR_SENTINEL`].
    #[default]
    Sentinel,
    /// Leave the placeholder as written.
    Decline,
}

/// Evaluates `+ - * / ( )` over numeric literals and `$name` variables.
///
/// Variables are replaced by their numeric context value, or `0` when the
/// value is missing or not numeric.
#[derive(Debug, Clone, Copy, Default)]
pub struct MathExpressionHandler {
    on_rejected: RejectPolicy,
}

impl MathExpressionHandler {
    pub const NAME: &'static str = "math_expression";

    #[must_use]
    pub fn new(on_rejected: RejectPolicy) -> Self {
        Self { on_rejected }
    }

    fn substitute_variables(expression: &str, context: &Context) -> String {
        VARIABLE_RE
            .replace_all(expression, |caps: &regex::Captures<'_>| {
                context
                    .get(&caps[1])
                    .and_then(Value::as_number)
                    .map_or_else(|| "0".to_string(), format_number)
            })
            .into_owned()
    }
}

impl ExpressionHandler for MathExpressionHandler {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Arithmetic: {(math)$price*$quantity}"
    }

    fn handle(
        &self,
        expression: &str,
        context: &Context,
        _engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        let Some(caps) = MATH_RE.captures(expression) else {
            return Ok(None);
        };
        let processed = Self::substitute_variables(&caps[1], context);

        if !ALLOWED_RE.is_match(&processed) {
            tracing::debug!(expression = %processed, "Rejected arithmetic expression");
            return Ok(match self.on_rejected {
                RejectPolicy::Sentinel => Some(MATH_ERROR_SENTINEL.to_string()),
                RejectPolicy::Decline => None,
            });
        }

        match math::evaluate(&processed) {
            Ok(result) => Ok(Some(format_number(result))),
            Err(e) => {
                tracing::debug!(expression = %processed, error = %e, "Arithmetic evaluation failed");
                Ok(Some(MATH_ERROR_SENTINEL.to_string()))
            }
        }
    }
}
