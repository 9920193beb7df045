//! Expression handlers.
//!
//! Each handler recognises one expression shape and either produces the
//! substitution text or declines with `Ok(None)`. The engine tries handlers
//! in registration order and keeps the first value.
//!
//! | Name               | Shape                              |
//! |--------------------|------------------------------------|
//! | `object_method`    | `(obj)key.method(a,b)`             |
//! | `object_property`  | `(obj)key.member`                  |
//! | `multi_array`      | `key.arr.index`                    |
//! | `array_item`       | `key.index`                        |
//! | `context_variable` | `key`                              |
//! | `date_format`      | `(date)source` / `(date)source:fmt`|
//! | `math_expression`  | `(math)$price*$quantity`           |

mod array_item;
mod catalog;
mod context_variable;
mod date_format;
mod math_expression;
mod multi_array;
mod object_method;
mod object_property;

pub use array_item::ArrayItemHandler;
pub use catalog::{HandlerCatalog, DEFAULT_HANDLERS};
pub use context_variable::ContextVariableHandler;
pub use date_format::{DateFormatHandler, DEFAULT_DATE_FORMAT};
pub use math_expression::{MathExpressionHandler, RejectPolicy, MATH_ERROR_SENTINEL};
pub use multi_array::MultiArrayHandler;
pub use object_method::ObjectMethodHandler;
pub use object_property::ObjectPropertyHandler;

use crate::context::Context;
use crate::engine::{HandlerError, TemplateEngine};

/// A strategy for resolving one kind of placeholder expression.
pub trait ExpressionHandler: Send + Sync {
    /// Unique key in the handler chain.
    fn name(&self) -> &str;

    /// Human readable summary, including the accepted syntax.
    fn description(&self) -> &str;

    /// Resolve `expression`.
    ///
    /// Returns `Ok(None)` when the expression is not for this handler or
    /// cannot be resolved.
    ///
    /// # Errors
    ///
    /// Returns a [`HandlerError`] when evaluation fails after the handler
    /// accepted the expression. The engine keeps the placeholder as written.
    ///
    /// # Panics
    ///
    /// Implementations should report failures through `Err` and never panic.
    /// A panic aborts the whole batch: every queued template, the business
    /// id included, is returned unrendered.
    fn handle(
        &self,
        expression: &str,
        context: &Context,
        engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError>;
}
