//! Ordered, name-indexed handler chain.

use std::collections::HashMap;
use std::fmt;

use crate::context::Context;
use crate::handlers::ExpressionHandler;

use super::error::HandlerError;
use super::TemplateEngine;

/// Handlers in resolution order.
///
/// Registering a new name appends it to the chain. Registering an existing
/// name swaps the handler in place, so precedence never depends on when a
/// name was overwritten.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<(String, Box<dyn ExpressionHandler>)>,
    positions: HashMap<String, usize>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under its own name.
    pub fn register(&mut self, handler: impl ExpressionHandler + 'static) -> &mut Self {
        self.register_boxed(Box::new(handler))
    }

    /// Register an already boxed handler.
    pub fn register_boxed(&mut self, handler: Box<dyn ExpressionHandler>) -> &mut Self {
        let name = handler.name().to_string();
        if let Some(&pos) = self.positions.get(&name) {
            tracing::debug!(handler = %name, position = pos, "Replacing expression handler");
            self.handlers[pos].1 = handler;
        } else {
            tracing::debug!(handler = %name, position = self.handlers.len(), "Registering expression handler");
            self.positions.insert(name.clone(), self.handlers.len());
            self.handlers.push((name, handler));
        }
        self
    }

    /// Remove a handler by name. Unknown names are ignored.
    pub fn remove(&mut self, name: &str) -> &mut Self {
        if let Some(pos) = self.positions.remove(name) {
            self.handlers.remove(pos);
            for (_, p) in self.positions.iter_mut() {
                if *p > pos {
                    *p -= 1;
                }
            }
        }
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ExpressionHandler> {
        self.positions
            .get(name)
            .map(|&pos| self.handlers[pos].1.as_ref())
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    /// Handler names in resolution order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ExpressionHandler> {
        self.handlers.iter().map(|(_, handler)| handler.as_ref())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the chain and return the first handler's value.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first handler fault.
    pub fn resolve(
        &self,
        expression: &str,
        context: &Context,
        engine: &TemplateEngine<'_>,
    ) -> Result<Option<String>, HandlerError> {
        Ok(self
            .resolve_named(expression, context, engine)?
            .map(|(_, value)| value))
    }

    /// Like [`resolve`](Self::resolve), also naming the handler that produced
    /// the value.
    ///
    /// # Errors
    ///
    /// Stops at, and returns, the first handler fault.
    pub fn resolve_named(
        &self,
        expression: &str,
        context: &Context,
        engine: &TemplateEngine<'_>,
    ) -> Result<Option<(&str, String)>, HandlerError> {
        for (name, handler) in &self.handlers {
            if let Some(value) = handler.handle(expression, context, engine)? {
                tracing::trace!(handler = %name, expression, "Expression resolved");
                return Ok(Some((name.as_str(), value)));
            }
        }
        Ok(None)
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("handlers", &self.names())
            .finish()
    }
}
