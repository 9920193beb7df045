//! Name-keyed handler factories, used to build a chain from configuration.

use std::fmt;

use indexmap::IndexMap;

use crate::config::OplogConfig;
use crate::engine::HandlerRegistry;

use super::{
    ArrayItemHandler, ContextVariableHandler, DateFormatHandler, ExpressionHandler,
    MathExpressionHandler, MultiArrayHandler, ObjectMethodHandler, ObjectPropertyHandler,
};

/// Built-in handlers installed unless configuration disables them, in chain
/// order.
pub const DEFAULT_HANDLERS: [&str; 5] = [
    ObjectMethodHandler::NAME,
    ObjectPropertyHandler::NAME,
    MultiArrayHandler::NAME,
    ArrayItemHandler::NAME,
    ContextVariableHandler::NAME,
];

type Factory = Box<dyn Fn(&OplogConfig) -> Box<dyn ExpressionHandler> + Send + Sync>;

/// Maps handler names to constructors.
///
/// Configuration refers to handlers by name; the catalog turns those names
/// into instances. Applications add their own handlers with [`add`](Self::add).
pub struct HandlerCatalog {
    factories: IndexMap<String, Factory>,
}

impl HandlerCatalog {
    /// Catalog with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Catalog with every built-in handler.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        catalog
            .add(ObjectMethodHandler::NAME, |_| Box::new(ObjectMethodHandler))
            .add(ObjectPropertyHandler::NAME, |_| Box::new(ObjectPropertyHandler))
            .add(MultiArrayHandler::NAME, |_| Box::new(MultiArrayHandler))
            .add(ArrayItemHandler::NAME, |_| Box::new(ArrayItemHandler))
            .add(ContextVariableHandler::NAME, |_| Box::new(ContextVariableHandler))
            .add(DateFormatHandler::NAME, |config| {
                Box::new(DateFormatHandler::from_offset_seconds(
                    config.date.utc_offset_seconds,
                ))
            })
            .add(MathExpressionHandler::NAME, |config| {
                Box::new(MathExpressionHandler::new(config.math.on_rejected))
            });
        catalog
    }

    /// Add or replace a factory.
    pub fn add<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&OplogConfig) -> Box<dyn ExpressionHandler> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Box::new(factory));
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Build the handler registered under `name`.
    #[must_use]
    pub fn create(&self, name: &str, config: &OplogConfig) -> Option<Box<dyn ExpressionHandler>> {
        self.factories.get(name).map(|factory| factory(config))
    }

    /// Register the handlers selected by `config` into `registry`.
    ///
    /// Defaults come first, in [`DEFAULT_HANDLERS`] order, unless
    /// `disable_default` is set or their entry in `default` is `false`. The
    /// `custom` names follow in the order listed. Unknown names are skipped
    /// with a warning.
    pub fn install(&self, config: &OplogConfig, registry: &mut HandlerRegistry) {
        let handlers = &config.handlers;

        for name in handlers.default.keys() {
            if !DEFAULT_HANDLERS.contains(&name.as_str()) {
                tracing::warn!(handler = %name, "Unknown default handler in configuration");
            }
        }

        if !handlers.disable_default {
            for name in DEFAULT_HANDLERS {
                if handlers.default.get(name).copied().unwrap_or(true) {
                    self.install_one(name, config, registry);
                }
            }
        }

        for name in &handlers.custom {
            self.install_one(name, config, registry);
        }

        tracing::debug!(handlers = ?registry.names(), "Handler chain installed");
    }

    fn install_one(&self, name: &str, config: &OplogConfig, registry: &mut HandlerRegistry) {
        match self.create(name, config) {
            Some(handler) => {
                registry.register_boxed(handler);
            }
            None => tracing::warn!(handler = name, "Unknown handler, skipping"),
        }
    }
}

impl Default for HandlerCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for HandlerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerCatalog")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
