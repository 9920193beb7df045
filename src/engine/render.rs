//! The template engine.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::config::OplogConfig;
use crate::context::{Context, ServiceRegistry};
use crate::handlers::{ExpressionHandler, HandlerCatalog};

use super::error::{EngineError, HandlerError};
use super::registry::HandlerRegistry;
use super::report::{FaultReporter, TracingReporter};
use super::resolver::ObjectResolver;
use super::scanner;

/// Renders queued templates against one request-scoped context.
///
/// One engine is built per logged operation. Handlers are registered up
/// front; rendering only reads the chain and the context.
///
/// ```
/// use oplog::context::Context;
/// use oplog::engine::TemplateEngine;
///
/// let ctx = Context::new().with("name", "Alice");
/// let mut engine = TemplateEngine::new(&ctx);
/// engine.enqueue("Updated {name}, kept {missing}");
/// assert_eq!(engine.render_all(), ["Updated Alice, kept {missing}"]);
/// ```
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    context: &'a Context,
    registry: HandlerRegistry,
    objects: ObjectResolver<'a>,
    templates: Vec<String>,
    reporter: Arc<dyn FaultReporter>,
}

impl<'a> TemplateEngine<'a> {
    /// Engine with the default handler chain.
    #[must_use]
    pub fn new(context: &'a Context) -> Self {
        let mut engine = Self::bare(context);
        HandlerCatalog::standard().install(&OplogConfig::default(), &mut engine.registry);
        engine
    }

    /// Engine with an empty handler chain.
    #[must_use]
    pub fn bare(context: &'a Context) -> Self {
        Self {
            context,
            registry: HandlerRegistry::new(),
            objects: ObjectResolver::new(context),
            templates: Vec::new(),
            reporter: Arc::new(TracingReporter),
        }
    }

    /// Engine whose handlers and service map come from configuration.
    #[must_use]
    pub fn from_config(context: &'a Context, config: &OplogConfig, catalog: &HandlerCatalog) -> Self {
        let mut engine = Self::bare(context);
        catalog.install(config, &mut engine.registry);
        engine.objects.set_service_map(config.service_map.clone());
        engine
    }

    /// Attach the registry consulted for `(obj)` keys missing from the context.
    #[must_use]
    pub fn with_services(mut self, services: &'a ServiceRegistry) -> Self {
        self.objects.set_services(services);
        self
    }

    /// Replace the key to service name map.
    #[must_use]
    pub fn with_service_map(mut self, map: HashMap<String, String>) -> Self {
        self.objects.set_service_map(map);
        self
    }

    /// Replace the collaborator that receives batch faults.
    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FaultReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Register a handler; see [`HandlerRegistry::register`].
    pub fn register_handler(&mut self, handler: impl ExpressionHandler + 'static) -> &mut Self {
        self.registry.register(handler);
        self
    }

    pub fn remove_handler(&mut self, name: &str) -> &mut Self {
        self.registry.remove(name);
        self
    }

    #[must_use]
    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut HandlerRegistry {
        &mut self.registry
    }

    #[must_use]
    pub fn context(&self) -> &'a Context {
        self.context
    }

    #[must_use]
    pub fn objects(&self) -> &ObjectResolver<'a> {
        &self.objects
    }

    /// Queue a template. No validation; duplicates allowed.
    pub fn enqueue(&mut self, template: impl Into<String>) {
        self.templates.push(template.into());
    }

    #[must_use]
    pub fn templates(&self) -> &[String] {
        &self.templates
    }

    /// Render a single template.
    ///
    /// Placeholders no handler resolves, or whose handler faults, are kept
    /// verbatim.
    #[must_use]
    pub fn render_template(&self, template: &str) -> String {
        scanner::substitute(template, |expression| {
            match self.registry.resolve(expression, self.context, self) {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(expression, error = %e, "Expression handler failed, keeping placeholder");
                    None
                }
            }
        })
    }

    /// Resolve each placeholder of `template` and report which handler, if
    /// any, produced its value.
    #[must_use]
    pub fn explain<'t>(&self, template: &'t str) -> Vec<Resolution<'t>> {
        scanner::placeholders(template)
            .map(|placeholder| {
                let expression = placeholder.expression;
                let outcome = match self.registry.resolve_named(expression, self.context, self) {
                    Ok(Some((handler, value))) => Outcome::Resolved {
                        handler: handler.to_string(),
                        value,
                    },
                    Ok(None) => Outcome::Unresolved,
                    Err(e) => Outcome::Failed(e),
                };
                Resolution {
                    expression,
                    outcome,
                }
            })
            .collect()
    }

    /// Render every queued template in order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::BatchFault`] if rendering panics.
    pub fn try_render_all(&self) -> Result<Vec<String>, EngineError> {
        panic::catch_unwind(AssertUnwindSafe(|| {
            self.templates
                .iter()
                .map(|template| self.render_template(template))
                .collect()
        }))
        .map_err(|payload| EngineError::BatchFault {
            message: panic_message(payload.as_ref()),
            templates: self.templates.len(),
        })
    }

    /// Render every queued template in order, never failing.
    ///
    /// On a batch fault the fault is reported and the original templates are
    /// returned unrendered.
    #[must_use]
    pub fn render_all(&self) -> Vec<String> {
        match self.try_render_all() {
            Ok(rendered) => rendered,
            Err(fault) => {
                let reporter = &self.reporter;
                if panic::catch_unwind(AssertUnwindSafe(|| reporter.report(&fault))).is_err() {
                    tracing::warn!("Fault reporter panicked");
                }
                self.templates.clone()
            }
        }
    }
}

/// How one placeholder was resolved, see [`TemplateEngine::explain`].
#[derive(Debug)]
pub struct Resolution<'t> {
    pub expression: &'t str,
    pub outcome: Outcome,
}

#[derive(Debug)]
pub enum Outcome {
    Resolved { handler: String, value: String },
    /// No handler produced a value; the placeholder stays literal.
    Unresolved,
    /// A handler faulted; the placeholder stays literal.
    Failed(HandlerError),
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "panic with non-string payload".into()
    }
}
