//! End-to-end recording: gate, render, fan out, deliver.

use std::sync::Arc;

use crate::config::OplogConfig;
use crate::context::{Context, ServiceRegistry, Value};
use crate::engine::{FaultReporter, TemplateEngine};
use crate::handlers::HandlerCatalog;

use super::error::RecordError;
use super::operation::OperationLog;
use super::sink::RecordSink;

/// Records operations into a sink, one engine per call.
pub struct Recorder<S> {
    config: OplogConfig,
    catalog: HandlerCatalog,
    services: ServiceRegistry,
    reporter: Option<Arc<dyn FaultReporter>>,
    sink: S,
}

impl<S: RecordSink> Recorder<S> {
    #[must_use]
    pub fn new(config: OplogConfig, sink: S) -> Self {
        Self {
            config,
            catalog: HandlerCatalog::standard(),
            services: ServiceRegistry::new(),
            reporter: None,
            sink,
        }
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: HandlerCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    #[must_use]
    pub fn with_services(mut self, services: ServiceRegistry) -> Self {
        self.services = services;
        self
    }

    #[must_use]
    pub fn with_reporter(mut self, reporter: Arc<dyn FaultReporter>) -> Self {
        self.reporter = Some(reporter);
        self
    }

    #[must_use]
    pub fn config(&self) -> &OplogConfig {
        &self.config
    }

    #[must_use]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Record `log` against `context`.
    ///
    /// `response` is the raw result of the operation, checked against the
    /// recording policy. Returns the number of records delivered, zero when
    /// the policy skips the operation.
    ///
    /// # Errors
    ///
    /// Returns the first delivery error; records before it were delivered.
    pub async fn record(
        &self,
        log: &OperationLog,
        context: &Context,
        response: Option<&Value>,
    ) -> Result<usize, RecordError> {
        if !self.config.recording.accepts(response) {
            tracing::debug!(category = %log.category, action = %log.action, "Operation not successful, skipping log");
            return Ok(0);
        }

        let records = {
            let mut engine = TemplateEngine::from_config(context, &self.config, &self.catalog)
                .with_services(&self.services);
            if let Some(reporter) = &self.reporter {
                engine = engine.with_reporter(Arc::clone(reporter));
            }
            log.compose(engine)
        };

        let count = records.len();
        for record in records {
            self.sink.deliver(record).await?;
        }
        tracing::info!(category = %log.category, action = %log.action, count, "Operation logged");
        Ok(count)
    }
}

impl<S: std::fmt::Debug> std::fmt::Debug for Recorder<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Recorder")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("services", &self.services)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}
