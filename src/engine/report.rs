//! Diagnostic reporting for render faults.

use std::fmt;

use super::error::EngineError;

/// Receives batch faults. Implementations must not fail the caller.
pub trait FaultReporter: Send + Sync {
    fn report(&self, fault: &EngineError);
}

/// Reports faults as `tracing` error events on the `oplog` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl FaultReporter for TracingReporter {
    fn report(&self, fault: &EngineError) {
        tracing::error!(target: "oplog", error = %fault, "Failed to render operation log templates");
    }
}

impl fmt::Debug for dyn FaultReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FaultReporter")
    }
}
