//! Record error types.

use uuid::Uuid;

/// Errors assembling or delivering audit records.
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    /// The receiving side of a sink went away.
    #[error("Failed to deliver record {id}: sink closed")]
    SinkClosed { id: Uuid },

    /// A record could not be serialized.
    #[error("Failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
