//! Record delivery.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::error::RecordError;
use super::operation::LogRecord;

/// Destination for composed records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Deliver one record.
    async fn deliver(&self, record: LogRecord) -> Result<(), RecordError>;
}

/// Forwards records into a bounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<LogRecord>,
}

impl ChannelSink {
    /// Create a sink and the receiver that drains it.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<LogRecord>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    #[must_use]
    pub fn from_sender(tx: mpsc::Sender<LogRecord>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl RecordSink for ChannelSink {
    async fn deliver(&self, record: LogRecord) -> Result<(), RecordError> {
        let id = record.id;
        self.tx
            .send(record)
            .await
            .map_err(|_| RecordError::SinkClosed { id })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn record(biz_no: &str) -> LogRecord {
        LogRecord {
            id: Uuid::new_v4(),
            biz_no: biz_no.to_string(),
            content: "content".to_string(),
            category: String::new(),
            action: String::new(),
            user_id: "0".to_string(),
            user_name: "unknown user".to_string(),
            organization_code: None,
            extra: serde_json::Value::Null,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_channel_sink_delivers_in_order() {
        let (sink, mut rx) = ChannelSink::new(4);
        sink.deliver(record("a")).await.unwrap();
        sink.deliver(record("b")).await.unwrap();
        drop(sink);

        assert_eq!(rx.recv().await.unwrap().biz_no, "a");
        assert_eq!(rx.recv().await.unwrap().biz_no, "b");
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_channel_sink_closed() {
        let (sink, rx) = ChannelSink::new(1);
        drop(rx);
        let rec = record("a");
        let id = rec.id;
        let err = sink.deliver(rec).await.unwrap_err();
        assert!(matches!(err, RecordError::SinkClosed { id: got } if got == id));
    }
}
