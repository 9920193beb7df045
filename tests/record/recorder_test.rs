use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use oplog::config::{OplogConfig, RecordingConfig};
use oplog::context::{ContextBuilder, Value};
use oplog::record::{LogRecord, OperationLog, RecordError, RecordSink, Recorder};

/// Collects delivered records in memory.
#[derive(Debug, Default, Clone)]
struct MemorySink(Arc<Mutex<Vec<LogRecord>>>);

#[async_trait]
impl RecordSink for MemorySink {
    async fn deliver(&self, record: LogRecord) -> Result<(), RecordError> {
        self.0.lock().unwrap().push(record);
        Ok(())
    }
}

fn record_everything() -> OplogConfig {
    OplogConfig {
        recording: RecordingConfig {
            only_success: false,
            ..RecordingConfig::default()
        },
        ..OplogConfig::default()
    }
}

fn context() -> oplog::context::Context {
    ContextBuilder::new()
        .auth_user(json!({"uid": 12, "userName": "张三", "organizationCode": "HQ"}))
        .param(json!({"reason": "expired"}))
        .log_context(json!({"batch": true}))
        .extra("orders", json!([{"no": "SO-1"}, {"no": "SO-2"}]))
        .build()
}

#[tokio::test]
async fn test_bulk_operation_fans_out() {
    let sink = MemorySink::default();
    let recorder = Recorder::new(record_everything(), sink.clone());
    let log = OperationLog::new(
        "{authUser.userName} cancelled {orders.arr.no}: {param.reason}",
        "{orders.arr.no}",
    )
    .category("order")
    .action("cancel");

    let count = recorder.record(&log, &context(), None).await.unwrap();
    assert_eq!(count, 2);

    let records = sink.0.lock().unwrap();
    assert_eq!(records[0].biz_no, "SO-1");
    assert_eq!(records[1].biz_no, "SO-2");
    for record in records.iter() {
        assert_eq!(record.content, r#"张三 cancelled ["SO-1","SO-2"]: expired"#);
        assert_eq!(record.user_id, "12");
        assert_eq!(record.user_name, "张三");
        assert_eq!(record.organization_code.as_deref(), Some("HQ"));
        assert_eq!(record.category, "order");
        assert_eq!(record.action, "cancel");
        assert_eq!(record.extra, json!({"batch": true}));
    }
}

#[tokio::test]
async fn test_success_gate() {
    let sink = MemorySink::default();
    let recorder = Recorder::new(OplogConfig::default(), sink.clone());
    let log = OperationLog::new("done", "{param.reason}");

    let failure = Value::from(json!({"code": 4001, "msg": "denied"}));
    assert_eq!(recorder.record(&log, &context(), Some(&failure)).await.unwrap(), 0);
    assert_eq!(recorder.record(&log, &context(), None).await.unwrap(), 0);

    let success = Value::from(json!({"code": 1000, "data": {}}));
    assert_eq!(recorder.record(&log, &context(), Some(&success)).await.unwrap(), 1);
    assert_eq!(sink.0.lock().unwrap()[0].biz_no, "expired");
}

#[tokio::test]
async fn test_unresolved_biz_no_kept_literal() {
    let sink = MemorySink::default();
    let recorder = Recorder::new(record_everything(), sink.clone());
    let log = OperationLog::new("Updated", "{param.missing}");

    recorder
        .record(&log, &ContextBuilder::new().build(), None)
        .await
        .unwrap();
    let records = sink.0.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].biz_no, "{param.missing}");
    assert_eq!(records[0].user_name, "unknown user");
    assert_eq!(records[0].user_id, "0");
}

#[test]
fn test_record_json_round_trip() {
    let ctx = context();
    let records = OperationLog::new("c", "b").compose(oplog::engine::TemplateEngine::new(&ctx));
    let line = records[0].to_json_line().unwrap();
    let parsed: LogRecord = serde_json::from_str(&line).unwrap();
    assert_eq!(parsed, records[0]);
}
