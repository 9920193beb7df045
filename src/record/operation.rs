//! Operation declarations and the records they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::context::{Value, KEY_LOG_CONTEXT};
use crate::engine::TemplateEngine;

use super::biz_no::decode_biz_no;
use super::error::RecordError;
use super::user::AuthUser;

/// What to log for one kind of operation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLog {
    /// Message template, e.g. `"Updated order {param.id}"`.
    pub content: String,
    /// Business identifier template. May render to a JSON array of ids.
    pub biz_no: String,
    pub category: String,
    pub action: String,
}

impl OperationLog {
    #[must_use]
    pub fn new(content: impl Into<String>, biz_no: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            biz_no: biz_no.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.action = action.into();
        self
    }

    /// Render both templates in one batch on `engine` and build one record
    /// per business id.
    ///
    /// Templates already queued on the engine are rendered but ignored.
    #[must_use]
    pub fn compose(&self, mut engine: TemplateEngine<'_>) -> Vec<LogRecord> {
        let offset = engine.templates().len();
        engine.enqueue(&self.content);
        engine.enqueue(&self.biz_no);

        let mut rendered = engine.render_all().into_iter().skip(offset);
        let content = rendered.next().unwrap_or_default();
        let biz_no = rendered.next().unwrap_or_default();

        let context = engine.context();
        let user = AuthUser::from_context(context);
        let extra = context
            .get(KEY_LOG_CONTEXT)
            .map_or(serde_json::Value::Null, Value::to_json);
        let created_at = Utc::now();

        let records: Vec<LogRecord> = decode_biz_no(&biz_no)
            .into_iter()
            .map(|biz_no| LogRecord {
                id: Uuid::new_v4(),
                biz_no,
                content: content.clone(),
                category: self.category.clone(),
                action: self.action.clone(),
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                organization_code: user.organization_code.clone(),
                extra: extra.clone(),
                created_at,
            })
            .collect();
        tracing::debug!(
            category = %self.category,
            action = %self.action,
            records = records.len(),
            "Composed operation log"
        );
        records
    }
}

/// One audit record, ready for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub id: Uuid,
    pub biz_no: String,
    pub content: String,
    pub category: String,
    pub action: String,
    pub user_id: String,
    pub user_name: String,
    pub organization_code: Option<String>,
    /// Snapshot of the `logContext` entry.
    pub extra: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl LogRecord {
    /// Serialize as a single JSON line.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Serialize`] if serialization fails.
    pub fn to_json_line(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }
}
