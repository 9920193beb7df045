//! Configuration types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::context::Value;
use crate::handlers::RejectPolicy;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OplogConfig {
    /// `(obj)` key to logical service name.
    pub service_map: HashMap<String, String>,
    /// Handler chain selection.
    pub handlers: HandlersConfig,
    pub date: DateConfig,
    pub math: MathConfig,
    pub recording: RecordingConfig,
}

/// Which handlers make up the chain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlersConfig {
    /// Skip every built-in default handler.
    pub disable_default: bool,
    /// Per-handler switches for the defaults; missing entries count as enabled.
    pub default: HashMap<String, bool>,
    /// Extra handlers by catalog name, appended in order.
    pub custom: Vec<String>,
}

/// Date handler settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Fixed offset east of UTC. Unset uses the system local zone.
    pub utc_offset_seconds: Option<i32>,
}

/// Math handler settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    pub on_rejected: RejectPolicy,
}

/// When an operation is recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    /// Record only operations whose response carries a success code.
    pub only_success: bool,
    /// Integer codes that count as success.
    pub success_codes: Vec<i64>,
    /// Response fields checked for a status code, first present wins.
    pub code_fields: Vec<String>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            only_success: true,
            success_codes: vec![1000, 200],
            code_fields: vec!["code".to_string()],
        }
    }
}

impl RecordingConfig {
    /// Whether an operation with this response should be recorded.
    ///
    /// With `only_success` set, the first present code field must hold an
    /// integer listed in `success_codes`; a missing response never qualifies.
    #[must_use]
    pub fn accepts(&self, response: Option<&Value>) -> bool {
        if !self.only_success {
            return true;
        }
        let code = response.and_then(|response| {
            self.code_fields
                .iter()
                .find_map(|field| response.item(field))
        });
        matches!(code, Some(Value::Int(code)) if self.success_codes.contains(code))
    }
}
