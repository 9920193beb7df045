//! Acting-user attributes pulled from the `authUser` context entry.

use crate::context::{Context, Value, KEY_AUTH_USER};

/// Shown when the user has no name.
pub const UNKNOWN_USER_NAME: &str = "unknown user";
/// Used when the user has no id.
pub const UNKNOWN_USER_ID: &str = "0";

/// The user an operation is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub name: String,
    pub organization_code: Option<String>,
}

impl AuthUser {
    /// Read `uid`, `userName` and `organizationCode` from `authUser`, which
    /// may be a map or an object. Missing values fall back to
    /// [`UNKNOWN_USER_ID`] and [`UNKNOWN_USER_NAME`].
    #[must_use]
    pub fn from_context(context: &Context) -> Self {
        let user = context.get(KEY_AUTH_USER);
        let attr = |key: &str| user.and_then(|u| attribute(u, key)).map(|v| v.to_string());
        Self {
            id: attr("uid").unwrap_or_else(|| UNKNOWN_USER_ID.to_string()),
            name: attr("userName").unwrap_or_else(|| UNKNOWN_USER_NAME.to_string()),
            organization_code: attr("organizationCode"),
        }
    }
}

fn attribute(user: &Value, key: &str) -> Option<Value> {
    if let Some(object) = user.as_object() {
        return object
            .field(key)
            .or_else(|| object.dynamic_property(key))
            .filter(|v| !v.is_null());
    }
    user.item(key).cloned()
}
