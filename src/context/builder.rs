//! Conventional context layout for intercepted operations.

use super::value::Value;
use super::Context;

/// Key holding the acting user's attributes.
pub const KEY_AUTH_USER: &str = "authUser";
/// Key holding the intercepted call's arguments.
pub const KEY_PARAM: &str = "param";
/// Key holding the request body merged with query parameters.
pub const KEY_REQUEST: &str = "request";
/// Key holding the `data` payload of the response.
pub const KEY_RESPONSE: &str = "response";
/// Key holding extra values attached by business code during the request.
pub const KEY_LOG_CONTEXT: &str = "logContext";

/// Builder assembling the standard audit context.
///
/// Unset sections are stored as null so templates referring to them stay
/// literal.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    auth_user: Value,
    param: Value,
    request: Value,
    response: Value,
    log_context: Value,
    extra: Vec<(String, Value)>,
}

impl ContextBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn auth_user(mut self, user: impl Into<Value>) -> Self {
        self.auth_user = user.into();
        self
    }

    #[must_use]
    pub fn param(mut self, param: impl Into<Value>) -> Self {
        self.param = param.into();
        self
    }

    #[must_use]
    pub fn request(mut self, request: impl Into<Value>) -> Self {
        self.request = request.into();
        self
    }

    #[must_use]
    pub fn response(mut self, response: impl Into<Value>) -> Self {
        self.response = response.into();
        self
    }

    #[must_use]
    pub fn log_context(mut self, log_context: impl Into<Value>) -> Self {
        self.log_context = log_context.into();
        self
    }

    /// Add a value under a custom key. Custom keys follow the standard ones.
    #[must_use]
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn build(self) -> Context {
        let mut ctx = Context::new()
            .with(KEY_AUTH_USER, self.auth_user)
            .with(KEY_PARAM, self.param)
            .with(KEY_REQUEST, self.request)
            .with(KEY_RESPONSE, self.response)
            .with(KEY_LOG_CONTEXT, self.log_context);
        for (key, value) in self.extra {
            ctx.insert(key, value);
        }
        ctx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_standard_keys() {
        let ctx = ContextBuilder::new()
            .auth_user(json!({"uid": 1, "userName": "alice"}))
            .param(json!({"id": 5}))
            .extra("tenant", "acme")
            .build();

        let keys: Vec<&String> = ctx.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            [KEY_AUTH_USER, KEY_PARAM, KEY_REQUEST, KEY_RESPONSE, KEY_LOG_CONTEXT, "tenant"]
        );
        assert!(ctx.contains_key(KEY_PARAM));
        assert!(!ctx.contains_key(KEY_RESPONSE));
        assert_eq!(ctx.get("tenant"), Some(&Value::from("acme")));
    }
}
