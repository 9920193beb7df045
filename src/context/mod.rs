//! Request-scoped rendering context.
//!
//! A [`Context`] is built once per logged operation and only read while
//! templates render. Values that are live objects are wrapped in an
//! [`ObjectHandle`]; keys absent from the context can still resolve to an
//! object through the [`ServiceRegistry`].

mod builder;
mod error;
mod object;
mod services;
mod value;

pub use builder::*;
pub use error::*;
pub use object::*;
pub use services::*;
pub use value::*;

use indexmap::IndexMap;

/// Ordered mapping from key to [`Value`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: IndexMap<String, Value>,
}

impl Context {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value, keeping the original position on replace.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(key.into(), value.into());
    }

    /// Look up a key. Null values are reported as missing.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|v| !v.is_null())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Build a context from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::NotAnObject`] if `json` is not an object.
    pub fn from_json(json: serde_json::Value) -> Result<Self, ContextError> {
        match json {
            serde_json::Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ContextError::NotAnObject(json_kind(&other))),
        }
    }

    /// Parse a JSON document into a context.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or not an object.
    pub fn from_json_str(text: &str) -> Result<Self, ContextError> {
        Self::from_json(serde_json::from_str(text)?)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Context {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
