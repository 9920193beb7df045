//! Object handles: live objects whose members are read through an explicit
//! accessor interface instead of runtime reflection.

use std::fmt;

use indexmap::IndexMap;

use super::error::ObjectError;
use super::value::Value;

/// Capability exposed by objects that templates may introspect.
///
/// Only `type_name`, `has_method` and `call` are required. The remaining
/// accessors default to "not supported" and back the later stages of the
/// member extraction priority.
pub trait ObjectHandle: Send + Sync {
    /// Name used in diagnostics.
    fn type_name(&self) -> &str;

    /// Whether a method with this exact name exists.
    fn has_method(&self, name: &str) -> bool;

    /// Invoke a method positionally with string arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ObjectError::MethodNotFound`] for unknown methods and
    /// [`ObjectError::Failed`] when the method itself fails.
    fn call(&self, name: &str, args: &[String]) -> Result<Value, ObjectError>;

    /// Direct field access, including non-public fields.
    fn field(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Catch-all property lookup for objects with dynamic members.
    fn dynamic_property(&self, _name: &str) -> Option<Value> {
        None
    }

    /// Index-style access (`object[key]`).
    fn index(&self, _key: &str) -> Option<Value> {
        None
    }

    /// JSON form used when the object is serialized inside a message.
    fn snapshot(&self) -> serde_json::Value {
        serde_json::Value::Object(serde_json::Map::new())
    }
}

/// Field visibility on a [`DynObject`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

type MethodFn = Box<dyn Fn(&[String]) -> Result<Value, ObjectError> + Send + Sync>;
type LookupFn = Box<dyn Fn(&str) -> Option<Value> + Send + Sync>;

/// An [`ObjectHandle`] assembled from registered methods and fields.
///
/// ```
/// use oplog::context::{DynObject, Value};
///
/// let user = DynObject::new("UserService")
///     .with_method("getName", |_| Ok(Value::from("Alice")))
///     .with_private_field("secret", "s3cr3t");
/// assert!(oplog::context::ObjectHandle::has_method(&user, "getName"));
/// ```
pub struct DynObject {
    type_name: String,
    methods: IndexMap<String, MethodFn>,
    fields: IndexMap<String, (Visibility, Value)>,
    dynamic: Option<LookupFn>,
    index: Option<LookupFn>,
}

impl DynObject {
    /// Create an object with no members.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            methods: IndexMap::new(),
            fields: IndexMap::new(),
            dynamic: None,
            index: None,
        }
    }

    /// Register a method.
    #[must_use]
    pub fn with_method<F>(mut self, name: impl Into<String>, method: F) -> Self
    where
        F: Fn(&[String]) -> Result<Value, ObjectError> + Send + Sync + 'static,
    {
        self.methods.insert(name.into(), Box::new(method));
        self
    }

    /// Register a public field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .insert(name.into(), (Visibility::Public, value.into()));
        self
    }

    /// Register a private field. Readable by templates, hidden from snapshots.
    #[must_use]
    pub fn with_private_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields
            .insert(name.into(), (Visibility::Private, value.into()));
        self
    }

    /// Install a dynamic property fallback.
    #[must_use]
    pub fn with_dynamic<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.dynamic = Some(Box::new(lookup));
        self
    }

    /// Install index-style access.
    #[must_use]
    pub fn with_index<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<Value> + Send + Sync + 'static,
    {
        self.index = Some(Box::new(lookup));
        self
    }

    /// Wrap into a context value.
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::object(self)
    }
}

impl ObjectHandle for DynObject {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn has_method(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    fn call(&self, name: &str, args: &[String]) -> Result<Value, ObjectError> {
        let method = self
            .methods
            .get(name)
            .ok_or_else(|| ObjectError::MethodNotFound {
                type_name: self.type_name.clone(),
                method: name.to_string(),
            })?;
        method(args)
    }

    fn field(&self, name: &str) -> Option<Value> {
        self.fields.get(name).map(|(_, value)| value.clone())
    }

    fn dynamic_property(&self, name: &str) -> Option<Value> {
        self.dynamic.as_ref().and_then(|lookup| lookup(name))
    }

    fn index(&self, key: &str) -> Option<Value> {
        self.index.as_ref().and_then(|lookup| lookup(key))
    }

    fn snapshot(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.fields
                .iter()
                .filter(|(_, (visibility, _))| *visibility == Visibility::Public)
                .map(|(name, (_, value))| (name.clone(), value.to_json()))
                .collect(),
        )
    }
}

impl fmt::Debug for DynObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynObject")
            .field("type_name", &self.type_name)
            .field("methods", &self.methods.keys().collect::<Vec<_>>())
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("dynamic", &self.dynamic.is_some())
            .field("index", &self.index.is_some())
            .finish()
    }
}
