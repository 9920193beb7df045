//! Object handle resolution and member extraction.

use std::collections::HashMap;

use crate::context::{Context, ObjectError, ObjectHandle, ServiceRegistry, Value};

/// Resolves `(obj)` keys to live objects.
///
/// Lookup order: an object stored in the context under the key, then the
/// service named by the service map (or the key itself when unmapped) in the
/// [`ServiceRegistry`].
#[derive(Debug)]
pub struct ObjectResolver<'a> {
    context: &'a Context,
    services: Option<&'a ServiceRegistry>,
    service_map: HashMap<String, String>,
}

impl<'a> ObjectResolver<'a> {
    #[must_use]
    pub fn new(context: &'a Context) -> Self {
        Self {
            context,
            services: None,
            service_map: HashMap::new(),
        }
    }

    pub(crate) fn set_services(&mut self, services: &'a ServiceRegistry) {
        self.services = Some(services);
    }

    pub(crate) fn set_service_map(&mut self, map: HashMap<String, String>) {
        self.service_map = map;
    }

    /// The key to logical service name map.
    #[must_use]
    pub fn service_map(&self) -> &HashMap<String, String> {
        &self.service_map
    }

    /// Resolve a key to an object.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<&'a dyn ObjectHandle> {
        if let Some(object) = self.context.get(key).and_then(Value::as_object) {
            return Some(object);
        }
        let services = self.services?;
        let service = self
            .service_map
            .get(key)
            .map_or(key, String::as_str);
        let found = services.get(service);
        if found.is_none() {
            tracing::trace!(key, service, "Object key unresolved");
        }
        found
    }

    /// Read a member using the fixed priority: `getMember()` getter, bare
    /// `member()` method, field, dynamic property, index access.
    ///
    /// Null results and failing method calls fall through to the next stage.
    ///
    /// # Errors
    ///
    /// Returns the first method failure when no later stage yields a value.
    pub fn read_member(
        &self,
        object: &dyn ObjectHandle,
        member: &str,
    ) -> Result<Option<Value>, ObjectError> {
        let getter = getter_name(member);
        let mut failure = None;
        for method in [getter.as_str(), member] {
            if !object.has_method(method) {
                continue;
            }
            match object.call(method, &[]) {
                Ok(value) if !value.is_null() => return Ok(Some(value)),
                Ok(_) => {}
                Err(error) => {
                    tracing::debug!(
                        method,
                        error = %error,
                        "Member accessor failed, trying next stage"
                    );
                    failure.get_or_insert(error);
                }
            }
        }

        let value = object
            .field(member)
            .filter(|v| !v.is_null())
            .or_else(|| object.dynamic_property(member).filter(|v| !v.is_null()))
            .or_else(|| object.index(member).filter(|v| !v.is_null()));
        match (value, failure) {
            (Some(value), _) => Ok(Some(value)),
            (None, Some(error)) => Err(error),
            (None, None) => Ok(None),
        }
    }

    /// Call a method if it exists. Returns `Ok(None)` for unknown methods.
    ///
    /// # Errors
    ///
    /// Propagates failures raised by the method.
    pub fn call_method(
        &self,
        object: &dyn ObjectHandle,
        method: &str,
        args: &[String],
    ) -> Result<Option<Value>, ObjectError> {
        if !object.has_method(method) {
            return Ok(None);
        }
        object.call(method, args).map(Some)
    }

    /// Split a flat, comma separated argument list. Arguments are trimmed and
    /// empty ones dropped; there is no quoting or nesting.
    #[must_use]
    pub fn parse_arguments(args: &str) -> Vec<String> {
        args.split(',')
            .map(str::trim)
            .filter(|arg| !arg.is_empty())
            .map(String::from)
            .collect()
    }
}

/// `name` -> `getName`.
fn getter_name(member: &str) -> String {
    let mut chars = member.chars();
    match chars.next() {
        Some(first) => format!("get{}{}", first.to_uppercase(), chars.as_str()),
        None => "get".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::DynObject;

    #[test]
    fn test_getter_name() {
        assert_eq!(getter_name("name"), "getName");
        assert_eq!(getter_name("userId"), "getUserId");
        assert_eq!(getter_name(""), "get");
    }

    #[test]
    fn test_parse_arguments() {
        assert_eq!(
            ObjectResolver::parse_arguments(" a, b ,,c "),
            ["a", "b", "c"]
        );
        assert!(ObjectResolver::parse_arguments("").is_empty());
        assert!(ObjectResolver::parse_arguments(" , ").is_empty());
    }

    #[test]
    fn test_resolve_prefers_context_object() {
        let ctx = Context::new().with("svc", DynObject::new("FromContext").into_value());
        let mut services = ServiceRegistry::new();
        services.register("svc", Arc::new(DynObject::new("FromRegistry")));

        let mut resolver = ObjectResolver::new(&ctx);
        resolver.set_services(&services);
        assert_eq!(resolver.resolve("svc").unwrap().type_name(), "FromContext");
    }

    #[test]
    fn test_resolve_through_service_map() {
        let ctx = Context::new().with("users", "not an object");
        let mut services = ServiceRegistry::new();
        services.register("app.user_service", Arc::new(DynObject::new("UserService")));

        let mut resolver = ObjectResolver::new(&ctx);
        resolver.set_services(&services);
        resolver.set_service_map(HashMap::from([(
            "users".to_string(),
            "app.user_service".to_string(),
        )]));

        assert_eq!(resolver.resolve("users").unwrap().type_name(), "UserService");
        assert!(resolver.resolve("orders").is_none());
    }

    #[test]
    fn test_resolve_without_registry() {
        let ctx = Context::new();
        assert!(ObjectResolver::new(&ctx).resolve("svc").is_none());
    }

    #[test]
    fn test_read_member_priority() {
        let ctx = Context::new();
        let resolver = ObjectResolver::new(&ctx);
        let obj = DynObject::new("User")
            .with_method("getName", |_| Ok(Value::from("getter")))
            .with_method("name", |_| Ok(Value::from("bare")))
            .with_field("name", "field")
            .with_method("email", |_| Ok(Value::from("bare-email")))
            .with_field("email", "field-email")
            .with_private_field("age", 30)
            .with_dynamic(|key| (key == "nickname").then(|| Value::from("dyn")))
            .with_index(|key| (key == "role").then(|| Value::from("admin")));

        let read = |member: &str| resolver.read_member(&obj, member).unwrap();
        assert_eq!(read("name"), Some(Value::from("getter")));
        assert_eq!(read("email"), Some(Value::from("bare-email")));
        assert_eq!(read("age"), Some(Value::from(30)));
        assert_eq!(read("nickname"), Some(Value::from("dyn")));
        assert_eq!(read("role"), Some(Value::from("admin")));
        assert_eq!(read("missing"), None);
    }

    #[test]
    fn test_read_member_null_getter_falls_through() {
        let ctx = Context::new();
        let resolver = ObjectResolver::new(&ctx);
        let obj = DynObject::new("User")
            .with_method("getName", |_| Ok(Value::Null))
            .with_field("name", "field");
        assert_eq!(
            resolver.read_member(&obj, "name").unwrap(),
            Some(Value::from("field"))
        );
    }

    #[test]
    fn test_read_member_failing_getter_falls_through() {
        let ctx = Context::new();
        let resolver = ObjectResolver::new(&ctx);
        fn unavailable(method: &str) -> ObjectError {
            ObjectError::Failed {
                method: method.to_string(),
                message: "unavailable".to_string(),
            }
        }
        let obj = DynObject::new("User")
            .with_method("getName", |_| Err(unavailable("getName")))
            .with_field("name", "Alice")
            .with_method("getEmail", |_| Err(unavailable("getEmail")));

        assert_eq!(
            resolver.read_member(&obj, "name").unwrap(),
            Some(Value::from("Alice"))
        );
        assert!(matches!(
            resolver.read_member(&obj, "email"),
            Err(ObjectError::Failed { method, .. }) if method == "getEmail"
        ));
    }

    #[test]
    fn test_call_method() {
        let ctx = Context::new();
        let resolver = ObjectResolver::new(&ctx);
        let obj = DynObject::new("Svc")
            .with_method("fail", |_| {
                Err(ObjectError::Failed {
                    method: "fail".to_string(),
                    message: "nope".to_string(),
                })
            });
        assert_eq!(resolver.call_method(&obj, "missing", &[]).unwrap(), None);
        assert!(resolver.call_method(&obj, "fail", &[]).is_err());
    }
}
