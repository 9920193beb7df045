//! Secondary object lookup for keys absent from the context.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use super::object::ObjectHandle;

type Provider = Box<dyn Fn() -> Option<Arc<dyn ObjectHandle>> + Send + Sync>;

enum ServiceEntry {
    Ready(Arc<dyn ObjectHandle>),
    Lazy {
        provider: Provider,
        cell: OnceLock<Option<Arc<dyn ObjectHandle>>>,
    },
}

impl ServiceEntry {
    fn get(&self) -> Option<&dyn ObjectHandle> {
        match self {
            Self::Ready(handle) => Some(handle.as_ref()),
            Self::Lazy { provider, cell } => cell.get_or_init(|| provider()).as_deref(),
        }
    }
}

/// Registry of named services, keyed by logical service name.
///
/// Lazy providers run at most once, on first lookup.
#[derive(Default)]
pub struct ServiceRegistry {
    entries: HashMap<String, ServiceEntry>,
}

impl ServiceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready instance.
    pub fn register(&mut self, name: impl Into<String>, handle: Arc<dyn ObjectHandle>) {
        self.entries
            .insert(name.into(), ServiceEntry::Ready(handle));
    }

    /// Register a provider invoked on first lookup. A provider returning
    /// `None` makes the service unresolvable.
    pub fn register_lazy<F>(&mut self, name: impl Into<String>, provider: F)
    where
        F: Fn() -> Option<Arc<dyn ObjectHandle>> + Send + Sync + 'static,
    {
        self.entries.insert(
            name.into(),
            ServiceEntry::Lazy {
                provider: Box::new(provider),
                cell: OnceLock::new(),
            },
        );
    }

    /// Whether a service is registered under this name.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Resolve a service.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn ObjectHandle> {
        self.entries.get(name).and_then(ServiceEntry::get)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.entries.keys().collect();
        names.sort();
        f.debug_struct("ServiceRegistry")
            .field("services", &names)
            .finish()
    }
}
