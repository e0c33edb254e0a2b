use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Application-scoped values keyed by string, e.g. `app.version`.
#[derive(Clone, Default)]
pub struct AppContext {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("AppContext").field("keys", &keys).finish()
    }
}

impl AppContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Value under `key` if present and of type `T`.
    pub fn get<T: Any>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|v| v.downcast_ref::<T>())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}
