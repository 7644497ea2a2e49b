//! Per-type user data
//!
//! Arbitrary values attached to a class or enum at registration, keyed by
//! name. The store is frozen with its descriptor.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// Key-value store attached to a type descriptor.
#[derive(Default, Clone)]
pub struct UserData {
    entries: FxHashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl UserData {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach `value` under `key`, replacing any previous entry
    pub(crate) fn insert<V: Any + Send + Sync>(&mut self, key: &str, value: V) {
        self.entries.insert(key.to_string(), Arc::new(value));
    }

    /// Value under `key`, if present and of type `V`
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.entries.get(key)?.downcast_ref::<V>()
    }

    /// Type-erased value under `key`
    pub fn get_raw(&self, key: &str) -> Option<&Arc<dyn Any + Send + Sync>> {
        self.entries.get(key)
    }

    /// Check if an entry exists under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys of all entries, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for UserData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.keys().collect();
        keys.sort_unstable();
        f.debug_struct("UserData").field("keys", &keys).finish()
    }
}
