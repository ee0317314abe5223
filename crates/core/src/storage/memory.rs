use std::hash::Hash;

use dashmap::DashMap;

/// Concurrent key value table backed by a [DashMap].
#[derive(Debug)]
pub struct MemStorage<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    table: DashMap<K, V>,
}

impl<K, V> Default for MemStorage<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MemStorage<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create an empty storage.
    pub fn new() -> Self {
        Self {
            table: DashMap::default(),
        }
    }

    /// Get a cloned value by `key`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.table.get(key).map(|v| v.value().clone())
    }

    /// Put `value` under `key`, returning the previous value.
    pub fn set(&self, key: &K, value: V) -> Option<V> {
        self.table.insert(key.clone(), value)
    }

    /// Check whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.table.contains_key(key)
    }

    /// Get all entries.
    pub fn items(&self) -> Vec<(K, V)> {
        self.table
            .iter()
            .map(|kv| (kv.key().clone(), kv.value().clone()))
            .collect()
    }
}
