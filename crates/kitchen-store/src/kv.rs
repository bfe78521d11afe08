//! Key-value persistence
//!
//! [`KeyValueStore`] is the generic `(collection, key) -> value` store every
//! domain object persists through. Values are JSON so any backend can hold
//! them without knowing the domain types.

use crate::error::StoreError;
use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::fmt::Debug;

/// Process-wide persistence keyed by `(collection, key)`
///
/// # Contract
/// - `set` overwrites unconditionally
/// - `get` after `delete` reports `None`
/// - `delete` of an absent key succeeds
/// - concurrent calls on one key are linearizable per caller
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Fetch the value stored under `key`, if any
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing any prior value
    async fn set(&self, collection: &str, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove `key` from `collection`
    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError>;

    /// Snapshot of every key in `collection`, unordered
    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError>;
}

/// In-memory [`KeyValueStore`]
///
/// One concurrent map per collection. Clones are not shared; wrap in `Arc`
/// to hand the same store to several callers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: DashMap<String, DashMap<String, Value>>,
}

impl MemoryStore {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in `collection`
    #[must_use]
    pub fn len(&self, collection: &str) -> usize {
        self.collections
            .get(collection)
            .map_or(0, |entries| entries.len())
    }

    #[must_use]
    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|entries| entries.get(key).map(|v| v.value().clone())))
    }

    async fn set(&self, collection: &str, key: &str, value: Value) -> Result<(), StoreError> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        if let Some(entries) = self.collections.get(collection) {
            entries.remove(key);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .collections
            .get(collection)
            .map(|entries| entries.iter().map(|e| e.key().clone()).collect())
            .unwrap_or_default())
    }
}
