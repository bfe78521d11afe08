//! Testing utilities for Kitchen workspace
//!
//! Shared fakes, fixtures, and store doubles.

#![allow(missing_docs)]

use async_trait::async_trait;
use kitchen_sandbox::{EntropyError, EntropySource, SandboxCoordinator};
use kitchen_store::{
    Checksum, ContentStore, KeyValueStore, MemoryContentStore, MemoryStore, StoreError,
};
use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

pub fn checksums(items: &[&str]) -> Vec<Checksum> {
    items
        .iter()
        .map(|s| Checksum::new(*s).unwrap())
        .collect()
}

pub fn checksum(item: &str) -> Checksum {
    Checksum::new(item).unwrap()
}

/// Coordinator over fresh in-memory stores, with `present` already uploaded
pub fn memory_coordinator(present: &[&str]) -> SandboxCoordinator<MemoryStore, MemoryContentStore> {
    let content: MemoryContentStore = checksums(present).into_iter().collect();
    SandboxCoordinator::new(Arc::new(MemoryStore::new()), Arc::new(content))
}

/// Key-value store whose first `collisions` lookups report a hit
#[derive(Debug, Default)]
pub struct CollidingStore {
    inner: MemoryStore,
    collisions_left: AtomicU32,
    gets: AtomicU32,
}

impl CollidingStore {
    pub fn new(collisions: u32) -> Self {
        Self {
            inner: MemoryStore::new(),
            collisions_left: AtomicU32::new(collisions),
            gets: AtomicU32::new(0),
        }
    }

    /// Number of `get` calls seen so far
    pub fn get_calls(&self) -> u32 {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CollidingStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        let collided = self
            .collisions_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if collided {
            return Ok(Some(Value::Object(serde_json::Map::new())));
        }
        self.inner.get(collection, key).await
    }

    async fn set(&self, collection: &str, key: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(collection, key, value).await
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), StoreError> {
        self.inner.delete(collection, key).await
    }

    async fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        self.inner.list(collection).await
    }
}

/// Key-value store where every call fails
#[derive(Debug, Default)]
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _collection: &str, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::backend("failing", "get refused"))
    }

    async fn set(&self, _collection: &str, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::backend("failing", "set refused"))
    }

    async fn delete(&self, _collection: &str, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::backend("failing", "delete refused"))
    }

    async fn list(&self, _collection: &str) -> Result<Vec<String>, StoreError> {
        Err(StoreError::backend("failing", "list refused"))
    }
}

/// Content store where every lookup fails
#[derive(Debug, Default)]
pub struct FailingContentStore;

#[async_trait]
impl ContentStore for FailingContentStore {
    async fn exists(&self, _checksum: &Checksum) -> Result<bool, StoreError> {
        Err(StoreError::backend("failing", "exists refused"))
    }
}

/// Entropy source that always fails, counting calls
#[derive(Debug, Default)]
pub struct FailingEntropy {
    calls: AtomicU32,
}

impl FailingEntropy {
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EntropySource for FailingEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EntropyError::new(buf.len(), "source exhausted"))
    }
}

/// Entropy source that always yields the same byte, so every id is equal
#[derive(Debug, Clone, Copy)]
pub struct FixedEntropy(pub u8);

impl EntropySource for FixedEntropy {
    fn fill(&self, buf: &mut [u8]) -> Result<(), EntropyError> {
        buf.fill(self.0);
        Ok(())
    }
}
