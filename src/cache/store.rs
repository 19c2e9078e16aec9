//! Store capability and the in-memory implementation
//!
//! A [`Store`] is any asynchronous persistence mechanism that can return the
//! last cached record and save a new one. It may key records by the
//! [`CacheKey`] (per-argument caching) or ignore the key entirely and hold a
//! single record.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use super::fetch::CacheKey;

/// Errors raised by a store's `get` or `put`
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying I/O failed
    #[error("cache store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded or decoded
    #[error("cache record could not be encoded or decoded: {0}")]
    Codec(#[from] serde_json::Error),
}

/// Asynchronous persistence for cached records of type `T`
///
/// The decorator treats a failing `get` as a cache miss and a failing `put`
/// as best-effort, so implementations are free to fail without taking the
/// data path down with them.
#[async_trait]
pub trait Store<T>: Send + Sync {
    /// Returns the last record cached under `key`, if any.
    async fn get(&self, key: &CacheKey) -> Result<Option<T>, StoreError>;

    /// Saves `record` under `key`, overwriting any previous record.
    async fn put(&self, record: &T, key: &CacheKey) -> Result<(), StoreError>;
}

#[async_trait]
impl<T, S> Store<T> for Arc<S>
where
    T: Send + Sync,
    S: Store<T> + ?Sized,
{
    async fn get(&self, key: &CacheKey) -> Result<Option<T>, StoreError> {
        (**self).get(key).await
    }

    async fn put(&self, record: &T, key: &CacheKey) -> Result<(), StoreError> {
        (**self).put(record, key).await
    }
}

/// In-memory store keyed by [`CacheKey`]
///
/// Clones records in and out; never fails. Share it behind an [`Arc`] to
/// keep a handle on the cache contents after handing the store to a
/// decorator.
#[derive(Debug, Default)]
pub struct MemoryStore<T> {
    records: RwLock<HashMap<CacheKey, T>>,
}

impl<T> MemoryStore<T> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl<T> Store<T> for MemoryStore<T>
where
    T: Clone + Send + Sync,
{
    async fn get(&self, key: &CacheKey) -> Result<Option<T>, StoreError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, record: &T, key: &CacheKey) -> Result<(), StoreError> {
        self.records.write().await.insert(key.clone(), record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_get_on_empty_store_returns_none() {
        let store: MemoryStore<String> = MemoryStore::new();
        let key = CacheKey::new("latest", &());
        assert!(store.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_then_get_round_trips() {
        let store = MemoryStore::new();
        let key = CacheKey::new("latest", &());

        store.put(&"rates".to_string(), &key).await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), Some("rates".to_string()));
    }

    #[tokio::test]
    async fn test_put_overwrites_previous_record() {
        let store = MemoryStore::new();
        let key = CacheKey::new("latest", &());

        store.put(&"first".to_string(), &key).await.unwrap();
        store.put(&"second".to_string(), &key).await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), Some("second".to_string()));
    }

    #[tokio::test]
    async fn test_records_are_independent_per_key() {
        let store = MemoryStore::new();
        let latest = CacheKey::new("latest", &());
        let historical = CacheKey::new(
            "historical",
            &chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
        );

        store.put(&"a".to_string(), &latest).await.unwrap();
        store.put(&"b".to_string(), &historical).await.unwrap();

        assert_eq!(store.get(&latest).await.unwrap(), Some("a".to_string()));
        assert_eq!(store.get(&historical).await.unwrap(), Some("b".to_string()));
    }

    #[tokio::test]
    async fn test_arc_wrapper_delegates_to_the_inner_store() {
        let store = Arc::new(MemoryStore::new());
        let key = CacheKey::new("latest", &());

        Store::put(&store, &42_u32, &key).await.unwrap();

        assert_eq!(store.get(&key).await.unwrap(), Some(42));
    }
}
