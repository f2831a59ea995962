//! Shared Result Cache
//!
//! Cloneable handle that serializes access to one [`CacheStore`] and
//! coordinates concurrent computations of the same key.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::{validate_key, CacheStats, CacheStore, GroupPolicy};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

type KeyLock = Arc<Mutex<()>>;
type InFlightMap = StdMutex<HashMap<String, KeyLock>>;

// == Result Cache ==
/// Thread-safe result cache handle.
///
/// All maps live in one [`CacheStore`] behind a single lock, so every
/// operation sees them consistent. Clones share the same store; build one at
/// startup and hand clones to whoever needs memoization.
///
/// `get_or_compute` runs at most one computation per key at a time: later
/// callers for the same missing key wait for the first one and reuse its
/// result. The store lock is never held while a computation runs.
pub struct ResultCache<V = serde_json::Value> {
    store: Arc<Mutex<CacheStore<V>>>,
    in_flight: Arc<InFlightMap>,
}

impl<V> Clone for ResultCache<V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<V> ResultCache<V> {
    /// Wraps an existing store.
    pub fn from_store(store: CacheStore<V>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            in_flight: Arc::new(StdMutex::new(HashMap::new())),
        }
    }

    /// Creates a cache with the given footprint budget.
    pub fn new(capacity: usize) -> Self {
        Self::from_store(CacheStore::new(capacity))
    }

    pub fn with_policy(capacity: usize, group_policy: GroupPolicy) -> Self {
        Self::from_store(CacheStore::with_policy(capacity, group_policy))
    }

    /// Creates a cache from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        info!(
            capacity = config.capacity,
            group_policy = %config.group_policy,
            "Result cache initialized"
        );
        Self::from_store(CacheStore::from_config(config))
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.lock().await.contains(key)
    }

    /// Removes a key everywhere. Returns false if it was not present.
    pub async fn unset(&self, key: &str) -> bool {
        self.store.lock().await.unset(key)
    }

    /// Removes a group's members, or everything when `group` is None.
    pub async fn clear(&self, group: Option<&str>) -> usize {
        self.store.lock().await.clear(group)
    }

    /// Empties the cache and restores its configured state.
    pub async fn reset(&self) {
        self.store.lock().await.reset();
    }

    pub async fn set_capacity(&self, capacity: usize) {
        self.store.lock().await.set_capacity(capacity);
    }

    pub async fn capacity(&self) -> usize {
        self.store.lock().await.capacity()
    }

    pub async fn estimate_footprint(&self) -> usize {
        self.store.lock().await.estimate_footprint()
    }

    pub async fn keys_in_group(&self, group: &str) -> Vec<String> {
        self.store.lock().await.keys_in_group(group)
    }

    pub async fn last_access(&self, key: &str) -> Option<DateTime<Utc>> {
        self.store.lock().await.last_access(key)
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    pub async fn len(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.lock().await.is_empty()
    }

    fn key_lock(&self, key: &str) -> KeyLock {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(in_flight.entry(key.to_string()).or_default())
    }
}

impl<V: Clone> ResultCache<V> {
    /// Returns a clone of the cached value and marks it most recently used.
    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.lock().await.get(key).cloned()
    }
}

impl<V: Serialize + Clone> ResultCache<V> {
    /// Stores `value` under `key` and returns it.
    pub async fn set(&self, key: impl Into<String>, value: V, group: Option<&str>) -> Result<V> {
        let stored = value.clone();
        self.store.lock().await.set(key, value, group)?;
        Ok(stored)
    }

    pub async fn recompute_footprint(&self) -> Result<usize> {
        self.store.lock().await.recompute_footprint()
    }

    // == Get Or Compute ==
    /// Returns the cached value for `key`, or awaits `compute`, stores the
    /// result and returns it.
    ///
    /// Cached "empty" values (`0`, `""`, `null`) count as present.
    pub async fn get_or_compute<F, Fut>(
        &self,
        key: &str,
        compute: F,
        group: Option<&str>,
    ) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let compute = move || async move { Ok::<V, CacheError>(compute().await) };
        self.try_get_or_compute(key, compute, group).await
    }

    /// Fallible variant of [`get_or_compute`](Self::get_or_compute).
    ///
    /// A failed computation stores nothing; the error is handed back and the
    /// next caller for the key computes again.
    pub async fn try_get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        compute: F,
        group: Option<&str>,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
        E: From<CacheError>,
    {
        validate_key(key)?;

        let cached = self.store.lock().await.get(key).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }

        let in_flight = InFlight {
            map: &self.in_flight,
            key,
            lock: self.key_lock(key),
        };
        let _permit = in_flight.lock.lock().await;

        // Another caller may have published while we waited
        let published = self.store.lock().await.refresh(key).cloned();
        if let Some(value) = published {
            debug!(key, "Reusing value computed by concurrent caller");
            return Ok(value);
        }

        self.store.lock().await.record_computation();
        let value = compute().await?;
        self.store.lock().await.set(key, value.clone(), group)?;
        Ok(value)
    }
}

// == In-Flight Guard ==
/// Holds one reference to a key lock; the last holder removes the map entry.
struct InFlight<'a> {
    map: &'a InFlightMap,
    key: &'a str,
    lock: KeyLock,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        let ours = map
            .get(self.key)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock));
        // the map and this guard are the only holders
        if ours && Arc::strong_count(&self.lock) == 2 {
            map.remove(self.key);
        }
    }
}
