//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, group
//! invalidation and footprint-bounded eviction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::footprint::{entry_size, Footprint};
use crate::cache::{
    validate_key, CacheEntry, CacheStats, GroupIndex, GroupPolicy, LruTracker, DEFAULT_CAPACITY,
};
use crate::config::CacheConfig;
use crate::error::Result;

// == Cache Store ==
/// Single-owner result cache.
///
/// Entries, access records, group memberships and the running footprint are
/// all owned here and change together, so every method leaves them
/// consistent. Wrap it in [`ResultCache`](crate::cache::ResultCache) to share
/// it across tasks.
#[derive(Debug)]
pub struct CacheStore<V = serde_json::Value> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Group memberships
    groups: GroupIndex,
    /// Running estimate of the stored footprint
    footprint: Footprint,
    /// Performance statistics
    stats: CacheStats,
    /// Footprint budget, 0 disables eviction
    capacity: usize,
    /// Capacity restored by `reset`
    configured_capacity: usize,
    group_policy: GroupPolicy,
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given footprint budget.
    ///
    /// # Arguments
    /// * `capacity` - Footprint budget in estimated bytes; 0 disables eviction
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, GroupPolicy::default())
    }

    /// Creates a new CacheStore with an explicit group policy.
    pub fn with_policy(capacity: usize, group_policy: GroupPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            groups: GroupIndex::new(),
            footprint: Footprint::new(),
            stats: CacheStats::new(),
            capacity,
            configured_capacity: capacity,
            group_policy,
        }
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_policy(config.capacity, config.group_policy)
    }

    // == Get ==
    /// Retrieves a value by key and marks it as most recently used.
    ///
    /// Never triggers eviction.
    pub fn get(&mut self, key: &str) -> Option<&V> {
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.touch();
                self.lru.touch(key);
                self.stats.record_hit();
                Some(&entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Like `get` but leaves hit/miss counters alone.
    pub(crate) fn refresh(&mut self, key: &str) -> Option<&V> {
        let entry = self.entries.get_mut(key)?;
        entry.touch();
        self.lru.touch(key);
        Some(&entry.value)
    }

    // == Contains ==
    /// Checks presence without refreshing the access stamp.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Unset ==
    /// Removes a key from storage, access tracking and its group.
    ///
    /// Returns false if the key was not present.
    pub fn unset(&mut self, key: &str) -> bool {
        self.remove_entry(key).is_some()
    }

    // == Clear ==
    /// Removes every member of `group`, or everything when no group is given.
    /// A group with no members removes nothing.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self, group: Option<&str>) -> usize {
        match group {
            Some(group) => {
                let keys = self.groups.take_group(group);
                let mut removed = 0;
                for key in keys {
                    if let Some(entry) = self.entries.remove(&key) {
                        self.lru.remove(&key);
                        self.footprint.remove(entry.size);
                        removed += 1;
                    }
                }
                debug!(group, removed, "Cleared cache group");
                removed
            }
            None => {
                let removed = self.entries.len();
                self.entries.clear();
                self.lru.clear();
                self.groups.clear();
                self.footprint.reset();
                debug!(removed, "Cleared cache");
                removed
            }
        }
    }

    // == Reset ==
    /// Empties the cache, zeroes statistics and restores the configured capacity.
    pub fn reset(&mut self) {
        self.clear(None);
        self.stats = CacheStats::new();
        self.capacity = self.configured_capacity;
    }

    // == Capacity ==
    /// Sets the footprint budget. 0 disables eviction.
    ///
    /// Lowering the budget does not evict immediately; the next `set` does.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn group_policy(&self) -> GroupPolicy {
        self.group_policy
    }

    // == Footprint ==
    /// Returns the running estimate of the stored footprint.
    pub fn estimate_footprint(&self) -> usize {
        self.footprint.total()
    }

    /// Keys currently attributed to `group`, sorted.
    pub fn keys_in_group(&self, group: &str) -> Vec<String> {
        self.groups.members(group)
    }

    pub fn group_of(&self, key: &str) -> Option<&str> {
        self.groups.group_of(key)
    }

    /// Wall-clock time of the last get or set of `key`.
    pub fn last_access(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.get(key).map(|entry| entry.accessed_at)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.entries.len();
        stats.footprint = self.footprint.total();
        stats.capacity = self.capacity;
        stats
    }

    pub(crate) fn record_computation(&mut self) {
        self.stats.record_computation();
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.groups.remove_key(key);
        self.footprint.remove(entry.size);
        Some(entry)
    }

    // == Evict ==
    /// Removes least recently used entries until the footprint fits the
    /// budget. The last remaining entry is never evicted.
    fn evict_to_capacity(&mut self) -> usize {
        let mut evicted = 0;
        while self.footprint.total() > self.capacity {
            if self.entries.len() <= 1 {
                warn!(
                    key = self.lru.peek_oldest().unwrap_or_default(),
                    footprint = self.footprint.total(),
                    capacity = self.capacity,
                    "Single entry exceeds cache capacity; keeping it"
                );
                self.stats.record_oversized();
                break;
            }
            let Some(key) = self.lru.evict_oldest() else {
                break;
            };
            self.remove_entry(&key);
            self.stats.record_eviction();
            evicted += 1;
            debug!(
                key = %key,
                footprint = self.footprint.total(),
                capacity = self.capacity,
                "Evicted least recently used entry"
            );
        }
        evicted
    }
}

impl<V: Serialize> CacheStore<V> {
    // == Set ==
    /// Stores a value, refreshes its access stamp, applies the group tag and
    /// runs the eviction pass.
    ///
    /// An empty group name counts as no group. A set without a group keeps
    /// any existing membership.
    ///
    /// # Errors
    /// - `InvalidKey` for empty or overlong keys
    /// - `Serialization` if the value cannot be measured; the store is unchanged
    pub fn set(&mut self, key: impl Into<String>, value: V, group: Option<&str>) -> Result<()> {
        let key = key.into();
        validate_key(&key)?;
        let size = entry_size(&key, &value)?;

        match self.entries.get_mut(&key) {
            Some(entry) => {
                let previous = entry.replace(value, size);
                self.footprint.remove(previous);
            }
            None => {
                self.entries.insert(key.clone(), CacheEntry::new(value, size));
            }
        }
        self.footprint.add(size);
        self.lru.touch(&key);

        if let Some(group) = group.filter(|g| !g.is_empty()) {
            self.groups.assign(&key, group, self.group_policy);
        }

        if self.capacity > 0 {
            self.evict_to_capacity();
        }
        Ok(())
    }

    // == Recompute Footprint ==
    /// Remeasures every entry from scratch.
    ///
    /// O(n) in the store size; the running total from `estimate_footprint`
    /// should always agree with it.
    pub fn recompute_footprint(&self) -> Result<usize> {
        self.entries
            .iter()
            .map(|(key, entry)| entry_size(key, &entry.value))
            .sum()
    }
}

impl<V: Serialize + Clone> CacheStore<V> {
    // == Get Or Compute ==
    /// Returns the cached value for `key`, or runs `compute` once, stores its
    /// result under `key` (tagged with `group`) and returns it.
    ///
    /// Presence is explicit: cached `0`, `""` or `null` values are hits.
    pub fn get_or_compute<F>(&mut self, key: &str, compute: F, group: Option<&str>) -> Result<V>
    where
        F: FnOnce() -> V,
    {
        validate_key(key)?;
        if let Some(value) = self.get(key) {
            return Ok(value.clone());
        }

        self.stats.record_computation();
        let value = compute();
        self.set(key, value.clone(), group)?;
        Ok(value)
    }
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
