//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;

use crate::cache::{GroupPolicy, DEFAULT_CAPACITY};

/// Result cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Footprint budget in estimated bytes, 0 disables eviction
    pub capacity: usize,
    /// How a re-set key with a different group is handled
    pub group_policy: GroupPolicy,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `RESULT_CACHE_CAPACITY` - Footprint budget (default: 10000000)
    /// - `RESULT_CACHE_GROUP_POLICY` - `keep-first` or `reassign` (default: keep-first)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Missing or unparseable values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            capacity: lookup("RESULT_CACHE_CAPACITY")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.capacity),
            group_policy: lookup("RESULT_CACHE_GROUP_POLICY")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.group_policy),
        }
    }

    /// Overrides the footprint budget.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Overrides the group policy.
    pub fn with_group_policy(mut self, group_policy: GroupPolicy) -> Self {
        self.group_policy = group_policy;
        self
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            group_policy: GroupPolicy::KeepFirst,
        }
    }
}
