//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with access metadata.

use chrono::{DateTime, Utc};

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Estimated footprint of key, value and bookkeeping
    pub size: usize,
    /// When the entry was first written
    pub created_at: DateTime<Utc>,
    /// Last get or set of this key
    pub accessed_at: DateTime<Utc>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `size` - Estimated footprint as computed by the size estimator
    pub fn new(value: V, size: usize) -> Self {
        let now = Utc::now();
        Self {
            value,
            size,
            created_at: now,
            accessed_at: now,
        }
    }

    // == Replace ==
    /// Swaps in a new value and size, returning the previous size.
    ///
    /// The creation time is kept.
    pub fn replace(&mut self, value: V, size: usize) -> usize {
        self.value = value;
        self.touch();
        std::mem::replace(&mut self.size, size)
    }

    // == Touch ==
    /// Refreshes the wall-clock access stamp.
    pub fn touch(&mut self) {
        self.accessed_at = Utc::now();
    }
}
