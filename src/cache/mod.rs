//! Cache Module
//!
//! Provides a footprint-bounded result cache with LRU eviction and group
//! invalidation.

mod entry;
pub mod footprint;
mod groups;
mod lru;
mod shared;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use groups::{GroupIndex, GroupPolicy};
pub use lru::LruTracker;
pub use shared::ResultCache;
pub use stats::CacheStats;
pub use store::CacheStore;

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 1024;

/// Default footprint budget in estimated bytes
pub const DEFAULT_CAPACITY: usize = 10_000_000;

// == Key Validation ==
/// Rejects empty keys and keys longer than [`MAX_KEY_LENGTH`].
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(CacheError::InvalidKey("Key cannot be empty".to_string()));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(CacheError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
