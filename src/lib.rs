//! Result Cache - A size-bounded in-process memoization cache
//!
//! Memoizes computed values under string keys, evicts least recently used
//! entries once the estimated footprint exceeds a budget, and invalidates
//! entries in bulk by named group.

pub mod cache;
pub mod config;
pub mod error;
pub mod paging;

pub use cache::{CacheStore, GroupPolicy, ResultCache};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
