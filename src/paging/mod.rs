//! Paging Module
//!
//! The data-source side of paginated lists: a range-fetch contract, a caching
//! decorator over it, and page offset arithmetic.

mod page;
mod source;

pub use page::{Page, PageRequest, DEFAULT_PAGE_LENGTH, DEFAULT_START_VAR};
pub use source::{CachedRangeSource, RangeSource};
