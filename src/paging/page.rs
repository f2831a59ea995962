//! Page Module
//!
//! Offset arithmetic for paginated lists.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::{CacheError, Result};

/// Items shown per page when nothing else is configured
pub const DEFAULT_PAGE_LENGTH: usize = 10;

/// Query parameter carrying the page start offset
pub const DEFAULT_START_VAR: &str = "start";

// == Page Request ==
/// A validated `(start, length)` window into a list.
///
/// Only obtainable through the checked constructors, so the page length is
/// never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Offset of the first item on the page
    start: usize,
    /// Items per page
    length: usize,
}

impl PageRequest {
    /// Creates a request, rejecting a zero page length.
    pub fn new(start: usize, length: usize) -> Result<Self> {
        if length == 0 {
            return Err(CacheError::InvalidRequest(
                "Page length must be greater than zero".to_string(),
            ));
        }
        Ok(Self { start, length })
    }

    /// Request for a 1-based page number.
    pub fn for_page(page: usize, length: usize) -> Result<Self> {
        if page == 0 {
            return Err(CacheError::InvalidRequest(
                "Page numbers start at 1".to_string(),
            ));
        }
        Self::new((page - 1) * length, length)
    }

    /// Reads the start offset from query parameters.
    ///
    /// A missing parameter means the first page. A present but non-numeric
    /// offset fails immediately rather than silently falling back to zero.
    ///
    /// # Arguments
    /// * `params` - Request query parameters
    /// * `var` - Name of the offset parameter, usually [`DEFAULT_START_VAR`]
    /// * `length` - Items per page
    pub fn from_params(params: &HashMap<String, String>, var: &str, length: usize) -> Result<Self> {
        let start = match params.get(var) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                CacheError::InvalidRequest(format!(
                    "Parameter '{}' must be a non-negative integer, got '{}'",
                    var, raw
                ))
            })?,
            None => 0,
        };
        Self::new(start, length)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

// == Page ==
/// One page of items plus the numbers needed to navigate around it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    start: usize,
    length: usize,
    /// Size of the whole, unpaginated list
    total_items: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: usize) -> Self {
        Self {
            items,
            start: request.start,
            length: request.length,
            total_items,
        }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// 1-based number of this page.
    pub fn current_page(&self) -> usize {
        self.start / self.length + 1
    }

    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.length)
    }

    pub fn more_than_one_page(&self) -> bool {
        self.total_pages() > 1
    }

    pub fn not_first_page(&self) -> bool {
        self.current_page() != 1
    }

    pub fn not_last_page(&self) -> bool {
        self.current_page() < self.total_pages()
    }

    /// 1-based position of the first item on this page.
    pub fn first_item(&self) -> usize {
        self.start + 1
    }

    /// 1-based position of the last item on this page.
    pub fn last_item(&self) -> usize {
        (self.start + self.length).min(self.total_items)
    }

    /// Start offset of the following page, if there is one.
    pub fn next_start(&self) -> Option<usize> {
        self.not_last_page().then(|| self.start + self.length)
    }

    /// Start offset of the preceding page, if there is one.
    pub fn prev_start(&self) -> Option<usize> {
        self.not_first_page()
            .then(|| self.start.saturating_sub(self.length))
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn page(start: usize, length: usize, total: usize) -> Page<u32> {
        Page::new(Vec::new(), PageRequest::new(start, length).unwrap(), total)
    }

    #[test]
    fn test_request_rejects_zero_length() {
        assert!(matches!(
            PageRequest::new(0, 0),
            Err(CacheError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_zero_length_never_reaches_a_page() {
        let empty = HashMap::new();
        assert!(PageRequest::from_params(&empty, DEFAULT_START_VAR, 0).is_err());
        assert!(PageRequest::for_page(1, 0).is_err());

        // Every request that does exist divides safely.
        let request = PageRequest::new(0, 1).unwrap();
        let p: Page<u32> = Page::new(Vec::new(), request, 5);
        assert_eq!(p.length(), 1);
        assert_eq!(p.current_page(), 1);
        assert_eq!(p.total_pages(), 5);
    }

    #[test]
    fn test_request_for_page() {
        assert_eq!(PageRequest::for_page(3, 10).unwrap().start(), 20);
        assert!(PageRequest::for_page(0, 10).is_err());
    }

    #[test]
    fn test_request_from_params() {
        let request = PageRequest::from_params(&params(&[("start", "30")]), "start", 10).unwrap();
        assert_eq!(request, PageRequest::new(30, 10).unwrap());

        let request = PageRequest::from_params(&params(&[]), DEFAULT_START_VAR, 10).unwrap();
        assert_eq!(request.start(), 0);

        let request = PageRequest::from_params(&params(&[("offset", "5")]), "offset", 5).unwrap();
        assert_eq!(request.start(), 5);
        assert_eq!(request.length(), 5);
    }

    #[test]
    fn test_request_from_params_fails_fast() {
        let result = PageRequest::from_params(&params(&[("start", "abc")]), "start", 10);
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));

        let result = PageRequest::from_params(&params(&[("start", "-10")]), "start", 10);
        assert!(result.is_err());
    }

    #[test]
    fn test_page_numbers() {
        let p = page(20, 10, 45);
        assert_eq!(p.current_page(), 3);
        assert_eq!(p.total_pages(), 5);
        assert!(p.more_than_one_page());
        assert!(p.not_first_page());
        assert!(p.not_last_page());
        assert_eq!(p.first_item(), 21);
        assert_eq!(p.last_item(), 30);
        assert_eq!(p.next_start(), Some(30));
        assert_eq!(p.prev_start(), Some(10));
    }

    #[test]
    fn test_first_and_last_page() {
        let first = page(0, 10, 45);
        assert!(!first.not_first_page());
        assert_eq!(first.prev_start(), None);
        assert_eq!(first.first_item(), 1);

        let last = page(40, 10, 45);
        assert!(!last.not_last_page());
        assert_eq!(last.next_start(), None);
        assert_eq!(last.last_item(), 45);
    }

    #[test]
    fn test_single_and_empty_lists() {
        let single = page(0, 10, 7);
        assert_eq!(single.total_pages(), 1);
        assert!(!single.more_than_one_page());
        assert!(!single.not_last_page());

        let empty = page(0, 10, 0);
        assert_eq!(empty.total_pages(), 0);
        // First item stays 1-based even with nothing to show.
        assert_eq!(empty.first_item(), 1);
        assert_eq!(empty.last_item(), 0);
        assert!(!empty.not_first_page());
        assert_eq!(empty.next_start(), None);
    }
}
