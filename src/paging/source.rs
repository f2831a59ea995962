//! Range Source Module
//!
//! Data-source contract for paginated lists and a decorator that memoizes
//! its expensive calls in the result cache.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::ResultCache;
use crate::error::{CacheError, Result};
use crate::paging::{Page, PageRequest};

// == Range Source ==
/// A list that can report its size and hand out bounded slices.
pub trait RangeSource {
    type Item: Serialize + DeserializeOwned;

    /// Number of items in the whole list.
    fn total_count(&self) -> Result<usize>;

    /// Up to `length` items starting at `offset`.
    fn fetch(&self, offset: usize, length: usize) -> Result<Vec<Self::Item>>;
}

impl<T> RangeSource for Vec<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    type Item = T;

    fn total_count(&self) -> Result<usize> {
        Ok(self.len())
    }

    fn fetch(&self, offset: usize, length: usize) -> Result<Vec<T>> {
        Ok(self.iter().skip(offset).take(length).cloned().collect())
    }
}

// == Cached Range Source ==
/// Memoizes `total_count` and range fetches of a source.
///
/// Keys are `{namespace}:count` and `{namespace}:range:{offset}:{length}`,
/// all tagged with the namespace as their group so [`invalidate`](Self::invalidate)
/// drops every cached answer for this source at once.
pub struct CachedRangeSource<S> {
    inner: S,
    cache: ResultCache,
    namespace: String,
}

impl<S: RangeSource> CachedRangeSource<S> {
    /// Wraps `inner`, caching under `namespace` in the shared cache.
    pub fn new(inner: S, cache: ResultCache, namespace: impl Into<String>) -> Result<Self> {
        let namespace = namespace.into();
        if namespace.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Namespace cannot be empty".to_string(),
            ));
        }
        Ok(Self {
            inner,
            cache,
            namespace,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Cached `total_count` of the underlying source.
    pub async fn total_count(&self) -> Result<usize> {
        let key = format!("{}:count", self.namespace);
        let value = self
            .cache
            .try_get_or_compute(
                &key,
                move || async move { Ok::<_, CacheError>(Value::from(self.inner.total_count()?)) },
                Some(&self.namespace),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Cached range fetch of the underlying source.
    pub async fn fetch(&self, offset: usize, length: usize) -> Result<Vec<S::Item>> {
        let key = format!("{}:range:{}:{}", self.namespace, offset, length);
        let value = self
            .cache
            .try_get_or_compute(
                &key,
                move || async move {
                    let items = self.inner.fetch(offset, length)?;
                    Ok::<_, CacheError>(serde_json::to_value(items)?)
                },
                Some(&self.namespace),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fetches one page together with the list total.
    pub async fn page(&self, request: PageRequest) -> Result<Page<S::Item>> {
        let total = self.total_count().await?;
        let items = self.fetch(request.start(), request.length()).await?;
        Ok(Page::new(items, request, total))
    }

    /// Drops every cached answer for this source.
    pub async fn invalidate(&self) -> usize {
        let removed = self.cache.clear(Some(&self.namespace)).await;
        debug!(namespace = %self.namespace, removed, "Invalidated cached source");
        removed
    }
}
