//! Process-lifetime product cache.

use std::future::Future;

use cozyspot_core::ProductRecord;
use moka::future::Cache;

/// Product records keyed by handle.
///
/// Unbounded and never expired: entries live until [`clear`](Self::clear) or
/// process exit. Clones share the same storage.
#[derive(Clone)]
pub struct ProductCache {
    inner: Cache<String, ProductRecord>,
}

impl Default for ProductCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProductCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductCache")
            .field("entries", &self.inner.entry_count())
            .finish()
    }
}

impl ProductCache {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Cache::builder().build(),
        }
    }

    pub async fn get(&self, handle: &str) -> Option<ProductRecord> {
        self.inner.get(handle).await
    }

    pub async fn set(&self, handle: &str, product: ProductRecord) {
        self.inner.insert(handle.to_string(), product).await;
    }

    /// Cached product, or the result of `load`.
    ///
    /// Only `Some` results are stored. Concurrent misses for one handle
    /// share a single `load`.
    pub async fn get_or_load<F>(&self, handle: &str, load: F) -> Option<ProductRecord>
    where
        F: Future<Output = Option<ProductRecord>>,
    {
        self.inner.optionally_get_with_by_ref(handle, load).await
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.inner.invalidate_all();
        self.inner.run_pending_tasks().await;
    }

    /// Approximate number of entries.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.inner.entry_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
