use crate::models::{Click, Link, NewClick};
use crate::storage::{Storage, StorageResult};
use anyhow::Result;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Cached storage wrapper that keeps recently resolved links in memory
///
/// Links never change after creation, so a cached entry can only go stale by
/// expiring, which the resolver checks on every lookup. Misses are not cached:
/// a slug created by another process becomes visible on the next lookup.
/// Clicks are written straight through.
pub struct CachedStorage {
    /// Underlying storage implementation
    inner: Arc<dyn Storage>,
    /// Read cache for link lookups (Moka cache)
    read_cache: Cache<String, Link>,
}

impl CachedStorage {
    pub fn new(inner: Arc<dyn Storage>, max_cache_entries: u64, ttl_secs: u64) -> Self {
        let read_cache = Cache::builder()
            .max_capacity(max_cache_entries)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { inner, read_cache }
    }

    /// Number of links currently held in the read cache
    pub fn cached_entries(&self) -> u64 {
        self.read_cache.entry_count()
    }
}

#[async_trait]
impl Storage for CachedStorage {
    async fn init(&self) -> Result<()> {
        self.inner.init().await
    }

    async fn create_link(
        &self,
        slug: &str,
        destination_url: &str,
        created_at: i64,
        expires_at: Option<i64>,
    ) -> StorageResult<Link> {
        let link = self
            .inner
            .create_link(slug, destination_url, created_at, expires_at)
            .await?;

        self.read_cache.insert(slug.to_string(), link.clone()).await;

        Ok(link)
    }

    async fn get_link(&self, slug: &str) -> StorageResult<Option<Link>> {
        if let Some(cached) = self.read_cache.get(slug).await {
            tracing::trace!(slug, "link cache hit");
            return Ok(Some(cached));
        }

        let result = self.inner.get_link(slug).await?;

        if let Some(ref link) = result {
            self.read_cache.insert(slug.to_string(), link.clone()).await;
        }

        Ok(result)
    }

    async fn list_links(&self, limit: i64, offset: i64) -> StorageResult<Vec<Link>> {
        self.inner.list_links(limit, offset).await
    }

    async fn record_click(&self, click: &NewClick) -> StorageResult<()> {
        self.inner.record_click(click).await
    }

    async fn recent_clicks(&self, slug: &str, limit: i64) -> StorageResult<Vec<Click>> {
        self.inner.recent_clicks(slug, limit).await
    }

    async fn click_count(&self, slug: &str) -> StorageResult<i64> {
        self.inner.click_count(slug).await
    }
}
