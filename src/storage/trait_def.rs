use crate::models::{Click, Link, NewClick};
use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("slug already exists")]
    Conflict,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Link store and click log behind a single persistent backend.
///
/// Every method is a single statement against the backend; callers get no
/// transactional guarantee across calls.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize the storage (create tables and indexes)
    async fn init(&self) -> Result<()>;

    /// Insert a new link. Returns [`StorageError::Conflict`] if the slug is taken.
    async fn create_link(
        &self,
        slug: &str,
        destination_url: &str,
        created_at: i64,
        expires_at: Option<i64>,
    ) -> StorageResult<Link>;

    /// Get a link by slug
    async fn get_link(&self, slug: &str) -> StorageResult<Option<Link>>;

    /// List links, newest first
    async fn list_links(&self, limit: i64, offset: i64) -> StorageResult<Vec<Link>>;

    /// Append a click to the log
    async fn record_click(&self, click: &NewClick) -> StorageResult<()>;

    /// Up to `limit` most recent clicks for a slug, newest first
    async fn recent_clicks(&self, slug: &str, limit: i64) -> StorageResult<Vec<Click>>;

    /// Total number of clicks recorded for a slug
    async fn click_count(&self, slug: &str) -> StorageResult<i64>;
}
