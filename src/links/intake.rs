use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::slug::generate_slug;
use crate::config::LinkConfig;
use crate::models::Link;
use crate::storage::{Storage, StorageError};

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("URL cannot be empty")]
    EmptyUrl,
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type SlugSource = Arc<dyn Fn(usize) -> String + Send + Sync>;

/// Append the playback timestamp as the `t` query parameter.
///
/// Uses `&` when the URL already has a query string. A missing or blank
/// timestamp leaves the URL untouched.
pub fn apply_timestamp(url: &str, timestamp: Option<&str>) -> String {
    match timestamp.map(str::trim).filter(|t| !t.is_empty()) {
        Some(t) if url.contains('?') => format!("{url}&t={t}"),
        Some(t) => format!("{url}?t={t}"),
        None => url.to_string(),
    }
}

/// Creates links with fresh random slugs
pub struct LinkService {
    storage: Arc<dyn Storage>,
    config: LinkConfig,
    slug_source: SlugSource,
}

impl LinkService {
    pub fn new(storage: Arc<dyn Storage>, config: LinkConfig) -> Self {
        Self::with_slug_source(storage, config, Arc::new(generate_slug))
    }

    /// Use a custom slug generator; it receives the configured slug length
    pub fn with_slug_source(
        storage: Arc<dyn Storage>,
        config: LinkConfig,
        slug_source: SlugSource,
    ) -> Self {
        Self {
            storage,
            config,
            slug_source,
        }
    }

    /// Validate `url`, apply the optional timestamp and store it under a new slug.
    ///
    /// A slug collision is retried with a fresh slug up to the configured number
    /// of attempts; after that the conflict is returned.
    pub async fn create(
        &self,
        url: &str,
        timestamp: Option<&str>,
        now: i64,
    ) -> Result<Link, IntakeError> {
        let url = url.trim();
        validate_url(url)?;

        let destination_url = apply_timestamp(url, timestamp);
        let expires_at = self.config.ttl_secs.map(|ttl| now.saturating_add(ttl));
        let attempts = self.config.slug_max_attempts.max(1);

        for attempt in 1..=attempts {
            let slug = (self.slug_source)(self.config.slug_length);

            match self
                .storage
                .create_link(&slug, &destination_url, now, expires_at)
                .await
            {
                Ok(link) => {
                    info!(slug = %link.slug, destination = %link.destination_url, "link created");
                    return Ok(link);
                }
                Err(StorageError::Conflict) => {
                    debug!(slug, attempt, "slug already taken, retrying");
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(attempts, "gave up generating a unique slug");
        Err(StorageError::Conflict.into())
    }
}

fn validate_url(url: &str) -> Result<(), IntakeError> {
    if url.is_empty() {
        return Err(IntakeError::EmptyUrl);
    }

    let parsed = url::Url::parse(url).map_err(|e| IntakeError::InvalidUrl(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(IntakeError::InvalidUrl(format!(
            "unsupported scheme '{other}'"
        ))),
    }
}
