use serde::Serialize;
use std::sync::Arc;

use crate::models::{Click, Link};
use crate::storage::{Storage, StorageResult};

/// Clicks shown on a stats report
pub const RECENT_CLICKS_LIMIT: i64 = 50;

#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub link: Link,
    pub total_clicks: i64,
    /// Newest first, at most [`RECENT_CLICKS_LIMIT`]
    pub recent_clicks: Vec<Click>,
}

/// Read-only view of a link and its click history
pub struct StatsReporter {
    storage: Arc<dyn Storage>,
}

impl StatsReporter {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// `None` if no link exists for `slug`. Expired links still report.
    pub async fn report(&self, slug: &str) -> StorageResult<Option<StatsReport>> {
        let Some(link) = self.storage.get_link(slug).await? else {
            return Ok(None);
        };

        let total_clicks = self.storage.click_count(slug).await?;
        let recent_clicks = self
            .storage
            .recent_clicks(slug, RECENT_CLICKS_LIMIT)
            .await?;

        Ok(Some(StatsReport {
            link,
            total_clicks,
            recent_clicks,
        }))
    }
}
