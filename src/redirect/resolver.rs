use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use super::media::{is_media_link, parse_media_link, MediaRef};
use super::platform::{classify_platform, Platform};
use crate::models::NewClick;
use crate::storage::{Storage, StorageResult};

/// Result of resolving a slug for a visitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectOutcome {
    Found(String),
    NotFound,
}

/// How a destination is rewritten for one visitor. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectDecision {
    pub platform: Platform,
    pub is_media_link: bool,
    pub media: Option<MediaRef>,
    pub target: String,
}

/// Work out the redirect target for a destination and client identity.
///
/// Non-media destinations, and media links without a usable id, are returned
/// unchanged. Media links become an intent URL on Android and the canonical
/// watch URL everywhere else.
pub fn decide(destination_url: &str, client_identity: &str) -> RedirectDecision {
    let platform = classify_platform(client_identity);
    let is_media = is_media_link(destination_url);
    let media = if is_media {
        parse_media_link(destination_url)
    } else {
        None
    };

    let target = match (&media, platform) {
        (None, _) => destination_url.to_string(),
        (Some(media), Platform::Android) => media.intent_url(),
        (Some(media), Platform::Ios | Platform::Desktop) => media.watch_url(),
    };

    RedirectDecision {
        platform,
        is_media_link: is_media,
        media,
        target,
    }
}

/// Resolves slugs to redirect targets and records a click for every hit
pub struct Resolver {
    storage: Arc<dyn Storage>,
}

impl Resolver {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Look up `slug`, log the click, and compute the target for this client.
    ///
    /// Unknown and expired slugs yield [`RedirectOutcome::NotFound`] without
    /// touching the click log. A failed click write is logged and ignored; only
    /// a failed lookup is returned as an error.
    pub async fn resolve_redirect(
        &self,
        slug: &str,
        client_identity: Option<&str>,
        client_address: Option<&str>,
        now: i64,
    ) -> StorageResult<RedirectOutcome> {
        let link = match self.storage.get_link(slug).await? {
            Some(link) if !link.is_expired(now) => link,
            Some(_) => {
                debug!(slug, "link expired");
                return Ok(RedirectOutcome::NotFound);
            }
            None => return Ok(RedirectOutcome::NotFound),
        };

        let click = NewClick::new(slug, client_address, client_identity, now);
        if let Err(err) = self.storage.record_click(&click).await {
            warn!(slug, error = %err, "failed to record click");
        }

        let decision = decide(&link.destination_url, &click.client_identity);
        debug!(
            slug,
            platform = %decision.platform,
            media = decision.media.is_some(),
            target = %decision.target,
            "resolved redirect"
        );

        Ok(RedirectOutcome::Found(decision.target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Click, Link};
    use crate::storage::{SqliteStorage, StorageError};
    use async_trait::async_trait;

    const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 10)";
    const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0)";
    const DESKTOP_UA: &str = "Mozilla/5.0 (X11; Linux x86_64)";

    async fn setup() -> Arc<dyn Storage> {
        let storage = SqliteStorage::new("sqlite::memory:", 1).await.unwrap();
        storage.init().await.unwrap();
        Arc::new(storage)
    }

    #[test]
    fn test_non_media_destination_unchanged_on_every_platform() {
        for ua in [ANDROID_UA, IPHONE_UA, DESKTOP_UA, ""] {
            let decision = decide("https://example.com/page", ua);
            assert_eq!(decision.target, "https://example.com/page");
            assert!(!decision.is_media_link);
            assert!(decision.media.is_none());
        }
    }

    #[test]
    fn test_android_media_link_gets_intent() {
        let decision = decide("https://youtu.be/abc123?t=3m20s", ANDROID_UA);

        assert_eq!(decision.platform, Platform::Android);
        assert!(decision.target.starts_with("intent://"));
        assert!(decision.target.contains("package=com.google.android.youtube"));
        assert!(decision
            .target
            .contains("S.browser_fallback_url=https://www.youtube.com/watch?v=abc123&t=200s"));
    }

    #[test]
    fn test_ios_and_desktop_media_link_get_watch_url() {
        for ua in [IPHONE_UA, DESKTOP_UA] {
            let decision = decide("https://www.youtube.com/watch?v=abc123&t=90", ua);
            assert_eq!(
                decision.target,
                "https://www.youtube.com/watch?v=abc123&t=90s"
            );
        }
    }

    #[test]
    fn test_media_link_without_id_unchanged() {
        let decision = decide("https://www.youtube.com/feed/trending", ANDROID_UA);

        assert!(decision.is_media_link);
        assert!(decision.media.is_none());
        assert_eq!(decision.target, "https://www.youtube.com/feed/trending");
    }

    #[tokio::test]
    async fn test_unknown_slug_records_nothing() {
        let storage = setup().await;
        let resolver = Resolver::new(Arc::clone(&storage));

        let outcome = resolver
            .resolve_redirect("missing", Some(DESKTOP_UA), Some("127.0.0.1"), 100)
            .await
            .unwrap();

        assert_eq!(outcome, RedirectOutcome::NotFound);
        assert_eq!(storage.click_count("missing").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_known_slug_records_one_click() {
        let storage = setup().await;
        storage
            .create_link("vid", "https://youtu.be/abc123?t=45s", 1, None)
            .await
            .unwrap();
        let resolver = Resolver::new(Arc::clone(&storage));

        let outcome = resolver
            .resolve_redirect("vid", Some(IPHONE_UA), Some("203.0.113.9"), 100)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RedirectOutcome::Found("https://www.youtube.com/watch?v=abc123&t=45s".to_string())
        );

        let clicks = storage.recent_clicks("vid", 10).await.unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].timestamp, 100);
        assert_eq!(clicks[0].client_address.as_deref(), Some("203.0.113.9"));
        assert_eq!(clicks[0].client_identity.as_deref(), Some(IPHONE_UA));
    }

    #[tokio::test]
    async fn test_missing_client_details_stored_as_unknown() {
        let storage = setup().await;
        storage
            .create_link("plain", "https://example.com", 1, None)
            .await
            .unwrap();
        let resolver = Resolver::new(Arc::clone(&storage));

        resolver.resolve_redirect("plain", None, None, 5).await.unwrap();

        let clicks = storage.recent_clicks("plain", 10).await.unwrap();
        assert_eq!(clicks[0].client_address.as_deref(), Some("unknown"));
        assert_eq!(clicks[0].client_identity.as_deref(), Some("unknown"));
    }

    #[tokio::test]
    async fn test_expired_link_not_found() {
        let storage = setup().await;
        storage
            .create_link("old", "https://example.com", 1, Some(50))
            .await
            .unwrap();
        let resolver = Resolver::new(Arc::clone(&storage));

        let before = resolver.resolve_redirect("old", None, None, 49).await.unwrap();
        assert!(matches!(before, RedirectOutcome::Found(_)));

        let after = resolver.resolve_redirect("old", None, None, 50).await.unwrap();
        assert_eq!(after, RedirectOutcome::NotFound);
        assert_eq!(storage.click_count("old").await.unwrap(), 1);
    }

    /// Serves one link but refuses every click write
    struct BrokenClickLog;

    #[async_trait]
    impl Storage for BrokenClickLog {
        async fn init(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn create_link(
            &self,
            _slug: &str,
            _destination_url: &str,
            _created_at: i64,
            _expires_at: Option<i64>,
        ) -> StorageResult<Link> {
            Err(StorageError::Conflict)
        }

        async fn get_link(&self, slug: &str) -> StorageResult<Option<Link>> {
            Ok(Some(Link {
                id: 1,
                slug: slug.to_string(),
                destination_url: "https://example.com/still-works".to_string(),
                created_at: 0,
                expires_at: None,
            }))
        }

        async fn list_links(&self, _limit: i64, _offset: i64) -> StorageResult<Vec<Link>> {
            Ok(Vec::new())
        }

        async fn record_click(&self, _click: &NewClick) -> StorageResult<()> {
            Err(StorageError::Other(anyhow::anyhow!("disk full")))
        }

        async fn recent_clicks(&self, _slug: &str, _limit: i64) -> StorageResult<Vec<Click>> {
            Ok(Vec::new())
        }

        async fn click_count(&self, _slug: &str) -> StorageResult<i64> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_click_failure_does_not_block_redirect() {
        let resolver = Resolver::new(Arc::new(BrokenClickLog));

        let outcome = resolver
            .resolve_redirect("any", Some(DESKTOP_UA), None, 1)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            RedirectOutcome::Found("https://example.com/still-works".to_string())
        );
    }
}
