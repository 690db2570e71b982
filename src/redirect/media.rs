//! Recognition of the special-cased video provider's links
//!
//! The provider has two URL shapes that encode the start offset differently:
//!
//! - short domain: `https://youtu.be/<id>?t=3m20s` (`<m>m<s>s` or `<s>s`)
//! - long domain: `https://www.youtube.com/watch?v=<id>&t=90s` (`<s>s` or bare `<s>`)
//!
//! Parsing is tolerant. An unreadable offset becomes zero and a link without a
//! usable id is not treated as a media link at all.

use serde::Serialize;

pub const PROVIDER_DOMAIN: &str = "www.youtube.com";
pub const PROVIDER_PACKAGE: &str = "com.google.android.youtube";

const MEDIA_MARKER: &str = "youtu";
const SHORT_DOMAIN_PREFIX: &str = "youtu.be/";

/// Video id and start offset extracted from a media link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MediaRef {
    pub id: String,
    pub start_seconds: u64,
}

impl MediaRef {
    /// `https://www.youtube.com/watch?v=<id>&t=<n>s`
    pub fn watch_url(&self) -> String {
        format!(
            "https://{PROVIDER_DOMAIN}/watch?v={}&t={}s",
            self.id, self.start_seconds
        )
    }

    /// Android intent URL opening the provider's app, with the watch URL as browser fallback
    pub fn intent_url(&self) -> String {
        format!(
            "intent://{PROVIDER_DOMAIN}/watch?v={id}&t={t}s#Intent;scheme=https;package={PROVIDER_PACKAGE};S.browser_fallback_url={fallback};end",
            id = self.id,
            t = self.start_seconds,
            fallback = self.watch_url(),
        )
    }
}

/// Whether a destination belongs to the video provider (either domain form)
pub fn is_media_link(url: &str) -> bool {
    url.contains(MEDIA_MARKER)
}

/// Extract the video id and start offset from a media link.
///
/// Returns `None` when no id can be found, or when the id contains characters
/// that cannot belong to a video id.
pub fn parse_media_link(url: &str) -> Option<MediaRef> {
    let (id, start_seconds) = if let Some(pos) = url.find(SHORT_DOMAIN_PREFIX) {
        let rest = &url[pos + SHORT_DOMAIN_PREFIX.len()..];
        let id = rest
            .split(['?', '#', '/'])
            .next()
            .unwrap_or_default();
        let start = query_param(url, "t").map_or(0, parse_short_offset);
        (id, start)
    } else {
        let id = query_param(url, "v").unwrap_or_default();
        let start = query_param(url, "t").map_or(0, parse_long_offset);
        (id, start)
    };

    if !is_valid_media_id(id) {
        return None;
    }

    Some(MediaRef {
        id: id.to_string(),
        start_seconds,
    })
}

/// Short-domain offsets: `<minutes>m<seconds>s` or `<seconds>s`; anything else is 0
pub fn parse_short_offset(value: &str) -> u64 {
    let Some(body) = value.strip_suffix('s') else {
        return 0;
    };

    match body.split_once('m') {
        Some((minutes, seconds)) => match (parse_digits(minutes), parse_digits(seconds)) {
            (Some(m), Some(s)) => m.saturating_mul(60).saturating_add(s),
            _ => 0,
        },
        None => parse_digits(body).unwrap_or(0),
    }
}

/// Long-domain offsets: `<seconds>s` or a bare integer; anything else is 0
pub fn parse_long_offset(value: &str) -> u64 {
    let digits = value.strip_suffix('s').unwrap_or(value);
    parse_digits(digits).unwrap_or(0)
}

fn parse_digits(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

fn is_valid_media_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

/// First value of a query parameter; the fragment is ignored
fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let (_, query) = without_fragment.split_once('?')?;

    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        (key == name).then_some(value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(id: &str, start_seconds: u64) -> Option<MediaRef> {
        Some(MediaRef {
            id: id.to_string(),
            start_seconds,
        })
    }

    #[test]
    fn test_is_media_link() {
        assert!(is_media_link("https://youtu.be/abc123"));
        assert!(is_media_link("https://www.youtube.com/watch?v=abc123"));
        assert!(!is_media_link("https://example.com/page"));
    }

    #[test]
    fn test_short_offset_formats() {
        assert_eq!(parse_short_offset("3m20s"), 200);
        assert_eq!(parse_short_offset("45s"), 45);
        assert_eq!(parse_short_offset("0m5s"), 5);
        assert_eq!(parse_short_offset("90"), 0);
        assert_eq!(parse_short_offset("1h2m3s"), 0);
        assert_eq!(parse_short_offset("m20s"), 0);
        assert_eq!(parse_short_offset("s"), 0);
        assert_eq!(parse_short_offset(""), 0);
    }

    #[test]
    fn test_long_offset_formats() {
        assert_eq!(parse_long_offset("90s"), 90);
        assert_eq!(parse_long_offset("90"), 90);
        assert_eq!(parse_long_offset("3m20s"), 0);
        assert_eq!(parse_long_offset("abc"), 0);
        assert_eq!(parse_long_offset("-5"), 0);
    }

    #[test]
    fn test_short_domain_link() {
        assert_eq!(
            parse_media_link("https://youtu.be/dQw4w9WgXcQ?t=3m20s"),
            media("dQw4w9WgXcQ", 200)
        );
        assert_eq!(
            parse_media_link("https://youtu.be/dQw4w9WgXcQ?si=share&t=45s"),
            media("dQw4w9WgXcQ", 45)
        );
        assert_eq!(
            parse_media_link("https://youtu.be/dQw4w9WgXcQ"),
            media("dQw4w9WgXcQ", 0)
        );
    }

    #[test]
    fn test_short_domain_unparseable_offset_is_zero() {
        assert_eq!(
            parse_media_link("https://youtu.be/abc123?t=90"),
            media("abc123", 0)
        );
    }

    #[test]
    fn test_long_domain_link() {
        assert_eq!(
            parse_media_link("https://www.youtube.com/watch?v=abc123&t=90s"),
            media("abc123", 90)
        );
        assert_eq!(
            parse_media_link("https://www.youtube.com/watch?v=abc123&t=90"),
            media("abc123", 90)
        );
        assert_eq!(
            parse_media_link("https://www.youtube.com/watch?v=abc123"),
            media("abc123", 0)
        );
        assert_eq!(
            parse_media_link("https://m.youtube.com/watch?feature=share&v=abc123&t=12s#comments"),
            media("abc123", 12)
        );
    }

    #[test]
    fn test_missing_id_is_not_media() {
        assert_eq!(parse_media_link("https://www.youtube.com/"), None);
        assert_eq!(parse_media_link("https://www.youtube.com/watch?t=30s"), None);
        assert_eq!(parse_media_link("https://youtu.be/?t=30s"), None);
        assert_eq!(
            parse_media_link("https://www.youtube.com/watch?v=bad%20id"),
            None
        );
    }

    #[test]
    fn test_watch_and_intent_urls() {
        let media = MediaRef {
            id: "abc123".to_string(),
            start_seconds: 90,
        };

        assert_eq!(
            media.watch_url(),
            "https://www.youtube.com/watch?v=abc123&t=90s"
        );
        assert_eq!(
            media.intent_url(),
            "intent://www.youtube.com/watch?v=abc123&t=90s#Intent;scheme=https;package=com.google.android.youtube;S.browser_fallback_url=https://www.youtube.com/watch?v=abc123&t=90s;end"
        );
    }
}
