use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: i64,
    pub slug: String,
    pub destination_url: String,
    pub created_at: i64,
    pub expires_at: Option<i64>,
}

impl Link {
    /// A link with an expiry stops resolving at the instant it expires.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

/// Form body of `POST /create`
#[derive(Debug, Deserialize)]
pub struct CreateLinkForm {
    pub url: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}
