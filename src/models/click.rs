use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Stored in place of a missing client address or identity
pub const UNKNOWN_CLIENT: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Click {
    pub id: i64,
    pub slug: String,
    pub timestamp: i64,
    pub client_address: Option<String>,
    pub client_identity: Option<String>,
}

/// A click about to be appended to the log
#[derive(Debug, Clone)]
pub struct NewClick {
    pub slug: String,
    pub timestamp: i64,
    pub client_address: String,
    pub client_identity: String,
}

impl NewClick {
    pub fn new(
        slug: &str,
        client_address: Option<&str>,
        client_identity: Option<&str>,
        timestamp: i64,
    ) -> Self {
        Self {
            slug: slug.to_string(),
            timestamp,
            client_address: or_unknown(client_address),
            client_identity: or_unknown(client_identity),
        }
    }
}

fn or_unknown(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => UNKNOWN_CLIENT.to_string(),
    }
}
