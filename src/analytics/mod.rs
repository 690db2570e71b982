//! Visitor details captured for the click log
//!
//! The redirect path records who followed a link: the client address (taking
//! trusted proxies into account) and the client's declared identity string.

pub mod ip_extractor;

use axum::extract::{connect_info::ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts, HeaderMap};
use std::convert::Infallible;
use std::net::SocketAddr;

pub use ip_extractor::extract_client_ip;

/// Socket peer of the request, when the server was started with connect info
#[derive(Debug, Clone, Copy)]
pub struct PeerAddr(pub Option<SocketAddr>);

impl<S: Send + Sync> FromRequestParts<S> for PeerAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(PeerAddr(
            parts
                .extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| *addr),
        ))
    }
}

/// The `User-Agent` header, if present and readable
pub fn client_identity(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ua| !ua.is_empty())
}
