use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::resolver::{RedirectOutcome, Resolver};
use crate::analytics::{client_identity, extract_client_ip, PeerAddr};
use crate::config::ClientAddressConfig;
use crate::error::AppError;

pub struct RedirectState {
    pub resolver: Resolver,
    pub client_address: ClientAddressConfig,
    pub redirect_status: StatusCode,
}

/// Redirect to the destination of a short link
pub async fn redirect_url(
    State(state): State<Arc<RedirectState>>,
    Path(slug): Path<String>,
    PeerAddr(peer): PeerAddr,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    // Without a peer address the click is logged as "unknown"
    let client_address = peer.map(|addr| {
        extract_client_ip(&headers, addr.ip(), &state.client_address).to_string()
    });
    let now = chrono::Utc::now().timestamp();

    let outcome = state
        .resolver
        .resolve_redirect(
            &slug,
            client_identity(&headers),
            client_address.as_deref(),
            now,
        )
        .await?;

    match outcome {
        RedirectOutcome::Found(target) => redirect_response(state.redirect_status, &target),
        RedirectOutcome::NotFound => Err(AppError::NotFound("Invalid or expired link")),
    }
}

fn redirect_response(status: StatusCode, target: &str) -> Result<Response, AppError> {
    let location = HeaderValue::from_str(target).map_err(|e| {
        AppError::Internal(anyhow::anyhow!("redirect target is not a valid header value: {e}"))
    })?;

    Ok((status, [(header::LOCATION, location)]).into_response())
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    #[derive(Serialize)]
    struct HealthResponse {
        status: String,
    }

    Json(HealthResponse {
        status: "OK".to_string(),
    })
}
