use axum::{http::StatusCode, routing::get, Router};
use std::sync::Arc;

use crate::config::ClientAddressConfig;
use crate::storage::Storage;

use super::handlers::{redirect_url, RedirectState};
use super::resolver::Resolver;

pub fn create_redirect_router(
    storage: Arc<dyn Storage>,
    client_address: ClientAddressConfig,
    redirect_status: StatusCode,
) -> Router {
    let state = Arc::new(RedirectState {
        resolver: Resolver::new(storage),
        client_address,
        redirect_status,
    });

    Router::new()
        .route("/go/{slug}", get(redirect_url))
        .with_state(state)
}
