use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::config::LinkConfig;
use crate::links::{LinkService, StatsReporter};
use crate::storage::Storage;

use super::handlers::{create_link, show_form, show_stats, WebState};

pub fn create_web_router(storage: Arc<dyn Storage>, link_config: LinkConfig) -> Router {
    let state = Arc::new(WebState {
        links: LinkService::new(Arc::clone(&storage), link_config),
        stats: StatsReporter::new(storage),
    });

    Router::new()
        .route("/", get(show_form))
        .route("/create", post(create_link))
        .route("/stats/{slug}", get(show_stats))
        .with_state(state)
}
