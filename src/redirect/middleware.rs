use axum::{body::Body, http::HeaderValue, http::Request, middleware::Next, response::Response};
use std::time::Instant;

pub const TIMING_HEADER: &str = "x-smartlink-timing-total-ms";

/// Stamp every response with the time spent handling the request
pub async fn record_request_timing(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis().to_string();
    if let Ok(value) = HeaderValue::from_str(&elapsed_ms) {
        response.headers_mut().insert(TIMING_HEADER, value);
    }

    response
}
