//! API middleware components

pub mod logging;
pub mod metrics;

use axum::{body::Body, extract::MatchedPath, http::Request};

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;

/// Route template when matched, raw path otherwise
fn route_path(request: &Request<Body>) -> String {
    request
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string())
}
