use axum::{Router, middleware, routing::get};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::admin;
use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::v1;
use crate::infrastructure::observability::{PrometheusMetrics, create_metrics_router};

/// Create the full router; the metrics endpoint is mounted only when a recorder is installed
pub fn create_router(
    state: AppState,
    metrics: Option<PrometheusMetrics>,
    metrics_path: &str,
) -> Router {
    let mut router = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        // OpenAI-compatible v1 API
        .nest("/v1", v1::create_v1_router())
        // Dashboard API
        .nest("/api", admin::create_admin_router())
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m, metrics_path));
    }

    router
}
