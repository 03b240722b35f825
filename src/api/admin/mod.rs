//! Dashboard endpoints: stats and cache maintenance

pub mod cache;
pub mod stats;

use axum::{
    Router,
    routing::{get, post},
};

use super::state::AppState;

/// Create dashboard router, mounted under /api
pub fn create_admin_router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .route("/cache/clear", post(cache::clear_cache))
}
