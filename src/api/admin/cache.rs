use axum::extract::State;
use tracing::info;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CacheClearResponse, Json};

/// POST /api/cache/clear
///
/// Empties the semantic cache and resets every counter. Safe to repeat.
pub async fn clear_cache(State(state): State<AppState>) -> Result<Json<CacheClearResponse>, ApiError> {
    state.cache.clear().await?;
    state.stats.reset();

    info!("Semantic cache cleared and stats reset");

    Ok(Json(CacheClearResponse::success()))
}
