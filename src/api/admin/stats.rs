use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::{Json, StatsResponse};

/// GET /api/stats
pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let snapshot = state.stats.snapshot();

    Json(StatsResponse::from_snapshot(
        &snapshot,
        state.routing.registry().names(),
    ))
}
