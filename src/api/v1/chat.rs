//! Chat completions endpoint handler

use axum::extract::State;
use tracing::{debug, info};

use crate::api::state::AppState;
use crate::api::types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, Json};

/// POST /v1/chat/completions
pub async fn create_chat_completion(
    State(state): State<AppState>,
    Json(request): Json<ChatCompletionRequest>,
) -> Result<Json<ChatCompletionResponse>, ApiError> {
    let conversation = request.conversation()?;

    if let Some(model) = request.model.as_deref() {
        debug!(requested_model = %model, "Ignoring client model; backend is chosen by routing");
    }

    info!(messages = conversation.len(), "Processing chat completion request");

    let response = state.routing.route(&conversation, &request.options()).await?;

    Ok(Json(ChatCompletionResponse::from(&response)))
}
