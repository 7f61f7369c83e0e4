// ============================================================
// Layer 1 — Serving Facade: Request Handlers
// ============================================================
// One axum handler per route. Handlers only translate between HTTP
// and the loaded ChatModel; every failure becomes a ServeError.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::server::{
    state::AppState, ChatRequest, ChatResponse, ConfigResponse, HealthResponse, ServeError,
};

/// Answer one user message with the model's parse result
pub async fn chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ServeError> {
    // A body that is not JSON is treated like a missing message
    let message = payload
        .ok()
        .and_then(|Json(req)| req.message)
        .filter(|m| !m.is_empty())
        .ok_or(ServeError::MissingMessage)?;

    let model = state.model().await?;

    let input = message.clone();
    let parsed = tokio::task::spawn_blocking(move || model.parse(&input))
        .await
        .map_err(|e| ServeError::Processing(e.to_string()))?
        .map_err(|e| {
            tracing::error!("Error processing message: {e:#}");
            ServeError::Processing(format!("{e:#}"))
        })?;

    Ok(Json(ChatResponse {
        user_message: message,
        bot_response: parsed,
        success:      true,
    }))
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status:  "healthy".to_string(),
        chatbot: state.config.project.name.clone(),
        version: state.config.project.version.clone(),
    })
}

/// Public chatbot configuration
pub async fn get_config(State(state): State<AppState>) -> Json<ConfigResponse> {
    Json(ConfigResponse {
        name:    state.config.project.name.clone(),
        version: state.config.project.version.clone(),
        domain:  state.config.dataset.domain.clone(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> ServeError {
    ServeError::NotFound
}
