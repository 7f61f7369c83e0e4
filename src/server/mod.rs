// ============================================================
// Layer 1 — Serving Facade (HTTP API)
// ============================================================
// A thin JSON API over a loaded chat model:
//
//   POST /api/chat    {"message": "..."} → parse result
//   GET  /api/health                      → liveness + project info
//   GET  /api/config                      → name, version, domain
//
// Errors here are request-level (`ServeError`): each maps to an
// HTTP status and a `{"error": "..."}` body, separate from the
// pipeline's `PipelineError`.

mod handlers;
mod state;

pub use handlers::*;
pub use state::*;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::traits::ModelLoader;
use crate::infra::config::Configuration;

/// Request-level failures of the serving API
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("Message is required")]
    MissingMessage,

    #[error("Chatbot not initialized")]
    NotInitialized,

    /// The model failed on a message
    #[error("{0}")]
    Processing(String),

    #[error("Endpoint not found")]
    NotFound,

    #[error("cannot bind {addr}: {source}")]
    Bind {
        addr:   String,
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::MissingMessage => StatusCode::BAD_REQUEST,
            ServeError::NotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        let body = ErrorResponse { error: self.to_string() };
        (self.status(), Json(body)).into_response()
    }
}

// ─── Request/Response DTOs ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub user_message: String,
    /// The model's parse result, passed through unchanged
    pub bot_response: Value,
    pub success:      bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status:  String,
    pub chatbot: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigResponse {
    pub name:    String,
    pub version: String,
    pub domain:  String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ─── Server ───────────────────────────────────────────────────────────────────

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health_check))
        .route("/api/config", get(get_config))
        .fallback(not_found)
        .with_state(state)
}

/// Bind `deployment.host:deployment.port` and serve until shutdown.
pub async fn run(config: Configuration, loader: Arc<dyn ModelLoader>) -> Result<(), ServeError> {
    let host = config.deployment.host.clone();
    let port = config.deployment.port;

    let listener = tokio::net::TcpListener::bind((host.as_str(), port))
        .await
        .map_err(|source| ServeError::Bind { addr: format!("{host}:{port}"), source })?;

    tracing::info!(
        "Serving '{}' v{} on http://{}",
        config.project.name,
        config.project.version,
        listener.local_addr()?
    );

    let app = router(AppState::new(config, loader));
    axum::serve(listener, app).await?;
    Ok(())
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::ChatModel;
    use serde_json::json;
    use std::path::Path;

    struct EchoModel;

    impl ChatModel for EchoModel {
        fn parse(&self, message: &str) -> anyhow::Result<Value> {
            Ok(json!({"text": message, "intent": {"name": "greet"}}))
        }
    }

    struct EchoLoader;

    impl ModelLoader for EchoLoader {
        fn load(&self, _artifact: &Path) -> anyhow::Result<Arc<dyn ChatModel>> {
            Ok(Arc::new(EchoModel))
        }
    }

    /// Serve the full router on an ephemeral port, return its base URL
    async fn spawn_app() -> String {
        let state    = AppState::new(Configuration::default(), Arc::new(EchoLoader));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr     = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router(state)).await.unwrap() });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_non_json_body_is_missing_message() {
        let base = spawn_app().await;
        let resp = reqwest::Client::new()
            .post(format!("{base}/api/chat"))
            .header("content-type", "text/plain")
            .body("hello")
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"error": "Message is required"}));
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let base = spawn_app().await;
        let resp = reqwest::get(format!("{base}/nope")).await.unwrap();

        assert_eq!(resp.status().as_u16(), 404);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({"error": "Endpoint not found"}));
    }

    #[tokio::test]
    async fn test_chat_through_router() {
        let base = spawn_app().await;
        let resp = reqwest::Client::new()
            .post(format!("{base}/api/chat"))
            .json(&json!({"message": "hi"}))
            .send()
            .await
            .unwrap();

        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["user_message"], "hi");
        assert_eq!(body["success"], true);
        assert_eq!(body["bot_response"]["intent"]["name"], "greet");
    }
}
