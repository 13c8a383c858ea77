//! Axum route handlers for the tonedial HTTP server.
//!
//! # Routes
//!
//! - `GET  /`         — Returns the embedded slider UI page
//! - `GET  /health`   — Returns `{"status": "ok", "version": ..., "model": ...}`
//! - `POST /api/chat` — Accepts `{"message": ..., "style": ...}`, relays to
//!   the completion backend

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::llms::{CompletionBackend, OpenAICompletion};
use crate::relay::{self, ChatRequest, ChatResponse, RelayError};

/// The slider UI, served as-is.
const INDEX_HTML: &str = include_str!("index.html");

/// Shared application state for the HTTP server.
///
/// Holds the single completion backend; constructed once at startup from the
/// resolved configuration and cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend every chat request is relayed through.
    pub backend: Arc<dyn CompletionBackend>,
}

impl AppState {
    /// Build state from the startup configuration.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            backend: Arc::new(OpenAICompletion::new(
                &config.model,
                &config.api_key,
                config.base_url.clone(),
            )),
        }
    }

    /// Build state around an arbitrary backend.
    pub fn with_backend(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/health", get(health_handler))
        .route("/api/chat", post(chat_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET / — the embedded slider UI.
async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// GET /health — liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "model": state.backend.model(),
    }))
}

/// POST /api/chat — relay one message to the completion backend.
///
/// The body is parsed leniently: a malformed or missing JSON body decodes as
/// an empty object, which then fails message validation. Validation failures
/// return 400, upstream failures 500, both as `{"error": ...}`.
async fn chat_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ChatResponse>, (StatusCode, Json<Value>)> {
    let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    let request = ChatRequest::from_value(&value);

    match relay::handle_chat(state.backend.as_ref(), &request).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            let status = match err {
                RelayError::Validation(_) => StatusCode::BAD_REQUEST,
                RelayError::Upstream(_) => {
                    tracing::error!("completion call failed: {err}");
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            };
            Err((status, Json(serde_json::json!({"error": err.to_string()}))))
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
