//! tonedial HTTP server binary.
//!
//! Starts an axum HTTP server that serves the slider UI and relays chat
//! messages to the configured completion API.
//!
//! # Environment Variables
//!
//! - `OPENAI_API_KEY` — API credential (required)
//! - `OPENAI_MODEL` — model identifier (default: "gpt-4o-mini")
//! - `OPENAI_BASE_URL` — completion API base URL override (optional)
//! - `PORT` — HTTP port (default: 5000)
//! - `RUST_LOG` — Tracing filter (default: "info,tonedial=debug")
//!
//! # Usage
//!
//! ```bash
//! OPENAI_API_KEY=sk-... cargo run --bin server
//! ```

use tonedial::config::ServerConfig;
use tonedial::server::{app_router, AppState};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tonedial=debug".into()),
        )
        .init();

    // Configuration errors are fatal: refuse to bind without a credential.
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("configuration error: {err}");
            std::process::exit(1);
        }
    };

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let state = AppState::new(&config);
    let app = app_router(state);

    tracing::info!("tonedial server starting on {}, model: {}", bind_addr, config.model);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /         — slider UI");
    tracing::info!("  GET  /health   — liveness probe");
    tracing::info!("  POST /api/chat — chat relay");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .await
        .expect("Server failed");
}
