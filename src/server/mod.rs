//! HTTP server for the tone-dialed chat relay.
//!
//! # Endpoints
//!
//! - `GET  /`         — Static slider UI
//! - `GET  /health`   — Liveness probe
//! - `POST /api/chat` — Relay a message to the completion API

pub mod routes;

pub use routes::{app_router, AppState};
