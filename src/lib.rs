//! # tonedial
//!
//! A single-endpoint web relay that forwards a chat message to an LLM
//! completion API, dialing the system prompt and decoding parameters with a
//! 0-10 tone intensity slider.
//!
//! The crate splits into a pure intensity mapper ([`tone`]), the completion
//! backend seam ([`llms`]), the stateless request path ([`relay`]), and the
//! axum HTTP surface ([`server`]). Configuration is read once at startup
//! ([`config`]) and injected; nothing holds process-global state.

pub mod config;
pub mod llms;
pub mod relay;
pub mod server;
pub mod tone;

// Re-exports for the common path
pub use config::ServerConfig;
pub use llms::{ChatMessage, CompletionBackend, OpenAICompletion};
pub use relay::{handle_chat, ChatRequest, ChatResponse, RelayError};
pub use tone::{map_intensity, DecodingParams, Intensity};

/// Library version, reported by the health endpoint.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
