//! Base trait and message types for completion backends.
//!
//! Defines the interface the relay depends on. Implementations handle their
//! own transport; the contract is one completion per call, with the raw
//! upstream error text preserved on failure.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tone::DecodingParams;

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// Message role in a chat exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a chat exchange, serialized in the wire shape the
/// Chat Completions API expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Build a system-role message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Build a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant-role message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failures from the external completion capability.
///
/// The original error text is carried through on every variant so the relay
/// can surface it for diagnostics.
#[derive(Debug, Error)]
pub enum CompletionError {
    /// Transport-level failure (connect, TLS, timeout).
    #[error("completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("completion API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The API answered 2xx but the body was not the expected shape.
    #[error("malformed completion response: {0}")]
    Malformed(String),
}

// ---------------------------------------------------------------------------
// CompletionBackend trait
// ---------------------------------------------------------------------------

/// Abstract completion capability: given a message exchange and decoding
/// parameters, return generated text or fail.
///
/// Exactly one outbound call per `complete` invocation; implementations must
/// not retry or fall back to another model.
#[async_trait]
pub trait CompletionBackend: Send + Sync + fmt::Debug {
    /// The model identifier this backend calls.
    fn model(&self) -> &str;

    /// Issue one completion call.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &DecodingParams,
    ) -> Result<String, CompletionError>;
}
