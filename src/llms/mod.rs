//! Completion backend seam.
//!
//! This module provides the boundary to the external completion capability:
//!
//! - [`base`] - The [`CompletionBackend`] trait, chat message types, and the
//!   completion error taxonomy
//! - [`openai`] - The OpenAI Chat Completions implementation
//!
//! The relay only ever talks to the trait, so tests can swap in an in-memory
//! backend and the rest of the crate never touches the network.

pub mod base;
pub mod openai;

// Re-exports for convenience
pub use base::{ChatMessage, CompletionBackend, CompletionError, Role};
pub use openai::OpenAICompletion;
