//! Chat relay: validate, map intensity, one completion call.
//!
//! The relay is the whole request-handling path between the HTTP surface and
//! the completion backend. It is stateless; each invocation is independent
//! and makes exactly one outbound call on the happy path.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::llms::{ChatMessage, CompletionBackend};
use crate::tone::{self, Intensity};

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Decoded chat request.
///
/// The wire field for intensity is named `style`. Decoding goes through
/// [`ChatRequest::from_value`] rather than a serde derive so each field's
/// default is explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    /// The user's message; must be non-empty after trimming.
    pub message: String,
    /// Raw intensity value; clamped by the mapper.
    pub style: i64,
}

impl ChatRequest {
    /// Decode from a loosely-typed JSON body with documented defaults.
    ///
    /// A missing or non-string `message` decodes as empty (and will fail
    /// validation downstream). A missing or non-integer `style` decodes as
    /// 0, not the slider UI's displayed default of 5.
    pub fn from_value(body: &Value) -> Self {
        Self {
            message: body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            style: body.get("style").and_then(Value::as_i64).unwrap_or(0),
        }
    }
}

/// Successful relay response.
///
/// Echoes the model and decoding parameters actually used, for display and
/// debugging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Generated text from the model.
    pub reply: String,
    /// Model identifier the call was made with.
    pub model: String,
    /// Temperature the call was made with.
    pub temperature: f64,
    /// Output token budget the call was made with.
    pub max_tokens: u32,
    /// The clamped intensity the request resolved to.
    pub style: Intensity,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Per-request relay failures.
///
/// Both variants are recovered at the HTTP boundary into structured JSON
/// responses; neither crashes the process.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The request failed validation. Surfaced as a client error (400).
    #[error("{0}")]
    Validation(String),

    /// The external completion call failed. Surfaced as a server error
    /// (500) with the underlying message preserved.
    #[error("{0}")]
    Upstream(String),
}

// ---------------------------------------------------------------------------
// Relay
// ---------------------------------------------------------------------------

/// Handle one chat request end to end.
///
/// Validates the message, maps the intensity to a system prompt and decoding
/// parameters, and invokes the backend once with a system + user message
/// pair. No retries, no fallback model, no fabricated content on failure.
pub async fn handle_chat(
    backend: &dyn CompletionBackend,
    request: &ChatRequest,
) -> Result<ChatResponse, RelayError> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(RelayError::Validation("message is required".to_string()));
    }

    let mapping = tone::map_intensity(request.style);
    let messages = [
        ChatMessage::system(&mapping.system_prompt),
        ChatMessage::user(message),
    ];

    let reply = backend
        .complete(&messages, &mapping.params)
        .await
        .map_err(|e| RelayError::Upstream(e.to_string()))?;

    Ok(ChatResponse {
        reply,
        model: backend.model().to_string(),
        temperature: mapping.params.temperature,
        max_tokens: mapping.params.max_tokens,
        style: mapping.intensity,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;

    use crate::llms::CompletionError;
    use crate::tone::{DecodingParams, GUARDRAIL_CLAUSE, TONE_TABLE};

    /// Backend that records every call and returns a fixed reply.
    #[derive(Debug, Clone, Default)]
    struct RecordingBackend {
        calls: Arc<Mutex<Vec<(Vec<ChatMessage>, DecodingParams)>>>,
    }

    #[async_trait]
    impl CompletionBackend for RecordingBackend {
        fn model(&self) -> &str {
            "mock-model"
        }

        async fn complete(
            &self,
            messages: &[ChatMessage],
            params: &DecodingParams,
        ) -> Result<String, CompletionError> {
            self.calls
                .lock()
                .unwrap()
                .push((messages.to_vec(), *params));
            Ok("mock reply".to_string())
        }
    }

    /// Backend that always fails with a fixed upstream message.
    #[derive(Debug)]
    struct FailingBackend;

    #[async_trait]
    impl CompletionBackend for FailingBackend {
        fn model(&self) -> &str {
            "mock-model"
        }

        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _params: &DecodingParams,
        ) -> Result<String, CompletionError> {
            Err(CompletionError::Api {
                status: 429,
                body: "quota exceeded".to_string(),
            })
        }
    }

    fn request(message: &str, style: i64) -> ChatRequest {
        ChatRequest {
            message: message.to_string(),
            style,
        }
    }

    #[tokio::test]
    async fn test_empty_message_fails_without_backend_call() {
        let backend = RecordingBackend::default();
        let err = handle_chat(&backend, &request("", 5)).await.unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
        assert_eq!(err.to_string(), "message is required");
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_whitespace_message_fails_without_backend_call() {
        let backend = RecordingBackend::default();
        let err = handle_chat(&backend, &request("  ", 5)).await.unwrap_err();
        assert!(matches!(err, RelayError::Validation(_)));
        assert!(backend.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_intensity_zero_call() {
        let backend = RecordingBackend::default();
        let response = handle_chat(&backend, &request("hello", 0)).await.unwrap();

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (messages, params) = &calls[0];
        assert!((params.temperature - 0.20).abs() < 1e-9);
        assert_eq!(params.max_tokens, 256);
        assert_eq!(messages.len(), 2);
        assert!(messages[0].content.contains(TONE_TABLE[0]));
        assert!(messages[0].content.contains(GUARDRAIL_CLAUSE));
        assert_eq!(messages[1].content, "hello");

        assert_eq!(response.reply, "mock reply");
        assert_eq!(response.model, "mock-model");
        assert_eq!(response.style.value(), 0);
    }

    #[tokio::test]
    async fn test_intensity_ten_call() {
        let backend = RecordingBackend::default();
        let response = handle_chat(&backend, &request("hello", 10)).await.unwrap();

        let calls = backend.calls.lock().unwrap();
        let (messages, params) = &calls[0];
        assert!((params.temperature - 1.00).abs() < 1e-9);
        assert_eq!(params.max_tokens, 512);
        assert!(messages[0].content.contains(TONE_TABLE[10]));

        assert!((response.temperature - 1.00).abs() < 1e-9);
        assert_eq!(response.max_tokens, 512);
        assert_eq!(response.style.value(), 10);
    }

    #[tokio::test]
    async fn test_message_is_trimmed_before_send() {
        let backend = RecordingBackend::default();
        handle_chat(&backend, &request("  hello  ", 3)).await.unwrap();

        let calls = backend.calls.lock().unwrap();
        assert_eq!(calls[0].0[1].content, "hello");
    }

    #[tokio::test]
    async fn test_out_of_range_style_clamped_in_echo() {
        let backend = RecordingBackend::default();
        let response = handle_chat(&backend, &request("hello", 99)).await.unwrap();
        assert_eq!(response.style.value(), 10);
        assert_eq!(response.max_tokens, 512);

        let response = handle_chat(&backend, &request("hello", -5)).await.unwrap();
        assert_eq!(response.style.value(), 0);
        assert_eq!(response.max_tokens, 256);
    }

    #[tokio::test]
    async fn test_upstream_error_preserves_message() {
        let err = handle_chat(&FailingBackend, &request("hello", 5))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Upstream(_)));
        assert!(err.to_string().contains("quota exceeded"));
        assert!(err.to_string().contains("429"));
    }

    #[test]
    fn test_decode_defaults() {
        let decoded = ChatRequest::from_value(&serde_json::json!({"message": "hi"}));
        assert_eq!(decoded, request("hi", 0));

        let decoded = ChatRequest::from_value(&serde_json::json!({"message": "hi", "style": "7"}));
        assert_eq!(decoded.style, 0, "non-integer style defaults to 0");

        let decoded = ChatRequest::from_value(&serde_json::json!({"message": "hi", "style": 5.7}));
        assert_eq!(decoded.style, 0, "fractional style defaults to 0");

        let decoded = ChatRequest::from_value(&serde_json::json!({"style": 3}));
        assert_eq!(decoded.message, "");

        let decoded = ChatRequest::from_value(&Value::Null);
        assert_eq!(decoded, request("", 0));
    }

    #[test]
    fn test_response_wire_shape() {
        let response = ChatResponse {
            reply: "ok".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.52,
            max_tokens: 256,
            style: Intensity::new(4),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["reply"], "ok");
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"], 0.52);
        assert_eq!(json["max_tokens"], 256);
        assert_eq!(json["style"], 4);
    }
}
