//! OpenAI Chat Completions backend.
//!
//! Direct integration with the Chat Completions API via `reqwest`. One
//! request per call, no retries, no fallback model; every failure is
//! reported to the caller with the upstream text intact.

use async_trait::async_trait;
use serde_json::Value;

use crate::llms::base::{ChatMessage, CompletionBackend, CompletionError};
use crate::tone::DecodingParams;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// OpenAI Chat Completions client.
#[derive(Debug, Clone)]
pub struct OpenAICompletion {
    model: String,
    api_key: String,
    base_url: Option<String>,
    timeout: std::time::Duration,
    client: reqwest::Client,
}

impl OpenAICompletion {
    /// Create a new backend for a model and credential.
    ///
    /// # Arguments
    ///
    /// * `model` - model name (e.g. "gpt-4o-mini").
    /// * `api_key` - bearer credential for the API.
    /// * `base_url` - optional base URL override for proxies and
    ///   API-compatible servers.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: Option<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url,
            timeout: std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            client: reqwest::Client::new(),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the API base URL.
    pub fn api_base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
    }

    /// Build the request body for the Chat Completions API.
    pub fn build_request_body(&self, messages: &[ChatMessage], params: &DecodingParams) -> Value {
        serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": params.temperature,
            "max_tokens": params.max_tokens,
        })
    }

    /// Extract the generated text from a Chat Completions response.
    fn parse_response(response: &Value) -> Result<String, CompletionError> {
        let content = response
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CompletionError::Malformed("no message content in response".to_string())
            })?;

        if let Some(usage) = response.get("usage") {
            log::debug!(
                "OpenAI token usage: prompt={}, completion={}, total={}",
                usage.get("prompt_tokens").and_then(Value::as_i64).unwrap_or(0),
                usage.get("completion_tokens").and_then(Value::as_i64).unwrap_or(0),
                usage.get("total_tokens").and_then(Value::as_i64).unwrap_or(0),
            );
        }

        Ok(content.to_string())
    }
}

#[async_trait]
impl CompletionBackend for OpenAICompletion {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(
        &self,
        messages: &[ChatMessage],
        params: &DecodingParams,
    ) -> Result<String, CompletionError> {
        log::debug!(
            "OpenAICompletion.complete: model={}, messages={}, temperature={}, max_tokens={}",
            self.model,
            messages.len(),
            params.temperature,
            params.max_tokens,
        );

        let endpoint = format!("{}/chat/completions", self.api_base_url());
        let body = self.build_request_body(messages, params);

        let response = self
            .client
            .post(&endpoint)
            .timeout(self.timeout)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: Value = serde_json::from_str(&text).map_err(|e| {
            let preview: String = text.chars().take(500).collect();
            CompletionError::Malformed(format!("{e} - body: {preview}"))
        })?;

        Self::parse_response(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tone::{DecodingParams, Intensity};

    fn backend() -> OpenAICompletion {
        OpenAICompletion::new("gpt-4o-mini", "sk-test", None)
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(backend().api_base_url(), "https://api.openai.com/v1");

        let custom = OpenAICompletion::new(
            "gpt-4o-mini",
            "sk-test",
            Some("http://localhost:8080/v1".to_string()),
        );
        assert_eq!(custom.api_base_url(), "http://localhost:8080/v1");
    }

    #[test]
    fn test_request_body_carries_decoding_params() {
        let params = DecodingParams::for_intensity(Intensity::new(10));
        let messages = [ChatMessage::system("prompt"), ChatMessage::user("hello")];
        let body = backend().build_request_body(&messages, &params);

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hello");
    }

    #[test]
    fn test_parse_response_extracts_content() {
        let response = serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "hi there"}}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 3, "total_tokens": 13},
        });
        assert_eq!(OpenAICompletion::parse_response(&response).unwrap(), "hi there");
    }

    #[test]
    fn test_parse_response_rejects_missing_content() {
        let response = serde_json::json!({"choices": []});
        let err = OpenAICompletion::parse_response(&response).unwrap_err();
        assert!(matches!(err, CompletionError::Malformed(_)));
    }
}
