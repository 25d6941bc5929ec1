use crate::config::CompletionConfig;
use crate::error::{RecipeError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A text-completion backend.
///
/// Implementations make exactly one attempt per call; there is no retry.
#[async_trait]
pub trait CompletionProvider: Send + Sync + fmt::Debug {
    /// Send a prompt and return the model's raw text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    fn model_name(&self) -> &str;
}

/// OpenAI-compatible chat-completion client (Groq by default).
#[derive(Debug, Clone)]
pub struct ChatCompletionClient {
    http: Client,
    config: CompletionConfig,
}

impl ChatCompletionClient {
    /// Create a client, rejecting a missing API key before any request.
    pub fn new(config: CompletionConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(RecipeError::Configuration(
                "LLM API key is missing".to_string(),
            ));
        }
        Ok(Self {
            http: Client::new(),
            config,
        })
    }

    /// Use a custom `reqwest::Client`.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn config(&self) -> &CompletionConfig {
        &self.config
    }

    fn url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.endpoint.trim_end_matches('/')
        )
    }
}

/// JSON body for a single-message chat completion.
pub fn request_body(config: &CompletionConfig, prompt: &str) -> Value {
    json!({
        "model": config.model,
        "messages": [{"role": "user", "content": prompt}],
        "temperature": config.temperature,
        "max_tokens": config.max_tokens,
    })
}

/// `choices[0].message.content`, or empty when the shape is unexpected.
pub fn extract_content(response: &Value) -> String {
    response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

#[async_trait]
impl CompletionProvider for ChatCompletionClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let url = self.url();
        tracing::info!(model = %self.config.model, prompt_len = prompt.len(), "requesting completion");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .timeout(self.config.timeout)
            .json(&request_body(&self.config, prompt))
            .send()
            .await
            .map_err(|e| RecipeError::Network {
                context: format!("Failed to connect to LLM at {}", url),
                source: e,
            })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "LLM returned an error status");
            return Err(RecipeError::Http { status, body });
        }

        let body = resp.text().await.map_err(|e| RecipeError::Network {
            context: "Failed to read LLM response body".to_string(),
            source: e,
        })?;

        match serde_json::from_str::<Value>(&body) {
            Ok(json) => Ok(extract_content(&json)),
            Err(e) => {
                tracing::warn!(error = %e, "LLM response body is not JSON");
                Ok(String::new())
            }
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Deterministic provider for tests and offline demos.
///
/// Responses are matched by checking whether the prompt contains a
/// registered substring; the first match wins.
#[derive(Debug, Default)]
pub struct FakeProvider {
    responses: Vec<(String, String)>,
    default_response: Option<String>,
    failure_status: Option<u16>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every prompt with `response`.
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(response.into());
        self
    }

    /// Answer prompts containing `prompt_contains` with `response`.
    pub fn with_response(mut self, prompt_contains: &str, response: &str) -> Self {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
        self
    }

    /// Fail every call with an HTTP error of the given status.
    pub fn failing_with_status(mut self, status: u16) -> Self {
        self.failure_status = Some(status);
        self
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CompletionProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(status) = self.failure_status {
            return Err(RecipeError::Http {
                status,
                body: "fake failure".to_string(),
            });
        }

        self.responses
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, response)| response.clone())
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| RecipeError::Http {
                status: 404,
                body: "no fake response registered".to_string(),
            })
    }

    fn model_name(&self) -> &str {
        "fake"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_configuration_error() {
        let err = ChatCompletionClient::new(CompletionConfig::default()).unwrap_err();
        assert!(matches!(err, RecipeError::Configuration(_)));
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = ChatCompletionClient::new(
            CompletionConfig::default()
                .with_api_key("k")
                .with_endpoint("http://localhost:8080/v1/"),
        )
        .unwrap();
        assert_eq!(client.url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.model_name(), "llama3-8b-8192");
    }

    #[test]
    fn test_client_debug_hides_key() {
        let client =
            ChatCompletionClient::new(CompletionConfig::default().with_api_key("gsk_live_123"))
                .unwrap();
        assert!(!format!("{:?}", client).contains("gsk_live_123"));
    }

    #[test]
    fn test_request_body_shape() {
        let config = CompletionConfig::default().with_max_tokens(900);
        let body = request_body(&config, "make soup");
        assert_eq!(body["model"], "llama3-8b-8192");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "make soup");
        assert_eq!(body["temperature"], 0.7);
        assert_eq!(body["max_tokens"], 900);
    }

    #[test]
    fn test_extract_content() {
        let resp = json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "[1]"}}]
        });
        assert_eq!(extract_content(&resp), "[1]");
    }

    #[test]
    fn test_extract_content_unexpected_shape() {
        assert_eq!(extract_content(&json!({})), "");
        assert_eq!(extract_content(&json!({"choices": []})), "");
        assert_eq!(
            extract_content(&json!({"choices": [{"message": {"content": null}}]})),
            ""
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let client = ChatCompletionClient::new(
            CompletionConfig::default()
                .with_api_key("k")
                .with_endpoint("http://127.0.0.1:1/v1")
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let err = client.complete("hi").await.unwrap_err();
        assert!(err.is_network());
    }

    #[tokio::test]
    async fn test_fake_provider_matching() {
        let fake = FakeProvider::new()
            .with_response("soup", "[\"soup\"]")
            .with_default_response("[]");
        assert_eq!(fake.complete("make soup").await.unwrap(), "[\"soup\"]");
        assert_eq!(fake.complete("make stew").await.unwrap(), "[]");
        assert_eq!(fake.call_count(), 2);
        assert_eq!(fake.prompts(), vec!["make soup", "make stew"]);
    }

    #[tokio::test]
    async fn test_fake_provider_failure() {
        let fake = FakeProvider::new().failing_with_status(503);
        let err = fake.complete("x").await.unwrap_err();
        assert!(matches!(err, RecipeError::Http { status: 503, .. }));
    }
}
