//! Generation backends
//!
//! [`ChatBackend`] posts to an OpenAI-style `/v1/chat/completions` endpoint
//! with exponential-backoff retry for transient failures. [`EchoGenerator`]
//! answers with its own prompt and exists so the pipeline can run and be
//! tested without a model.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use course_buddy_core::{GenerateRequest, Message, TextGenerator};

use crate::LlmError;

/// Generation backend configuration
#[derive(Debug, Clone)]
pub struct GenerationBackendConfig {
    /// Model name
    pub model: String,
    /// API base endpoint
    pub endpoint: String,
    /// API key (optional; sent as a bearer token when present)
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for GenerationBackendConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            endpoint: "https://api.openai.com".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

impl GenerationBackendConfig {
    /// Build from settings, resolving the API key from the environment
    pub fn from_settings(settings: &course_buddy_config::GenerationConfig) -> Self {
        Self {
            model: settings.model.clone(),
            endpoint: settings.endpoint.clone(),
            api_key: std::env::var(&settings.api_key_env).ok(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    max_tokens: usize,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Chat-completions backend
pub struct ChatBackend {
    client: Client,
    config: GenerationBackendConfig,
}

impl ChatBackend {
    /// Create a new backend
    pub fn new(config: GenerationBackendConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Model name this backend generates with
    pub fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn generate_with_retry(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    attempt,
                    max_retries = self.config.max_retries,
                    "Generation request failed, retrying after backoff"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(request).await {
                Ok(text) => return Ok(text),
                Err(e) if is_retryable(&e) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Network("Max retries exceeded".to_string())))
    }

    async fn execute_request(&self, request: &GenerateRequest) -> Result<String, LlmError> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: request.messages(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let url = format!("{}/v1/chat/completions", self.config.endpoint);
        let mut builder = self.client.post(&url).json(&body);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            // 5xx is transient and retryable, 4xx is not
            if status.is_server_error() {
                return Err(LlmError::Network(format!("Server error {}: {}", status, text)));
            }
            return Err(LlmError::Api(text));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices returned".to_string()))
    }
}

fn is_retryable(error: &LlmError) -> bool {
    matches!(error, LlmError::Network(_) | LlmError::Timeout)
}

#[async_trait]
impl TextGenerator for ChatBackend {
    async fn generate(&self, request: &GenerateRequest) -> course_buddy_core::Result<String> {
        let text = self.generate_with_retry(request).await?;
        tracing::debug!(
            model = %self.config.model,
            temperature = request.temperature,
            output_chars = text.len(),
            "Generated completion"
        );
        Ok(text)
    }
}

/// Generator that echoes its prompt back (no model required).
///
/// The reply is the user text followed by the system directive, so callers
/// that embed grounding context in the directive still see it reflected in
/// the output. Useful for tests and offline smoke runs.
pub struct EchoGenerator;

#[async_trait]
impl TextGenerator for EchoGenerator {
    async fn generate(&self, request: &GenerateRequest) -> course_buddy_core::Result<String> {
        Ok(format!("{}\n{}", request.user, request.system)
            .trim()
            .to_string())
    }
}
