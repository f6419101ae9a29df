//! Text embeddings
//!
//! [`HttpEmbedder`] talks to an OpenAI-style embeddings endpoint and is the
//! production path. [`SimpleEmbedder`] is a deterministic, offline
//! bag-of-words fake for tests and air-gapped runs; both enforce the same
//! contract: empty input is a typed error, output length always equals the
//! configured dimension.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;

use course_buddy_core::Embedder;

use crate::RagError;

/// HTTP embedder configuration
#[derive(Debug, Clone)]
pub struct HttpEmbedderConfig {
    /// API base endpoint
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// Expected embedding dimension
    pub dimension: usize,
    /// API key (optional; sent as a bearer token when present)
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum retry attempts for transient failures
    pub max_retries: u32,
    /// Initial backoff duration (doubles each retry)
    pub initial_backoff: Duration,
}

impl Default for HttpEmbedderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 3,
            initial_backoff: Duration::from_millis(100),
        }
    }
}

impl HttpEmbedderConfig {
    /// Build from settings, resolving the API key from the environment
    pub fn from_settings(settings: &course_buddy_config::EmbeddingConfig) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            dimension: settings.dimension,
            api_key: std::env::var(&settings.api_key_env).ok(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

/// Embedder backed by an OpenAI-style `/v1/embeddings` endpoint
pub struct HttpEmbedder {
    client: Client,
    config: HttpEmbedderConfig,
}

impl HttpEmbedder {
    /// Create a new HTTP embedder
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| RagError::Embedding(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Embed a batch in one provider call, with retry on transient failures
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() || texts.iter().any(|t| t.trim().is_empty()) {
            return Err(RagError::Embedding(
                "No usable text provided for embedding".to_string(),
            ));
        }

        let mut backoff = self.config.initial_backoff;
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::warn!(
                    attempt,
                    max_retries = self.config.max_retries,
                    "Embedding request failed, retrying after backoff"
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.execute_request(texts).await {
                Ok(embeddings) => return self.validate_dimensions(texts, embeddings),
                Err(e) if is_retryable(&e) => last_error = Some(e),
                Err(e) => return Err(e),
            }
        }

        Err(last_error
            .unwrap_or_else(|| RagError::Embedding("Max retries exceeded".to_string())))
    }

    async fn execute_request(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let request = EmbedRequest {
            model: &self.config.model,
            input: texts,
        };

        let url = format!("{}/v1/embeddings", self.config.endpoint);
        let mut builder = self.client.post(&url).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| RagError::Connection(format!("Embedding request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            // 5xx is transient and retryable, 4xx is not
            if status.is_server_error() {
                return Err(RagError::Connection(format!(
                    "Embedding server error {}: {}",
                    status, body
                )));
            }
            return Err(RagError::Embedding(format!(
                "Embedding request rejected {}: {}",
                status, body
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to parse embedding response: {}", e)))?;

        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }

    fn validate_dimensions(
        &self,
        texts: &[String],
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Vec<Vec<f32>>, RagError> {
        if embeddings.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "Provider returned {} embeddings for {} inputs",
                embeddings.len(),
                texts.len()
            )));
        }
        for embedding in &embeddings {
            if embedding.len() != self.config.dimension {
                return Err(RagError::DimensionMismatch {
                    expected: self.config.dimension,
                    got: embedding.len(),
                });
            }
        }
        Ok(embeddings)
    }
}

/// Transient failures worth retrying; provider rejections are not
fn is_retryable(error: &RagError) -> bool {
    matches!(error, RagError::Connection(_))
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> course_buddy_core::Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RagError::Embedding("No embedding returned".to_string()).into())
    }

    async fn embed_many(&self, texts: &[String]) -> course_buddy_core::Result<Vec<Vec<f32>>> {
        Ok(self.embed_batch(texts).await?)
    }

    fn dim(&self) -> usize {
        self.config.dimension
    }
}

/// Deterministic bag-of-words embedder for tests and offline runs.
///
/// Each lowercased word hashes to one dimension; the vector is normalized.
/// Texts sharing words land close under cosine similarity, which is enough
/// for retrieval tests without a model.
pub struct SimpleEmbedder {
    dimension: usize,
}

impl SimpleEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, RagError> {
        if text.trim().is_empty() {
            return Err(RagError::Embedding(
                "No usable text provided for embedding".to_string(),
            ));
        }

        let mut embedding = vec![0.0f32; self.dimension];
        for word in text.unicode_words() {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            let idx = (hasher.finish() as usize) % self.dimension;
            embedding[idx] += 1.0;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        Ok(embedding)
    }
}

#[async_trait]
impl Embedder for SimpleEmbedder {
    async fn embed(&self, text: &str) -> course_buddy_core::Result<Vec<f32>> {
        Ok(self.embed_text(text)?)
    }

    fn dim(&self) -> usize {
        self.dimension
    }
}
