//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Transcript corpus configuration
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Chunking and retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Tool dispatch configuration
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Conversational memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Text generation provider configuration
    #[serde(default)]
    pub generation: GenerationConfig,
}

/// Transcript corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CorpusConfig {
    /// Directory holding `*.txt` transcripts. Required for ingestion;
    /// question answering against an already-built index works without it.
    #[serde(default)]
    pub transcript_dir: Option<String>,
}

/// Chunking and retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Maximum words per chunk
    #[serde(default = "default_chunk_max_words")]
    pub chunk_max_words: usize,
    /// Words repeated from the end of one chunk at the start of the next
    #[serde(default = "default_chunk_overlap_words")]
    pub chunk_overlap_words: usize,
    /// Chunks retrieved per answer
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Chunks retrieved when generating study notes (wider net)
    #[serde(default = "default_notes_top_k")]
    pub notes_top_k: usize,
}

fn default_chunk_max_words() -> usize {
    300
}

fn default_chunk_overlap_words() -> usize {
    50
}

fn default_top_k() -> usize {
    3
}

fn default_notes_top_k() -> usize {
    8
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_max_words: default_chunk_max_words(),
            chunk_overlap_words: default_chunk_overlap_words(),
            top_k: default_top_k(),
            notes_top_k: default_notes_top_k(),
        }
    }
}

/// Tool dispatch configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Execution budget per tool invocation, in seconds
    #[serde(default = "default_tool_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_tool_timeout_secs() -> u64 {
    12
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_tool_timeout_secs(),
        }
    }
}

/// Conversational memory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Turns kept per session before the oldest is evicted
    #[serde(default = "default_session_cap")]
    pub session_cap: usize,
    /// Minimum similarity for a durable recall to count as a match.
    /// 0.0 preserves top-1-regardless behavior; raise to filter weak hits.
    #[serde(default)]
    pub min_recall_score: f32,
}

fn default_session_cap() -> usize {
    5
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            session_cap: default_session_cap(),
            min_recall_score: 0.0,
        }
    }
}

/// Embedding provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// API endpoint (OpenAI-style `/v1/embeddings`)
    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,
    /// Model name
    #[serde(default = "default_embedding_model")]
    pub model: String,
    /// Embedding dimensionality; must match across ingestion and query
    #[serde(default = "default_embedding_dimension")]
    pub dimension: usize,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_embedding_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_embedding_model() -> String {
    "text-embedding-3-small".to_string()
}

fn default_embedding_dimension() -> usize {
    1536
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dimension: default_embedding_dimension(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Text generation provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// API endpoint (OpenAI-style `/v1/chat/completions`)
    #[serde(default = "default_generation_endpoint")]
    pub endpoint: String,
    /// Model name
    #[serde(default = "default_generation_model")]
    pub model: String,
    /// Default output budget for answer-shaped calls
    #[serde(default = "default_max_tokens")]
    pub max_tokens: usize,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

fn default_generation_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_generation_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> usize {
    300
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_generation_endpoint(),
            model: default_generation_model(),
            max_tokens: default_max_tokens(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Settings {
    /// Validate settings, fail-fast on misconfiguration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.chunk_max_words == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.chunk_max_words must be greater than zero".to_string(),
            ));
        }
        if self.retrieval.chunk_overlap_words >= self.retrieval.chunk_max_words {
            return Err(ConfigError::Invalid(format!(
                "retrieval.chunk_overlap_words ({}) must be less than chunk_max_words ({})",
                self.retrieval.chunk_overlap_words, self.retrieval.chunk_max_words
            )));
        }
        if self.retrieval.top_k == 0 || self.retrieval.notes_top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.top_k and retrieval.notes_top_k must be greater than zero".to_string(),
            ));
        }
        if self.tools.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "tools.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.memory.session_cap == 0 {
            return Err(ConfigError::Invalid(
                "memory.session_cap must be greater than zero".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimension must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The transcript directory, required for ingestion
    pub fn transcript_dir(&self) -> Result<&str, ConfigError> {
        self.corpus
            .transcript_dir
            .as_deref()
            .filter(|d| !d.is_empty())
            .ok_or_else(|| ConfigError::Missing("corpus.transcript_dir".to_string()))
    }
}

/// Load settings from defaults, an optional file, and environment variables.
///
/// Priority: `BUDDY_*` env vars > `config/buddy.toml` > built-in defaults.
/// Nested keys use `__` in the environment, e.g. `BUDDY_RETRIEVAL__TOP_K=5`.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/buddy").required(false))
        .add_source(Environment::with_prefix("BUDDY").separator("__"));

    let settings: Settings = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    settings.validate()?;

    tracing::debug!(
        chunk_max_words = settings.retrieval.chunk_max_words,
        chunk_overlap_words = settings.retrieval.chunk_overlap_words,
        top_k = settings.retrieval.top_k,
        tool_timeout_secs = settings.tools.timeout_secs,
        "Settings loaded"
    );

    Ok(settings)
}
