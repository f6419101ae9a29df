//! Configuration for the course buddy assistant
//!
//! Settings are layered: built-in defaults, then an optional TOML file,
//! then `BUDDY_*` environment variables. Validation is fail-fast: a
//! misconfigured chunker or retrieval section is rejected at load time,
//! not discovered mid-ingestion.

mod settings;

pub use settings::{
    load_settings, CorpusConfig, EmbeddingConfig, GenerationConfig, MemoryConfig,
    RetrievalConfig, Settings, ToolsConfig,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to load configuration: {0}")]
    Load(String),
}

impl From<ConfigError> for course_buddy_core::Error {
    fn from(err: ConfigError) -> Self {
        course_buddy_core::Error::Configuration(err.to_string())
    }
}
