//! Shared error type
//!
//! Leaf crates define their own error enums and convert into this type at
//! crate boundaries via `From` impls defined next to each leaf error.

use thiserror::Error;

/// Result alias using the shared error type
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error for the assistant
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("RAG error: {0}")]
    Rag(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Tool error: {0}")]
    Tool(String),
}
