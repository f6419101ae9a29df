//! Text generation backend
//!
//! One HTTP backend against an OpenAI-style chat-completions endpoint with
//! retry and backoff, plus an offline echo generator used by tests. Both
//! implement the `TextGenerator` seam from the core crate; the request
//! carries the sampling shape so classification and persona rewriting can
//! share one backend.

pub mod backend;

pub use backend::{ChatBackend, EchoGenerator, GenerationBackendConfig};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for course_buddy_core::Error {
    fn from(err: LlmError) -> Self {
        course_buddy_core::Error::Llm(err.to_string())
    }
}
