//! Text generation seam

use async_trait::async_trait;

use crate::{GenerateRequest, Result};

/// Black-box text generation capability.
///
/// The request carries the sampling shape, so the same backend serves both
/// near-deterministic classification calls and conversational rewrites.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the request
    async fn generate(&self, request: &GenerateRequest) -> Result<String>;
}
