//! Durable memory seam

use async_trait::async_trait;

use crate::Result;

/// Similarity lookup over durable conversation memory.
///
/// `recall` returns the single best-matching past exchange, or an empty
/// string when nothing is stored or nothing clears the relevance bar.
/// Callers must treat the empty string as "no memory", not as an error.
#[async_trait]
pub trait MemoryRecall: Send + Sync {
    async fn recall(&self, query: &str) -> Result<String>;
}
