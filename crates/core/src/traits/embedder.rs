//! Embedding seam

use async_trait::async_trait;

use crate::Result;

/// Maps text to a fixed-dimension vector.
///
/// Implementations must reject empty or whitespace-only input with a typed
/// error rather than returning a degenerate vector, and every vector they
/// produce must have exactly `dim()` dimensions.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts, preserving order.
    ///
    /// The default issues one `embed` call per text concurrently; backends
    /// with a native batch endpoint should override this.
    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let futures: Vec<_> = texts.iter().map(|t| self.embed(t)).collect();
        futures::future::join_all(futures)
            .await
            .into_iter()
            .collect()
    }

    /// Embedding dimensionality, fixed per embedder
    fn dim(&self) -> usize;
}
