//! Transcript corpus seam

use async_trait::async_trait;

use crate::Result;

/// Read access to the transcript corpus.
///
/// Transcripts are immutable once fetched; re-ingestion replaces a
/// transcript's indexed chunks wholesale rather than mutating them.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// List transcript ids available in the corpus
    async fn list(&self) -> Result<Vec<String>>;

    /// Fetch the full text of one transcript
    async fn fetch(&self, id: &str) -> Result<String>;
}
