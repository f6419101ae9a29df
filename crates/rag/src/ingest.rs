//! Ingestion pipeline
//!
//! Drives transcript source → chunker → embedder → vector store to
//! (re)build the transcript index. Ingestion is idempotent: records are
//! keyed by (transcript id, chunk index) and a transcript's prior rows are
//! deleted before its new rows land, so re-ingesting unchanged input
//! yields the same indexed state and a shrunk transcript leaves no stale
//! chunks behind.
//!
//! One transcript failing to embed or index must not abort the rest of the
//! run; failures are tallied per source and logged.

use std::sync::Arc;

use course_buddy_core::{Embedder, TranscriptSource};

use crate::chunker::WordChunker;
use crate::vector_store::{
    EmbeddingRecord, VectorStore, META_CHUNK_INDEX, META_TRANSCRIPT_ID,
};

/// Outcome of one ingestion run
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Transcripts successfully indexed
    pub files_indexed: usize,
    /// Chunks written across all transcripts
    pub chunks_indexed: usize,
    /// Per-source failures: (transcript id, cause)
    pub failures: Vec<(String, String)>,
}

/// Ingestion pipeline over one collection
pub struct IngestPipeline {
    source: Arc<dyn TranscriptSource>,
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    chunker: WordChunker,
    collection: String,
}

impl IngestPipeline {
    pub fn new(
        source: Arc<dyn TranscriptSource>,
        embedder: Arc<dyn Embedder>,
        store: Arc<VectorStore>,
        chunker: WordChunker,
        collection: impl Into<String>,
    ) -> Self {
        Self {
            source,
            embedder,
            store,
            chunker,
            collection: collection.into(),
        }
    }

    /// Rebuild the index from the transcript source.
    ///
    /// Fails only when the corpus itself cannot be listed; everything
    /// per-transcript is contained and reported.
    pub async fn ingest(&self) -> course_buddy_core::Result<IngestReport> {
        let ids = self.source.list().await?;
        self.store.ensure_collection(&self.collection);

        let mut report = IngestReport::default();

        for id in ids {
            match self.ingest_one(&id).await {
                Ok(chunks) => {
                    tracing::info!(transcript = %id, chunks, "Indexed transcript");
                    report.files_indexed += 1;
                    report.chunks_indexed += chunks;
                }
                Err(e) => {
                    tracing::warn!(transcript = %id, error = %e, "Failed to index transcript");
                    report.failures.push((id, e.to_string()));
                }
            }
        }

        tracing::info!(
            files_indexed = report.files_indexed,
            chunks_indexed = report.chunks_indexed,
            failures = report.failures.len(),
            "Ingestion complete"
        );

        Ok(report)
    }

    /// Ingest a single transcript, returning the number of chunks written
    async fn ingest_one(&self, id: &str) -> course_buddy_core::Result<usize> {
        let text = self.source.fetch(id).await?;
        let chunks = self.chunker.chunk_all(&text);

        // An empty transcript still supersedes whatever was indexed before
        if chunks.is_empty() {
            self.store.delete_by_transcript(&self.collection, id);
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_many(&texts).await?;

        let records: Vec<EmbeddingRecord> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, vector)| EmbeddingRecord {
                id: format!("{}::{}", id, chunk.index),
                vector,
                text: chunk.text.clone(),
                metadata: [
                    (META_TRANSCRIPT_ID.to_string(), id.to_string()),
                    (META_CHUNK_INDEX.to_string(), chunk.index.to_string()),
                ]
                .into(),
            })
            .collect();

        self.store.delete_by_transcript(&self.collection, id);
        let count = records.len();
        self.store.upsert(&self.collection, records)?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::RwLock;
    use std::collections::BTreeMap;

    use crate::chunker::ChunkerConfig;
    use crate::embeddings::SimpleEmbedder;
    use crate::RagError;

    /// Transcript source over a fixed in-memory corpus
    struct StaticSource {
        transcripts: RwLock<BTreeMap<String, String>>,
    }

    impl StaticSource {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self {
                transcripts: RwLock::new(
                    entries
                        .iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                ),
            }
        }

        fn set(&self, id: &str, text: &str) {
            self.transcripts
                .write()
                .insert(id.to_string(), text.to_string());
        }
    }

    #[async_trait]
    impl TranscriptSource for StaticSource {
        async fn list(&self) -> course_buddy_core::Result<Vec<String>> {
            Ok(self.transcripts.read().keys().cloned().collect())
        }

        async fn fetch(&self, id: &str) -> course_buddy_core::Result<String> {
            self.transcripts
                .read()
                .get(id)
                .cloned()
                .ok_or_else(|| RagError::Source(format!("Unknown transcript: {}", id)).into())
        }
    }

    /// Embedder that fails for texts containing a marker word
    struct FlakyEmbedder {
        inner: SimpleEmbedder,
    }

    #[async_trait]
    impl Embedder for FlakyEmbedder {
        async fn embed(&self, text: &str) -> course_buddy_core::Result<Vec<f32>> {
            if text.contains("poison") {
                return Err(RagError::Embedding("provider rejected input".to_string()).into());
            }
            self.inner.embed(text).await
        }

        fn dim(&self) -> usize {
            self.inner.dim()
        }
    }

    fn pipeline(
        source: Arc<StaticSource>,
        store: Arc<VectorStore>,
        max_words: usize,
        overlap_words: usize,
    ) -> IngestPipeline {
        IngestPipeline::new(
            source,
            Arc::new(SimpleEmbedder::new(32)),
            store,
            WordChunker::new(ChunkerConfig {
                max_words,
                overlap_words,
            })
            .unwrap(),
            "transcripts",
        )
    }

    #[tokio::test]
    async fn test_ingest_counts_files_and_chunks() {
        let source = Arc::new(StaticSource::new(&[
            ("video_1", "agents use tools to act on the environment"),
            ("video_2", "memory lets agents recall earlier context"),
        ]));
        let store = Arc::new(VectorStore::new());

        let report = pipeline(source, store.clone(), 300, 50).ingest().await.unwrap();

        assert_eq!(report.files_indexed, 2);
        assert_eq!(report.chunks_indexed, 2);
        assert!(report.failures.is_empty());
        assert_eq!(store.count("transcripts"), 2);
    }

    #[tokio::test]
    async fn test_ingest_twice_is_idempotent() {
        // ~1200 words chunked at 300 with overlap 50
        let long_text = "lecture word ".repeat(600);
        let source = Arc::new(StaticSource::new(&[("video_1", long_text.as_str())]));
        let store = Arc::new(VectorStore::new());
        let pipeline = pipeline(source, store.clone(), 300, 50);

        let first = pipeline.ingest().await.unwrap();
        let second = pipeline.ingest().await.unwrap();

        assert_eq!(first.chunks_indexed, second.chunks_indexed);
        assert_eq!(store.count("transcripts"), first.chunks_indexed);
    }

    #[tokio::test]
    async fn test_reingest_shrunk_transcript_drops_stale_chunks() {
        let long_text = "word ".repeat(900);
        let source = Arc::new(StaticSource::new(&[("video_1", long_text.as_str())]));
        let store = Arc::new(VectorStore::new());
        let pipeline = pipeline(source.clone(), store.clone(), 300, 50);

        pipeline.ingest().await.unwrap();
        assert!(store.count("transcripts") > 1);

        source.set("video_1", "just a short transcript now");
        let report = pipeline.ingest().await.unwrap();

        assert_eq!(report.chunks_indexed, 1);
        assert_eq!(store.count("transcripts"), 1);
    }

    #[tokio::test]
    async fn test_one_failing_transcript_does_not_abort_the_run() {
        let source = Arc::new(StaticSource::new(&[
            ("video_1", "agents use tools"),
            ("video_2", "poison transcript that cannot embed"),
        ]));
        let store = Arc::new(VectorStore::new());
        let pipeline = IngestPipeline::new(
            source,
            Arc::new(FlakyEmbedder {
                inner: SimpleEmbedder::new(32),
            }),
            store.clone(),
            WordChunker::new(ChunkerConfig {
                max_words: 300,
                overlap_words: 50,
            })
            .unwrap(),
            "transcripts",
        );

        let report = pipeline.ingest().await.unwrap();

        assert_eq!(report.files_indexed, 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, "video_2");
        assert_eq!(store.count("transcripts"), 1);
    }

    #[tokio::test]
    async fn test_empty_transcript_contributes_zero_chunks() {
        let source = Arc::new(StaticSource::new(&[
            ("video_1", "agents use tools"),
            ("video_2", "   \n  "),
        ]));
        let store = Arc::new(VectorStore::new());

        let report = pipeline(source, store.clone(), 300, 50).ingest().await.unwrap();

        assert_eq!(report.files_indexed, 2);
        assert_eq!(report.chunks_indexed, 1);
        assert!(report.failures.is_empty());
    }
}
