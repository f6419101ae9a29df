//! Transcript retriever
//!
//! Embeds a query and pulls the nearest transcript chunks from the vector
//! store. Retrieval finding nothing is an empty result, not an error;
//! callers decide how to phrase "no information found".

use std::sync::Arc;

use course_buddy_core::Embedder;

use crate::vector_store::{SearchHit, VectorStore};

/// Dense top-k retriever over one collection
pub struct TranscriptRetriever {
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    collection: String,
    top_k: usize,
}

impl TranscriptRetriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<VectorStore>,
        collection: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            embedder,
            store,
            collection: collection.into(),
            top_k,
        }
    }

    /// Retrieve the configured number of chunks for a query
    pub async fn retrieve(&self, query: &str) -> course_buddy_core::Result<Vec<SearchHit>> {
        self.retrieve_k(query, self.top_k).await
    }

    /// Retrieve up to `k` chunks for a query
    pub async fn retrieve_k(
        &self,
        query: &str,
        k: usize,
    ) -> course_buddy_core::Result<Vec<SearchHit>> {
        let embedding = self.embedder.embed(query).await?;
        let hits = self.store.search(&self.collection, &embedding, k)?;

        tracing::debug!(
            query,
            hits = hits.len(),
            top_score = hits.first().map(|h| h.score).unwrap_or(0.0),
            "Retrieved transcript chunks"
        );

        Ok(hits)
    }

    /// Build a single context block from retrieved chunks
    pub fn build_context(hits: &[SearchHit]) -> String {
        let chunks: Vec<&str> = hits.iter().map(|h| h.text.as_str()).collect();
        format!(
            "Relevant course transcript chunks:\n\n{}",
            chunks.join("\n\n")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::embeddings::SimpleEmbedder;
    use crate::vector_store::EmbeddingRecord;

    async fn seeded_store(embedder: &SimpleEmbedder) -> Arc<VectorStore> {
        let store = Arc::new(VectorStore::new());
        let texts = [
            ("v1::0", "Agents use tools to act on the environment"),
            ("v1::1", "Transcripts are chunked before embedding"),
            ("v2::0", "The weather in the demo video was sunny"),
        ];

        let mut records = Vec::new();
        for (id, text) in texts {
            records.push(EmbeddingRecord {
                id: id.to_string(),
                vector: embedder.embed(text).await.unwrap(),
                text: text.to_string(),
                metadata: HashMap::new(),
            });
        }
        store.upsert("transcripts", records).unwrap();
        store
    }

    #[tokio::test]
    async fn test_retrieve_finds_relevant_chunk() {
        let embedder = SimpleEmbedder::new(128);
        let store = seeded_store(&embedder).await;
        let retriever =
            TranscriptRetriever::new(Arc::new(SimpleEmbedder::new(128)), store, "transcripts", 2);

        let hits = retriever.retrieve("what do agents use to act").await.unwrap();
        assert!(!hits.is_empty());
        assert!(hits[0].text.contains("tools"));
    }

    #[tokio::test]
    async fn test_retrieve_from_empty_store_is_empty() {
        let store = Arc::new(VectorStore::new());
        store.ensure_collection("transcripts");
        let retriever =
            TranscriptRetriever::new(Arc::new(SimpleEmbedder::new(64)), store, "transcripts", 3);

        let hits = retriever.retrieve("anything").await.unwrap();
        assert!(hits.is_empty());
    }

    #[test]
    fn test_build_context_joins_chunks() {
        let hits = vec![
            SearchHit {
                id: "a".to_string(),
                text: "first chunk".to_string(),
                score: 0.9,
                metadata: HashMap::new(),
            },
            SearchHit {
                id: "b".to_string(),
                text: "second chunk".to_string(),
                score: 0.8,
                metadata: HashMap::new(),
            },
        ];

        let context = TranscriptRetriever::build_context(&hits);
        assert!(context.starts_with("Relevant course transcript chunks:"));
        assert!(context.contains("first chunk\n\nsecond chunk"));
    }
}
