//! Conversational memory
//!
//! Two lifecycles coexist. Session memory is a per-session ring buffer of
//! recent turns: bounded, ordered, gone at process end. Durable memory
//! embeds each exchange into its own vector collection and recalls the
//! single best match by similarity, across sessions.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use course_buddy_core::{Embedder, MemoryRecall};
use course_buddy_rag::{EmbeddingRecord, VectorStore};

/// One conversation turn: what the user said and what the assistant replied
#[derive(Debug, Clone)]
pub struct MemoryTurn {
    pub user: String,
    pub assistant: String,
    pub timestamp: DateTime<Utc>,
}

/// Short-term, recency-bounded memory keyed by session.
///
/// Ring-buffer semantics: once a session holds `cap` turns, appending
/// evicts the oldest. Sessions vanish with the process.
pub struct SessionMemory {
    sessions: DashMap<String, VecDeque<MemoryTurn>>,
    cap: usize,
}

impl SessionMemory {
    pub fn new(cap: usize) -> Self {
        Self {
            sessions: DashMap::new(),
            cap,
        }
    }

    /// Append a turn, evicting the oldest once the cap is reached
    pub fn append(&self, session_id: &str, user: impl Into<String>, assistant: impl Into<String>) {
        let mut turns = self
            .sessions
            .entry(session_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.cap));

        if turns.len() >= self.cap {
            turns.pop_front();
        }
        turns.push_back(MemoryTurn {
            user: user.into(),
            assistant: assistant.into(),
            timestamp: Utc::now(),
        });
    }

    /// Recent turns for a session, oldest first
    pub fn history(&self, session_id: &str) -> Vec<MemoryTurn> {
        self.sessions
            .get(session_id)
            .map(|turns| turns.iter().cloned().collect())
            .unwrap_or_default()
    }
}

/// Long-term memory over a vector collection.
///
/// Exchanges are embedded as a single combined text and recalled by
/// similarity. Recall returns at most one best match, or an empty string
/// when nothing is stored or nothing clears the relevance threshold.
pub struct DurableMemory {
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
    collection: String,
    min_score: f32,
}

impl DurableMemory {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        store: Arc<VectorStore>,
        collection: impl Into<String>,
        min_score: f32,
    ) -> Self {
        Self {
            embedder,
            store,
            collection: collection.into(),
            min_score,
        }
    }

    /// Persist one exchange into durable memory
    pub async fn remember(&self, user: &str, assistant: &str) -> course_buddy_core::Result<()> {
        let text = format!("User said: {}\nAssistant replied: {}", user, assistant);
        let vector = self.embedder.embed(&text).await?;

        let record = EmbeddingRecord {
            id: uuid::Uuid::new_v4().to_string(),
            vector,
            text,
            metadata: Default::default(),
        };

        self.store.upsert(&self.collection, vec![record])?;
        Ok(())
    }

    /// Best-matching past exchange, or an empty string
    pub async fn recall_best(&self, query: &str) -> course_buddy_core::Result<String> {
        let embedding = self.embedder.embed(query).await?;
        let hits = self.store.search(&self.collection, &embedding, 1)?;

        Ok(hits
            .into_iter()
            .next()
            .filter(|hit| hit.score >= self.min_score)
            .map(|hit| hit.text)
            .unwrap_or_default())
    }
}

#[async_trait]
impl MemoryRecall for DurableMemory {
    async fn recall(&self, query: &str) -> course_buddy_core::Result<String> {
        self.recall_best(query).await
    }
}
