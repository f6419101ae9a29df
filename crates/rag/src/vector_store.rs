//! In-process vector store
//!
//! Stores embedding records in named, independent collections and serves
//! cosine-similarity nearest-neighbor search. The search path takes a read
//! lock only, so concurrent readers never block each other; writes are
//! serialized by the write lock, matching the single-writer ingestion
//! discipline.
//!
//! A collection's dimensionality is fixed by the first record inserted
//! into it. An upsert batch containing any mismatched vector is rejected
//! whole, before a single record is written.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::RagError;

/// Metadata key for the owning transcript id
pub const META_TRANSCRIPT_ID: &str = "transcript_id";
/// Metadata key for the chunk sequence index
pub const META_CHUNK_INDEX: &str = "chunk_index";

/// A stored embedding with its source text and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// Unique record id within the collection
    pub id: String,
    /// Embedding vector; length must match the collection dimension
    pub vector: Vec<f32>,
    /// Original text the vector was computed from
    pub text: String,
    /// Additional metadata
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// A search result, ordered by descending similarity
#[derive(Debug, Clone)]
pub struct SearchHit {
    /// Record id
    pub id: String,
    /// Record text
    pub text: String,
    /// Cosine similarity to the query
    pub score: f32,
    /// Record metadata
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Collection {
    /// Dimensionality, fixed by the first inserted record
    dim: Option<usize>,
    /// Records in insertion order
    records: Vec<EmbeddingRecord>,
    /// Record id → position in `records`
    positions: HashMap<String, usize>,
}

/// Vector store with named collections
#[derive(Debug, Default)]
pub struct VectorStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl VectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection if it does not exist
    pub fn ensure_collection(&self, name: &str) {
        self.collections
            .write()
            .entry(name.to_string())
            .or_default();
    }

    /// Insert or overwrite records.
    ///
    /// Records are keyed by id: an existing id is overwritten in place,
    /// preserving its insertion position. The whole batch is validated
    /// against the collection dimension before any write, so a rejected
    /// batch leaves the collection untouched.
    pub fn upsert(&self, collection: &str, records: Vec<EmbeddingRecord>) -> Result<(), RagError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut collections = self.collections.write();
        let coll = collections.entry(collection.to_string()).or_default();

        let expected = coll.dim.unwrap_or(records[0].vector.len());
        for record in &records {
            if record.vector.len() != expected {
                return Err(RagError::DimensionMismatch {
                    expected,
                    got: record.vector.len(),
                });
            }
        }

        coll.dim = Some(expected);
        for record in records {
            match coll.positions.get(&record.id) {
                Some(&pos) => coll.records[pos] = record,
                None => {
                    coll.positions
                        .insert(record.id.clone(), coll.records.len());
                    coll.records.push(record);
                }
            }
        }

        Ok(())
    }

    /// Nearest-neighbor search by cosine similarity.
    ///
    /// Returns up to `k` hits ordered by descending similarity; equal
    /// scores keep insertion order. An empty or unknown collection yields
    /// an empty result, never an error. A query whose length differs from
    /// the collection dimension is rejected.
    pub fn search(
        &self,
        collection: &str,
        query: &[f32],
        k: usize,
    ) -> Result<Vec<SearchHit>, RagError> {
        let collections = self.collections.read();
        let coll = match collections.get(collection) {
            Some(c) => c,
            None => return Ok(Vec::new()),
        };

        let dim = match coll.dim {
            Some(d) => d,
            None => return Ok(Vec::new()),
        };
        if query.len() != dim {
            return Err(RagError::DimensionMismatch {
                expected: dim,
                got: query.len(),
            });
        }

        let mut hits: Vec<SearchHit> = coll
            .records
            .iter()
            .map(|r| SearchHit {
                id: r.id.clone(),
                text: r.text.clone(),
                score: cosine_similarity(query, &r.vector),
                metadata: r.metadata.clone(),
            })
            .collect();

        // Stable sort keeps insertion order for tied scores
        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        hits.truncate(k);

        Ok(hits)
    }

    /// Delete all records belonging to one transcript.
    ///
    /// Returns the number of records removed. Used by re-ingestion so a
    /// shrunk transcript leaves no stale chunks behind.
    pub fn delete_by_transcript(&self, collection: &str, transcript_id: &str) -> usize {
        let mut collections = self.collections.write();
        let coll = match collections.get_mut(collection) {
            Some(c) => c,
            None => return 0,
        };

        let before = coll.records.len();
        coll.records.retain(|r| {
            r.metadata.get(META_TRANSCRIPT_ID).map(String::as_str) != Some(transcript_id)
        });

        coll.positions.clear();
        for (pos, record) in coll.records.iter().enumerate() {
            coll.positions.insert(record.id.clone(), pos);
        }

        before - coll.records.len()
    }

    /// Number of records in a collection
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .get(collection)
            .map(|c| c.records.len())
            .unwrap_or(0)
    }
}

/// Cosine similarity; zero-norm vectors score 0.0
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
