//! Retrieval pipeline for course transcripts
//!
//! Features:
//! - Word-based chunking with configurable overlap
//! - Dense embeddings via an OpenAI-style HTTP endpoint
//! - In-process vector store with named collections and cosine search
//! - Directory-backed transcript source
//! - Idempotent ingestion with per-source failure containment
//! - Top-k transcript retriever for grounded answering

pub mod chunker;
pub mod embeddings;
pub mod ingest;
pub mod retriever;
pub mod source;
pub mod vector_store;

pub use chunker::{Chunk, ChunkerConfig, WordChunker};
pub use embeddings::{HttpEmbedder, HttpEmbedderConfig, SimpleEmbedder};
pub use ingest::{IngestPipeline, IngestReport};
pub use retriever::TranscriptRetriever;
pub use source::DirTranscriptSource;
pub use vector_store::{EmbeddingRecord, SearchHit, VectorStore};

/// Collection holding transcript chunk embeddings
pub const TRANSCRIPT_COLLECTION: &str = "transcripts";
/// Collection holding durable conversation memory
pub const MEMORY_COLLECTION: &str = "memory";

use thiserror::Error;

/// RAG errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Dimension mismatch: collection expects {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Transcript source error: {0}")]
    Source(String),

    #[error("Invalid chunking config: {0}")]
    InvalidChunking(String),
}

impl From<RagError> for course_buddy_core::Error {
    fn from(err: RagError) -> Self {
        course_buddy_core::Error::Rag(err.to_string())
    }
}
