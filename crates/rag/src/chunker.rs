//! Word-based transcript chunking
//!
//! Splits transcripts into overlapping word-window chunks sized for the
//! embedding model. Splitting is by word count, not raw characters, so
//! chunks stay semantically coherent and respect downstream model limits.
//!
//! The overlap repeats the trailing words of one chunk at the start of the
//! next, preserving context across boundaries. A configuration where the
//! overlap is not smaller than the window would never advance, so it is
//! rejected at construction.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

use crate::RagError;

/// Chunker configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum words per chunk
    pub max_words: usize,
    /// Words repeated from the previous chunk at the start of the next
    pub overlap_words: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_words: 300,
            overlap_words: 50,
        }
    }
}

/// A single chunk of transcript text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Chunk text, sliced from the original transcript
    pub text: String,
    /// 0-based position within the transcript, monotonic
    pub index: usize,
    /// Number of words in this chunk
    pub word_count: usize,
}

/// Word-window chunker
#[derive(Debug, Clone)]
pub struct WordChunker {
    config: ChunkerConfig,
}

impl WordChunker {
    /// Create a chunker, rejecting non-advancing configurations
    pub fn new(config: ChunkerConfig) -> Result<Self, RagError> {
        if config.max_words == 0 {
            return Err(RagError::InvalidChunking(
                "max_words must be greater than zero".to_string(),
            ));
        }
        if config.overlap_words >= config.max_words {
            return Err(RagError::InvalidChunking(format!(
                "overlap_words ({}) must be less than max_words ({})",
                config.overlap_words, config.max_words
            )));
        }
        Ok(Self { config })
    }

    /// Chunk a transcript lazily.
    ///
    /// The iterator is finite and restartable (call `chunk` again for a
    /// fresh pass). Input with no words yields no chunks; input that fits
    /// within `max_words` yields exactly one chunk spanning all of it.
    pub fn chunk<'a>(&self, text: &'a str) -> Chunks<'a> {
        Chunks {
            text,
            words: text.unicode_word_indices().collect(),
            start: 0,
            index: 0,
            max_words: self.config.max_words,
            overlap_words: self.config.overlap_words,
        }
    }

    /// Chunk a transcript into a vector
    pub fn chunk_all(&self, text: &str) -> Vec<Chunk> {
        self.chunk(text).collect()
    }

    /// The configured window size
    pub fn max_words(&self) -> usize {
        self.config.max_words
    }
}

/// Lazy chunk iterator over one transcript
pub struct Chunks<'a> {
    text: &'a str,
    words: Vec<(usize, &'a str)>,
    start: usize,
    index: usize,
    max_words: usize,
    overlap_words: usize,
}

impl Iterator for Chunks<'_> {
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        if self.start >= self.words.len() {
            return None;
        }

        let end = (self.start + self.max_words).min(self.words.len());
        let (first_offset, _) = self.words[self.start];
        let (last_offset, last_word) = self.words[end - 1];
        let span = &self.text[first_offset..last_offset + last_word.len()];

        let chunk = Chunk {
            text: span.to_string(),
            index: self.index,
            word_count: end - self.start,
        };

        self.index += 1;
        // overlap_words < max_words guarantees a strictly advancing window
        self.start = if end == self.words.len() {
            self.words.len()
        } else {
            end - self.overlap_words
        };

        Some(chunk)
    }
}
