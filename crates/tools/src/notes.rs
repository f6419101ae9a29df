//! Study notes generation

use std::sync::Arc;

use course_buddy_core::{GenerateRequest, TextGenerator};
use course_buddy_rag::TranscriptRetriever;

use crate::{Tool, ToolError};
use async_trait::async_trait;

/// Fixed reply when no course material matches the request
pub const NO_MATERIAL_ANSWER: &str =
    "I couldn't find course material to make notes from for that topic.";

const NOTES_DIRECTIVE: &str = "You create study notes for a course on AI agents. \
Summarize the transcript excerpts below into 8-10 concise sentences a student \
can revise from. Use only the excerpts; do not add outside facts.";

/// Generates study notes from retrieved transcript chunks.
///
/// Casts a wider net than plain answering: notes benefit from more
/// surrounding material than a pointed question does.
pub struct NotesTool {
    retriever: Arc<TranscriptRetriever>,
    generator: Arc<dyn TextGenerator>,
    top_k: usize,
    max_tokens: usize,
}

impl NotesTool {
    pub fn new(
        retriever: Arc<TranscriptRetriever>,
        generator: Arc<dyn TextGenerator>,
        top_k: usize,
        max_tokens: usize,
    ) -> Self {
        Self {
            retriever,
            generator,
            top_k,
            max_tokens,
        }
    }
}

#[async_trait]
impl Tool for NotesTool {
    fn name(&self) -> &'static str {
        "notes"
    }

    async fn invoke(&self, question: &str) -> Result<String, ToolError> {
        let hits = self
            .retriever
            .retrieve_k(question, self.top_k)
            .await
            .map_err(|e| ToolError::Failed {
                tool: self.name(),
                cause: e.to_string(),
            })?;

        if hits.is_empty() {
            return Ok(NO_MATERIAL_ANSWER.to_string());
        }

        let context = TranscriptRetriever::build_context(&hits);
        let request = GenerateRequest::conversational(
            format!("{}\n\n{}", NOTES_DIRECTIVE, context),
            question,
            self.max_tokens,
        );

        self.generator
            .generate(&request)
            .await
            .map_err(|e| ToolError::Failed {
                tool: self.name(),
                cause: e.to_string(),
            })
    }
}
