//! Retrieval-grounded answering

use std::sync::Arc;

use course_buddy_core::{GenerateRequest, TextGenerator};
use course_buddy_rag::TranscriptRetriever;

use crate::{Tool, ToolError};
use async_trait::async_trait;

/// Fixed reply when retrieval comes back empty
pub const NO_CONTEXT_ANSWER: &str =
    "I couldn't find anything about that in the course material.";

const GROUNDED_DIRECTIVE: &str = "You are a study assistant for a course on AI agents. \
Answer the question using ONLY the transcript context below. \
Keep the answer short and concrete. If the context does not cover the question, say so.";

/// Answers course questions from retrieved transcript chunks
pub struct RetrievalTool {
    retriever: Arc<TranscriptRetriever>,
    generator: Arc<dyn TextGenerator>,
    max_tokens: usize,
}

impl RetrievalTool {
    pub fn new(
        retriever: Arc<TranscriptRetriever>,
        generator: Arc<dyn TextGenerator>,
        max_tokens: usize,
    ) -> Self {
        Self {
            retriever,
            generator,
            max_tokens,
        }
    }
}

#[async_trait]
impl Tool for RetrievalTool {
    fn name(&self) -> &'static str {
        "retrieval"
    }

    async fn invoke(&self, question: &str) -> Result<String, ToolError> {
        let hits = self
            .retriever
            .retrieve(question)
            .await
            .map_err(|e| ToolError::Failed {
                tool: self.name(),
                cause: e.to_string(),
            })?;

        if hits.is_empty() {
            tracing::debug!(question, "No chunks retrieved");
            return Ok(NO_CONTEXT_ANSWER.to_string());
        }

        let context = TranscriptRetriever::build_context(&hits);
        let request = GenerateRequest::conversational(
            format!("{}\n\n{}", GROUNDED_DIRECTIVE, context),
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
