//! General knowledge answering

use std::sync::Arc;

use course_buddy_core::{GenerateRequest, TextGenerator};

use crate::{Tool, ToolError};
use async_trait::async_trait;

const GENERAL_DIRECTIVE: &str =
    "You are a friendly, helpful study buddy. Answer general AI and ML questions simply.";

/// Answers general questions directly from the generation capability,
/// without retrieval
pub struct GeneralKnowledgeTool {
    generator: Arc<dyn TextGenerator>,
    max_tokens: usize,
}

impl GeneralKnowledgeTool {
    pub fn new(generator: Arc<dyn TextGenerator>, max_tokens: usize) -> Self {
        Self {
            generator,
            max_tokens,
        }
    }
}

#[async_trait]
impl Tool for GeneralKnowledgeTool {
    fn name(&self) -> &'static str {
        "general_knowledge"
    }

    async fn invoke(&self, question: &str) -> Result<String, ToolError> {
        let request = GenerateRequest::conversational(GENERAL_DIRECTIVE, question, self.max_tokens);

        self.generator
            .generate(&request)
            .await
            .map_err(|e| ToolError::Failed {
                tool: self.name(),
                cause: e.to_string(),
            })
    }
}
