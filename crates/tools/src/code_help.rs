//! Code explanation and debugging help

use std::sync::Arc;

use course_buddy_core::{GenerateRequest, TextGenerator};

use crate::{Tool, ToolError};
use async_trait::async_trait;

const CODE_DIRECTIVE: &str =
    "You are a Python and cloud expert. Explain clearly and concisely.";

/// Delegates programming questions to the generation capability
pub struct CodeHelpTool {
    generator: Arc<dyn TextGenerator>,
    max_tokens: usize,
}

impl CodeHelpTool {
    pub fn new(generator: Arc<dyn TextGenerator>, max_tokens: usize) -> Self {
        Self {
            generator,
            max_tokens,
        }
    }
}

#[async_trait]
impl Tool for CodeHelpTool {
    fn name(&self) -> &'static str {
        "code_help"
    }

    async fn invoke(&self, question: &str) -> Result<String, ToolError> {
        let request = GenerateRequest::conversational(CODE_DIRECTIVE, question, self.max_tokens);

        self.generator
            .generate(&request)
            .await
            .map_err(|e| ToolError::Failed {
                tool: self.name(),
                cause: e.to_string(),
            })
    }
}
