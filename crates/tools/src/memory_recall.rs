//! Conversation memory recall

use std::sync::Arc;

use course_buddy_core::MemoryRecall;

use crate::{Tool, ToolError};
use async_trait::async_trait;

/// Fixed reply when durable memory holds nothing relevant
pub const NO_MEMORY_ANSWER: &str = "We haven't talked about that yet.";

/// Surfaces the best-matching past exchange from durable memory
pub struct MemoryRecallTool {
    memory: Arc<dyn MemoryRecall>,
}

impl MemoryRecallTool {
    pub fn new(memory: Arc<dyn MemoryRecall>) -> Self {
        Self { memory }
    }
}

#[async_trait]
impl Tool for MemoryRecallTool {
    fn name(&self) -> &'static str {
        "memory_recall"
    }

    async fn invoke(&self, question: &str) -> Result<String, ToolError> {
        let recalled = self
            .memory
            .recall(question)
            .await
            .map_err(|e| ToolError::Failed {
                tool: self.name(),
                cause: e.to_string(),
            })?;

        // Empty string means "no memory", not an error
        if recalled.is_empty() {
            return Ok(NO_MEMORY_ANSWER.to_string());
        }

        Ok(recalled)
    }
}
