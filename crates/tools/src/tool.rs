//! Uniform tool interface

use async_trait::async_trait;

use crate::ToolError;

/// One question-answering capability.
///
/// Tools are read-only against shared state (vector store, memory), so an
/// abandoned invocation cannot leave partial writes behind.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name, used in logs and sentinel messages
    fn name(&self) -> &'static str;

    /// Answer a question, producing an intermediate answer for the
    /// persona rewriter
    async fn invoke(&self, question: &str) -> Result<String, ToolError>;
}
