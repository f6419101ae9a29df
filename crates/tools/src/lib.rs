//! Question-answering tools and the intent router
//!
//! The tool set is closed and explicit: retrieval, code help, study notes,
//! memory recall, and general knowledge. Every tool implements one uniform
//! capability interface, and the [`Router`] maps each intent to its tool
//! with a bounded execution budget. A slow or failing tool degrades into
//! a sentinel message, never into a hung or failed request.

pub mod code_help;
pub mod general;
pub mod memory_recall;
pub mod notes;
pub mod retrieval;
pub mod router;
pub mod tool;

pub use code_help::CodeHelpTool;
pub use general::GeneralKnowledgeTool;
pub use memory_recall::MemoryRecallTool;
pub use notes::NotesTool;
pub use retrieval::RetrievalTool;
pub use router::{Router, RouterConfig};
pub use tool::Tool;

use thiserror::Error;

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool '{tool}' timed out after {secs}s")]
    Timeout { tool: &'static str, secs: u64 },

    #[error("Tool '{tool}' failed: {cause}")]
    Failed { tool: &'static str, cause: String },
}

impl From<ToolError> for course_buddy_core::Error {
    fn from(err: ToolError) -> Self {
        course_buddy_core::Error::Tool(err.to_string())
    }
}
