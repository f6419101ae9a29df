//! Intent router with bounded tool dispatch
//!
//! A pure mapping from intent to tool. Every invocation runs under a fixed
//! execution budget; a tool that overruns it or fails is converted into a
//! sentinel message so dispatch always produces an answer string and never
//! blocks the request indefinitely. The overrun future is dropped; tools
//! are read-only against shared state, so abandonment cannot corrupt it.

use std::sync::Arc;
use std::time::Duration;

use course_buddy_core::Intent;

use crate::{Tool, ToolError};

/// Preamble used when routing an unrecognized intent through retrieval
const FALLBACK_PREAMBLE: &str = "I think you're asking about the course. Here's what I found:";

/// Router configuration
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Execution budget per tool invocation
    pub timeout: Duration,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(12),
        }
    }
}

/// Maps intents to tools and invokes them under a time budget
pub struct Router {
    config: RouterConfig,
    retrieval: Arc<dyn Tool>,
    code_help: Arc<dyn Tool>,
    notes: Arc<dyn Tool>,
    memory: Arc<dyn Tool>,
    general: Arc<dyn Tool>,
}

impl Router {
    pub fn new(
        config: RouterConfig,
        retrieval: Arc<dyn Tool>,
        code_help: Arc<dyn Tool>,
        notes: Arc<dyn Tool>,
        memory: Arc<dyn Tool>,
        general: Arc<dyn Tool>,
    ) -> Self {
        Self {
            config,
            retrieval,
            code_help,
            notes,
            memory,
            general,
        }
    }

    /// Dispatch a question to the tool for its intent.
    ///
    /// Always returns an answer string (possibly a sentinel) together with
    /// the intent that was actually routed. `Fallback` goes through
    /// retrieval as a best-effort safety net.
    pub async fn dispatch(&self, intent: Intent, question: &str) -> (String, Intent) {
        let tool = match intent {
            Intent::Retrieval | Intent::Fallback => &self.retrieval,
            Intent::GeneralKnowledge => &self.general,
            Intent::CodeHelp => &self.code_help,
            Intent::Notes => &self.notes,
            Intent::Memory => &self.memory,
        };

        tracing::debug!(intent = %intent, tool = tool.name(), "Dispatching question");

        match self.invoke_bounded(tool.as_ref(), question).await {
            Ok(answer) if intent == Intent::Fallback => {
                (format!("{}\n\n{}", FALLBACK_PREAMBLE, answer), intent)
            }
            Ok(answer) => (answer, intent),
            Err(e) => {
                tracing::warn!(intent = %intent, error = %e, "Tool degraded to sentinel");
                (sentinel_message(&e), intent)
            }
        }
    }

    /// Run one tool under the configured budget
    async fn invoke_bounded(&self, tool: &dyn Tool, question: &str) -> Result<String, ToolError> {
        let secs = self.config.timeout.as_secs();
        match tokio::time::timeout(self.config.timeout, tool.invoke(question)).await {
            Ok(result) => result,
            Err(_) => Err(ToolError::Timeout {
                tool: tool.name(),
                secs,
            }),
        }
    }
}

/// Convert a tool error into the user-facing sentinel string
fn sentinel_message(error: &ToolError) -> String {
    match error {
        ToolError::Timeout { secs, .. } => {
            format!("[tool-timeout] The tool did not finish within {}s.", secs)
        }
        ToolError::Failed { cause, .. } => format!("[tool-error] {}", cause),
    }
}
