//! Request orchestration
//!
//! Composes classifier → router → persona rewriter into one
//! request/response cycle and owns failure containment. Each stage
//! degrades independently: classification falls back to the default
//! intent, dispatch substitutes sentinel text, rewriting passes the
//! intermediate answer through, and memory write-back failures are logged
//! and swallowed. The public contract is "always return a string".

use std::sync::Arc;
use tokio::sync::broadcast;

use course_buddy_core::Intent;
use course_buddy_tools::Router;

use crate::intent::IntentClassifier;
use crate::memory::{DurableMemory, MemoryTurn, SessionMemory};
use crate::persona::PersonaRewriter;

/// Fixed substitute when dispatch produces nothing usable
const APOLOGY_ANSWER: &str = "Sorry, I couldn't find information to answer that.";

/// Per-phase events for observers (logging, UIs, tests)
#[derive(Debug, Clone)]
pub enum AgentEvent {
    Classified { intent: Intent },
    Dispatched { intent: Intent },
    Rewritten,
    Answered,
}

/// Drives one question through the full pipeline
pub struct Orchestrator {
    classifier: IntentClassifier,
    router: Router,
    rewriter: PersonaRewriter,
    session_memory: Arc<SessionMemory>,
    durable_memory: Arc<DurableMemory>,
    event_tx: broadcast::Sender<AgentEvent>,
}

impl Orchestrator {
    pub fn new(
        classifier: IntentClassifier,
        router: Router,
        rewriter: PersonaRewriter,
        session_memory: Arc<SessionMemory>,
        durable_memory: Arc<DurableMemory>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(64);
        Self {
            classifier,
            router,
            rewriter,
            session_memory,
            durable_memory,
            event_tx,
        }
    }

    /// Subscribe to pipeline events
    pub fn subscribe(&self) -> broadcast::Receiver<AgentEvent> {
        self.event_tx.subscribe()
    }

    /// Answer a question.
    ///
    /// Always returns a non-empty string; no downstream failure escapes
    /// this method.
    pub async fn answer(&self, session_id: &str, question: &str) -> String {
        let intent = self.classifier.classify(question).await;
        self.emit(AgentEvent::Classified { intent });

        let (intermediate, resolved) = self.router.dispatch(intent, question).await;
        let intermediate = if intermediate.trim().is_empty() {
            APOLOGY_ANSWER.to_string()
        } else {
            intermediate
        };
        self.emit(AgentEvent::Dispatched { intent: resolved });

        let final_answer = self.rewriter.rewrite(question, &intermediate).await;
        let final_answer = if final_answer.trim().is_empty() {
            intermediate
        } else {
            final_answer
        };
        self.emit(AgentEvent::Rewritten);

        self.session_memory.append(session_id, question, &final_answer);
        if let Err(e) = self.durable_memory.remember(question, &final_answer).await {
            tracing::warn!(error = %e, "Failed to write durable memory");
        }

        tracing::info!(
            session = session_id,
            intent = %resolved,
            answer_chars = final_answer.len(),
            "Answered question"
        );
        self.emit(AgentEvent::Answered);

        final_answer
    }

    /// Recent turns for a session, oldest first
    pub fn history(&self, session_id: &str) -> Vec<MemoryTurn> {
        self.session_memory.history(session_id)
    }

    fn emit(&self, event: AgentEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;

    use course_buddy_core::{Error, GenerateRequest, TextGenerator};
    use course_buddy_rag::{SimpleEmbedder, VectorStore};
    use course_buddy_tools::{RouterConfig, Tool, ToolError};

    struct StaticTool(&'static str);

    #[async_trait]
    impl Tool for StaticTool {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn invoke(&self, _question: &str) -> Result<String, ToolError> {
            Ok(self.0.to_string())
        }
    }

    struct BrokenGenerator;

    #[async_trait]
    impl TextGenerator for BrokenGenerator {
        async fn generate(&self, _request: &GenerateRequest) -> course_buddy_core::Result<String> {
            Err(Error::Llm("offline".to_string()))
        }
    }

    fn orchestrator_with_tool_answer(answer: &'static str) -> Orchestrator {
        let tool = || -> Arc<dyn Tool> { Arc::new(StaticTool(answer)) };
        let router = Router::new(
            RouterConfig::default(),
            tool(),
            tool(),
            tool(),
            tool(),
            tool(),
        );
        let store = Arc::new(VectorStore::new());
        Orchestrator::new(
            IntentClassifier::new(Arc::new(BrokenGenerator)),
            router,
            PersonaRewriter::new(Arc::new(BrokenGenerator)),
            Arc::new(SessionMemory::new(5)),
            Arc::new(DurableMemory::new(
                Arc::new(SimpleEmbedder::new(32)),
                store,
                "memory",
                0.0,
            )),
        )
    }

    #[tokio::test]
    async fn test_answer_is_written_to_session_history() {
        let orchestrator = orchestrator_with_tool_answer("a grounded answer");

        let answer = orchestrator.answer("s1", "what are agents?").await;
        assert_eq!(answer, "a grounded answer");

        let history = orchestrator.history("s1");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user, "what are agents?");
        assert_eq!(history[0].assistant, "a grounded answer");
    }

    #[tokio::test]
    async fn test_empty_intermediate_becomes_apology() {
        let orchestrator = orchestrator_with_tool_answer("");

        let answer = orchestrator.answer("s1", "anything").await;
        assert_eq!(answer, APOLOGY_ANSWER);
    }

    #[tokio::test]
    async fn test_events_are_emitted_per_phase() {
        let orchestrator = orchestrator_with_tool_answer("ok");
        let mut events = orchestrator.subscribe();

        orchestrator.answer("s1", "question").await;

        assert!(matches!(
            events.recv().await.unwrap(),
            AgentEvent::Classified { .. }
        ));
        assert!(matches!(
            events.recv().await.unwrap(),
            AgentEvent::Dispatched { .. }
        ));
        assert!(matches!(events.recv().await.unwrap(), AgentEvent::Rewritten));
        assert!(matches!(events.recv().await.unwrap(), AgentEvent::Answered));
    }
}
