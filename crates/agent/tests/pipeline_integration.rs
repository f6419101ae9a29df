//! Full-pipeline integration tests
//!
//! Builds the real component graph (ingestion → retrieval → routing →
//! persona rewrite → memory) against offline fakes: the deterministic
//! bag-of-words embedder and the echo generator.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use course_buddy_agent::{
    DurableMemory, IntentClassifier, Orchestrator, PersonaRewriter, SessionMemory,
};
use course_buddy_core::{
    Embedder, Error, GenerateRequest, TextGenerator, TranscriptSource,
};
use course_buddy_llm::EchoGenerator;
use course_buddy_rag::{
    ChunkerConfig, IngestPipeline, SimpleEmbedder, TranscriptRetriever, VectorStore, WordChunker,
    MEMORY_COLLECTION, TRANSCRIPT_COLLECTION,
};
use course_buddy_tools::{
    CodeHelpTool, GeneralKnowledgeTool, MemoryRecallTool, NotesTool, RetrievalTool, Router,
    RouterConfig,
};

const EMBED_DIM: usize = 128;

/// Fixed in-memory transcript corpus
struct StaticSource {
    transcripts: BTreeMap<String, String>,
}

impl StaticSource {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            transcripts: entries
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

#[async_trait]
impl TranscriptSource for StaticSource {
    async fn list(&self) -> course_buddy_core::Result<Vec<String>> {
        Ok(self.transcripts.keys().cloned().collect())
    }

    async fn fetch(&self, id: &str) -> course_buddy_core::Result<String> {
        self.transcripts
            .get(id)
            .cloned()
            .ok_or_else(|| Error::Rag(format!("Unknown transcript: {}", id)))
    }
}

/// Generator that always emits one fixed label
struct FixedGenerator(&'static str);

#[async_trait]
impl TextGenerator for FixedGenerator {
    async fn generate(&self, _request: &GenerateRequest) -> course_buddy_core::Result<String> {
        Ok(self.0.to_string())
    }
}

/// Generator that always fails
struct BrokenGenerator;

#[async_trait]
impl TextGenerator for BrokenGenerator {
    async fn generate(&self, _request: &GenerateRequest) -> course_buddy_core::Result<String> {
        Err(Error::Llm("generation backend offline".to_string()))
    }
}

/// Embedder that always fails
struct BrokenEmbedder;

#[async_trait]
impl Embedder for BrokenEmbedder {
    async fn embed(&self, _text: &str) -> course_buddy_core::Result<Vec<f32>> {
        Err(Error::Rag("embedding backend offline".to_string()))
    }

    fn dim(&self) -> usize {
        EMBED_DIM
    }
}

async fn ingest_corpus(
    store: Arc<VectorStore>,
    entries: &[(&str, &str)],
    max_words: usize,
    overlap_words: usize,
) {
    let pipeline = IngestPipeline::new(
        Arc::new(StaticSource::new(entries)),
        Arc::new(SimpleEmbedder::new(EMBED_DIM)),
        store,
        WordChunker::new(ChunkerConfig {
            max_words,
            overlap_words,
        })
        .unwrap(),
        TRANSCRIPT_COLLECTION,
    );
    let report = pipeline.ingest().await.unwrap();
    assert!(report.failures.is_empty());
}

fn build_orchestrator(
    store: Arc<VectorStore>,
    embedder: Arc<dyn Embedder>,
    classifier_generator: Arc<dyn TextGenerator>,
    answer_generator: Arc<dyn TextGenerator>,
) -> Orchestrator {
    let retriever = Arc::new(TranscriptRetriever::new(
        embedder.clone(),
        store.clone(),
        TRANSCRIPT_COLLECTION,
        3,
    ));
    let durable_memory = Arc::new(DurableMemory::new(
        embedder,
        store,
        MEMORY_COLLECTION,
        0.0,
    ));

    let router = Router::new(
        RouterConfig::default(),
        Arc::new(RetrievalTool::new(
            retriever.clone(),
            answer_generator.clone(),
            300,
        )),
        Arc::new(CodeHelpTool::new(answer_generator.clone(), 300)),
        Arc::new(NotesTool::new(retriever, answer_generator.clone(), 8, 400)),
        Arc::new(MemoryRecallTool::new(durable_memory.clone())),
        Arc::new(GeneralKnowledgeTool::new(answer_generator.clone(), 300)),
    );

    Orchestrator::new(
        IntentClassifier::new(classifier_generator),
        router,
        PersonaRewriter::new(answer_generator),
        Arc::new(SessionMemory::new(5)),
        durable_memory,
    )
}

#[tokio::test]
async fn test_end_to_end_grounded_answer() {
    let store = Arc::new(VectorStore::new());
    ingest_corpus(
        store.clone(),
        &[(
            "video_1",
            "Video 1: intro to agents. Agents use tools to act on the environment.",
        )],
        10,
        2,
    )
    .await;

    // Retrieval alone surfaces the chunk mentioning tools
    let retriever = TranscriptRetriever::new(
        Arc::new(SimpleEmbedder::new(EMBED_DIM)),
        store.clone(),
        TRANSCRIPT_COLLECTION,
        3,
    );
    let hits = retriever.retrieve("What do agents use to act?").await.unwrap();
    assert!(!hits.is_empty());
    assert!(hits.iter().any(|h| h.text.contains("tools")));

    // The full pipeline, with the echo generator reflecting its grounding
    // context, carries "tools" into the final answer. The echo output is
    // not a known intent label, so classification falls back to retrieval.
    let orchestrator = build_orchestrator(
        store,
        Arc::new(SimpleEmbedder::new(EMBED_DIM)),
        Arc::new(EchoGenerator),
        Arc::new(EchoGenerator),
    );

    let answer = orchestrator.answer("s1", "What do agents use to act?").await;
    assert!(answer.contains("tools"), "answer was: {}", answer);
}

#[tokio::test]
async fn test_orchestrator_survives_total_downstream_failure() {
    // Classifier, embedder, and generator all fail; the request still
    // resolves to a non-empty textual answer.
    let orchestrator = build_orchestrator(
        Arc::new(VectorStore::new()),
        Arc::new(BrokenEmbedder),
        Arc::new(BrokenGenerator),
        Arc::new(BrokenGenerator),
    );

    let answer = orchestrator.answer("s1", "what are agents?").await;
    assert!(!answer.is_empty());
}

#[tokio::test]
async fn test_empty_index_yields_no_information_answer() {
    let store = Arc::new(VectorStore::new());
    store.ensure_collection(TRANSCRIPT_COLLECTION);

    let orchestrator = build_orchestrator(
        store,
        Arc::new(SimpleEmbedder::new(EMBED_DIM)),
        Arc::new(FixedGenerator("retrieval")),
        Arc::new(BrokenGenerator),
    );

    let answer = orchestrator.answer("s1", "what is in video 9?").await;
    assert!(answer.contains("couldn't find anything"), "answer was: {}", answer);
}

#[tokio::test]
async fn test_memory_recall_surfaces_past_exchange() {
    let store = Arc::new(VectorStore::new());
    ingest_corpus(
        store.clone(),
        &[("video_1", "Agents use tools to act on the environment.")],
        10,
        2,
    )
    .await;

    // First turn is answered and remembered; the second turn asks about it
    let orchestrator = build_orchestrator(
        store.clone(),
        Arc::new(SimpleEmbedder::new(EMBED_DIM)),
        Arc::new(FixedGenerator("retrieval")),
        Arc::new(EchoGenerator),
    );
    orchestrator.answer("s1", "What do agents use to act?").await;

    let recaller = build_orchestrator(
        store,
        Arc::new(SimpleEmbedder::new(EMBED_DIM)),
        Arc::new(FixedGenerator("memory")),
        Arc::new(EchoGenerator),
    );
    let answer = recaller
        .answer("s1", "what did we discuss about agents earlier?")
        .await;
    assert!(answer.contains("User said:"), "answer was: {}", answer);
}

#[tokio::test]
async fn test_session_history_is_bounded_across_requests() {
    let orchestrator = build_orchestrator(
        Arc::new(VectorStore::new()),
        Arc::new(SimpleEmbedder::new(EMBED_DIM)),
        Arc::new(FixedGenerator("general_knowledge")),
        Arc::new(EchoGenerator),
    );

    for i in 0..8 {
        orchestrator.answer("s1", &format!("question {}", i)).await;
    }

    let history = orchestrator.history("s1");
    assert_eq!(history.len(), 5);
    assert_eq!(history[0].user, "question 3");
    assert_eq!(history[4].user, "question 7");
}
