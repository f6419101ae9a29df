//! Course Buddy entry point
//!
//! Operator binary for the two flows the assistant has: rebuilding the
//! transcript index and answering questions. All components are
//! constructed here and passed down explicitly; nothing lives in module
//! globals.
//!
//! Usage:
//!   course-buddy ingest   # build the index from corpus.transcript_dir
//!   course-buddy chat     # ingest (if configured), then answer stdin questions

use std::io::Write;
use std::sync::Arc;

use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

use course_buddy_agent::{
    DurableMemory, IntentClassifier, Orchestrator, PersonaRewriter, SessionMemory,
};
use course_buddy_config::{load_settings, Settings};
use course_buddy_core::{Embedder, TextGenerator};
use course_buddy_llm::{ChatBackend, GenerationBackendConfig};
use course_buddy_rag::{
    ChunkerConfig, DirTranscriptSource, HttpEmbedder, HttpEmbedderConfig, IngestPipeline,
    TranscriptRetriever, VectorStore, WordChunker, MEMORY_COLLECTION, TRANSCRIPT_COLLECTION,
};
use course_buddy_tools::{
    CodeHelpTool, GeneralKnowledgeTool, MemoryRecallTool, NotesTool, RetrievalTool, Router,
    RouterConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings().context("Failed to load settings")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting course buddy");

    let store = Arc::new(VectorStore::new());
    let embedder: Arc<dyn Embedder> = Arc::new(HttpEmbedder::new(
        HttpEmbedderConfig::from_settings(&settings.embedding),
    )?);

    let mode = std::env::args().nth(1).unwrap_or_else(|| "chat".to_string());
    match mode.as_str() {
        "ingest" => {
            ingest(&settings, embedder, store).await?;
        }
        "chat" => {
            // The index lives in-process, so chat starts with an ingestion
            // pass when a corpus is configured
            if settings.corpus.transcript_dir.is_some() {
                ingest(&settings, embedder.clone(), store.clone()).await?;
            }
            let generator: Arc<dyn TextGenerator> = Arc::new(ChatBackend::new(
                GenerationBackendConfig::from_settings(&settings.generation),
            )?);
            let orchestrator = build_orchestrator(&settings, embedder, generator, store);
            chat(orchestrator).await?;
        }
        other => bail!("Unknown mode '{}'. Use 'ingest' or 'chat'.", other),
    }

    Ok(())
}

/// Rebuild the transcript index and report the outcome
async fn ingest(
    settings: &Settings,
    embedder: Arc<dyn Embedder>,
    store: Arc<VectorStore>,
) -> anyhow::Result<()> {
    let dir = settings.transcript_dir()?;
    let chunker = WordChunker::new(ChunkerConfig {
        max_words: settings.retrieval.chunk_max_words,
        overlap_words: settings.retrieval.chunk_overlap_words,
    })?;

    let pipeline = IngestPipeline::new(
        Arc::new(DirTranscriptSource::new(dir)),
        embedder,
        store,
        chunker,
        TRANSCRIPT_COLLECTION,
    );

    let report = pipeline.ingest().await?;
    println!(
        "Indexed {} transcripts, {} chunks ({} failures)",
        report.files_indexed,
        report.chunks_indexed,
        report.failures.len()
    );
    for (id, cause) in &report.failures {
        println!("  failed: {} ({})", id, cause);
    }

    Ok(())
}

/// Wire the full request pipeline
fn build_orchestrator(
    settings: &Settings,
    embedder: Arc<dyn Embedder>,
    generator: Arc<dyn TextGenerator>,
    store: Arc<VectorStore>,
) -> Orchestrator {
    let retriever = Arc::new(TranscriptRetriever::new(
        embedder.clone(),
        store.clone(),
        TRANSCRIPT_COLLECTION,
        settings.retrieval.top_k,
    ));
    let durable_memory = Arc::new(DurableMemory::new(
        embedder,
        store,
        MEMORY_COLLECTION,
        settings.memory.min_recall_score,
    ));

    let max_tokens = settings.generation.max_tokens;
    let router = Router::new(
        RouterConfig {
            timeout: std::time::Duration::from_secs(settings.tools.timeout_secs),
        },
        Arc::new(RetrievalTool::new(
            retriever.clone(),
            generator.clone(),
            max_tokens,
        )),
        Arc::new(CodeHelpTool::new(generator.clone(), max_tokens)),
        Arc::new(NotesTool::new(
            retriever,
            generator.clone(),
            settings.retrieval.notes_top_k,
            max_tokens,
        )),
        Arc::new(MemoryRecallTool::new(durable_memory.clone())),
        Arc::new(GeneralKnowledgeTool::new(generator.clone(), max_tokens)),
    );

    Orchestrator::new(
        IntentClassifier::new(generator.clone()),
        router,
        PersonaRewriter::new(generator),
        Arc::new(SessionMemory::new(settings.memory.session_cap)),
        durable_memory,
    )
}

/// Read questions from stdin until EOF
async fn chat(orchestrator: Orchestrator) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut line = String::new();

    loop {
        print!("you> ");
        std::io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }

        let answer = orchestrator.answer("terminal", question).await;
        println!("buddy> {}\n", answer);
    }

    Ok(())
}
