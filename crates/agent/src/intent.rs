//! Intent classification
//!
//! One near-deterministic generation call constrained to emit a single
//! label. The mechanism (a model call) is deliberately decoupled from the
//! policy (the closed label set and its fallback): any output outside the
//! set, or any error from the capability, maps to the default label.
//! Classification never blocks the pipeline.

use std::sync::Arc;

use course_buddy_core::{GenerateRequest, Intent, TextGenerator};

const CLASSIFIER_DIRECTIVE: &str = "You are a precise classifier.";

/// Output budget for a single label
const LABEL_MAX_TOKENS: usize = 10;

/// LLM-backed intent classifier
pub struct IntentClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl IntentClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Classify a question into one intent label.
    ///
    /// Infallible by contract: unknown labels and capability failures both
    /// resolve to [`Intent::DEFAULT`].
    pub async fn classify(&self, question: &str) -> Intent {
        let request = GenerateRequest::deterministic(
            CLASSIFIER_DIRECTIVE,
            classification_prompt(question),
            LABEL_MAX_TOKENS,
        );

        match self.generator.generate(&request).await {
            Ok(label) => match Intent::parse(&label) {
                Some(intent) => {
                    tracing::debug!(intent = %intent, "Classified question");
                    intent
                }
                None => {
                    tracing::debug!(label = %label.trim(), "Unknown intent label, using default");
                    Intent::DEFAULT
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "Intent classification failed, using default");
                Intent::DEFAULT
            }
        }
    }
}

fn classification_prompt(question: &str) -> String {
    format!(
        "Classify the user question into one intent category.\n\
         \n\
         Categories:\n\
         - retrieval: Questions about the course, its videos, transcripts, or demos.\n\
         - general_knowledge: General AI / LLM / ML concepts not specific to the course.\n\
         - code_help: Explaining or fixing code, programming, workflows.\n\
         - notes: Asking for notes, summaries, study material.\n\
         - memory: Asking about earlier conversation context.\n\
         - fallback: Anything that fits none of the above.\n\
         \n\
         Respond ONLY with the intent name.\n\
         \n\
         User question: \"{}\"",
        question
    )
}
