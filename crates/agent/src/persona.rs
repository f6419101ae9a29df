//! Language-register detection and persona rewriting
//!
//! The rewriter turns a tool's intermediate answer into the assistant's
//! final voice: short, casual, grounded only in the intermediate answer.
//! A lightweight lexicon-overlap detector decides whether the user wrote
//! code-switched Hindi-English, so the reply can match their register.
//! Rewriting is cosmetic, never load-bearing: on any failure the
//! intermediate answer passes through unchanged.

use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::sync::Arc;
use unicode_segmentation::UnicodeSegmentation;

use course_buddy_core::{GenerateRequest, TextGenerator};

/// Romanized-Hindi function words; one hit flips the register
static CODE_SWITCH_LEXICON: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "kya", "kaise", "batao", "bata", "hai", "tha", "hun", "hona", "matlab", "kyu", "ka",
        "ki", "ho", "bhai", "dost", "mujhe", "samjha", "samjhao",
    ]
    .into_iter()
    .collect()
});

/// Detected language register of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageRegister {
    English,
    CodeSwitched,
}

/// Score keyword overlap against the fixed lexicon
pub fn detect_register(text: &str) -> LanguageRegister {
    let lowered = text.to_lowercase();
    let matches = lowered
        .unicode_words()
        .filter(|w| CODE_SWITCH_LEXICON.contains(w))
        .count();

    if matches >= 1 {
        LanguageRegister::CodeSwitched
    } else {
        LanguageRegister::English
    }
}

const PERSONA_DIRECTIVE: &str = "You are a friendly study buddy who explains concepts in a \
casual, simple, helpful way. Keep responses short (2-3 sentences), warm and conversational, \
never formal or academic. Use ONLY the intermediate answer below to rewrite; do not invent facts.";

/// Output budget for the rewritten answer
const REWRITE_MAX_TOKENS: usize = 250;

/// Rewrites intermediate answers into the assistant's fixed voice
pub struct PersonaRewriter {
    generator: Arc<dyn TextGenerator>,
}

impl PersonaRewriter {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Rewrite an intermediate answer in the persona voice.
    ///
    /// Never fails: any generation error returns the intermediate answer
    /// unchanged.
    pub async fn rewrite(&self, question: &str, intermediate: &str) -> String {
        let register_directive = match detect_register(question) {
            LanguageRegister::CodeSwitched => {
                "The user wrote in Hinglish; reply naturally in Hinglish."
            }
            LanguageRegister::English => "Reply in English.",
        };

        let system = format!(
            "{}\n{}\n\nIntermediate answer:\n{}",
            PERSONA_DIRECTIVE, register_directive, intermediate
        );
        let request = GenerateRequest::conversational(system, question, REWRITE_MAX_TOKENS);

        match self.generator.generate(&request).await {
            Ok(rewritten) if !rewritten.trim().is_empty() => rewritten,
            Ok(_) => intermediate.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Persona rewrite failed, passing answer through");
                intermediate.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use course_buddy_core::Error;

    #[test]
    fn test_english_register() {
        assert_eq!(
            detect_register("What do agents use to act?"),
            LanguageRegister::English
        );
    }

    #[test]
    fn test_single_lexicon_hit_flips_register() {
        assert_eq!(
            detect_register("agents kya hote hain?"),
            LanguageRegister::CodeSwitched
        );
        assert_eq!(
            detect_register("Batao about embeddings"),
            LanguageRegister::CodeSwitched
        );
    }

    #[test]
    fn test_lexicon_matches_whole_words_only() {
        // "kaput" contains "ka" but is not a code-switch token
        assert_eq!(detect_register("the demo went kaput"), LanguageRegister::English);
    }

    struct BrokenGenerator;

    #[async_trait]
    impl TextGenerator for BrokenGenerator {
        async fn generate(&self, _request: &GenerateRequest) -> course_buddy_core::Result<String> {
            Err(Error::Llm("model offline".to_string()))
        }
    }

    struct UppercaseGenerator;

    #[async_trait]
    impl TextGenerator for UppercaseGenerator {
        async fn generate(&self, request: &GenerateRequest) -> course_buddy_core::Result<String> {
            Ok(request.user.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_rewrite_failure_passes_answer_through() {
        let rewriter = PersonaRewriter::new(Arc::new(BrokenGenerator));
        let rewritten = rewriter.rewrite("a question", "the intermediate answer").await;
        assert_eq!(rewritten, "the intermediate answer");
    }

    #[tokio::test]
    async fn test_rewrite_uses_generator_output() {
        let rewriter = PersonaRewriter::new(Arc::new(UppercaseGenerator));
        let rewritten = rewriter.rewrite("hello there", "ignored").await;
        assert_eq!(rewritten, "HELLO THERE");
    }
}
