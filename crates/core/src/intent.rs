//! Intent labels
//!
//! Every user question is classified into exactly one of these labels,
//! which drives tool selection in the router. The set is closed: anything
//! the classifier emits outside of it is treated as `Retrieval`.

use serde::{Deserialize, Serialize};

/// Classified purpose of a user question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Questions about the course content itself (videos, transcripts, demos)
    Retrieval,
    /// General AI/ML concepts not tied to the course
    GeneralKnowledge,
    /// Explaining or fixing code, programming workflows
    CodeHelp,
    /// Study notes or summaries of course material
    Notes,
    /// Questions about earlier conversation context
    Memory,
    /// Unrecognized intent; answered best-effort via retrieval
    Fallback,
}

impl Intent {
    /// All labels, in routing order
    pub const ALL: [Intent; 6] = [
        Intent::Retrieval,
        Intent::GeneralKnowledge,
        Intent::CodeHelp,
        Intent::Notes,
        Intent::Memory,
        Intent::Fallback,
    ];

    /// The label the classifier falls back to when it cannot decide
    pub const DEFAULT: Intent = Intent::Retrieval;

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Retrieval => "retrieval",
            Intent::GeneralKnowledge => "general_knowledge",
            Intent::CodeHelp => "code_help",
            Intent::Notes => "notes",
            Intent::Memory => "memory",
            Intent::Fallback => "fallback",
        }
    }

    /// Parse a classifier label. Returns `None` for anything outside the set.
    pub fn parse(label: &str) -> Option<Intent> {
        match label.trim().to_lowercase().as_str() {
            "retrieval" => Some(Intent::Retrieval),
            "general_knowledge" => Some(Intent::GeneralKnowledge),
            "code_help" => Some(Intent::CodeHelp),
            "notes" => Some(Intent::Notes),
            "memory" => Some(Intent::Memory),
            "fallback" => Some(Intent::Fallback),
            _ => None,
        }
    }
}

impl std::fmt::Display for Intent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
