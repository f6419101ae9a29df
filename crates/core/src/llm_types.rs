//! Text generation request types
//!
//! One interface, two call shapes: classification runs near-deterministic
//! with a tiny output budget, persona rewriting runs at a conversational
//! temperature. Both are expressed as a [`GenerateRequest`].

use serde::{Deserialize, Serialize};

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A complete generation request: system directive, user text, sampling shape
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// System directive (persona, task framing, grounding context)
    pub system: String,
    /// User text
    pub user: String,
    /// Maximum output units (tokens) to generate
    pub max_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
}

impl GenerateRequest {
    /// Near-deterministic shape for classification-style calls
    pub fn deterministic(system: impl Into<String>, user: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
            temperature: 0.0,
        }
    }

    /// Conversational shape for answer and rewrite calls
    pub fn conversational(system: impl Into<String>, user: impl Into<String>, max_tokens: usize) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens,
            temperature: 0.7,
        }
    }

    /// Messages in provider wire order
    pub fn messages(&self) -> Vec<Message> {
        vec![
            Message::system(self.system.clone()),
            Message::user(self.user.clone()),
        ]
    }
}
