//! Inbound request types and response modes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Response mode for a generation request.
///
/// The mode selects the instruction prefix sent to the backend and is
/// part of the cache key, so the same prompt asked in two modes produces
/// two independent cache entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AskMode {
    /// Brief, to the point (default).
    #[default]
    Concise,
    /// Formal language and business-appropriate tone.
    Professional,
    /// Witty and sarcastic, but still helpful.
    Sarcastic,
    /// Imaginative, metaphors and analogies welcome.
    Creative,
    /// Warm, casual, conversational.
    Friendly,
}

impl AskMode {
    /// Canonical lowercase name, as used in cache keys and wire formats.
    pub fn as_str(&self) -> &'static str {
        match self {
            AskMode::Concise => "concise",
            AskMode::Professional => "professional",
            AskMode::Sarcastic => "sarcastic",
            AskMode::Creative => "creative",
            AskMode::Friendly => "friendly",
        }
    }

    /// The instruction prefix sent to the backend for this mode.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            AskMode::Concise => {
                "Please provide a concise answer to the following question \
                 without any additional explanations or context. Be brief and \
                 to the point. Do not ask back questions."
            }
            AskMode::Professional => {
                "Please provide a professional, well-structured answer to the \
                 following question. Use formal language, proper terminology, \
                 and maintain a business-appropriate tone. Do not ask back \
                 questions."
            }
            AskMode::Sarcastic => {
                "Please answer the following question with a sarcastic and \
                 witty tone. Be clever, use humor, and don't take things too \
                 seriously, but still provide a helpful answer. Do not ask \
                 back questions."
            }
            AskMode::Creative => {
                "Please provide a creative and imaginative answer to the \
                 following question. Feel free to use metaphors, analogies, \
                 and think outside the box while still being informative. Do \
                 not ask back questions."
            }
            AskMode::Friendly => {
                "Please provide a friendly, casual answer to the following \
                 question. Use a warm, conversational tone as if talking to a \
                 friend. Be approachable and personable. Do not ask back \
                 questions."
            }
        }
    }

    /// Compose the full prompt sent to the backend: instruction prefix,
    /// then the user's prompt.
    ///
    /// The cache is keyed on the raw prompt, not this composed form.
    pub fn instruct(&self, prompt: &str) -> String {
        format!("{}:\n\n{}", self.system_prompt(), prompt)
    }
}

impl fmt::Display for AskMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inbound generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskRequest {
    /// Backend model name.
    #[serde(default = "default_model")]
    pub model: String,

    /// The raw prompt text. May be empty, multi-megabyte, or non-ASCII.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Response mode (default: concise).
    #[serde(default)]
    pub mode: AskMode,
}

fn default_model() -> String {
    "llama3.2".to_string()
}

fn default_prompt() -> String {
    "hello world".to_string()
}

impl AskRequest {
    /// Create a request with the given model and prompt, concise mode.
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            mode: AskMode::default(),
        }
    }

    /// Set the response mode.
    pub fn mode(mut self, mode: AskMode) -> Self {
        self.mode = mode;
        self
    }
}

/// The reply returned to the caller, from cache or fresh generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    /// Model that produced (or originally produced) the answer.
    pub model: String,
    /// Generated text.
    pub response: String,
    /// Backend-reported creation timestamp, passed through verbatim.
    pub created_at: String,
    /// Whether the backend reported the generation as complete.
    pub done: bool,
    /// Mode of the request this reply answers.
    pub mode: AskMode,
}
