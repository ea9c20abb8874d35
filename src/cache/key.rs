//! Cache-key derivation.

use sha2::{Digest, Sha256};

use crate::types::AskMode;

/// Number of hex characters of the prompt digest kept in the key.
const HASH_PREFIX_LEN: usize = 16;

/// Derive the cache key for a `(model, prompt, mode)` triple.
///
/// Format: `llm:{model}:{mode}:{hash16}`, where `hash16` is the first
/// 16 hex characters of the SHA-256 digest of the raw prompt bytes.
/// Deterministic and total: any prompt, including the empty string and
/// arbitrary non-ASCII text, produces a key, and changing any of the
/// three inputs changes the key with overwhelming probability.
pub fn derive_key(model: &str, prompt: &str, mode: AskMode) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let mut hash16 = String::with_capacity(HASH_PREFIX_LEN);
    for byte in digest.iter().take(HASH_PREFIX_LEN / 2) {
        hash16.push_str(&format!("{byte:02x}"));
    }
    format!("llm:{model}:{mode}:{hash16}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_deterministic() {
        let a = derive_key("llama3.2", "What is AI?", AskMode::Concise);
        let b = derive_key("llama3.2", "What is AI?", AskMode::Concise);
        assert_eq!(a, b);
    }

    #[test]
    fn key_matches_expected_format() {
        // sha256("What is AI?") starts with 7d859e86e13f1a43.
        let key = derive_key("llama3.2", "What is AI?", AskMode::Concise);
        assert_eq!(key, "llm:llama3.2:concise:7d859e86e13f1a43");
    }

    #[test]
    fn key_differs_on_model() {
        let a = derive_key("llama3.2", "hello", AskMode::Concise);
        let b = derive_key("mistral", "hello", AskMode::Concise);
        assert_ne!(a, b);
    }

    #[test]
    fn key_differs_on_prompt() {
        let a = derive_key("llama3.2", "hello", AskMode::Concise);
        let b = derive_key("llama3.2", "hello!", AskMode::Concise);
        assert_ne!(a, b);
    }

    #[test]
    fn key_differs_on_mode() {
        let a = derive_key("llama3.2", "hello", AskMode::Concise);
        let b = derive_key("llama3.2", "hello", AskMode::Friendly);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_prompt_hashes_cleanly() {
        // sha256("") starts with e3b0c44298fc1c14.
        let key = derive_key("llama3.2", "", AskMode::Concise);
        assert_eq!(key, "llm:llama3.2:concise:e3b0c44298fc1c14");
    }

    #[test]
    fn non_ascii_prompt_hashes_cleanly() {
        let key = derive_key("llama3.2", "héllo wörld — 你好", AskMode::Creative);
        assert!(key.starts_with("llm:llama3.2:creative:"));
        let hash = key.rsplit(':').next().unwrap();
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
