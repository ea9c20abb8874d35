//! In-process implementation of [`KeyValueStore`] for tests and local
//! development.
//!
//! Mirrors the Redis semantics the gateway relies on: lazy expiry (an
//! expired key is indistinguishable from an absent one), INCR that
//! preserves any existing TTL, and cursor-paginated SCAN with `*`/`?`
//! glob matching. Not intended for production use — state is lost on
//! process exit and is not shared across processes.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::Result;

use super::KeyValueStore;

struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

/// In-memory key-value store with TTL support.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        if entries.get(key).is_some_and(Entry::is_expired) {
            entries.remove(key);
            return Ok(None);
        }
        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        let live = entries.get(key).filter(|e| !e.is_expired());
        let (count, expires_at) = match live {
            Some(entry) => (
                entry.value.parse::<i64>().unwrap_or(0) + 1,
                entry.expires_at,
            ),
            // Created fresh: no expiry until EXPIRE is called.
            None => (1, None),
        };
        entries.insert(
            key.to_string(),
            Entry {
                value: count.to_string(),
                expires_at,
            },
        );
        Ok(count)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        if let Some(entry) = entries.get_mut(key) {
            if !entry.is_expired() {
                entry.expires_at = Some(Instant::now() + ttl);
            }
        }
        Ok(())
    }

    async fn scan(&self, cursor: u64, pattern: &str, count: usize) -> Result<(u64, Vec<String>)> {
        let entries = self.entries.lock().expect("store lock poisoned");
        let mut matching: Vec<String> = entries
            .iter()
            .filter(|(key, entry)| !entry.is_expired() && glob_match(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();
        // Sorted so the cursor (an index into this list) is stable
        // across pages as long as no keys are added or removed.
        matching.sort();

        let start = cursor as usize;
        if start >= matching.len() {
            return Ok((0, Vec::new()));
        }
        let end = (start + count.max(1)).min(matching.len());
        let next_cursor = if end == matching.len() { 0 } else { end as u64 };
        Ok((next_cursor, matching[start..end].to_vec()))
    }

    async fn del(&self, keys: &[String]) -> Result<u64> {
        let mut entries = self.entries.lock().expect("store lock poisoned");
        let mut deleted = 0;
        for key in keys {
            if let Some(entry) = entries.remove(key) {
                if !entry.is_expired() {
                    deleted += 1;
                }
            }
        }
        Ok(deleted)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

/// Minimal glob matcher supporting `*` (any run) and `?` (any one char),
/// the subset of Redis key patterns the gateway uses.
fn glob_match(pattern: &str, text: &str) -> bool {
    fn inner(pattern: &[u8], text: &[u8]) -> bool {
        match (pattern.first(), text.first()) {
            (None, None) => true,
            (Some(b'*'), _) => {
                inner(&pattern[1..], text) || (!text.is_empty() && inner(pattern, &text[1..]))
            }
            (Some(b'?'), Some(_)) => inner(&pattern[1..], &text[1..]),
            (Some(p), Some(t)) if p == t => inner(&pattern[1..], &text[1..]),
            _ => false,
        }
    }
    inner(pattern.as_bytes(), text.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glob_matches_prefix_patterns() {
        assert!(glob_match("llm:*", "llm:llama3.2:concise:abc123"));
        assert!(glob_match("llm:*", "llm:"));
        assert!(!glob_match("llm:*", "rate_limit:10.0.0.1"));
        assert!(glob_match("*", "anything"));
        assert!(glob_match("rate_limit:?", "rate_limit:a"));
        assert!(!glob_match("rate_limit:?", "rate_limit:ab"));
        assert!(glob_match("llm:*:concise:*", "llm:llama3.2:concise:abc"));
    }

    #[tokio::test]
    async fn scan_paginates_with_cursor() {
        let store = MemoryStore::new();
        for i in 0..5 {
            store
                .set_with_ttl(&format!("llm:key{i}"), "v", Duration::from_secs(60))
                .await
                .unwrap();
        }
        store
            .set_with_ttl("other:key", "v", Duration::from_secs(60))
            .await
            .unwrap();

        let mut cursor = 0;
        let mut seen = Vec::new();
        loop {
            let (next, page) = store.scan(cursor, "llm:*", 2).await.unwrap();
            assert!(page.len() <= 2);
            seen.extend(page);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }
        assert_eq!(seen.len(), 5);
        assert!(seen.iter().all(|k| k.starts_with("llm:")));
    }

    #[tokio::test]
    async fn incr_preserves_existing_expiry() {
        let store = MemoryStore::new();
        assert_eq!(store.incr("counter").await.unwrap(), 1);
        store
            .expire("counter", Duration::from_millis(50))
            .await
            .unwrap();
        assert_eq!(store.incr("counter").await.unwrap(), 2);

        tokio::time::sleep(Duration::from_millis(100)).await;
        // Expiry survived the second increment, so the counter is gone.
        assert_eq!(store.get("counter").await.unwrap(), None);
    }
}
