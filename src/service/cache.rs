//! Response cache
//!
//! Short-lived dedup layer for the chat surfaces: repeated identical
//! questions within the TTL get the cached reply instead of a fresh
//! retrieval/generation round. Bounded by opportunistic cleanup of expired
//! entries on every insert.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

/// TTL-bounded answer cache keyed by caller and normalized question
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl Default for ResponseCache {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl ResponseCache {
    #[inline]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Cache key from an optional caller id and the raw question
    #[inline]
    pub fn key(user: Option<&str>, message: &str) -> String {
        format!(
            "{}_{}",
            user.unwrap_or("anonymous"),
            message.trim().to_lowercase()
        )
    }

    /// Fetch a live entry; expired entries report as absent
    #[inline]
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).and_then(|(stored_at, response)| {
            if stored_at.elapsed() < self.ttl {
                Some(response.clone())
            } else {
                None
            }
        })
    }

    /// Store a response and drop any entries past their TTL
    #[inline]
    pub fn insert(&self, key: String, response: String) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key, (Instant::now(), response));
            let ttl = self.ttl;
            entries.retain(|_, (stored_at, _)| stored_at.elapsed() < ttl);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
