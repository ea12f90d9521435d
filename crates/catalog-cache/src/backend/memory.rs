//! In-process backend for local development and tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;

use super::{CacheBackend, StoredValue, glob_match};
use crate::error::Result;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

/// `DashMap`-backed store with lazy TTL expiry
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: DashMap<String, Entry>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys
    #[must_use]
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries.iter().filter(|e| e.is_live(now)).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store a raw string without going through JSON encoding
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(
            key.into(),
            Entry {
                value: value.into(),
                expires_at: None,
            },
        );
    }

    fn live(&self, key: &str) -> Option<Entry> {
        let now = Instant::now();
        let entry = self.entries.get(key)?.clone();
        if entry.is_live(now) {
            Some(entry)
        } else {
            self.entries.remove(key);
            None
        }
    }
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        Ok(self.live(key).map(|e| StoredValue::Text(e.value)))
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let expires_at = ttl.map(|ttl| Instant::now() + ttl);
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        let now = Instant::now();
        let removed = keys
            .iter()
            .filter_map(|k| self.entries.remove(k))
            .filter(|(_, e)| e.is_live(now))
            .count();
        Ok(removed as u64)
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let now = Instant::now();
        let mut keys: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.is_live(now) && glob_match(pattern, e.key()))
            .map(|e| e.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.live(key).is_some())
    }

    async fn ttl(&self, key: &str) -> Result<i64> {
        let remaining = self
            .live(key)
            .and_then(|e| e.expires_at)
            .map_or(-1, |at| {
                let left = at.saturating_duration_since(Instant::now());
                i64::try_from(left.as_secs()).unwrap_or(i64::MAX)
            });
        Ok(remaining)
    }
}
