//! # Backend Module
//!
//! Contract over a single remote key-value store, plus the concrete stores.
//!
//! Keys are opaque strings here; namespacing happens in the entity
//! strategies. Both the primary and the fallback store implement
//! [`CacheBackend`], and so does the failover client that composes them.

pub mod memory;
#[cfg(feature = "redis")]
pub mod redis_client;

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;

pub use memory::MemoryBackend;
#[cfg(feature = "redis")]
pub use redis_client::{RedisBackend, RedisConfig};

/// Raw value as returned by a backend.
///
/// Most stores hand back the stored string; some client libraries decode JSON
/// themselves and return a structured value instead.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    Text(String),
    Structured(serde_json::Value),
}

/// Remote key-value store operations used by the cache layer
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Read a key
    async fn get(&self, key: &str) -> Result<Option<StoredValue>>;

    /// Write a key, with an expiry when `ttl` is given
    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()>;

    /// Delete keys, returning how many existed
    async fn delete(&self, keys: &[String]) -> Result<u64>;

    /// List keys matching a glob pattern such as `card:*`
    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Remaining lifetime in seconds, `-1` when the key is absent or has no expiry
    async fn ttl(&self, key: &str) -> Result<i64>;
}

/// Shared backend handle
pub type SharedBackend = Arc<dyn CacheBackend>;

/// Glob match supporting `*` (any run) and `?` (any single char).
pub(crate) fn glob_match(pattern: &str, candidate: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let candidate: Vec<char> = candidate.chars().collect();

    let (mut p, mut c) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while c < candidate.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == candidate[c]) {
            p += 1;
            c += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            resume = c;
            p += 1;
        } else if let Some(s) = star {
            p = s + 1;
            resume += 1;
            c = resume;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&ch| ch == '*')
}
