//! # Cache Service
//!
//! Typed JSON cache over one backend with a fail-open contract: no method
//! returns an error. Backend and serialization failures are logged and turned
//! into a miss, a no-op, `false` or `-1`.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::backend::{SharedBackend, StoredValue};
use crate::error::{CacheError, Result};

/// Outcome of a cache read, before fail-open collapsing
#[derive(Debug)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss,
    /// Backend or decode failure; already logged
    Failed(CacheError),
}

impl<T> CacheLookup<T> {
    /// Collapse `Miss` and `Failed` into `None`
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss | Self::Failed(_) => None,
        }
    }

    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }
}

/// Fail-open typed cache
#[derive(Clone)]
pub struct CacheService {
    backend: SharedBackend,
}

impl CacheService {
    pub fn new(backend: SharedBackend) -> Self {
        Self { backend }
    }

    /// Underlying backend
    pub fn backend(&self) -> &SharedBackend {
        &self.backend
    }

    /// Read and decode a key, keeping miss and failure apart
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        match self.try_get(key).await {
            Ok(Some(value)) => {
                tracing::debug!(key, "Cache hit");
                CacheLookup::Hit(value)
            }
            Ok(None) => {
                tracing::debug!(key, "Cache miss");
                CacheLookup::Miss
            }
            Err(e) => {
                tracing::error!(key, error = %e, "Cache get error");
                CacheLookup::Failed(e)
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let decoded = match self.backend.get(key).await? {
            None => None,
            Some(StoredValue::Structured(value)) => Some(serde_json::from_value(value)?),
            Some(StoredValue::Text(json)) => Some(serde_json::from_str(&json)?),
        };
        Ok(decoded)
    }

    /// Read a key; `None` on miss or any failure
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.lookup(key).await.into_option()
    }

    /// Encode and store a value. A zero TTL stores without expiry.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let ttl = ttl.filter(|ttl| !ttl.is_zero());
        match self.try_set(key, value, ttl).await {
            Ok(()) => tracing::debug!(key, ttl_secs = ttl.map(|t| t.as_secs()), "Cache set"),
            Err(e) => tracing::error!(key, error = %e, "Cache set error"),
        }
    }

    async fn try_set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.backend.set(key, json, ttl).await
    }

    /// Delete a key
    pub async fn delete(&self, key: &str) {
        match self.backend.delete(&[key.to_string()]).await {
            Ok(_) => tracing::debug!(key, "Cache deleted"),
            Err(e) => tracing::error!(key, error = %e, "Cache delete error"),
        }
    }

    /// Delete every key matching a glob pattern in one batch.
    /// Issues no delete when nothing matches.
    pub async fn invalidate_pattern(&self, pattern: &str) {
        match self.try_invalidate_pattern(pattern).await {
            Ok(0) => {}
            Ok(count) => tracing::debug!(pattern, count, "Cache pattern invalidated"),
            Err(e) => tracing::error!(pattern, error = %e, "Cache pattern invalidation error"),
        }
    }

    async fn try_invalidate_pattern(&self, pattern: &str) -> Result<u64> {
        let keys = self.backend.keys_matching(pattern).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        self.backend.delete(&keys).await
    }

    /// Whether a key exists; `false` on failure
    pub async fn exists(&self, key: &str) -> bool {
        self.backend.exists(key).await.unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "Cache exists check error");
            false
        })
    }

    /// Remaining TTL in seconds; `-1` when absent, unbounded, or on failure
    pub async fn ttl(&self, key: &str) -> i64 {
        self.backend.ttl(key).await.unwrap_or_else(|e| {
            tracing::error!(key, error = %e, "Cache TTL check error");
            -1
        })
    }
}

/// Shared cache service handle
pub type SharedCacheService = Arc<CacheService>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::test_support::{Behavior, ScriptedBackend, StaticBackend};
    use catalog_domain::Card;

    fn failing() -> (Arc<ScriptedBackend>, CacheService) {
        let backend = ScriptedBackend::new(Behavior::Fail("ECONNREFUSED".into()));
        let service = CacheService::new(backend.clone());
        (backend, service)
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_then_get_round_trips_json() {
        let service = CacheService::new(Arc::new(MemoryBackend::new()));
        let card = Card::new(1, "Dream Believers", "Kaho");

        service.set("card:1", &card, Some(Duration::from_secs(60))).await;

        assert_eq!(service.get::<Card>("card:1").await, Some(card));
        assert_eq!(service.ttl("card:1").await, 60);
        assert!(service.exists("card:1").await);
    }

    #[tokio::test]
    async fn test_backend_failures_never_escape() {
        let (_, service) = failing();

        assert!(matches!(service.lookup::<Card>("card:1").await, CacheLookup::Failed(_)));
        assert_eq!(service.get::<Card>("card:1").await, None);
        service.set("card:1", &Card::new(1, "a", "b"), None).await;
        service.delete("card:1").await;
        service.invalidate_pattern("cards:list:*").await;
        assert!(!service.exists("card:1").await);
        assert_eq!(service.ttl("card:1").await, -1);
    }

    #[tokio::test]
    async fn test_malformed_json_is_a_miss() {
        let backend = Arc::new(MemoryBackend::new());
        backend.insert_raw("card:9", "{not json");
        let service = CacheService::new(backend);

        assert!(matches!(service.lookup::<Card>("card:9").await, CacheLookup::Failed(CacheError::Serialization(_))));
        assert_eq!(service.get::<Card>("card:9").await, None);
    }

    #[tokio::test]
    async fn test_absent_key_is_plain_miss() {
        let service = CacheService::new(Arc::new(MemoryBackend::new()));
        assert!(matches!(service.lookup::<Card>("card:404").await, CacheLookup::Miss));
    }

    #[tokio::test]
    async fn test_structured_value_is_returned_as_is() {
        let card = Card::new(5, "Sparkly Spot", "Sayaka");
        let raw = serde_json::to_value(&card).unwrap();
        let service = CacheService::new(Arc::new(StaticBackend(StoredValue::Structured(raw))));

        assert_eq!(service.get::<Card>("card:5").await, Some(card));
    }

    #[tokio::test]
    async fn test_zero_ttl_stores_without_expiry() {
        let service = CacheService::new(Arc::new(MemoryBackend::new()));
        service.set("cards:stats", &42, Some(Duration::ZERO)).await;

        assert_eq!(service.get::<i32>("cards:stats").await, Some(42));
        assert_eq!(service.ttl("cards:stats").await, -1);
    }

    #[tokio::test]
    async fn test_invalidate_pattern_deletes_exact_matching_set() {
        let backend = ScriptedBackend::healthy();
        for key in ["cards:list:a", "cards:list:b", "cards:stats"] {
            backend.store().insert_raw(key, "[]");
        }
        let service = CacheService::new(backend.clone());

        service.invalidate_pattern("cards:list:*").await;

        assert_eq!(
            backend.delete_calls(),
            vec![vec!["cards:list:a".to_string(), "cards:list:b".to_string()]]
        );
        assert!(service.exists("cards:stats").await);
    }

    #[tokio::test]
    async fn test_invalidate_pattern_without_matches_issues_no_delete() {
        let backend = ScriptedBackend::healthy();
        let service = CacheService::new(backend.clone());

        service.invalidate_pattern("songs:list:*").await;

        assert!(backend.delete_calls().is_empty());
    }
}
