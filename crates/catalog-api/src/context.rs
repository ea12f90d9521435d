//! # API Context
//!
//! Application state and dependency wiring for the HTTP handlers.

use std::sync::Arc;

use catalog_cache::{CacheStack, RedisBackend, Result as CacheResult, SharedBackend};

use crate::config::Config;

/// Application context shared across all handlers
#[derive(Clone)]
pub struct AppContext {
    /// Failover client, cache service and entity strategies
    pub cache: CacheStack,
}

impl AppContext {
    pub fn new(cache: CacheStack) -> Self {
        Self { cache }
    }

    /// Build the cache stack from configuration.
    ///
    /// Redis connections are opened lazily, so an unreachable primary
    /// degrades on first use instead of failing startup.
    ///
    /// # Errors
    ///
    /// Returns an error when a cache URL cannot be parsed.
    pub fn from_config(config: &Config) -> CacheResult<Self> {
        let primary = config
            .primary_cache
            .as_ref()
            .map(|endpoint| -> CacheResult<SharedBackend> {
                Ok(Arc::new(RedisBackend::new(&endpoint.redis_config("primary"))?))
            })
            .transpose()?;

        let fallback: SharedBackend = Arc::new(RedisBackend::new(
            &config.fallback_cache.redis_config("fallback"),
        )?);

        tracing::info!(
            primary_configured = primary.is_some(),
            fallback = %config.fallback_cache.url,
            timeout_ms = config.cache_timeout.as_millis(),
            "Cache stack configured"
        );

        Ok(Self::new(CacheStack::new(
            primary,
            fallback,
            config.failover_config(),
        )))
    }
}
