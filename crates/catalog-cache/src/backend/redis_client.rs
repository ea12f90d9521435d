//! # Redis Backend
//!
//! Redis implementation of [`CacheBackend`] built on a lazily established
//! `ConnectionManager`.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, IntoConnectionInfo};
use std::time::Duration;
use tokio::sync::OnceCell;

use super::{CacheBackend, StoredValue};
use crate::error::{CacheError, Result};

/// Redis connection configuration
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Label used in logs (`primary` / `fallback`)
    pub name: String,
    pub url: String,
    /// Overrides any password embedded in `url`
    pub password: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            name: "redis".to_string(),
            url: "redis://127.0.0.1:6379".to_string(),
            password: None,
        }
    }
}

/// Redis backend.
///
/// The connection is opened on first use, so constructing a backend for an
/// unreachable server succeeds and the failure surfaces on the first call.
pub struct RedisBackend {
    client: Client,
    conn: OnceCell<ConnectionManager>,
    name: String,
}

impl RedisBackend {
    /// Create a new backend from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn new(config: &RedisConfig) -> Result<Self> {
        let mut info = config
            .url
            .as_str()
            .into_connection_info()
            .map_err(|e| CacheError::Config(format!("{}: {e}", config.name)))?;

        if let Some(password) = &config.password {
            info.redis.password = Some(password.clone());
        }

        let client = Client::open(info)?;

        Ok(Self {
            client,
            conn: OnceCell::new(),
            name: config.name.clone(),
        })
    }

    /// Backend label
    pub fn name(&self) -> &str {
        &self.name
    }

    async fn connection(&self) -> Result<ConnectionManager> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                tracing::info!(backend = %self.name, "Connecting to Redis");
                let conn = ConnectionManager::new(self.client.clone()).await?;
                tracing::info!(backend = %self.name, "Redis connected");
                Ok::<_, CacheError>(conn)
            })
            .await?;

        Ok(conn.clone())
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value.map(StoredValue::Text))
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        let mut conn = self.connection().await?;
        match ttl {
            Some(ttl) => {
                let _: () = conn.set_ex(key, value, ttl.as_secs()).await?;
            }
            None => {
                let _: () = conn.set(key, value).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.connection().await?;
        let deleted: u64 = conn.del(keys).await?;
        Ok(deleted)
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn.keys(pattern).await?;
        Ok(keys)
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection().await?;
        let exists: bool = conn.exists(key).await?;
        Ok(exists)
    }

    async fn ttl(&self, key: &str) -> Result<i64> {
        let mut conn = self.connection().await?;
        let ttl: i64 = conn.ttl(key).await?;
        // Redis reports -2 for a missing key
        Ok(ttl.max(-1))
    }
}
