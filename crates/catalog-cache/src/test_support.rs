//! Scripted backends and sinks shared by unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::alert::{AlertSink, Severity};
use crate::backend::{CacheBackend, MemoryBackend, StoredValue};
use crate::error::{CacheError, Result};

/// How a [`ScriptedBackend`] answers
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Serve from the inner memory store
    Healthy,
    /// Fail every call with this message
    Fail(String),
    /// Never answer
    Hang,
    /// Answer from the inner store after this delay
    Delay(Duration),
}

/// Backend whose behaviour can be switched mid-test, counting every call
pub struct ScriptedBackend {
    store: MemoryBackend,
    behavior: Mutex<Behavior>,
    calls: AtomicUsize,
    set_calls: AtomicUsize,
    delete_calls: Mutex<Vec<Vec<String>>>,
}

impl ScriptedBackend {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            store: MemoryBackend::new(),
            behavior: Mutex::new(behavior),
            calls: AtomicUsize::new(0),
            set_calls: AtomicUsize::new(0),
            delete_calls: Mutex::new(Vec::new()),
        })
    }

    pub fn healthy() -> Arc<Self> {
        Self::new(Behavior::Healthy)
    }

    pub fn set_behavior(&self, behavior: Behavior) {
        *self.behavior.lock() = behavior;
    }

    pub fn store(&self) -> &MemoryBackend {
        &self.store
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn delete_calls(&self) -> Vec<Vec<String>> {
        self.delete_calls.lock().clone()
    }

    async fn gate(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let behavior = self.behavior.lock().clone();
        match behavior {
            Behavior::Healthy => Ok(()),
            Behavior::Fail(message) => Err(CacheError::Backend(message)),
            Behavior::Hang => std::future::pending().await,
            Behavior::Delay(delay) => {
                tokio::time::sleep(delay).await;
                Ok(())
            }
        }
    }
}

#[async_trait]
impl CacheBackend for ScriptedBackend {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        self.gate().await?;
        self.store.get(key).await
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;
        self.store.set(key, value, ttl).await
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        self.delete_calls.lock().push(keys.to_vec());
        self.gate().await?;
        self.store.delete(keys).await
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        self.gate().await?;
        self.store.keys_matching(pattern).await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.gate().await?;
        self.store.exists(key).await
    }

    async fn ttl(&self, key: &str) -> Result<i64> {
        self.gate().await?;
        self.store.ttl(key).await
    }
}

/// Backend that returns a fixed raw value for every read
pub struct StaticBackend(pub StoredValue);

#[async_trait]
impl CacheBackend for StaticBackend {
    async fn get(&self, _key: &str) -> Result<Option<StoredValue>> {
        Ok(Some(self.0.clone()))
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Option<Duration>) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        Ok(keys.len() as u64)
    }

    async fn keys_matching(&self, _pattern: &str) -> Result<Vec<String>> {
        Ok(Vec::new())
    }

    async fn exists(&self, _key: &str) -> Result<bool> {
        Ok(true)
    }

    async fn ttl(&self, _key: &str) -> Result<i64> {
        Ok(-1)
    }
}

/// Alert sink recording every captured message
#[derive(Default)]
pub struct RecordingAlertSink {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingAlertSink {
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }

    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.messages.lock().clone()
    }
}

impl AlertSink for RecordingAlertSink {
    fn capture_message(&self, message: &str, severity: Severity) {
        self.messages.lock().push((message.to_string(), severity));
    }
}
