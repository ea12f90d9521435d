//! # Failover Client
//!
//! One logical backend composed of an optional primary and a required
//! fallback store.
//!
//! ```text
//!                 ┌──────────────┐  timeout / error   ┌──────────────┐
//!   start ──────▶ │   PRIMARY    │ ─────────────────▶ │   FALLBACK   │
//!  (primary set)  └──────────────┘                    └──────────────┘
//!                        ▲        handshake succeeds          │
//!                        └────────────────────────────────────┘
//! ```
//!
//! - A primary call that times out or fails moves traffic to the fallback,
//!   and the same call is retried there once. The first failure of an
//!   episode raises an alert; later ones only log.
//! - Errors carrying the oversized-payload marker are returned unchanged:
//!   no switch, no fallback call, no alert.
//! - Only the recovery handshake moves traffic back to the primary.
//! - Without a primary the client stays on the fallback and never polls.

pub mod recovery;
pub mod timeout;

use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

use crate::alert::{AlertSink, Severity, TracingAlertSink};
use crate::backend::{CacheBackend, SharedBackend, StoredValue};
use crate::error::{CacheError, Result};
use recovery::{RecoveryPoller, RecoveryProbe};
use timeout::with_timeout;

pub use recovery::{HANDSHAKE_KEY, RecoveryConfig, delay_until_next_half_hour};
pub use timeout::DEFAULT_TIMEOUT;

/// Which backend currently serves traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackendRole {
    Primary,
    Fallback,
}

impl BackendRole {
    const fn as_u8(self) -> u8 {
        match self {
            Self::Primary => 0,
            Self::Fallback => 1,
        }
    }

    const fn from_u8(value: u8) -> Self {
        if value == 0 { Self::Primary } else { Self::Fallback }
    }
}

impl fmt::Display for BackendRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Fallback => f.write_str("fallback"),
        }
    }
}

/// Active role plus the per-episode alert flag
pub(crate) struct FailoverState {
    role: AtomicU8,
    alerted: AtomicBool,
}

impl FailoverState {
    fn new(role: BackendRole) -> Self {
        Self {
            role: AtomicU8::new(role.as_u8()),
            alerted: AtomicBool::new(false),
        }
    }

    pub(crate) fn role(&self) -> BackendRole {
        BackendRole::from_u8(self.role.load(Ordering::SeqCst))
    }

    fn alerted(&self) -> bool {
        self.alerted.load(Ordering::SeqCst)
    }

    /// Switch to fallback. Returns `true` for exactly one caller per episode.
    fn mark_primary_failed(&self) -> bool {
        self.role
            .store(BackendRole::Fallback.as_u8(), Ordering::SeqCst);
        !self.alerted.swap(true, Ordering::SeqCst)
    }

    pub(crate) fn mark_primary_recovered(&self) {
        self.alerted.store(false, Ordering::SeqCst);
        self.role
            .store(BackendRole::Primary.as_u8(), Ordering::SeqCst);
    }
}

/// Failover client configuration
#[derive(Debug, Clone, Copy)]
pub struct FailoverConfig {
    /// Deadline for each primary call
    pub timeout: Duration,
    pub recovery: RecoveryConfig,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            recovery: RecoveryConfig::default(),
        }
    }
}

/// Snapshot of the failover state for health reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailoverStatus {
    pub active_role: BackendRole,
    pub primary_configured: bool,
    pub alerted: bool,
    pub recovery_polling: bool,
}

/// Primary/fallback backend with automatic degrade and recover
pub struct FailoverClient {
    primary: Option<SharedBackend>,
    fallback: SharedBackend,
    state: Arc<FailoverState>,
    alerts: Arc<dyn AlertSink>,
    config: FailoverConfig,
    poller: RecoveryPoller,
}

impl fmt::Debug for FailoverClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailoverClient")
            .field("status", &self.status())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl FailoverClient {
    /// Create a client. Starts on the primary when one is given. A zero
    /// timeout is replaced by [`DEFAULT_TIMEOUT`].
    ///
    /// Recovery polling is not started here; call
    /// [`start_recovery_polling`](Self::start_recovery_polling) from within
    /// the runtime.
    pub fn new(
        primary: Option<SharedBackend>,
        fallback: SharedBackend,
        config: FailoverConfig,
    ) -> Self {
        let config = if config.timeout.is_zero() {
            tracing::warn!(
                fallback_ms = u64::try_from(DEFAULT_TIMEOUT.as_millis()).unwrap_or(u64::MAX),
                "Cache timeout is zero, using default"
            );
            FailoverConfig {
                timeout: DEFAULT_TIMEOUT,
                ..config
            }
        } else {
            config
        };

        let role = if primary.is_some() {
            BackendRole::Primary
        } else {
            BackendRole::Fallback
        };

        Self {
            primary,
            fallback,
            state: Arc::new(FailoverState::new(role)),
            alerts: Arc::new(TracingAlertSink),
            config,
            poller: RecoveryPoller::default(),
        }
    }

    /// Replace the alert sink
    #[must_use]
    pub fn with_alert_sink(mut self, alerts: Arc<dyn AlertSink>) -> Self {
        self.alerts = alerts;
        self
    }

    /// Currently active role
    pub fn active_role(&self) -> BackendRole {
        self.state.role()
    }

    pub fn status(&self) -> FailoverStatus {
        FailoverStatus {
            active_role: self.state.role(),
            primary_configured: self.primary.is_some(),
            alerted: self.state.alerted(),
            recovery_polling: self.poller.is_running(),
        }
    }

    /// Start the recovery poller. A no-op when polling is disabled, no
    /// primary is configured, or the poller is already running.
    ///
    /// Returns whether a new poller was spawned.
    pub fn start_recovery_polling(&self) -> bool {
        if !self.config.recovery.enabled {
            tracing::info!("Cache recovery polling disabled");
            return false;
        }
        let Some(probe) = self.probe() else {
            tracing::info!("No primary cache backend configured, recovery polling not started");
            return false;
        };
        self.poller.start(probe, self.config.recovery.interval)
    }

    /// Stop the recovery poller if it is running
    pub fn stop_recovery_polling(&self) -> bool {
        self.poller.stop()
    }

    /// Run one handshake against the primary now.
    ///
    /// Returns `true` when traffic was moved back to the primary.
    pub async fn try_recover(&self) -> bool {
        match self.probe() {
            Some(probe) => probe.run().await,
            None => false,
        }
    }

    fn probe(&self) -> Option<RecoveryProbe> {
        self.primary.as_ref().map(|primary| RecoveryProbe {
            primary: Arc::clone(primary),
            state: Arc::clone(&self.state),
            timeout: self.config.timeout,
        })
    }

    /// Route one operation: primary under deadline, fallback on failure.
    async fn route<T, F, Fut>(&self, operation: &'static str, call: F) -> Result<T>
    where
        T: Send,
        F: Fn(SharedBackend) -> Fut + Send + Sync,
        Fut: Future<Output = Result<T>> + Send,
    {
        let primary = match (&self.primary, self.state.role()) {
            (Some(primary), BackendRole::Primary) => Arc::clone(primary),
            _ => return call(Arc::clone(&self.fallback)).await,
        };

        let error = match with_timeout(operation, self.config.timeout, call(primary)).await {
            Ok(value) => return Ok(value),
            Err(e) if !e.is_failover_eligible() => {
                tracing::warn!(operation, error = %e, "Primary rejected oversized request");
                return Err(e);
            }
            Err(e) => e,
        };

        self.degrade(operation, &error);
        call(Arc::clone(&self.fallback)).await
    }

    fn degrade(&self, operation: &'static str, error: &CacheError) {
        if self.state.mark_primary_failed() {
            tracing::error!(
                operation,
                error = %error,
                "Primary cache backend failed, switching to fallback"
            );
            self.alerts.capture_message(
                &format!("Primary cache backend failed during {operation}: {error}; switched to fallback"),
                Severity::Error,
            );
        } else {
            tracing::warn!(
                operation,
                error = %error,
                "Primary cache backend failed again, staying on fallback"
            );
        }
    }
}

#[async_trait]
impl CacheBackend for FailoverClient {
    async fn get(&self, key: &str) -> Result<Option<StoredValue>> {
        self.route("get", |backend| {
            let key = key.to_owned();
            async move { backend.get(&key).await }
        })
        .await
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<()> {
        self.route("set", |backend| {
            let key = key.to_owned();
            let value = value.clone();
            async move { backend.set(&key, value, ttl).await }
        })
        .await
    }

    async fn delete(&self, keys: &[String]) -> Result<u64> {
        self.route("delete", |backend| {
            let keys = keys.to_vec();
            async move { backend.delete(&keys).await }
        })
        .await
    }

    async fn keys_matching(&self, pattern: &str) -> Result<Vec<String>> {
        self.route("keys", |backend| {
            let pattern = pattern.to_owned();
            async move { backend.keys_matching(&pattern).await }
        })
        .await
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.route("exists", |backend| {
            let key = key.to_owned();
            async move { backend.exists(&key).await }
        })
        .await
    }

    async fn ttl(&self, key: &str) -> Result<i64> {
        self.route("ttl", |backend| {
            let key = key.to_owned();
            async move { backend.ttl(&key).await }
        })
        .await
    }
}
