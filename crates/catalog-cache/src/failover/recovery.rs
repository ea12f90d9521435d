//! Scheduled handshake that moves traffic back to a recovered primary.

use chrono::{DateTime, Timelike, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::timeout::with_timeout;
use super::{BackendRole, FailoverState};
use crate::backend::SharedBackend;

/// Sentinel key read by the handshake. Its value is irrelevant; only a
/// successful round trip counts.
pub const HANDSHAKE_KEY: &str = "failover:handshake";

const HALF_HOUR: Duration = Duration::from_secs(30 * 60);

/// Recovery poller configuration
#[derive(Debug, Clone, Copy)]
pub struct RecoveryConfig {
    pub enabled: bool,
    /// Interval between handshakes once aligned to the half-hour boundary
    pub interval: Duration,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: HALF_HOUR,
        }
    }
}

/// Time from `now` until the next wall-clock `:00` or `:30`.
#[must_use]
pub fn delay_until_next_half_hour(now: DateTime<Utc>) -> Duration {
    let secs_into_slot = u64::from(now.minute() % 30) * 60 + u64::from(now.second());
    let elapsed =
        Duration::from_secs(secs_into_slot) + Duration::from_nanos(u64::from(now.nanosecond() % 1_000_000_000));

    if elapsed.is_zero() {
        HALF_HOUR
    } else {
        HALF_HOUR.saturating_sub(elapsed)
    }
}

/// One handshake against the primary
#[derive(Clone)]
pub(crate) struct RecoveryProbe {
    pub(crate) primary: SharedBackend,
    pub(crate) state: Arc<FailoverState>,
    pub(crate) timeout: Duration,
}

impl RecoveryProbe {
    /// Returns `true` when this handshake switched traffic back to primary.
    pub(crate) async fn run(&self) -> bool {
        if self.state.role() == BackendRole::Primary {
            tracing::debug!("Primary cache backend active, skipping handshake");
            return false;
        }

        match with_timeout("handshake", self.timeout, self.primary.get(HANDSHAKE_KEY)).await {
            Ok(_) => {
                self.state.mark_primary_recovered();
                tracing::info!("Primary cache backend recovered, switching back from fallback");
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Primary cache handshake failed, staying on fallback");
                false
            }
        }
    }
}

/// Background task handle for the recovery loop
#[derive(Default)]
pub(crate) struct RecoveryPoller {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl RecoveryPoller {
    /// Spawn the loop. Returns `false` if it was already running.
    pub(crate) fn start(&self, probe: RecoveryProbe, interval: Duration) -> bool {
        let mut handle = self.handle.lock();
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            tracing::warn!("Recovery poller already running");
            return false;
        }

        let interval = if interval.is_zero() {
            tracing::warn!(
                fallback_secs = HALF_HOUR.as_secs(),
                "Recovery interval is zero, using default"
            );
            HALF_HOUR
        } else {
            interval
        };

        let initial_delay = delay_until_next_half_hour(Utc::now());
        tracing::info!(
            initial_delay_secs = initial_delay.as_secs(),
            interval_secs = interval.as_secs(),
            "Starting cache recovery poller"
        );

        *handle = Some(tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                probe.run().await;
            }
        }));

        true
    }

    /// Abort the loop, whether it is still waiting for alignment or already
    /// ticking. Returns `false` if it was not running.
    pub(crate) fn stop(&self) -> bool {
        match self.handle.lock().take() {
            Some(handle) => {
                handle.abort();
                tracing::info!("Stopped cache recovery poller");
                true
            }
            None => false,
        }
    }

    /// A task that exited on its own no longer counts as running.
    pub(crate) fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for RecoveryPoller {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_delay_aligns_to_next_half_hour() {
        let at = |h, m, s| Utc.with_ymd_and_hms(2025, 6, 1, h, m, s).unwrap();

        assert_eq!(delay_until_next_half_hour(at(10, 10, 0)), Duration::from_secs(20 * 60));
        assert_eq!(delay_until_next_half_hour(at(10, 45, 30)), Duration::from_secs(14 * 60 + 30));
        assert_eq!(delay_until_next_half_hour(at(10, 29, 59)), Duration::from_secs(1));
    }

    #[test]
    fn test_delay_on_boundary_waits_full_slot() {
        let on_boundary = Utc.with_ymd_and_hms(2025, 6, 1, 11, 30, 0).unwrap();
        assert_eq!(delay_until_next_half_hour(on_boundary), HALF_HOUR);
    }

    #[test]
    fn test_delay_accounts_for_subseconds() {
        let at = Utc.with_ymd_and_hms(2025, 6, 1, 9, 59, 59).unwrap()
            + chrono::Duration::milliseconds(500);
        assert_eq!(delay_until_next_half_hour(at), Duration::from_millis(500));
    }
}
