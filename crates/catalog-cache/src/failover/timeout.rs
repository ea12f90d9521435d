//! Per-call deadline for backend operations.

use std::future::Future;
use std::time::Duration;

use crate::error::{CacheError, Result};

/// Default per-call timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Race `fut` against a timer. Expiry yields [`CacheError::Timeout`].
///
/// The timer is dropped whichever side settles first. The backend call is
/// dropped on expiry; anything it already sent to the server may still run.
pub async fn with_timeout<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout {
            operation,
            timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_call_becomes_timeout_error() {
        let result: Result<()> =
            with_timeout("get", Duration::from_millis(250), std::future::pending()).await;

        match result {
            Err(CacheError::Timeout {
                operation,
                timeout_ms,
            }) => {
                assert_eq!(operation, "get");
                assert_eq!(timeout_ms, 250);
            }
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_inner_error_passes_through() {
        let result: Result<()> = with_timeout("set", DEFAULT_TIMEOUT, async {
            Err(CacheError::Backend("413 Request Entity Too Large".into()))
        })
        .await;

        assert!(result.unwrap_err().is_payload_too_large());
    }
}
