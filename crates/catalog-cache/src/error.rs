//! Cache layer error types

use thiserror::Error;

/// Status token identifying an oversized-request rejection (HTTP 413).
///
/// Errors carrying it are a caller/data problem: the fallback would reject
/// the same payload, so they never trigger failover.
pub const PAYLOAD_TOO_LARGE_MARKER: &str = "413";

const PAYLOAD_TOO_LARGE_REASONS: [&str; 2] = ["entity too large", "payload too large"];

/// Cache layer errors
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u64,
    },

    #[error("Invalid backend configuration: {0}")]
    Config(String),
}

impl CacheError {
    /// Whether this error reports an oversized request rather than an
    /// unhealthy backend.
    #[must_use]
    pub fn is_payload_too_large(&self) -> bool {
        match self {
            Self::Redis(message) | Self::Backend(message) => mentions_payload_too_large(message),
            Self::Serialization(_) | Self::Timeout { .. } | Self::Config(_) => false,
        }
    }

    /// Whether a primary-backend failure of this kind should move traffic to
    /// the fallback.
    #[must_use]
    pub fn is_failover_eligible(&self) -> bool {
        !self.is_payload_too_large()
    }
}

/// `413` must stand as its own word (`"413 Request..."`, `"status: 413"`);
/// hosts or keys that merely contain the digits do not count.
fn mentions_payload_too_large(message: &str) -> bool {
    let status = message
        .split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .any(|word| word == PAYLOAD_TOO_LARGE_MARKER);

    status || {
        let lower = message.to_ascii_lowercase();
        PAYLOAD_TOO_LARGE_REASONS
            .iter()
            .any(|reason| lower.contains(reason))
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::Redis(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_too_large_is_not_failover_eligible() {
        let err = CacheError::Backend("413 Request Entity Too Large".into());
        assert!(err.is_payload_too_large());
        assert!(!err.is_failover_eligible());
    }

    #[test]
    fn test_payload_too_large_variants() {
        let status = CacheError::Redis("ResponseError: status 413".into());
        assert!(status.is_payload_too_large());

        let reason = CacheError::Backend("Payload Too Large".into());
        assert!(reason.is_payload_too_large());
    }

    #[test]
    fn test_digits_in_host_or_key_are_failover_eligible() {
        let host = CacheError::Redis("Connection refused: redis-413.internal:6379".into());
        assert!(!host.is_payload_too_large());
        assert!(host.is_failover_eligible());

        let key = CacheError::Backend("WRONGTYPE for key card:4130".into());
        assert!(key.is_failover_eligible());

        let config = CacheError::Config("primary: 413 is not a url".into());
        assert!(config.is_failover_eligible());
    }

    #[test]
    fn test_transport_errors_are_failover_eligible() {
        let err = CacheError::Redis("Connection refused (os error 111)".into());
        assert!(err.is_failover_eligible());

        let timeout = CacheError::Timeout {
            operation: "get",
            timeout_ms: 10_000,
        };
        assert!(timeout.is_failover_eligible());
    }
}
