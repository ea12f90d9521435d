//! Out-of-band alerting for backend health transitions.

use std::fmt;

/// Alert severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        f.write_str(s)
    }
}

/// Monitoring sink that accepts "capture message at severity" calls
pub trait AlertSink: Send + Sync {
    fn capture_message(&self, message: &str, severity: Severity);
}

/// Alert sink that emits a structured `tracing` event on the `alert` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAlertSink;

impl AlertSink for TracingAlertSink {
    fn capture_message(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!(target: "alert", %severity, "{message}"),
            Severity::Warning => tracing::warn!(target: "alert", %severity, "{message}"),
            Severity::Error | Severity::Fatal => {
                tracing::error!(target: "alert", %severity, "{message}");
            }
        }
    }
}
