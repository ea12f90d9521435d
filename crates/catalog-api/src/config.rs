//! # API Configuration
//!
//! Environment-based configuration, read once at startup.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use catalog_cache::{FailoverConfig, RecoveryConfig, RedisConfig};
use thiserror::Error;

const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:4000";
const DEFAULT_FALLBACK_URL: &str = "redis://127.0.0.1:6379";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_RECOVERY_INTERVAL_SECS: u64 = 30 * 60;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required variable {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    Production,
    #[default]
    Development,
    Test,
}

impl FromStr for AppEnv {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" => Ok(Self::Production),
            "development" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            _ => Err(()),
        }
    }
}

/// One Redis endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEndpoint {
    pub url: String,
    pub password: Option<String>,
}

impl CacheEndpoint {
    /// Backend configuration labelled for logs
    pub fn redis_config(&self, name: &str) -> RedisConfig {
        RedisConfig {
            name: name.to_string(),
            url: self.url.clone(),
            password: self.password.clone(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app_env: AppEnv,

    /// Server bind address
    pub server_addr: SocketAddr,

    /// Logging level
    pub log_level: String,

    /// Optional primary cache
    pub primary_cache: Option<CacheEndpoint>,

    /// Required fallback cache
    pub fallback_cache: CacheEndpoint,

    /// Deadline for each primary cache call
    pub cache_timeout: Duration,

    /// Whether the recovery poller was requested
    pub recovery_polling: bool,

    pub recovery_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error when a value does not parse, or when production runs
    /// without `FALLBACK_CACHE_URL`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable source
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let app_env = match var("APP_ENV") {
            Some(value) => value.parse().map_err(|()| ConfigError::Invalid {
                name: "APP_ENV",
                value,
            })?,
            None => AppEnv::default(),
        };

        let server_addr: SocketAddr = parse_or("SERVER_ADDR", var("SERVER_ADDR"), || {
            DEFAULT_SERVER_ADDR.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_ADDR",
                value: DEFAULT_SERVER_ADDR.to_string(),
            })
        })?;

        let primary_cache = var("PRIMARY_CACHE_URL").map(|url| CacheEndpoint {
            url,
            password: var("PRIMARY_CACHE_PASSWORD"),
        });

        let fallback_url = match (var("FALLBACK_CACHE_URL"), app_env) {
            (Some(url), _) => url,
            (None, AppEnv::Production) => return Err(ConfigError::Missing("FALLBACK_CACHE_URL")),
            (None, _) => DEFAULT_FALLBACK_URL.to_string(),
        };

        let timeout_ms = parse_positive(
            "CACHE_TIMEOUT_MS",
            var("CACHE_TIMEOUT_MS"),
            DEFAULT_TIMEOUT_MS,
        )?;
        let interval_secs = parse_positive(
            "CACHE_RECOVERY_INTERVAL_SECS",
            var("CACHE_RECOVERY_INTERVAL_SECS"),
            DEFAULT_RECOVERY_INTERVAL_SECS,
        )?;

        Ok(Self {
            app_env,
            server_addr,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            primary_cache,
            fallback_cache: CacheEndpoint {
                url: fallback_url,
                password: var("FALLBACK_CACHE_PASSWORD"),
            },
            cache_timeout: Duration::from_millis(timeout_ms),
            recovery_polling: var("CACHE_RECOVERY_POLLING")
                .is_none_or(|v| v == "true" || v == "1"),
            recovery_interval: Duration::from_secs(interval_secs),
        })
    }

    /// Whether the recovery poller should actually run
    pub fn recovery_effective(&self) -> bool {
        self.recovery_polling
            && self.primary_cache.is_some()
            && self.app_env == AppEnv::Production
    }

    pub fn failover_config(&self) -> FailoverConfig {
        FailoverConfig {
            timeout: self.cache_timeout,
            recovery: RecoveryConfig {
                enabled: self.recovery_effective(),
                interval: self.recovery_interval,
            },
        }
    }
}

fn parse_or<T: FromStr>(
    name: &'static str,
    value: Option<String>,
    default: impl FnOnce() -> Result<T, ConfigError>,
) -> Result<T, ConfigError> {
    match value {
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => default(),
    }
}

/// Durations of zero would disable the deadline or the poller cadence.
fn parse_positive(
    name: &'static str,
    value: Option<String>,
    default: u64,
) -> Result<u64, ConfigError> {
    match value {
        Some(value) => match value.parse::<u64>() {
            Ok(parsed) if parsed > 0 => Ok(parsed),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        None => Ok(default),
    }
}
