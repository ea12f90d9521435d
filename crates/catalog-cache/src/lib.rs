//! # Catalog Cache Library
//!
//! Fail-open cache layer for the catalog API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Services (cache-aside reads)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Entity Cache Strategies                    │
//! │   (card, card detail, song, live grand prix, grade chall.)  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Cache Service                         │
//! │          (typed JSON, never returns an error)                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       Failover Client                        │
//! │   (per-call timeout, degrade once, half-hour recovery poll)  │
//! └─────────────────────────────────────────────────────────────┘
//!                    │                   │
//!                    ▼                   ▼
//! ┌─────────────────────────┐   ┌──────────────────────────────┐
//! │     Primary Redis       │   │       Fallback Redis         │
//! │      (optional)         │   │                              │
//! └─────────────────────────┘   └──────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - `redis`: Enable the Redis backend (default)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_cache::{CacheStack, FailoverConfig, RedisBackend, RedisConfig};
//!
//! let primary = RedisBackend::new(&primary_config)?;
//! let fallback = RedisBackend::new(&fallback_config)?;
//! let stack = CacheStack::new(Some(Arc::new(primary)), Arc::new(fallback), FailoverConfig::default());
//! stack.failover.start_recovery_polling();
//!
//! if let Some(card) = stack.cards.get_card(1).await { /* hit */ }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod alert;
pub mod backend;
pub mod error;
pub mod failover;
pub mod filter_hash;
pub mod repository;
pub mod service;
pub mod stack;
pub mod strategy;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use alert::{AlertSink, Severity, TracingAlertSink};
#[cfg(feature = "redis")]
pub use backend::{RedisBackend, RedisConfig};
pub use backend::{CacheBackend, MemoryBackend, SharedBackend, StoredValue};
pub use error::{CacheError, Result};
pub use failover::{BackendRole, FailoverClient, FailoverConfig, FailoverStatus, RecoveryConfig};
pub use filter_hash::{ONGOING, filter_hash, filter_only_hash};
pub use repository::{
    CardDetailRepository, CardRepository, GradeChallengeRepository, LiveGrandPrixRepository,
    RepositoryError, RepositoryResult, SongRepository,
};
pub use service::{CacheLookup, CacheService, SharedCacheService};
pub use stack::{CacheEntity, CacheStack, UnknownEntity};
pub use strategy::{
    CardCacheStrategy, CardDetailCacheStrategy, GradeChallengeCacheStrategy,
    LiveGrandPrixCacheStrategy, ReadPath, SongCacheStrategy, TtlTier,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
