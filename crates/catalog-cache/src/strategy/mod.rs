//! # Strategy Module
//!
//! Per-entity cache strategies and the cache-aside read path.
//!
//! ## Keyspaces
//!
//! | Entity | By id | By natural key | Lists | Stats |
//! |---|---|---|---|---|
//! | card | `card:<id>` | `card:name:<card>:<character>` | `cards:list:<hash>` | `cards:stats` |
//! | card detail | `cardDetail:<cardId>` | | | |
//! | song | `song:<id>` | `song:name:<name>` | `songs:list:<hash>` | `songs:stats` |
//! | live grand prix | `liveGrandPrix:<id>` | `liveGrandPrix:eventName:<name>` | `liveGrandPrix:list:<hash>` | `liveGrandPrix:stats` |
//! | grade challenge | `gradeChallenge:<id>` | `gradeChallenge:title:<title>` | `gradeChallenge:list:<hash>` | `gradeChallenge:stats` |
//!
//! Strategies only derive keys, read and write. Loading from persistence is
//! the caller's job (see [`ReadPath`]).

pub mod card;
pub mod card_detail;
pub mod grade_challenge;
pub mod live_grand_prix;
pub mod read_path;
pub mod song;

use std::time::Duration;

pub use card::CardCacheStrategy;
pub use card_detail::CardDetailCacheStrategy;
pub use grade_challenge::GradeChallengeCacheStrategy;
pub use live_grand_prix::LiveGrandPrixCacheStrategy;
pub use read_path::ReadPath;
pub use song::SongCacheStrategy;

/// Named TTL classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TtlTier {
    /// Single entities by id or natural key: 24h
    Long,
    /// Card details: 6h
    Detail,
    /// List queries: 1h
    Medium,
    /// Aggregate stats: 30m
    Short,
}

impl TtlTier {
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::Long => Duration::from_secs(24 * 60 * 60),
            Self::Detail => Duration::from_secs(6 * 60 * 60),
            Self::Medium => Duration::from_secs(60 * 60),
            Self::Short => Duration::from_secs(30 * 60),
        }
    }

    /// Duration in the `Option` form the cache service takes
    #[must_use]
    pub const fn ttl(self) -> Option<Duration> {
        Some(self.duration())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_durations() {
        assert_eq!(TtlTier::Long.duration().as_secs(), 86_400);
        assert_eq!(TtlTier::Detail.duration().as_secs(), 21_600);
        assert_eq!(TtlTier::Medium.duration().as_secs(), 3_600);
        assert_eq!(TtlTier::Short.duration().as_secs(), 1_800);
    }
}
