//! The assembled cache layer: one failover client, one cache service and a
//! strategy per entity, built once at startup and shared by handle.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::backend::SharedBackend;
use crate::failover::{FailoverClient, FailoverConfig};
use crate::service::{CacheService, SharedCacheService};
use crate::strategy::{
    CardCacheStrategy, CardDetailCacheStrategy, GradeChallengeCacheStrategy,
    LiveGrandPrixCacheStrategy, SongCacheStrategy,
};

/// Cached entity families, as addressed by the admin flush route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheEntity {
    Cards,
    CardDetails,
    Songs,
    LiveGrandPrix,
    GradeChallenges,
}

impl CacheEntity {
    pub const ALL: [Self; 5] = [
        Self::Cards,
        Self::CardDetails,
        Self::Songs,
        Self::LiveGrandPrix,
        Self::GradeChallenges,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cards => "cards",
            Self::CardDetails => "card-details",
            Self::Songs => "songs",
            Self::LiveGrandPrix => "live-grand-prix",
            Self::GradeChallenges => "grade-challenges",
        }
    }
}

impl fmt::Display for CacheEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown entity name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown cache entity: {0}")]
pub struct UnknownEntity(pub String);

impl FromStr for CacheEntity {
    type Err = UnknownEntity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| UnknownEntity(s.to_string()))
    }
}

/// Fully wired cache layer
#[derive(Clone)]
pub struct CacheStack {
    pub failover: Arc<FailoverClient>,
    pub service: SharedCacheService,
    pub cards: CardCacheStrategy,
    pub card_details: CardDetailCacheStrategy,
    pub songs: SongCacheStrategy,
    pub live_grand_prix: LiveGrandPrixCacheStrategy,
    pub grade_challenges: GradeChallengeCacheStrategy,
}

impl CacheStack {
    pub fn new(primary: Option<SharedBackend>, fallback: SharedBackend, config: FailoverConfig) -> Self {
        Self::from_failover(Arc::new(FailoverClient::new(primary, fallback, config)))
    }

    /// Wire services and strategies over an existing client
    pub fn from_failover(failover: Arc<FailoverClient>) -> Self {
        let backend: SharedBackend = failover.clone();
        let service = Arc::new(CacheService::new(backend));

        Self {
            cards: CardCacheStrategy::new(service.clone()),
            card_details: CardDetailCacheStrategy::new(service.clone()),
            songs: SongCacheStrategy::new(service.clone()),
            live_grand_prix: LiveGrandPrixCacheStrategy::new(service.clone()),
            grade_challenges: GradeChallengeCacheStrategy::new(service.clone()),
            failover,
            service,
        }
    }

    /// Drop every cached entry of one entity family
    pub async fn flush(&self, entity: CacheEntity) {
        match entity {
            CacheEntity::Cards => self.cards.invalidate_all_cards().await,
            CacheEntity::CardDetails => self.card_details.invalidate_all_details().await,
            CacheEntity::Songs => self.songs.invalidate_all_songs().await,
            CacheEntity::LiveGrandPrix => self.live_grand_prix.invalidate_all().await,
            CacheEntity::GradeChallenges => self.grade_challenges.invalidate_all().await,
        }
        tracing::info!(entity = %entity, "Cache flushed");
    }
}
