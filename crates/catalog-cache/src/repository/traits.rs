//! # Repository Traits
//!
//! Source-of-truth interfaces the cache-aside read paths fall back to on a
//! miss. Implementations live with the persistence layer; tests use fakes.

use async_trait::async_trait;

use super::RepositoryResult as Result;
use catalog_domain::{
    Card, CardDetail, CardFilter, CardPage, CardSort, CardStats, GradeChallenge,
    GradeChallengeFilter, GradeChallengeStats, LiveGrandPrix, LiveGrandPrixFilter,
    LiveGrandPrixStats, Pagination, Song, SongFilter, SongStats,
};

// =============================================================================
// CARD REPOSITORY
// =============================================================================

#[async_trait]
pub trait CardRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Card>>;

    /// Cards are unique per (card name, character name)
    async fn find_by_name_and_character(
        &self,
        card_name: &str,
        character_name: &str,
    ) -> Result<Option<Card>>;

    async fn find_all(
        &self,
        filter: Option<&CardFilter>,
        sort: Option<&CardSort>,
        pagination: Option<&Pagination>,
    ) -> Result<CardPage>;

    async fn get_stats(&self) -> Result<CardStats>;
}

// =============================================================================
// CARD DETAIL REPOSITORY
// =============================================================================

#[async_trait]
pub trait CardDetailRepository: Send + Sync {
    async fn find_by_card_id(&self, card_id: i32) -> Result<Option<CardDetail>>;
}

// =============================================================================
// SONG REPOSITORY
// =============================================================================

#[async_trait]
pub trait SongRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Song>>;

    async fn find_by_song_name(&self, song_name: &str) -> Result<Option<Song>>;

    async fn find_all(&self, filter: Option<&SongFilter>) -> Result<Vec<Song>>;

    async fn get_stats(&self) -> Result<SongStats>;
}

// =============================================================================
// EVENT REPOSITORIES
// =============================================================================

#[async_trait]
pub trait LiveGrandPrixRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<LiveGrandPrix>>;

    async fn find_by_event_name(&self, event_name: &str) -> Result<Option<LiveGrandPrix>>;

    async fn find_all(&self, filter: Option<&LiveGrandPrixFilter>) -> Result<Vec<LiveGrandPrix>>;

    /// Events whose window contains the current time
    async fn find_ongoing(&self) -> Result<Vec<LiveGrandPrix>>;

    async fn get_stats(&self) -> Result<LiveGrandPrixStats>;
}

#[async_trait]
pub trait GradeChallengeRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<GradeChallenge>>;

    async fn find_by_title(&self, title: &str) -> Result<Option<GradeChallenge>>;

    async fn find_all(
        &self,
        filter: Option<&GradeChallengeFilter>,
    ) -> Result<Vec<GradeChallenge>>;

    async fn find_ongoing(&self) -> Result<Vec<GradeChallenge>>;

    async fn get_stats(&self) -> Result<GradeChallengeStats>;
}
