//! In-memory repositories and cache wiring for service tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use catalog_cache::{
    CacheBackend, CacheError, CacheStack, CardDetailRepository, CardRepository, FailoverConfig,
    GradeChallengeRepository, LiveGrandPrixRepository, MemoryBackend, RepositoryError,
    RepositoryResult, SongRepository, StoredValue,
};
use catalog_domain::{
    Card, CardDetail, CardFilter, CardPage, CardSort, CardStats, GradeChallenge,
    GradeChallengeFilter, GradeChallengeStats, LiveGrandPrix, LiveGrandPrixFilter,
    LiveGrandPrixStats, Pagination, Song, SongFilter, SongStats,
};

/// Cache stack over a single in-memory fallback
pub fn memory_stack() -> (Arc<MemoryBackend>, CacheStack) {
    let backend = Arc::new(MemoryBackend::new());
    let stack = CacheStack::new(None, backend.clone(), FailoverConfig::default());
    (backend, stack)
}

/// Cache stack whose only backend refuses every call
pub fn unreachable_stack() -> CacheStack {
    CacheStack::new(None, Arc::new(DownBackend), FailoverConfig::default())
}

struct DownBackend;

#[async_trait]
impl CacheBackend for DownBackend {
    async fn get(&self, _key: &str) -> catalog_cache::Result<Option<StoredValue>> {
        Err(refused())
    }

    async fn set(&self, _key: &str, _value: String, _ttl: Option<Duration>) -> catalog_cache::Result<()> {
        Err(refused())
    }

    async fn delete(&self, _keys: &[String]) -> catalog_cache::Result<u64> {
        Err(refused())
    }

    async fn keys_matching(&self, _pattern: &str) -> catalog_cache::Result<Vec<String>> {
        Err(refused())
    }

    async fn exists(&self, _key: &str) -> catalog_cache::Result<bool> {
        Err(refused())
    }

    async fn ttl(&self, _key: &str) -> catalog_cache::Result<i64> {
        Err(refused())
    }
}

fn refused() -> CacheError {
    CacheError::Backend("ECONNREFUSED".into())
}

/// Call counter with a failure switch
#[derive(Debug, Default)]
pub struct Probe {
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl Probe {
    fn record(&self) -> RepositoryResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("connection reset".into()));
        }
        Ok(())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

// =============================================================================
// CARDS
// =============================================================================

#[derive(Debug, Default)]
pub struct FakeCardRepository {
    pub cards: Vec<Card>,
    pub stats: CardStats,
    pub total_count: i64,
    pub has_next_page: bool,
    pub probe: Probe,
}

#[async_trait]
impl CardRepository for FakeCardRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Card>> {
        self.probe.record()?;
        Ok(self.cards.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_name_and_character(
        &self,
        card_name: &str,
        character_name: &str,
    ) -> RepositoryResult<Option<Card>> {
        self.probe.record()?;
        Ok(self
            .cards
            .iter()
            .find(|c| c.card_name == card_name && c.character_name == character_name)
            .cloned())
    }

    async fn find_all(
        &self,
        filter: Option<&CardFilter>,
        _sort: Option<&CardSort>,
        _pagination: Option<&Pagination>,
    ) -> RepositoryResult<CardPage> {
        self.probe.record()?;
        let rarity = filter.and_then(|f| f.rarity.as_deref());
        let cards: Vec<Card> = self
            .cards
            .iter()
            .filter(|c| rarity.is_none_or(|r| c.rarity.as_deref() == Some(r)))
            .cloned()
            .collect();
        Ok(CardPage {
            total_count: self.total_count.max(cards.len() as i64),
            has_next_page: self.has_next_page,
            cards,
        })
    }

    async fn get_stats(&self) -> RepositoryResult<CardStats> {
        self.probe.record()?;
        Ok(self.stats.clone())
    }
}

#[derive(Debug, Default)]
pub struct FakeCardDetailRepository {
    pub details: Vec<CardDetail>,
    pub probe: Probe,
}

#[async_trait]
impl CardDetailRepository for FakeCardDetailRepository {
    async fn find_by_card_id(&self, card_id: i32) -> RepositoryResult<Option<CardDetail>> {
        self.probe.record()?;
        Ok(self.details.iter().find(|d| d.card_id == card_id).cloned())
    }
}

// =============================================================================
// SONGS
// =============================================================================

#[derive(Debug, Default)]
pub struct FakeSongRepository {
    pub songs: Vec<Song>,
    pub stats: SongStats,
    pub probe: Probe,
}

#[async_trait]
impl SongRepository for FakeSongRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<Song>> {
        self.probe.record()?;
        Ok(self.songs.iter().find(|s| s.id == id).cloned())
    }

    async fn find_by_song_name(&self, song_name: &str) -> RepositoryResult<Option<Song>> {
        self.probe.record()?;
        Ok(self.songs.iter().find(|s| s.song_name == song_name).cloned())
    }

    async fn find_all(&self, filter: Option<&SongFilter>) -> RepositoryResult<Vec<Song>> {
        self.probe.record()?;
        let category = filter.and_then(|f| f.category.as_deref());
        Ok(self
            .songs
            .iter()
            .filter(|s| category.is_none_or(|c| s.category == c))
            .cloned()
            .collect())
    }

    async fn get_stats(&self) -> RepositoryResult<SongStats> {
        self.probe.record()?;
        Ok(self.stats.clone())
    }
}

// =============================================================================
// EVENTS
// =============================================================================

#[derive(Debug, Default)]
pub struct FakeLiveGrandPrixRepository {
    pub events: Vec<LiveGrandPrix>,
    pub stats: LiveGrandPrixStats,
    pub probe: Probe,
}

#[async_trait]
impl LiveGrandPrixRepository for FakeLiveGrandPrixRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<LiveGrandPrix>> {
        self.probe.record()?;
        Ok(self.events.iter().find(|e| e.id == id).cloned())
    }

    async fn find_by_event_name(&self, event_name: &str) -> RepositoryResult<Option<LiveGrandPrix>> {
        self.probe.record()?;
        Ok(self.events.iter().find(|e| e.event_name == event_name).cloned())
    }

    async fn find_all(
        &self,
        _filter: Option<&LiveGrandPrixFilter>,
    ) -> RepositoryResult<Vec<LiveGrandPrix>> {
        self.probe.record()?;
        Ok(self.events.clone())
    }

    async fn find_ongoing(&self) -> RepositoryResult<Vec<LiveGrandPrix>> {
        self.probe.record()?;
        let now = Utc::now();
        Ok(self
            .events
            .iter()
            .filter(|e| e.is_ongoing_at(now))
            .cloned()
            .collect())
    }

    async fn get_stats(&self) -> RepositoryResult<LiveGrandPrixStats> {
        self.probe.record()?;
        Ok(self.stats.clone())
    }
}

#[derive(Debug, Default)]
pub struct FakeGradeChallengeRepository {
    pub challenges: Vec<GradeChallenge>,
    pub stats: GradeChallengeStats,
    pub probe: Probe,
}

#[async_trait]
impl GradeChallengeRepository for FakeGradeChallengeRepository {
    async fn find_by_id(&self, id: i32) -> RepositoryResult<Option<GradeChallenge>> {
        self.probe.record()?;
        Ok(self.challenges.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> RepositoryResult<Option<GradeChallenge>> {
        self.probe.record()?;
        Ok(self.challenges.iter().find(|c| c.title == title).cloned())
    }

    async fn find_all(
        &self,
        _filter: Option<&GradeChallengeFilter>,
    ) -> RepositoryResult<Vec<GradeChallenge>> {
        self.probe.record()?;
        Ok(self.challenges.clone())
    }

    async fn find_ongoing(&self) -> RepositoryResult<Vec<GradeChallenge>> {
        self.probe.record()?;
        let now = Utc::now();
        Ok(self
            .challenges
            .iter()
            .filter(|c| c.is_ongoing_at(now))
            .cloned()
            .collect())
    }

    async fn get_stats(&self) -> RepositoryResult<GradeChallengeStats> {
        self.probe.record()?;
        Ok(self.stats.clone())
    }
}
