//! Song cache strategy.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::TtlTier;
use crate::service::SharedCacheService;
use catalog_domain::Song;

const LIST_PATTERN: &str = "songs:list:*";
const STATS_KEY: &str = "songs:stats";

fn song_key(id: i32) -> String {
    format!("song:{id}")
}

fn name_key(song_name: &str) -> String {
    format!("song:name:{song_name}")
}

fn list_key(filter_hash: &str) -> String {
    format!("songs:list:{filter_hash}")
}

/// Cache facade for songs
#[derive(Clone)]
pub struct SongCacheStrategy {
    cache: SharedCacheService,
}

impl SongCacheStrategy {
    pub fn new(cache: SharedCacheService) -> Self {
        Self { cache }
    }

    pub async fn get_song(&self, id: i32) -> Option<Song> {
        self.cache.get(&song_key(id)).await
    }

    pub async fn set_song(&self, song: &Song) {
        self.cache
            .set(&song_key(song.id), song, TtlTier::Long.ttl())
            .await;
    }

    pub async fn get_song_by_name(&self, song_name: &str) -> Option<Song> {
        self.cache.get(&name_key(song_name)).await
    }

    pub async fn set_song_by_name(&self, song: &Song) {
        self.cache
            .set(&name_key(&song.song_name), song, TtlTier::Long.ttl())
            .await;
    }

    pub async fn get_song_list(&self, filter_hash: &str) -> Option<Vec<Song>> {
        self.cache.get(&list_key(filter_hash)).await
    }

    pub async fn set_song_list(&self, filter_hash: &str, songs: &[Song]) {
        self.cache
            .set(&list_key(filter_hash), songs, TtlTier::Medium.ttl())
            .await;
    }

    pub async fn get_stats<T: DeserializeOwned>(&self) -> Option<T> {
        self.cache.get(STATS_KEY).await
    }

    pub async fn set_stats<T: Serialize + Sync>(&self, stats: &T) {
        self.cache.set(STATS_KEY, stats, TtlTier::Short.ttl()).await;
    }

    /// Drop one song and every cached song list
    pub async fn invalidate_song(&self, id: i32) {
        self.cache.delete(&song_key(id)).await;
        self.cache.invalidate_pattern(LIST_PATTERN).await;
    }

    pub async fn invalidate_all_songs(&self) {
        self.cache.invalidate_pattern("song:*").await;
        self.cache.invalidate_pattern("songs:*").await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CacheBackend, MemoryBackend};
    use crate::service::CacheService;
    use catalog_domain::SongStats;
    use std::sync::Arc;

    fn strategy() -> (Arc<MemoryBackend>, SongCacheStrategy) {
        let backend = Arc::new(MemoryBackend::new());
        let service = Arc::new(CacheService::new(backend.clone()));
        (backend, SongCacheStrategy::new(service))
    }

    #[tokio::test(start_paused = true)]
    async fn test_song_keys_and_ttls() {
        let (backend, strategy) = strategy();
        let song = Song::new(7, "Reflection in the mirror");

        strategy.set_song(&song).await;
        strategy.set_song_by_name(&song).await;
        strategy.set_song_list("abc", std::slice::from_ref(&song)).await;

        assert_eq!(backend.ttl("song:7").await.unwrap(), 86_400);
        assert_eq!(backend.ttl("song:name:Reflection in the mirror").await.unwrap(), 86_400);
        assert_eq!(backend.ttl("songs:list:abc").await.unwrap(), 3_600);
        assert_eq!(strategy.get_song(7).await, Some(song.clone()));
        assert_eq!(strategy.get_song_by_name("Reflection in the mirror").await, Some(song.clone()));
        assert_eq!(strategy.get_song_list("abc").await, Some(vec![song]));
    }

    #[tokio::test]
    async fn test_stats_round_trip() {
        let (_, strategy) = strategy();
        let stats = SongStats {
            total_songs: 64,
            ..Default::default()
        };

        assert_eq!(strategy.get_stats::<SongStats>().await, None);
        strategy.set_stats(&stats).await;
        assert_eq!(strategy.get_stats::<SongStats>().await, Some(stats));
    }

    #[tokio::test]
    async fn test_invalidate_song_keeps_name_entries() {
        let (backend, strategy) = strategy();
        let song = Song::new(7, "Holiday");
        strategy.set_song(&song).await;
        strategy.set_song_by_name(&song).await;
        strategy.set_song_list("abc", &[]).await;

        strategy.invalidate_song(7).await;

        assert_eq!(backend.keys_matching("*").await.unwrap(), vec!["song:name:Holiday"]);
    }

    #[tokio::test]
    async fn test_invalidate_all_songs() {
        let (backend, strategy) = strategy();
        strategy.set_song(&Song::new(1, "a")).await;
        strategy.set_stats(&SongStats::default()).await;
        backend.insert_raw("card:1", "{}");

        strategy.invalidate_all_songs().await;

        assert_eq!(backend.keys_matching("*").await.unwrap(), vec!["card:1"]);
    }
}
