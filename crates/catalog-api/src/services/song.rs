//! Song read service.

use std::sync::Arc;

use catalog_cache::{ReadPath, SongCacheStrategy, SongRepository, filter_only_hash};
use catalog_domain::{Song, SongFilter, SongStats};

use super::{not_found, read_always};
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct SongService {
    repository: Arc<dyn SongRepository>,
    cache: SongCacheStrategy,
}

impl SongService {
    pub fn new(repository: Arc<dyn SongRepository>, cache: SongCacheStrategy) -> Self {
        Self { repository, cache }
    }

    /// # Errors
    ///
    /// `NotFound` when no song has this id.
    pub async fn find_by_id(&self, id: i32) -> ServiceResult<Song> {
        ReadPath::CacheFirst
            .read(
                || self.cache.get_song(id),
                || self.repository.find_by_id(id),
                |song| async move { self.cache.set_song(&song).await },
            )
            .await?
            .ok_or_else(|| not_found("Song", id))
    }

    pub async fn find_by_name(&self, song_name: &str) -> ServiceResult<Option<Song>> {
        let song = ReadPath::CacheFirst
            .read(
                || self.cache.get_song_by_name(song_name),
                || self.repository.find_by_song_name(song_name),
                |song| async move { self.cache.set_song_by_name(&song).await },
            )
            .await?;
        Ok(song)
    }

    /// Lists are cached per filter hash, empty results included.
    pub async fn find_all(&self, filter: Option<&SongFilter>) -> ServiceResult<Vec<Song>> {
        let hash = filter_only_hash(filter);
        let hash = hash.as_str();
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_song_list(hash),
            || self.repository.find_all(filter),
            |songs| async move { self.cache.set_song_list(hash, &songs).await },
        )
        .await
    }

    pub async fn get_stats(&self) -> ServiceResult<SongStats> {
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_stats::<SongStats>(),
            || self.repository.get_stats(),
            |stats| async move { self.cache.set_stats(&stats).await },
        )
        .await
    }
}
