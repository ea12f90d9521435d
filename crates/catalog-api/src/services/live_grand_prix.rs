//! Live grand prix read service.

use std::sync::Arc;

use catalog_cache::{LiveGrandPrixCacheStrategy, LiveGrandPrixRepository, ReadPath, filter_only_hash};
use catalog_domain::{LiveGrandPrix, LiveGrandPrixFilter, LiveGrandPrixStats};

use super::{not_found, read_always};
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct LiveGrandPrixService {
    repository: Arc<dyn LiveGrandPrixRepository>,
    cache: LiveGrandPrixCacheStrategy,
}

impl LiveGrandPrixService {
    pub fn new(
        repository: Arc<dyn LiveGrandPrixRepository>,
        cache: LiveGrandPrixCacheStrategy,
    ) -> Self {
        Self { repository, cache }
    }

    /// # Errors
    ///
    /// `NotFound` when no event has this id.
    pub async fn find_by_id(&self, id: i32) -> ServiceResult<LiveGrandPrix> {
        ReadPath::CacheFirst
            .read(
                || self.cache.get_live_grand_prix(id),
                || self.repository.find_by_id(id),
                |event| async move { self.cache.set_live_grand_prix(&event).await },
            )
            .await?
            .ok_or_else(|| not_found("LiveGrandPrix", id))
    }

    pub async fn find_by_event_name(&self, event_name: &str) -> ServiceResult<Option<LiveGrandPrix>> {
        let event = ReadPath::CacheFirst
            .read(
                || self.cache.get_by_event_name(event_name),
                || self.repository.find_by_event_name(event_name),
                |event| async move { self.cache.set_by_event_name(&event).await },
            )
            .await?;
        Ok(event)
    }

    pub async fn find_all(
        &self,
        filter: Option<&LiveGrandPrixFilter>,
    ) -> ServiceResult<Vec<LiveGrandPrix>> {
        let hash = filter_only_hash(filter);
        let hash = hash.as_str();
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_list(hash),
            || self.repository.find_all(filter),
            |events| async move { self.cache.set_list(hash, &events).await },
        )
        .await
    }

    /// Events running now, cached for an hour under the `ongoing` list key
    pub async fn find_ongoing(&self) -> ServiceResult<Vec<LiveGrandPrix>> {
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_ongoing(),
            || self.repository.find_ongoing(),
            |events| async move { self.cache.set_ongoing(&events).await },
        )
        .await
    }

    pub async fn get_stats(&self) -> ServiceResult<LiveGrandPrixStats> {
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_stats::<LiveGrandPrixStats>(),
            || self.repository.get_stats(),
            |stats| async move { self.cache.set_stats(&stats).await },
        )
        .await
    }
}
