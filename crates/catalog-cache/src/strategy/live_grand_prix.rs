//! Live grand prix cache strategy.
//!
//! The ongoing-events query has no parameters, so it is stored as a list
//! under the reserved [`ONGOING`] hash and is dropped together with the other
//! lists on invalidation.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::TtlTier;
use crate::filter_hash::ONGOING;
use crate::service::SharedCacheService;
use catalog_domain::LiveGrandPrix;

const NAMESPACE: &str = "liveGrandPrix";

fn id_key(id: i32) -> String {
    format!("{NAMESPACE}:{id}")
}

fn event_name_key(event_name: &str) -> String {
    format!("{NAMESPACE}:eventName:{event_name}")
}

fn list_key(filter_hash: &str) -> String {
    format!("{NAMESPACE}:list:{filter_hash}")
}

fn stats_key() -> String {
    format!("{NAMESPACE}:stats")
}

#[derive(Clone)]
pub struct LiveGrandPrixCacheStrategy {
    cache: SharedCacheService,
}

impl LiveGrandPrixCacheStrategy {
    pub fn new(cache: SharedCacheService) -> Self {
        Self { cache }
    }

    pub async fn get_live_grand_prix(&self, id: i32) -> Option<LiveGrandPrix> {
        self.cache.get(&id_key(id)).await
    }

    pub async fn set_live_grand_prix(&self, event: &LiveGrandPrix) {
        self.cache
            .set(&id_key(event.id), event, TtlTier::Long.ttl())
            .await;
    }

    pub async fn get_by_event_name(&self, event_name: &str) -> Option<LiveGrandPrix> {
        self.cache.get(&event_name_key(event_name)).await
    }

    pub async fn set_by_event_name(&self, event: &LiveGrandPrix) {
        self.cache
            .set(&event_name_key(&event.event_name), event, TtlTier::Long.ttl())
            .await;
    }

    pub async fn get_list(&self, filter_hash: &str) -> Option<Vec<LiveGrandPrix>> {
        self.cache.get(&list_key(filter_hash)).await
    }

    pub async fn set_list(&self, filter_hash: &str, events: &[LiveGrandPrix]) {
        self.cache
            .set(&list_key(filter_hash), events, TtlTier::Medium.ttl())
            .await;
    }

    pub async fn get_ongoing(&self) -> Option<Vec<LiveGrandPrix>> {
        self.get_list(ONGOING).await
    }

    pub async fn set_ongoing(&self, events: &[LiveGrandPrix]) {
        self.set_list(ONGOING, events).await;
    }

    pub async fn get_stats<T: DeserializeOwned>(&self) -> Option<T> {
        self.cache.get(&stats_key()).await
    }

    pub async fn set_stats<T: Serialize + Sync>(&self, stats: &T) {
        self.cache.set(&stats_key(), stats, TtlTier::Short.ttl()).await;
    }

    /// Drop one event and every cached event list
    pub async fn invalidate(&self, id: i32) {
        self.cache.delete(&id_key(id)).await;
        self.cache
            .invalidate_pattern(&format!("{NAMESPACE}:list:*"))
            .await;
    }

    pub async fn invalidate_all(&self) {
        self.cache
            .invalidate_pattern(&format!("{NAMESPACE}:*"))
            .await;
    }
}
