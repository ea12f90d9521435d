//! Card cache strategy.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::TtlTier;
use crate::service::SharedCacheService;
use catalog_domain::Card;

const LIST_PATTERN: &str = "cards:list:*";
const STATS_KEY: &str = "cards:stats";

fn card_key(id: i32) -> String {
    format!("card:{id}")
}

fn name_key(card_name: &str, character_name: &str) -> String {
    format!("card:name:{card_name}:{character_name}")
}

fn list_key(filter_hash: &str) -> String {
    format!("cards:list:{filter_hash}")
}

/// Cache facade for cards
#[derive(Clone)]
pub struct CardCacheStrategy {
    cache: SharedCacheService,
}

impl CardCacheStrategy {
    pub fn new(cache: SharedCacheService) -> Self {
        Self { cache }
    }

    // =========================================================================
    // BY ID
    // =========================================================================

    pub async fn get_card(&self, id: i32) -> Option<Card> {
        self.cache.get(&card_key(id)).await
    }

    pub async fn set_card(&self, card: &Card) {
        self.cache
            .set(&card_key(card.id), card, TtlTier::Long.ttl())
            .await;
    }

    // =========================================================================
    // BY NAME + CHARACTER
    // =========================================================================

    pub async fn get_card_by_name(&self, card_name: &str, character_name: &str) -> Option<Card> {
        self.cache
            .get(&name_key(card_name, character_name))
            .await
    }

    pub async fn set_card_by_name(&self, card: &Card) {
        let key = name_key(&card.card_name, &card.character_name);
        self.cache.set(&key, card, TtlTier::Long.ttl()).await;
    }

    // =========================================================================
    // LISTS
    // =========================================================================

    pub async fn get_card_list(&self, filter_hash: &str) -> Option<Vec<Card>> {
        self.cache.get(&list_key(filter_hash)).await
    }

    pub async fn set_card_list(&self, filter_hash: &str, cards: &[Card]) {
        self.cache
            .set(&list_key(filter_hash), cards, TtlTier::Medium.ttl())
            .await;
    }

    // =========================================================================
    // STATS
    // =========================================================================

    pub async fn get_stats<T: DeserializeOwned>(&self) -> Option<T> {
        self.cache.get(STATS_KEY).await
    }

    pub async fn set_stats<T: Serialize + Sync>(&self, stats: &T) {
        self.cache.set(STATS_KEY, stats, TtlTier::Short.ttl()).await;
    }

    // =========================================================================
    // INVALIDATION
    // =========================================================================

    /// Drop one card and every cached card list
    pub async fn invalidate_card(&self, id: i32) {
        self.cache.delete(&card_key(id)).await;
        self.cache.invalidate_pattern(LIST_PATTERN).await;
    }

    /// Drop everything under the card namespaces
    pub async fn invalidate_all_cards(&self) {
        self.cache.invalidate_pattern("card:*").await;
        self.cache.invalidate_pattern("cards:*").await;
    }
}
