//! Card detail cache strategy. Details are keyed by their parent card id.

use super::TtlTier;
use crate::service::SharedCacheService;
use catalog_domain::CardDetail;

fn detail_key(card_id: i32) -> String {
    format!("cardDetail:{card_id}")
}

#[derive(Clone)]
pub struct CardDetailCacheStrategy {
    cache: SharedCacheService,
}

impl CardDetailCacheStrategy {
    pub fn new(cache: SharedCacheService) -> Self {
        Self { cache }
    }

    pub async fn get_detail(&self, card_id: i32) -> Option<CardDetail> {
        self.cache.get(&detail_key(card_id)).await
    }

    pub async fn set_detail(&self, detail: &CardDetail) {
        self.cache
            .set(&detail_key(detail.card_id), detail, TtlTier::Detail.ttl())
            .await;
    }

    pub async fn invalidate_detail(&self, card_id: i32) {
        self.cache.delete(&detail_key(card_id)).await;
    }

    pub async fn invalidate_all_details(&self) {
        self.cache.invalidate_pattern("cardDetail:*").await;
    }
}
