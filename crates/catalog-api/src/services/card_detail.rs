//! Card detail read service.

use std::sync::Arc;

use catalog_cache::{CardDetailCacheStrategy, CardDetailRepository, ReadPath};
use catalog_domain::CardDetail;

use super::not_found;
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct CardDetailService {
    repository: Arc<dyn CardDetailRepository>,
    cache: CardDetailCacheStrategy,
}

impl CardDetailService {
    pub fn new(repository: Arc<dyn CardDetailRepository>, cache: CardDetailCacheStrategy) -> Self {
        Self { repository, cache }
    }

    /// # Errors
    ///
    /// `NotFound` when the card has no detail record.
    pub async fn find_by_card_id(&self, card_id: i32) -> ServiceResult<CardDetail> {
        ReadPath::CacheFirst
            .read(
                || self.cache.get_detail(card_id),
                || self.repository.find_by_card_id(card_id),
                |detail| async move { self.cache.set_detail(&detail).await },
            )
            .await?
            .ok_or_else(|| not_found("CardDetail", card_id))
    }
}
