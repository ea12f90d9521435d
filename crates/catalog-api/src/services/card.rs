//! Card read service.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use std::sync::Arc;

use catalog_cache::{CardCacheStrategy, CardRepository, ReadPath, filter_hash};
use catalog_domain::{Card, CardFilter, CardPage, CardSort, CardStats, Pagination};

use super::{not_found, read_always};
use crate::error::ServiceResult;

/// Stats are aggregated on every call.
const STATS_PATH: ReadPath = ReadPath::Bypass;

/// Relay-style page of cards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardConnection {
    pub edges: Vec<CardEdge>,
    pub page_info: PageInfo,
    pub total_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardEdge {
    pub node: Card,
    pub cursor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    pub has_previous_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

impl CardConnection {
    /// Build a connection. Without page metadata (a cache hit) the page is
    /// treated as the last one and the total is the number of cards.
    fn build(cards: Vec<Card>, page: Option<(i64, bool)>) -> Self {
        let edges: Vec<CardEdge> = cards
            .into_iter()
            .map(|card| CardEdge {
                cursor: encode_cursor(card.id),
                node: card,
            })
            .collect();
        let (total_count, has_next_page) = page.unwrap_or((edges.len() as i64, false));

        Self {
            page_info: PageInfo {
                has_next_page,
                has_previous_page: false,
                start_cursor: edges.first().map(|e| e.cursor.clone()),
                end_cursor: edges.last().map(|e| e.cursor.clone()),
            },
            edges,
            total_count,
        }
    }
}

/// Opaque cursor for a card id
pub fn encode_cursor(id: i32) -> String {
    STANDARD.encode(id.to_string())
}

#[derive(Clone)]
pub struct CardService {
    repository: Arc<dyn CardRepository>,
    cache: CardCacheStrategy,
}

impl CardService {
    pub fn new(repository: Arc<dyn CardRepository>, cache: CardCacheStrategy) -> Self {
        Self { repository, cache }
    }

    /// # Errors
    ///
    /// `NotFound` when no card has this id.
    pub async fn find_by_id(&self, id: i32) -> ServiceResult<Card> {
        ReadPath::CacheFirst
            .read(
                || self.cache.get_card(id),
                || self.repository.find_by_id(id),
                |card| async move { self.cache.set_card(&card).await },
            )
            .await?
            .ok_or_else(|| not_found("Card", id))
    }

    /// Absent cards are not cached.
    pub async fn find_by_name(
        &self,
        card_name: &str,
        character_name: &str,
    ) -> ServiceResult<Option<Card>> {
        let card = ReadPath::CacheFirst
            .read(
                || self.cache.get_card_by_name(card_name, character_name),
                || {
                    self.repository
                        .find_by_name_and_character(card_name, character_name)
                },
                |card| async move { self.cache.set_card_by_name(&card).await },
            )
            .await?;
        Ok(card)
    }

    /// Lists are cached per `{filter, sort, pagination}` hash.
    pub async fn find_all(
        &self,
        filter: Option<&CardFilter>,
        sort: Option<&CardSort>,
        pagination: Option<&Pagination>,
    ) -> ServiceResult<CardConnection> {
        let hash = filter_hash(filter, sort, pagination);

        if let Some(cards) = self.cache.get_card_list(&hash).await {
            return Ok(CardConnection::build(cards, None));
        }

        let CardPage {
            cards,
            total_count,
            has_next_page,
        } = self.repository.find_all(filter, sort, pagination).await?;
        self.cache.set_card_list(&hash, &cards).await;

        Ok(CardConnection::build(cards, Some((total_count, has_next_page))))
    }

    pub async fn get_stats(&self) -> ServiceResult<CardStats> {
        read_always(
            STATS_PATH,
            || self.cache.get_stats::<CardStats>(),
            || self.repository.get_stats(),
            |stats| async move { self.cache.set_stats(&stats).await },
        )
        .await
    }
}
