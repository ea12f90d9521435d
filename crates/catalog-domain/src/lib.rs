//! # Catalog Domain Model
//!
//! Core entities, query inputs and aggregate types for the card / song /
//! live event catalog. These types are shared by the cache layer and the
//! API layer, and their JSON shape is what ends up in the cache.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ENTITIES
// =============================================================================

/// Card entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: i32,
    pub rarity: Option<String>,
    pub limited: Option<String>,
    pub card_name: String,
    pub card_url: Option<String>,
    pub character_name: String,
    pub style_type: Option<String>,
    pub release_date: Option<DateTime<Utc>>,
    pub is_locked: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Minimal card with only the identifying fields set
    #[must_use]
    pub fn new(id: i32, card_name: impl Into<String>, character_name: impl Into<String>) -> Self {
        Self {
            id,
            rarity: None,
            limited: None,
            card_name: card_name.into(),
            card_url: None,
            character_name: character_name.into(),
            style_type: None,
            release_date: None,
            is_locked: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: impl Into<String>) -> Self {
        self.rarity = Some(rarity.into());
        self
    }
}

/// Card detail entity - skills, appeals and artwork for one card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDetail {
    pub id: i32,
    pub card_id: i32,
    pub favorite_mode: Option<String>,
    pub acquisition_method: Option<String>,
    pub awake_before_url: Option<String>,
    pub awake_after_url: Option<String>,
    pub awake_before_storage_url: Option<String>,
    pub awake_after_storage_url: Option<String>,

    // Stats at max level
    pub smile_max_level: Option<String>,
    pub pure_max_level: Option<String>,
    pub cool_max_level: Option<String>,
    pub mental_max_level: Option<String>,

    // Special appeal
    pub special_appeal_name: Option<String>,
    pub special_appeal_ap: Option<String>,
    pub special_appeal_effect: Option<String>,

    // Skill
    pub skill_name: Option<String>,
    pub skill_ap: Option<String>,
    pub skill_effect: Option<String>,

    // Trait
    pub trait_name: Option<String>,
    pub trait_effect: Option<String>,

    pub is_locked: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CardDetail {
    #[must_use]
    pub fn new(id: i32, card_id: i32) -> Self {
        Self {
            id,
            card_id,
            favorite_mode: None,
            acquisition_method: None,
            awake_before_url: None,
            awake_after_url: None,
            awake_before_storage_url: None,
            awake_after_storage_url: None,
            smile_max_level: None,
            pure_max_level: None,
            cool_max_level: None,
            mental_max_level: None,
            special_appeal_name: None,
            special_appeal_ap: None,
            special_appeal_effect: None,
            skill_name: None,
            skill_ap: None,
            skill_effect: None,
            trait_name: None,
            trait_effect: None,
            is_locked: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Song entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: i32,
    pub song_name: String,
    pub song_url: Option<String>,
    pub category: String,
    pub attribute: String,
    pub center_character: String,
    pub singers: String,
    pub participations: Option<String>,
    pub live_analyzer_image_url: Option<String>,
    pub jacket_image_url: Option<String>,
    pub is_locked: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Song {
    #[must_use]
    pub fn new(id: i32, song_name: impl Into<String>) -> Self {
        Self {
            id,
            song_name: song_name.into(),
            song_url: None,
            category: String::new(),
            attribute: String::new(),
            center_character: String::new(),
            singers: String::new(),
            participations: None,
            live_analyzer_image_url: None,
            jacket_image_url: None,
            is_locked: None,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Live grand prix event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGrandPrix {
    pub id: i32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub event_name: String,
    pub event_url: Option<String>,
    pub year_term: String,
    pub is_locked: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl LiveGrandPrix {
    pub fn new(
        id: i32,
        event_name: impl Into<String>,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            start_date,
            end_date,
            event_name: event_name.into(),
            event_url: None,
            year_term: String::new(),
            is_locked: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the event window contains `at`
    #[must_use]
    pub fn is_ongoing_at(&self, at: DateTime<Utc>) -> bool {
        self.start_date <= at && at <= self.end_date
    }
}

/// Grade challenge event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeChallenge {
    pub id: i32,
    pub title: String,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub detail_url: Option<String>,
    pub term_name: Option<String>,
    pub is_locked: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl GradeChallenge {
    pub fn new(id: i32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            start_date: None,
            end_date: None,
            detail_url: None,
            term_name: None,
            is_locked: None,
            created_at: None,
            updated_at: None,
        }
    }

    /// Whether the challenge window contains `at`; open-ended bounds never match
    #[must_use]
    pub fn is_ongoing_at(&self, at: DateTime<Utc>) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= at && at <= end,
            _ => false,
        }
    }
}

// =============================================================================
// QUERY/FILTER TYPES
// =============================================================================
//
// Field order and `skip_serializing_if` matter: these structs are serialized
// verbatim into the list-cache filter hash.

/// Card list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rarity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limited: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skill_effect_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trait_effect_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special_appeal_effect_contains: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accessory_effect_contains: Option<String>,
}

/// Card sort field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardSortField {
    Id,
    CardName,
    CharacterName,
    CreatedAt,
    UpdatedAt,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Card sort input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSort {
    pub field: CardSortField,
    pub direction: SortDirection,
}

/// Cursor pagination parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
}

/// Song list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_character: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub song_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub singers_contains: Option<String>,
}

/// Live grand prix list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGrandPrixFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_to: Option<DateTime<Utc>>,
}

/// Grade challenge list filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeChallengeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub term_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_from: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_to: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_song_with_deck_type: Option<String>,
}

// =============================================================================
// LIST RESULTS & STATS
// =============================================================================

/// One page of cards as returned by persistence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardPage {
    pub cards: Vec<Card>,
    pub total_count: i64,
    pub has_next_page: bool,
}

/// Count of entities sharing one label (rarity, category, term ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: i64,
}

impl LabelCount {
    #[must_use]
    pub fn new(label: impl Into<String>, count: i64) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardStats {
    pub total_cards: i64,
    pub by_rarity: Vec<LabelCount>,
    pub by_style_type: Vec<LabelCount>,
    pub by_character: Vec<LabelCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SongStats {
    pub total_songs: i64,
    pub by_category: Vec<LabelCount>,
    pub by_attribute: Vec<LabelCount>,
    pub by_center_character: Vec<LabelCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveGrandPrixStats {
    pub total_events: i64,
    pub by_year_term: Vec<LabelCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeChallengeStats {
    pub total_events: i64,
    pub by_term_name: Vec<LabelCount>,
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with key {key}")]
    NotFound { entity_type: &'static str, key: String },
}
