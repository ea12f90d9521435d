//! Grade challenge read service.

use std::sync::Arc;

use catalog_cache::{GradeChallengeCacheStrategy, GradeChallengeRepository, ReadPath, filter_only_hash};
use catalog_domain::{GradeChallenge, GradeChallengeFilter, GradeChallengeStats};

use super::{not_found, read_always};
use crate::error::ServiceResult;

#[derive(Clone)]
pub struct GradeChallengeService {
    repository: Arc<dyn GradeChallengeRepository>,
    cache: GradeChallengeCacheStrategy,
}

impl GradeChallengeService {
    pub fn new(
        repository: Arc<dyn GradeChallengeRepository>,
        cache: GradeChallengeCacheStrategy,
    ) -> Self {
        Self { repository, cache }
    }

    /// # Errors
    ///
    /// `NotFound` when no challenge has this id.
    pub async fn find_by_id(&self, id: i32) -> ServiceResult<GradeChallenge> {
        ReadPath::CacheFirst
            .read(
                || self.cache.get_grade_challenge(id),
                || self.repository.find_by_id(id),
                |challenge| async move { self.cache.set_grade_challenge(&challenge).await },
            )
            .await?
            .ok_or_else(|| not_found("GradeChallenge", id))
    }

    pub async fn find_by_title(&self, title: &str) -> ServiceResult<Option<GradeChallenge>> {
        let challenge = ReadPath::CacheFirst
            .read(
                || self.cache.get_by_title(title),
                || self.repository.find_by_title(title),
                |challenge| async move { self.cache.set_by_title(&challenge).await },
            )
            .await?;
        Ok(challenge)
    }

    pub async fn find_all(
        &self,
        filter: Option<&GradeChallengeFilter>,
    ) -> ServiceResult<Vec<GradeChallenge>> {
        let hash = filter_only_hash(filter);
        let hash = hash.as_str();
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_list(hash),
            || self.repository.find_all(filter),
            |challenges| async move { self.cache.set_list(hash, &challenges).await },
        )
        .await
    }

    pub async fn find_ongoing(&self) -> ServiceResult<Vec<GradeChallenge>> {
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_ongoing(),
            || self.repository.find_ongoing(),
            |challenges| async move { self.cache.set_ongoing(&challenges).await },
        )
        .await
    }

    pub async fn get_stats(&self) -> ServiceResult<GradeChallengeStats> {
        read_always(
            ReadPath::CacheFirst,
            || self.cache.get_stats::<GradeChallengeStats>(),
            || self.repository.get_stats(),
            |stats| async move { self.cache.set_stats(&stats).await },
        )
        .await
    }
}
