//! Grade challenge cache strategy.

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::TtlTier;
use crate::filter_hash::ONGOING;
use crate::service::SharedCacheService;
use catalog_domain::GradeChallenge;

const NAMESPACE: &str = "gradeChallenge";

fn id_key(id: i32) -> String {
    format!("{NAMESPACE}:{id}")
}

fn title_key(title: &str) -> String {
    format!("{NAMESPACE}:title:{title}")
}

fn list_key(filter_hash: &str) -> String {
    format!("{NAMESPACE}:list:{filter_hash}")
}

fn stats_key() -> String {
    format!("{NAMESPACE}:stats")
}

#[derive(Clone)]
pub struct GradeChallengeCacheStrategy {
    cache: SharedCacheService,
}

impl GradeChallengeCacheStrategy {
    pub fn new(cache: SharedCacheService) -> Self {
        Self { cache }
    }

    pub async fn get_grade_challenge(&self, id: i32) -> Option<GradeChallenge> {
        self.cache.get(&id_key(id)).await
    }

    pub async fn set_grade_challenge(&self, challenge: &GradeChallenge) {
        self.cache
            .set(&id_key(challenge.id), challenge, TtlTier::Long.ttl())
            .await;
    }

    pub async fn get_by_title(&self, title: &str) -> Option<GradeChallenge> {
        self.cache.get(&title_key(title)).await
    }

    pub async fn set_by_title(&self, challenge: &GradeChallenge) {
        self.cache
            .set(&title_key(&challenge.title), challenge, TtlTier::Long.ttl())
            .await;
    }

    pub async fn get_list(&self, filter_hash: &str) -> Option<Vec<GradeChallenge>> {
        self.cache.get(&list_key(filter_hash)).await
    }

    pub async fn set_list(&self, filter_hash: &str, challenges: &[GradeChallenge]) {
        self.cache
            .set(&list_key(filter_hash), challenges, TtlTier::Medium.ttl())
            .await;
    }

    /// Currently running challenges, stored under the reserved list hash
    pub async fn get_ongoing(&self) -> Option<Vec<GradeChallenge>> {
        self.get_list(ONGOING).await
    }

    pub async fn set_ongoing(&self, challenges: &[GradeChallenge]) {
        self.set_list(ONGOING, challenges).await;
    }

    pub async fn get_stats<T: DeserializeOwned>(&self) -> Option<T> {
        self.cache.get(&stats_key()).await
    }

    pub async fn set_stats<T: Serialize + Sync>(&self, stats: &T) {
        self.cache.set(&stats_key(), stats, TtlTier::Short.ttl()).await;
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CacheBackend, MemoryBackend};
    use crate::service::CacheService;
    use catalog_domain::GradeChallengeStats;
    use std::sync::Arc;

    fn strategy() -> (Arc<MemoryBackend>, GradeChallengeCacheStrategy) {
        let backend = Arc::new(MemoryBackend::new());
        let service = Arc::new(CacheService::new(backend.clone()));
        (backend, GradeChallengeCacheStrategy::new(service))
    }

    #[tokio::test(start_paused = true)]
    async fn test_title_lookup() {
        let (backend, strategy) = strategy();
        let challenge = GradeChallenge::new(4, "Grade Challenge 104-2");

        assert_eq!(strategy.get_by_title("Grade Challenge 104-2").await, None);
        strategy.set_by_title(&challenge).await;

        assert_eq!(
            backend.ttl("gradeChallenge:title:Grade Challenge 104-2").await.unwrap(),
            86_400
        );
        assert_eq!(strategy.get_by_title("Grade Challenge 104-2").await, Some(challenge));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_use_short_tier() {
        let (backend, strategy) = strategy();
        let stats = GradeChallengeStats {
            total_events: 8,
            ..Default::default()
        };

        strategy.set_stats(&stats).await;

        assert_eq!(backend.ttl("gradeChallenge:stats").await.unwrap(), 1_800);
        assert_eq!(strategy.get_stats::<GradeChallengeStats>().await, Some(stats));
    }

    #[tokio::test]
    async fn test_invalidate_keeps_title_and_stats() {
        let (backend, strategy) = strategy();
        let challenge = GradeChallenge::new(4, "GC");
        strategy.set_grade_challenge(&challenge).await;
        strategy.set_by_title(&challenge).await;
        strategy.set_ongoing(&[challenge]).await;
        strategy.set_stats(&GradeChallengeStats::default()).await;

        strategy.invalidate(4).await;

        assert_eq!(
            backend.keys_matching("*").await.unwrap(),
            vec!["gradeChallenge:stats", "gradeChallenge:title:GC"]
        );
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let (backend, strategy) = strategy();
        strategy.set_grade_challenge(&GradeChallenge::new(1, "a")).await;
        strategy.set_list("h", &[]).await;

        strategy.invalidate_all().await;

        assert!(backend.is_empty());
    }
}
