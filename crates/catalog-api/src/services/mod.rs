//! # Entity Services
//!
//! Cache-aside read paths per entity: ask the strategy, fall back to the
//! repository on a miss, write the loaded value back. Cache problems never
//! surface; only not-found and repository failures do.

pub mod card;
pub mod card_detail;
pub mod grade_challenge;
pub mod live_grand_prix;
pub mod song;

#[cfg(test)]
pub(crate) mod fakes;

use std::fmt::Display;
use std::future::Future;

use catalog_cache::{ReadPath, RepositoryResult};
use catalog_domain::DomainError;

use crate::error::{ServiceError, ServiceResult};

pub use card::{CardConnection, CardEdge, CardService, PageInfo};
pub use card_detail::CardDetailService;
pub use grade_challenge::GradeChallengeService;
pub use live_grand_prix::LiveGrandPrixService;
pub use song::SongService;

/// Read a value the repository always produces (lists, stats)
async fn read_always<T, CacheFut, LoadFut, PopulateFut>(
    path: ReadPath,
    cache_fn: impl FnOnce() -> CacheFut,
    load_fn: impl FnOnce() -> LoadFut,
    populate_fn: impl FnOnce(T) -> PopulateFut,
) -> ServiceResult<T>
where
    T: Clone + Default,
    CacheFut: Future<Output = Option<T>>,
    LoadFut: Future<Output = RepositoryResult<T>>,
    PopulateFut: Future<Output = ()>,
{
    let value = path
        .read(cache_fn, || async move { load_fn().await.map(Some) }, populate_fn)
        .await?;
    Ok(value.unwrap_or_default())
}

fn not_found(entity_type: &'static str, key: impl Display) -> ServiceError {
    ServiceError::NotFound(DomainError::NotFound {
        entity_type,
        key: key.to_string(),
    })
}
