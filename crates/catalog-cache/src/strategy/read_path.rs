//! Cache-aside read path using enum dispatch.

use std::future::Future;

/// How a service read consults the cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReadPath {
    /// Check cache first, load on miss and write the loaded value back
    #[default]
    CacheFirst,
    /// Always load, never touch the cache
    Bypass,
}

impl ReadPath {
    /// Execute a read.
    ///
    /// - `cache_fn`: fail-open cache read
    /// - `load_fn`: source-of-truth read, only called on a miss
    /// - `populate_fn`: writes a freshly loaded value back to the cache
    pub async fn read<T, E, CacheFut, LoadFut, PopulateFut>(
        &self,
        cache_fn: impl FnOnce() -> CacheFut,
        load_fn: impl FnOnce() -> LoadFut,
        populate_fn: impl FnOnce(T) -> PopulateFut,
    ) -> Result<Option<T>, E>
    where
        T: Clone,
        CacheFut: Future<Output = Option<T>>,
        LoadFut: Future<Output = Result<Option<T>, E>>,
        PopulateFut: Future<Output = ()>,
    {
        match self {
            Self::CacheFirst => {
                if let Some(value) = cache_fn().await {
                    return Ok(Some(value));
                }

                let loaded = load_fn().await?;
                if let Some(value) = &loaded {
                    populate_fn(value.clone()).await;
                }
                Ok(loaded)
            }

            Self::Bypass => load_fn().await,
        }
    }
}
