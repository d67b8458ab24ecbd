//! Category accessor with a session-wide cache.
//!
//! Categories are reference data: fetched once, then served from memory until an
//! explicit [`CategoriesApi::refetch`]. The cache lives behind an `Arc`, so every
//! clone of the accessor (and of the owning [`crate::api::Backend`]) shares it.
//! Its lock is held across the fetch, so concurrent misses trigger one request.

use crate::api::fetch;
use crate::domain::error::ApiError;
use crate::domain::Category;
use crate::transport::{ApiRequest, Transport};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct CategoriesApi {
    transport: Arc<dyn Transport>,
    cache: Arc<Mutex<Option<Arc<[Category]>>>>,
}

impl CategoriesApi {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Uncached `/getAllCategory` call.
    ///
    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn list_all(&self) -> Result<Vec<Category>, ApiError> {
        fetch(
            self.transport.as_ref(),
            "list categories",
            ApiRequest::get("/getAllCategory"),
        )
        .await
    }

    /// Cached categories, fetching them on first use.
    ///
    /// # Errors
    ///
    /// Fails only when the cache is empty and the fetch fails. A failed fetch
    /// leaves the cache empty.
    pub async fn cached(&self) -> Result<Arc<[Category]>, ApiError> {
        let mut cache = self.cache.lock().await;
        if let Some(categories) = cache.as_ref() {
            tracing::debug!(count = categories.len(), "categories served from cache");
            return Ok(Arc::clone(categories));
        }
        self.fill(&mut cache).await
    }

    /// Replaces the cache with a fresh fetch.
    ///
    /// # Errors
    ///
    /// On failure the previous cache content is kept.
    pub async fn refetch(&self) -> Result<Arc<[Category]>, ApiError> {
        let mut cache = self.cache.lock().await;
        self.fill(&mut cache).await
    }

    async fn fill(&self, cache: &mut Option<Arc<[Category]>>) -> Result<Arc<[Category]>, ApiError> {
        let fresh: Arc<[Category]> = self.list_all().await?.into();
        *cache = Some(Arc::clone(&fresh));
        tracing::debug!(count = fresh.len(), "category cache refreshed");
        Ok(fresh)
    }
}
