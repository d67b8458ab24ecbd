//! Resource accessors for the catalog backend.
//!
//! Each accessor method issues exactly one [`Transport`] call and runs the body
//! through the strict envelope decoder, so every method returns either validated
//! data or an [`ApiError`]. Nothing here retries, caches results silently, or
//! substitutes defaults, with one exception: [`CategoriesApi`] keeps a
//! session-wide category cache that only [`CategoriesApi::refetch`] invalidates.
//!
//! | Accessor | Endpoints |
//! |---|---|
//! | [`ProductsApi`] | `/getAllProduct`, `/getProductById/{id}`, `/getAllProductByCategory`, `/getAllProductsByName` |
//! | [`ReviewsApi`] | `/getAllReview`, `/getAllReviewByProduct`, `/getAllReviewByCategory` |
//! | [`CategoriesApi`] | `/getAllCategory` |
//! | [`SentimentApi`] | `/getSentimentByProduct` |
//! | [`HealthApi`] | `/` |

pub mod categories;
pub mod envelope;
pub mod health;
pub mod products;
pub mod reviews;
pub mod sentiment;

pub use categories::CategoriesApi;
pub use health::{run_diagnostics, DiagnosticSample, EndpointReport, HealthApi};
pub use products::ProductsApi;
pub use reviews::ReviewsApi;
pub use sentiment::SentimentApi;

use crate::domain::error::ApiError;
use crate::domain::Validate;
use crate::transport::{ApiRequest, Transport};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// One transport call followed by envelope decoding.
///
/// An `error: true` envelope wins over the HTTP status. Any other non-2xx
/// response fails with its status class.
pub(crate) async fn fetch<T>(
    transport: &dyn Transport,
    operation: &str,
    request: ApiRequest,
) -> Result<T, ApiError>
where
    T: DeserializeOwned + Validate,
{
    let response = transport.send(&request).await?;
    if let Some(error) = response.status_error(&request.target()) {
        if let Some(rejected) = envelope::rejection(operation, &response) {
            tracing::debug!(
                operation = operation,
                request_id = %response.request_id,
                status = response.status,
                error = %rejected,
                "backend rejected request"
            );
            return Err(rejected.into());
        }
        return Err(error.into());
    }
    let value = envelope::decode(operation, &response).inspect_err(|e| {
        tracing::debug!(
            operation = operation,
            request_id = %response.request_id,
            error = %e,
            "envelope rejected"
        );
    })?;
    Ok(value)
}

/// All accessors over one shared transport.
///
/// Cloning is cheap and clones share the category cache.
#[derive(Clone)]
pub struct Backend {
    pub products: ProductsApi,
    pub reviews: ReviewsApi,
    pub categories: CategoriesApi,
    pub sentiment: SentimentApi,
    pub health: HealthApi,
}

impl Backend {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            products: ProductsApi::new(Arc::clone(&transport)),
            reviews: ReviewsApi::new(Arc::clone(&transport)),
            categories: CategoriesApi::new(Arc::clone(&transport)),
            sentiment: SentimentApi::new(Arc::clone(&transport)),
            health: HealthApi::new(transport),
        }
    }
}
