use crate::api::fetch;
use crate::domain::error::ApiError;
use crate::domain::{CategoryId, ProductId, Review};
use crate::transport::{ApiRequest, Transport};
use std::sync::Arc;

#[derive(Clone)]
pub struct ReviewsApi {
    transport: Arc<dyn Transport>,
}

impl ReviewsApi {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn list_all(&self) -> Result<Vec<Review>, ApiError> {
        fetch(
            self.transport.as_ref(),
            "list reviews",
            ApiRequest::get("/getAllReview"),
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn by_product(&self, product: ProductId) -> Result<Vec<Review>, ApiError> {
        let reviews: Vec<Review> = fetch(
            self.transport.as_ref(),
            "reviews by product",
            ApiRequest::get("/getAllReviewByProduct").param("product", product),
        )
        .await?;
        tracing::debug!(product = %product, count = reviews.len(), "reviews fetched");
        Ok(reviews)
    }

    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn by_category(&self, category: CategoryId) -> Result<Vec<Review>, ApiError> {
        fetch(
            self.transport.as_ref(),
            "reviews by category",
            ApiRequest::get("/getAllReviewByCategory").param("category", category),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::DomainError;
    use crate::transport::scripted::{envelope, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_by_product_decodes_reviews() {
        let transport = ScriptedTransport::new();
        transport.reply(
            "/getAllReviewByProduct?product=5",
            envelope(json!([
                { "id": 1, "productId": 5, "rating": 5, "review": "mantap",
                  "tanggal": "Tue, 01 Apr 2025 10:55:59 GMT" },
                { "id": 2, "productId": 5, "rating": 3, "review": "biasa",
                  "tanggal": "Wed, 02 Apr 2025 08:00:00 GMT" }
            ])),
        );
        let api = ReviewsApi::new(transport);

        let reviews = api.by_product(ProductId(5)).await.unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[1].rating, 3);
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_malformed() {
        let transport = ScriptedTransport::new();
        transport.reply(
            "/getAllReviewByCategory?category=1",
            envelope(json!([
                { "id": 1, "productId": 5, "rating": 9, "review": "",
                  "tanggal": "Tue, 01 Apr 2025 10:55:59 GMT" }
            ])),
        );
        let api = ReviewsApi::new(transport);

        let result = api.by_category(CategoryId(1)).await;
        assert!(matches!(
            result,
            Err(ApiError::Domain(DomainError::Malformed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_empty_list_is_a_valid_result() {
        let transport = ScriptedTransport::new();
        transport.reply("/getAllReview", envelope(json!([])));
        let api = ReviewsApi::new(transport);

        assert!(api.list_all().await.unwrap().is_empty());
    }
}
