use crate::api::fetch;
use crate::domain::error::ApiError;
use crate::domain::{ProductId, SentimentRecord};
use crate::transport::{ApiRequest, Transport};
use std::sync::Arc;

#[derive(Clone)]
pub struct SentimentApi {
    transport: Arc<dyn Transport>,
}

impl SentimentApi {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Raw sentiment records for one product; summarising is left to the caller.
    ///
    /// # Errors
    ///
    /// Propagates transport and envelope failures unchanged.
    pub async fn by_product(&self, product: ProductId) -> Result<Vec<SentimentRecord>, ApiError> {
        fetch(
            self.transport.as_ref(),
            "sentiment by product",
            ApiRequest::get("/getSentimentByProduct").param("product", product),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SentimentSummary;
    use crate::transport::scripted::{envelope, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_by_product_feeds_summary() {
        let transport = ScriptedTransport::new();
        transport.reply(
            "/getSentimentByProduct?product=4",
            envelope(json!([{
                "productId": 4,
                "sentiment_negative": 1,
                "sentiment_neutral": 2,
                "sentiment_positive": 7
            }])),
        );
        let api = SentimentApi::new(transport);

        let records = api.by_product(ProductId(4)).await.unwrap();
        let summary = SentimentSummary::for_product(&records, ProductId(4)).unwrap();
        assert_eq!(summary.positive_percent, 70);
    }
}
