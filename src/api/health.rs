//! Reachability probe and per-endpoint diagnostics.

use crate::api::Backend;
use crate::domain::error::{ApiError, TransportError};
use crate::domain::{CategoryId, ProductId};
use crate::transport::{ApiRequest, Transport};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct HealthApi {
    transport: Arc<dyn Transport>,
}

impl HealthApi {
    #[must_use]
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Probes `/` under the health-probe timeout and returns the round trip time.
    ///
    /// The body is not interpreted; any 2xx counts as reachable.
    ///
    /// # Errors
    ///
    /// Returns the classified transport failure.
    pub async fn probe(&self) -> Result<Duration, TransportError> {
        let started = Instant::now();
        let request = ApiRequest::probe("/");
        let response = self.transport.send(&request).await?;
        if let Some(error) = response.status_error(&request.target()) {
            return Err(error);
        }
        Ok(started.elapsed())
    }

    pub async fn is_reachable(&self) -> bool {
        self.probe().await.is_ok()
    }
}

/// Outcome of calling one backend operation during diagnostics.
#[derive(Debug, Clone)]
pub struct EndpointReport {
    pub name: &'static str,
    pub target: String,
    pub elapsed: Duration,
    /// Number of records returned, `None` for operations without a list payload.
    pub outcome: Result<Option<usize>, ApiError>,
}

impl EndpointReport {
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Parameters used when exercising parameterised endpoints.
#[derive(Debug, Clone)]
pub struct DiagnosticSample {
    pub product: ProductId,
    pub category: CategoryId,
    pub search: String,
}

impl Default for DiagnosticSample {
    fn default() -> Self {
        Self {
            product: ProductId(1),
            category: CategoryId(1),
            search: "jam".to_string(),
        }
    }
}

async fn measure<F>(name: &'static str, target: String, call: F) -> EndpointReport
where
    F: Future<Output = Result<Option<usize>, ApiError>>,
{
    let started = Instant::now();
    let outcome = call.await;
    let elapsed = started.elapsed();
    match &outcome {
        Ok(count) => tracing::info!(endpoint = name, elapsed_ms = elapsed.as_millis() as u64, count = ?count, "endpoint ok"),
        Err(e) => tracing::warn!(endpoint = name, elapsed_ms = elapsed.as_millis() as u64, error = %e, "endpoint failed"),
    }
    EndpointReport {
        name,
        target,
        elapsed,
        outcome,
    }
}

/// Calls every backend operation once, in order, and reports each outcome.
///
/// Failures do not stop the run; each endpoint is reported independently.
pub async fn run_diagnostics(backend: &Backend, sample: &DiagnosticSample) -> Vec<EndpointReport> {
    let mut reports = Vec::with_capacity(10);

    reports.push(
        measure("health check", "/".to_string(), async {
            backend.health.probe().await.map(|_| None).map_err(ApiError::from)
        })
        .await,
    );
    reports.push(
        measure("list products", "/getAllProduct".to_string(), async {
            backend.products.list_all().await.map(|items| Some(items.len()))
        })
        .await,
    );
    reports.push(
        measure("list categories", "/getAllCategory".to_string(), async {
            backend.categories.list_all().await.map(|items| Some(items.len()))
        })
        .await,
    );
    reports.push(
        measure("list reviews", "/getAllReview".to_string(), async {
            backend.reviews.list_all().await.map(|items| Some(items.len()))
        })
        .await,
    );
    reports.push(
        measure(
            "search products",
            format!("/getAllProductsByName?name={}", sample.search),
            async {
                backend
                    .products
                    .search(&sample.search)
                    .await
                    .map(|items| Some(items.len()))
            },
        )
        .await,
    );
    reports.push(
        measure(
            "product by id",
            format!("/getProductById/{}", sample.product),
            async { backend.products.by_id(sample.product).await.map(|_| Some(1)) },
        )
        .await,
    );
    reports.push(
        measure(
            "products by category",
            format!("/getAllProductByCategory?category={}", sample.category),
            async {
                backend
                    .products
                    .by_category(sample.category)
                    .await
                    .map(|items| Some(items.len()))
            },
        )
        .await,
    );
    reports.push(
        measure(
            "reviews by product",
            format!("/getAllReviewByProduct?product={}", sample.product),
            async {
                backend
                    .reviews
                    .by_product(sample.product)
                    .await
                    .map(|items| Some(items.len()))
            },
        )
        .await,
    );
    reports.push(
        measure(
            "reviews by category",
            format!("/getAllReviewByCategory?category={}", sample.category),
            async {
                backend
                    .reviews
                    .by_category(sample.category)
                    .await
                    .map(|items| Some(items.len()))
            },
        )
        .await,
    );
    reports.push(
        measure(
            "sentiment by product",
            format!("/getSentimentByProduct?product={}", sample.product),
            async {
                backend
                    .sentiment
                    .by_product(sample.product)
                    .await
                    .map(|items| Some(items.len()))
            },
        )
        .await,
    );

    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::scripted::{envelope, ScriptedTransport};
    use serde_json::json;

    #[tokio::test]
    async fn test_probe_uses_root_path() {
        let transport = ScriptedTransport::new();
        transport.reply("/", json!({ "status": "ok" }));
        let health = HealthApi::new(transport.clone());

        assert!(health.is_reachable().await);
        assert_eq!(transport.calls(), vec!["/"]);
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        let transport = ScriptedTransport::new();
        transport.fail(
            "/",
            TransportError::ConnectionRefused {
                base_url: "http://127.0.0.1:5000/".to_string(),
            },
        );
        let health = HealthApi::new(transport);
        assert!(!health.is_reachable().await);
    }

    #[tokio::test]
    async fn test_probe_fails_on_server_error_status() {
        let transport = ScriptedTransport::new();
        transport.reply_with_status("/", 503, json!("maintenance"));
        let health = HealthApi::new(transport);

        assert_eq!(
            health.probe().await.unwrap_err(),
            TransportError::ServerFault {
                status: 503,
                path: "/".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_diagnostics_report_every_endpoint() {
        let transport = ScriptedTransport::new();
        transport.reply("/", json!("API is running"));
        transport.reply("/getAllProduct", envelope(json!([])));
        transport.reply("/getAllCategory", envelope(json!([{ "id": 1, "name": "Elektronik" }])));
        let backend = Backend::new(transport.clone());

        let reports = run_diagnostics(&backend, &DiagnosticSample::default()).await;

        assert_eq!(reports.len(), 10);
        assert!(reports[0].is_ok());
        assert_eq!(reports[1].outcome, Ok(Some(0)));
        assert_eq!(reports[2].outcome, Ok(Some(1)));
        // Unscripted endpoints answer 404 and are reported, not fatal.
        assert!(!reports[3].is_ok());
        assert_eq!(transport.calls().len(), 10);
        assert_eq!(reports[4].target, "/getAllProductsByName?name=jam");
    }
}
