//! Executes [`WorkerMessage`]s against the resource accessors.
//!
//! The worker is stateless apart from the shared [`Backend`] (and the category
//! cache inside it), so the session runs every message as its own task and
//! several can be in flight at once.

use crate::api::Backend;
use crate::app::modes::QueryKind;
use crate::domain::error::ApiError;
use crate::worker::{WorkerMessage, WorkerResponse};

#[derive(Clone)]
pub struct FetchWorker {
    backend: Backend,
}

impl FetchWorker {
    #[must_use]
    pub const fn new(backend: Backend) -> Self {
        Self { backend }
    }

    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Logs the outcome of one accessor call and wraps it into a response.
    fn handle_api_result<T, F>(
        operation: &str,
        result: Result<T, ApiError>,
        into_response: F,
    ) -> WorkerResponse
    where
        F: FnOnce(Result<T, ApiError>) -> WorkerResponse,
    {
        match &result {
            Ok(_) => tracing::debug!(operation = operation, "fetch succeeded"),
            Err(e) => tracing::debug!(
                operation = operation,
                transient = e.is_transient(),
                error = %e,
                "fetch failed"
            ),
        }
        into_response(result)
    }

    /// Runs one message to completion. Failures are carried in the response.
    pub async fn handle_message(&self, message: WorkerMessage) -> WorkerResponse {
        let operation = message.operation();

        match message {
            WorkerMessage::LoadProducts { tag } => {
                let result = match &tag.kind {
                    QueryKind::All => self.backend.products.list_all().await,
                    QueryKind::Search(text) => self.backend.products.search(text).await,
                    QueryKind::Category(id) => self.backend.products.by_category(*id).await,
                };
                Self::handle_api_result(operation, result, |outcome| {
                    WorkerResponse::ProductsLoaded { tag, outcome }
                })
            }

            WorkerMessage::LookupProduct { tag } => {
                let result = self.backend.products.by_id(tag.product).await;
                Self::handle_api_result(operation, result, |outcome| {
                    WorkerResponse::ProductResolved { tag, outcome }
                })
            }

            WorkerMessage::LoadReviews { tag } => {
                let result = self.backend.reviews.by_product(tag.product).await;
                Self::handle_api_result(operation, result, |outcome| {
                    WorkerResponse::ReviewsLoaded { tag, outcome }
                })
            }

            WorkerMessage::LoadSentiment { tag } => {
                let result = self.backend.sentiment.by_product(tag.product).await;
                Self::handle_api_result(operation, result, |outcome| {
                    WorkerResponse::SentimentLoaded { tag, outcome }
                })
            }

            WorkerMessage::LoadCategories { generation, refresh } => {
                let result = if refresh {
                    self.backend.categories.refetch().await
                } else {
                    self.backend.categories.cached().await
                };
                Self::handle_api_result(operation, result, |outcome| {
                    WorkerResponse::CategoriesLoaded { generation, outcome }
                })
            }
        }
    }
}
