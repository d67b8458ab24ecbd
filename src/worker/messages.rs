//! Fetch requests emitted by the event handler and the responses that come back.
//!
//! Every request that feeds tagged state carries the tag captured at dispatch
//! time, and the response echoes it untouched. The state owner compares it with
//! the current tag before committing anything.

use crate::app::detail::DetailTag;
use crate::app::query::QueryTag;
use crate::app::modes::QueryKind;
use crate::domain::error::ApiError;
use crate::domain::{Category, Product, Review, SentimentRecord};
use std::sync::Arc;

/// Work for the fetch worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerMessage {
    /// Fetch the product list for `tag.kind`.
    LoadProducts { tag: QueryTag },

    /// Resolve a product that is not in the current list.
    LookupProduct { tag: DetailTag },

    /// Fetch reviews for the selected product.
    LoadReviews { tag: DetailTag },

    /// Fetch sentiment records for the selected product.
    LoadSentiment { tag: DetailTag },

    /// Serve categories from the session cache, or bypass it when `refresh` is set.
    LoadCategories { generation: u64, refresh: bool },
}

impl WorkerMessage {
    /// Short operation name used in spans and logs.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::LoadProducts { tag } => match &tag.kind {
                QueryKind::All => "list products",
                QueryKind::Search(_) => "search products",
                QueryKind::Category(_) => "products by category",
            },
            Self::LookupProduct { .. } => "product by id",
            Self::LoadReviews { .. } => "reviews by product",
            Self::LoadSentiment { .. } => "sentiment by product",
            Self::LoadCategories { refresh: false, .. } => "cached categories",
            Self::LoadCategories { refresh: true, .. } => "refetch categories",
        }
    }
}

/// Completed work, echoing the request's tag.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkerResponse {
    ProductsLoaded {
        tag: QueryTag,
        outcome: Result<Vec<Product>, ApiError>,
    },

    ProductResolved {
        tag: DetailTag,
        outcome: Result<Product, ApiError>,
    },

    ReviewsLoaded {
        tag: DetailTag,
        outcome: Result<Vec<Review>, ApiError>,
    },

    SentimentLoaded {
        tag: DetailTag,
        outcome: Result<Vec<SentimentRecord>, ApiError>,
    },

    CategoriesLoaded {
        generation: u64,
        outcome: Result<Arc<[Category]>, ApiError>,
    },
}
