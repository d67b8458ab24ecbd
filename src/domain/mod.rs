//! Domain layer for tokotrends.
//!
//! Backend records (products, categories, reviews, sentiment) and the statistics
//! derived from them, independent of HTTP or presentation concerns.
//!
//! # Organization
//!
//! - [`error`]: Error taxonomy and result alias
//! - [`product`]: Product snapshot and identifier
//! - [`category`]: Category reference data and name lookup
//! - [`review`]: Reviews and average rating
//! - [`sentiment`]: Sentiment records and the whole-percent summary
//!
//! # Examples
//!
//! ```
//! use tokotrends::domain::sentiment::{SentimentSummary, SentimentTone};
//!
//! let summary = SentimentSummary::from_counts(7.0, 2.0, 1.0).unwrap();
//! assert_eq!(summary.positive_percent, 70);
//! assert_eq!(summary.dominant, SentimentTone::Positive);
//! ```

pub mod category;
pub mod error;
pub mod product;
pub mod review;
pub mod sentiment;

pub use category::{Category, CategoryId};
pub use error::{ApiError, ConfigError, DomainError, Result, TransportError, TrendsError};
pub use product::{Product, ProductId};
pub use review::{average_rating, Review};
pub use sentiment::{SentimentRecord, SentimentSummary, SentimentTone};

/// Semantic checks applied to every decoded backend record.
///
/// Serde enforces the shape; this enforces value ranges the type system cannot
/// (ratings 1 to 5, non-negative prices and so on).
pub trait Validate {
    /// # Errors
    ///
    /// Returns a description of the first violated constraint.
    fn validate(&self) -> std::result::Result<(), String>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> std::result::Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}
