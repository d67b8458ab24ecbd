//! Selected-product detail: reviews, sentiment and their derived statistics.
//!
//! The selection slot is generation-tagged like the product list. Selecting a
//! different product (or closing the view) bumps the generation, so reviews or
//! sentiment still in flight for the old selection are dropped on arrival.
//! Reviews and sentiment resolve independently; either one failing leaves its
//! section [`Section::Unavailable`] without affecting the other.

use crate::app::modes::Section;
use crate::domain::error::ApiError;
use crate::domain::{average_rating, Product, ProductId, Review, SentimentRecord, SentimentSummary};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DetailTag {
    pub generation: u64,
    pub product: ProductId,
}

#[derive(Debug, Clone, Default)]
pub struct DetailState {
    generation: u64,
    pub product: Option<Product>,
    /// Id being resolved through the product-by-id endpoint.
    pub pending_lookup: Option<ProductId>,
    pub lookup_error: Option<String>,
    pub reviews: Section<Vec<Review>>,
    pub sentiment: Section<Vec<SentimentRecord>>,
}

impl DetailState {
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.product.is_some()
    }

    /// Whether a detail view is open or being opened.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.product.is_some() || self.pending_lookup.is_some()
    }

    /// Opens `product`, discarding everything held for the previous selection.
    pub fn open(&mut self, product: Product) -> DetailTag {
        let tag = DetailTag {
            generation: self.generation + 1,
            product: product.id,
        };
        *self = Self {
            generation: tag.generation,
            product: Some(product),
            pending_lookup: None,
            lookup_error: None,
            reviews: Section::Loading,
            sentiment: Section::Loading,
        };
        tracing::debug!(product = %tag.product, generation = tag.generation, "detail opened");
        tag
    }

    /// Starts resolving a product that is not in the current list.
    pub fn begin_lookup(&mut self, id: ProductId) -> DetailTag {
        let tag = DetailTag {
            generation: self.generation + 1,
            product: id,
        };
        *self = Self {
            generation: tag.generation,
            pending_lookup: Some(id),
            ..Self::default()
        };
        tag
    }

    /// Applies a product-by-id result. On success the view opens and the
    /// returned tag should be used to fetch reviews and sentiment.
    pub fn resolve_lookup(
        &mut self,
        tag: &DetailTag,
        outcome: Result<Product, ApiError>,
    ) -> Option<DetailTag> {
        if !self.is_current(tag) || self.pending_lookup != Some(tag.product) {
            tracing::debug!(product = %tag.product, "discarding superseded product lookup");
            return None;
        }
        match outcome {
            Ok(product) => Some(self.open(product)),
            Err(e) => {
                tracing::warn!(product = %tag.product, error = %e, "product lookup failed");
                *self = Self {
                    generation: self.generation,
                    lookup_error: Some(e.to_string()),
                    ..Self::default()
                };
                None
            }
        }
    }

    /// Returns `false` when `tag` belongs to a superseded selection.
    pub fn resolve_reviews(&mut self, tag: &DetailTag, outcome: Result<Vec<Review>, ApiError>) -> bool {
        if !self.is_current(tag) || !self.is_open() {
            tracing::debug!(product = %tag.product, "discarding reviews for superseded selection");
            return false;
        }
        self.reviews = degrade("reviews", outcome);
        true
    }

    /// Returns `false` when `tag` belongs to a superseded selection.
    pub fn resolve_sentiment(
        &mut self,
        tag: &DetailTag,
        outcome: Result<Vec<SentimentRecord>, ApiError>,
    ) -> bool {
        if !self.is_current(tag) || !self.is_open() {
            tracing::debug!(product = %tag.product, "discarding sentiment for superseded selection");
            return false;
        }
        self.sentiment = degrade("sentiment", outcome);
        true
    }

    /// Clears the selection so the next open never shows stale data.
    pub fn close(&mut self) {
        *self = Self {
            generation: self.generation + 1,
            ..Self::default()
        };
    }

    #[must_use]
    pub fn is_current(&self, tag: &DetailTag) -> bool {
        tag.generation == self.generation
    }

    /// Mean rating of the loaded reviews; `0.0` when there are none.
    #[must_use]
    pub fn average_rating(&self) -> f64 {
        self.reviews.loaded().map_or(0.0, |reviews| average_rating(reviews))
    }

    #[must_use]
    pub fn review_count(&self) -> usize {
        self.reviews.loaded().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn sentiment_summary(&self) -> Option<SentimentSummary> {
        let product = self.product.as_ref()?;
        let records = self.sentiment.loaded()?;
        SentimentSummary::for_product(records, product.id)
    }
}

fn degrade<T>(section: &str, outcome: Result<T, ApiError>) -> Section<T> {
    match outcome {
        Ok(value) => Section::Loaded(value),
        Err(e) => {
            tracing::warn!(section = section, error = %e, "detail section unavailable");
            Section::Unavailable(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::TransportError;
    use crate::domain::product::sample;
    use crate::domain::review::sample as review;
    use crate::domain::sentiment::record;
    use crate::domain::SentimentTone;

    fn server_fault() -> ApiError {
        ApiError::from(TransportError::ServerFault {
            status: 502,
            path: "/getSentimentByProduct?product=1".to_string(),
        })
    }

    #[test]
    fn test_open_marks_both_sections_loading() {
        let mut detail = DetailState::default();
        let tag = detail.open(sample(1, "Jam", 1));
        assert_eq!(tag.product, ProductId(1));
        assert!(detail.reviews.is_loading());
        assert!(detail.sentiment.is_loading());
        assert_eq!(detail.average_rating(), 0.0);
    }

    #[test]
    fn test_statistics_after_both_sections_resolve() {
        let mut detail = DetailState::default();
        let tag = detail.open(sample(1, "Jam", 1));

        assert!(detail.resolve_sentiment(&tag, Ok(vec![record(1, 7.0, 2.0, 1.0)])));
        assert!(detail.resolve_reviews(&tag, Ok(vec![review(1, 1, 5), review(2, 1, 3)])));

        assert!((detail.average_rating() - 4.0).abs() < f64::EPSILON);
        assert_eq!(detail.review_count(), 2);
        let summary = detail.sentiment_summary().unwrap();
        assert_eq!(summary.dominant, SentimentTone::Positive);
        assert_eq!(summary.neutral_percent, 20);
    }

    #[test]
    fn test_failed_section_degrades_independently() {
        let mut detail = DetailState::default();
        let tag = detail.open(sample(1, "Jam", 1));

        detail.resolve_sentiment(&tag, Err(server_fault()));
        detail.resolve_reviews(&tag, Ok(vec![review(1, 1, 4)]));

        assert!(matches!(detail.sentiment, Section::Unavailable(_)));
        assert!(detail.sentiment_summary().is_none());
        assert_eq!(detail.review_count(), 1);
        assert!(detail.is_open());
    }

    #[test]
    fn test_new_selection_discards_old_results() {
        let mut detail = DetailState::default();
        let first = detail.open(sample(1, "Jam", 1));
        let second = detail.open(sample(2, "Kaos", 2));

        assert!(!detail.resolve_reviews(&first, Ok(vec![review(1, 1, 1)])));
        assert!(detail.reviews.is_loading());
        assert!(detail.resolve_reviews(&second, Ok(vec![])));
        assert_eq!(detail.review_count(), 0);
        assert_eq!(detail.average_rating(), 0.0);
    }

    #[test]
    fn test_close_clears_and_drops_late_results() {
        let mut detail = DetailState::default();
        let tag = detail.open(sample(1, "Jam", 1));
        detail.resolve_reviews(&tag, Ok(vec![review(1, 1, 5)]));

        detail.close();
        assert!(!detail.is_open());
        assert_eq!(detail.reviews, Section::Idle);

        assert!(!detail.resolve_sentiment(&tag, Ok(vec![record(1, 1.0, 0.0, 0.0)])));
        assert_eq!(detail.sentiment, Section::Idle);
    }

    #[test]
    fn test_lookup_then_open() {
        let mut detail = DetailState::default();
        let lookup = detail.begin_lookup(ProductId(8));
        assert!(detail.is_active());
        assert!(!detail.is_open());

        let opened = detail.resolve_lookup(&lookup, Ok(sample(8, "Sepatu", 3))).unwrap();
        assert_eq!(opened.product, ProductId(8));
        assert!(detail.is_open());
        assert!(detail.pending_lookup.is_none());
    }

    #[test]
    fn test_failed_lookup_reports_error() {
        let mut detail = DetailState::default();
        let lookup = detail.begin_lookup(ProductId(8));
        assert!(detail.resolve_lookup(&lookup, Err(server_fault())).is_none());
        assert!(!detail.is_active());
        assert!(detail.lookup_error.is_some());
    }

    #[test]
    fn test_superseded_lookup_is_ignored() {
        let mut detail = DetailState::default();
        let stale = detail.begin_lookup(ProductId(8));
        detail.open(sample(2, "Kaos", 2));

        assert!(detail.resolve_lookup(&stale, Ok(sample(8, "Sepatu", 3))).is_none());
        assert_eq!(detail.product.as_ref().map(|p| p.id), Some(ProductId(2)));
    }
}
