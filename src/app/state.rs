//! Application state and view model computation.
//!
//! [`AppState`] is owned by exactly one task (the session loop) and mutated only
//! by [`crate::app::handle_event`]. Subscribers receive cloned snapshots; the
//! product list inside is an `Arc<[Product]>`, so a snapshot is cheap and can
//! never observe a half-applied transition.
//!
//! # State Components
//!
//! - **Query**: authoritative product list, its status and race tag
//! - **Detail**: selected product with its reviews and sentiment
//! - **Input**: debounced search box
//! - **Categories**: session reference data for names and filters

use crate::app::detail::DetailState;
use crate::app::input::SearchInput;
use crate::app::modes::{QueryKind, QueryStatus, Section};
use crate::app::query::QueryState;
use crate::domain::category::category_name;
use crate::domain::error::ApiError;
use crate::domain::{Category, CategoryId, Product, SentimentTone};
use crate::ui::helpers::{format_date, format_rupiah, star_bar};
use crate::ui::viewmodel::{
    DetailPanel, EmptyState, FooterInfo, HeaderInfo, ProductCard, ReviewLine, ReviewsBlock,
    SearchBarInfo, SentimentBlock, StatusBanner, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;
use std::sync::Arc;
use std::time::Duration;

/// Category reference data as last delivered by the worker.
///
/// Loads are generation-tagged like product queries: only the most recently
/// requested load may commit or clear `loading`.
#[derive(Debug, Clone)]
pub struct CategoriesState {
    generation: u64,
    pub items: Arc<[Category]>,
    pub last_error: Option<String>,
    pub loading: bool,
}

impl Default for CategoriesState {
    fn default() -> Self {
        Self {
            generation: 0,
            items: Arc::from(Vec::new()),
            last_error: None,
            loading: false,
        }
    }
}

impl CategoriesState {
    /// Marks a new load in flight and returns its generation.
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Applies a load result. Returns `false` when a later load superseded it.
    pub fn resolve(&mut self, generation: u64, outcome: &Result<Arc<[Category]>, ApiError>) -> bool {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "discarding superseded categories");
            return false;
        }
        self.loading = false;
        match outcome {
            Ok(items) => {
                self.items = Arc::clone(items);
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "categories unavailable");
                self.last_error = Some(e.to_string());
            }
        }
        true
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub query: QueryState,
    pub detail: DetailState,
    pub input: SearchInput,
    pub categories: CategoriesState,
}

impl AppState {
    #[must_use]
    pub fn new(debounce_window: Duration) -> Self {
        Self {
            input: SearchInput::new(debounce_window),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn category_name(&self, id: CategoryId) -> &str {
        category_name(&self.categories.items, id)
    }

    /// Finds a product in the currently visible list.
    #[must_use]
    pub fn visible_product(&self, id: crate::domain::ProductId) -> Option<&Product> {
        self.query.items.iter().find(|product| product.id == id)
    }

    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let matcher = self.query.search_text().map(|_| SkimMatcherV2::default());

        let cards: Vec<ProductCard> = self
            .query
            .items
            .iter()
            .map(|product| self.compute_card(product, matcher.as_ref()))
            .collect();

        let empty_state = (cards.is_empty() && self.query.status == QueryStatus::Ready)
            .then(|| self.compute_empty_state());

        UIViewModel {
            header: self.compute_header(),
            search_bar: self.compute_search_bar(),
            status: self.compute_status(),
            cards,
            empty_state,
            detail: self.compute_detail(),
            footer: self.compute_footer(),
        }
    }

    fn compute_card(&self, product: &Product, matcher: Option<&SkimMatcherV2>) -> ProductCard {
        let discounted = product.has_discount();
        ProductCard {
            id: product.id,
            name: product.name.clone(),
            highlight_ranges: matcher.map_or_else(Vec::new, |m| {
                self.compute_highlight_ranges(&product.name, m)
            }),
            price: format_rupiah(product.current_price),
            original_price: discounted.then(|| format_rupiah(product.original_price)),
            discount_badge: (discounted && product.discount_percent > 0.0)
                .then(|| format!("-{:.0}%", product.discount_percent)),
            stock: if product.stock_count == 0 {
                "out of stock".to_string()
            } else {
                format!("stock {}", product.stock_count)
            },
            category: self.category_name(product.category_id).to_string(),
            is_selected: self
                .detail
                .product
                .as_ref()
                .is_some_and(|selected| selected.id == product.id),
        }
    }

    /// Character ranges of `text` matched by the active search, coalesced into
    /// contiguous `(start, end)` runs.
    fn compute_highlight_ranges(&self, text: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some(query) = self.query.search_text() else {
            return vec![];
        };
        let Some((_score, indices)) = matcher.fuzzy_indices(text, query) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_header(&self) -> HeaderInfo {
        let scope = match &self.query.active {
            QueryKind::All => "All products".to_string(),
            QueryKind::Search(text) => format!("Search \"{text}\""),
            QueryKind::Category(id) => self.category_name(*id).to_string(),
        };
        HeaderInfo {
            title: format!(" Tokotrends · {scope} ({}) ", self.query.items.len()),
        }
    }

    fn compute_search_bar(&self) -> Option<SearchBarInfo> {
        let text = self.input.text();
        (!text.is_empty() || self.input.is_pending()).then(|| SearchBarInfo {
            query: text.to_string(),
            pending: self.input.is_pending(),
        })
    }

    fn compute_status(&self) -> Option<StatusBanner> {
        match self.query.status {
            QueryStatus::Idle | QueryStatus::Ready => None,
            QueryStatus::Loading => Some(StatusBanner::Loading {
                message: format!("Loading {}...", describe(&self.query.active)),
            }),
            QueryStatus::Failed => Some(StatusBanner::Failed {
                message: self
                    .query
                    .last_error
                    .clone()
                    .unwrap_or_else(|| "request failed".to_string()),
                hint: "type `retry` to try again".to_string(),
            }),
        }
    }

    fn compute_empty_state(&self) -> EmptyState {
        match &self.query.active {
            QueryKind::Search(text) => EmptyState {
                message: format!("No products match \"{text}\""),
                subtitle: "Try a different keyword or clear the search".to_string(),
            },
            QueryKind::Category(id) => EmptyState {
                message: format!("No products in {}", self.category_name(*id)),
                subtitle: "Pick another category or show all products".to_string(),
            },
            QueryKind::All => EmptyState {
                message: "No products found".to_string(),
                subtitle: "The catalog is empty".to_string(),
            },
        }
    }

    fn compute_detail(&self) -> Option<DetailPanel> {
        let detail = &self.detail;

        if let Some(id) = detail.pending_lookup {
            return Some(DetailPanel::Resolving { product: id });
        }
        if let Some(error) = &detail.lookup_error {
            return Some(DetailPanel::LookupFailed {
                message: error.clone(),
            });
        }
        let product = detail.product.as_ref()?;

        let reviews = match &detail.reviews {
            Section::Idle | Section::Loading => ReviewsBlock::Loading,
            Section::Unavailable(_) => ReviewsBlock::Unavailable,
            Section::Loaded(reviews) if reviews.is_empty() => ReviewsBlock::Empty,
            Section::Loaded(reviews) => ReviewsBlock::Items(
                reviews
                    .iter()
                    .map(|review| ReviewLine {
                        stars: star_bar(f64::from(review.rating)),
                        date: format_date(&review.posted_at),
                        body: review.body.clone(),
                    })
                    .collect(),
            ),
        };

        let sentiment = match &detail.sentiment {
            Section::Idle | Section::Loading => SentimentBlock::Loading,
            Section::Unavailable(_) => SentimentBlock::Unavailable,
            Section::Loaded(_) => detail.sentiment_summary().map_or(SentimentBlock::Empty, |summary| {
                SentimentBlock::Summary {
                    rows: [SentimentTone::Positive, SentimentTone::Neutral, SentimentTone::Negative]
                        .map(|tone| (tone, summary.percent_of(tone))),
                    dominant: summary.dominant,
                }
            }),
        };

        let average = detail.average_rating();
        Some(DetailPanel::Open {
            name: product.name.clone(),
            category: self.category_name(product.category_id).to_string(),
            price: format_rupiah(product.current_price),
            original_price: product
                .has_discount()
                .then(|| format_rupiah(product.original_price)),
            stock: product.stock_count,
            average_rating: format!("{average:.1}"),
            stars: star_bar(average),
            review_count: detail.review_count(),
            reviews,
            sentiment,
        })
    }

    fn compute_footer(&self) -> FooterInfo {
        let keybindings = if self.detail.is_active() {
            "close: back to list  show <id>: other product  quit"
        } else {
            "type <text>  clear  category <id|all>  all  show <id>  retry  categories  quit"
        };
        FooterInfo {
            keybindings: keybindings.to_string(),
        }
    }
}

fn describe(kind: &QueryKind) -> String {
    match kind {
        QueryKind::All => "all products".to_string(),
        QueryKind::Search(text) => format!("results for \"{text}\""),
        QueryKind::Category(id) => format!("category {id}"),
    }
}
