//! View model types representing renderable UI state.
//!
//! Computed by [`crate::app::AppState::compute_viewmodel`] and consumed by the
//! renderer. Everything here is display-ready: prices are formatted, ratings are
//! strings, fuzzy match ranges are precomputed. No business logic.

use crate::domain::{ProductId, SentimentTone};

#[derive(Debug, Clone)]
pub struct UIViewModel {
    pub header: HeaderInfo,
    /// Present while the search box holds text or a search is pending.
    pub search_bar: Option<SearchBarInfo>,
    /// Loading or failure notice for the product list.
    pub status: Option<StatusBanner>,
    pub cards: Vec<ProductCard>,
    /// Shown when a query succeeded with no products.
    pub empty_state: Option<EmptyState>,
    pub detail: Option<DetailPanel>,
    pub footer: FooterInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    pub keybindings: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    /// A debounced search has not fired yet.
    pub pending: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusBanner {
    Loading { message: String },
    Failed { message: String, hint: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// One product row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    /// Character ranges of `name` matched by the active search.
    pub highlight_ranges: Vec<(usize, usize)>,
    pub price: String,
    /// Set only when the product is discounted.
    pub original_price: Option<String>,
    pub discount_badge: Option<String>,
    pub stock: String,
    pub category: String,
    pub is_selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailPanel {
    /// Waiting for a product-by-id lookup.
    Resolving { product: ProductId },
    LookupFailed { message: String },
    Open {
        name: String,
        category: String,
        price: String,
        original_price: Option<String>,
        stock: u32,
        average_rating: String,
        stars: String,
        review_count: usize,
        reviews: ReviewsBlock,
        sentiment: SentimentBlock,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewsBlock {
    Loading,
    /// The fetch failed; the section is simply omitted.
    Unavailable,
    Empty,
    Items(Vec<ReviewLine>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewLine {
    pub stars: String,
    pub date: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SentimentBlock {
    Loading,
    Unavailable,
    /// Loaded, but no non-zero record for this product.
    Empty,
    Summary {
        rows: [(SentimentTone, u8); 3],
        dominant: SentimentTone,
    },
}
