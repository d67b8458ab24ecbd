//! State machine enums for the product list and the detail view.
//!
//! # State Machine
//!
//! The product list is always driven by exactly one [`QueryKind`]. Its
//! lifecycle is tracked by [`QueryStatus`]:
//!
//! ```text
//! Idle ──▶ Loading ──▶ Ready
//!            ▲   └───▶ Failed
//!            └── any state (new query or retry)
//! ```
//!
//! Each independently fetched part of the detail view moves through a
//! [`Section`].

use crate::domain::CategoryId;
use std::fmt;

/// Which query is authoritative for the product list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// Every product, unfiltered.
    All,
    /// Server-side name search; the text is already trimmed and non-empty.
    Search(String),
    /// Products of one category.
    Category(CategoryId),
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Search(text) => write!(f, "search({text})"),
            Self::Category(id) => write!(f, "category({id})"),
        }
    }
}

/// Lifecycle of the authoritative product query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Nothing dispatched yet.
    Idle,
    /// A query is in flight. Previous items stay visible until it resolves.
    Loading,
    /// The last query succeeded; items are its result.
    Ready,
    /// The last query failed; items are empty and an error message is set.
    Failed,
}

/// A detail-view section fetched independently of the rest.
///
/// A failed fetch degrades to [`Section::Unavailable`] so the rest of the view
/// still renders.
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Idle,
    Loading,
    Loaded(T),
    Unavailable(String),
}

impl<T> Default for Section<T> {
    fn default() -> Self {
        Self::Idle
    }
}

impl<T> Section<T> {
    #[must_use]
    pub const fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}
