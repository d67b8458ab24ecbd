//! Authoritative product-list state.
//!
//! [`QueryState`] is a versioned value. Every dispatch bumps a generation
//! counter and hands back a [`QueryTag`]; a completion commits only when its tag
//! is still the current one, so the last *initiated* query wins regardless of
//! the order responses arrive in. Transitions replace the whole value rather
//! than patching fields, which keeps published snapshots consistent.

use crate::app::modes::{QueryKind, QueryStatus};
use crate::domain::error::ApiError;
use crate::domain::{CategoryId, Product};
use std::sync::Arc;

/// Identity of one dispatched query, captured at dispatch time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryTag {
    pub generation: u64,
    pub kind: QueryKind,
}

#[derive(Debug, Clone)]
pub struct QueryState {
    pub items: Arc<[Product]>,
    pub status: QueryStatus,
    pub last_error: Option<String>,
    pub active: QueryKind,
    generation: u64,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Arc::from(Vec::new()),
            status: QueryStatus::Idle,
            last_error: None,
            active: QueryKind::All,
            generation: 0,
        }
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Makes the unfiltered list authoritative.
    pub fn load_all(&mut self) -> QueryTag {
        self.dispatch(QueryKind::All)
    }

    /// Makes a name search authoritative. Blank text means "no filter".
    pub fn search_by_text(&mut self, query: &str) -> QueryTag {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.load_all();
        }
        self.dispatch(QueryKind::Search(trimmed.to_string()))
    }

    /// Makes a category filter authoritative. `None` means "no filter".
    pub fn filter_by_category(&mut self, category: Option<CategoryId>) -> QueryTag {
        match category {
            Some(id) => self.dispatch(QueryKind::Category(id)),
            None => self.load_all(),
        }
    }

    /// Re-dispatches the active query kind. From `Idle` this is a first load.
    pub fn retry(&mut self) -> QueryTag {
        let kind = self.active.clone();
        self.dispatch(kind)
    }

    fn dispatch(&mut self, kind: QueryKind) -> QueryTag {
        let generation = self.generation + 1;
        *self = Self {
            items: Arc::clone(&self.items),
            status: QueryStatus::Loading,
            last_error: None,
            active: kind.clone(),
            generation,
        };
        tracing::debug!(generation = generation, kind = %kind, "query dispatched");
        QueryTag { generation, kind }
    }

    #[must_use]
    pub fn is_current(&self, tag: &QueryTag) -> bool {
        tag.generation == self.generation && tag.kind == self.active
    }

    /// Commits the outcome of the query identified by `tag`.
    ///
    /// Returns `false` (and changes nothing) when the tag has been superseded.
    /// A failure clears the items; data and an error are never shown together.
    pub fn resolve(&mut self, tag: &QueryTag, outcome: Result<Vec<Product>, ApiError>) -> bool {
        if !self.is_current(tag) {
            tracing::debug!(
                stale_generation = tag.generation,
                current_generation = self.generation,
                kind = %tag.kind,
                "discarding superseded query result"
            );
            return false;
        }

        *self = match outcome {
            Ok(items) => {
                tracing::debug!(kind = %tag.kind, count = items.len(), "query ready");
                Self {
                    items: items.into(),
                    status: QueryStatus::Ready,
                    last_error: None,
                    active: tag.kind.clone(),
                    generation: self.generation,
                }
            }
            Err(e) => {
                tracing::warn!(kind = %tag.kind, error = %e, "query failed");
                Self {
                    items: Arc::from(Vec::new()),
                    status: QueryStatus::Failed,
                    last_error: Some(e.to_string()),
                    active: tag.kind.clone(),
                    generation: self.generation,
                }
            }
        };
        true
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status == QueryStatus::Loading
    }

    /// The active search text, if the list is driven by a search.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        match &self.active {
            QueryKind::Search(text) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::{DomainError, TransportError};
    use crate::domain::product::sample;

    fn catalog() -> Vec<Product> {
        vec![sample(1, "Jam Tangan", 1), sample(2, "Kaos", 2), sample(3, "Jam Dinding", 1)]
    }

    fn search_hits() -> Vec<Product> {
        vec![sample(1, "Jam Tangan", 1), sample(3, "Jam Dinding", 1)]
    }

    // === Race policy ===

    #[test]
    fn test_slow_search_does_not_clobber_later_load_all() {
        let mut state = QueryState::new();
        let search = state.search_by_text("jam");
        let all = state.load_all();

        assert!(state.resolve(&all, Ok(catalog())));
        assert!(!state.resolve(&search, Ok(search_hits())));

        assert_eq!(state.items.len(), 3);
        assert_eq!(state.active, QueryKind::All);
        assert_eq!(state.status, QueryStatus::Ready);
    }

    #[test]
    fn test_last_initiated_wins_when_responses_arrive_in_order() {
        let mut state = QueryState::new();
        let search = state.search_by_text("jam");
        let category = state.filter_by_category(Some(CategoryId(2)));

        assert!(!state.resolve(&search, Ok(search_hits())));
        assert!(state.is_loading());
        assert!(state.resolve(&category, Ok(vec![sample(2, "Kaos", 2)])));

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.active, QueryKind::Category(CategoryId(2)));
    }

    #[test]
    fn test_same_kind_dispatched_twice_only_latest_commits() {
        let mut state = QueryState::new();
        let first = state.load_all();
        let second = state.load_all();
        assert_eq!(first.kind, second.kind);

        assert!(!state.resolve(&first, Ok(vec![sample(9, "Old", 1)])));
        assert!(state.resolve(&second, Ok(catalog())));
        assert_eq!(state.items.len(), 3);
    }

    #[test]
    fn test_stale_failure_is_discarded() {
        let mut state = QueryState::new();
        let search = state.search_by_text("jam");
        let all = state.load_all();
        state.resolve(&all, Ok(catalog()));

        let stale = Err(ApiError::from(TransportError::Timeout {
            path: "/getAllProductsByName?name=jam".to_string(),
            after: std::time::Duration::from_secs(10),
        }));
        assert!(!state.resolve(&search, stale));
        assert_eq!(state.status, QueryStatus::Ready);
        assert!(state.last_error.is_none());
    }

    // === Equivalences ===

    #[test]
    fn test_blank_search_is_load_all() {
        for text in ["", "   ", "\t\n"] {
            let mut state = QueryState::new();
            let tag = state.search_by_text(text);
            assert_eq!(tag.kind, QueryKind::All);
            assert_eq!(state.active, QueryKind::All);
        }
    }

    #[test]
    fn test_search_text_is_trimmed() {
        let mut state = QueryState::new();
        let tag = state.search_by_text("  jam ");
        assert_eq!(tag.kind, QueryKind::Search("jam".to_string()));
        assert_eq!(state.search_text(), Some("jam"));
    }

    #[test]
    fn test_no_category_is_load_all() {
        let mut state = QueryState::new();
        let tag = state.filter_by_category(None);
        assert_eq!(tag.kind, QueryKind::All);
    }

    // === Failure handling ===

    #[test]
    fn test_domain_error_never_populates_items() {
        let mut state = QueryState::new();
        let first = state.load_all();
        state.resolve(&first, Ok(catalog()));

        let tag = state.search_by_text("jam");
        assert_eq!(state.items.len(), 3, "previous items stay visible while loading");

        let rejected = Err(ApiError::from(DomainError::Rejected {
            message: "Produk tidak ditemukan".to_string(),
        }));
        assert!(state.resolve(&tag, rejected));

        assert!(state.items.is_empty());
        assert_eq!(state.status, QueryStatus::Failed);
        assert_eq!(state.last_error.as_deref(), Some("Produk tidak ditemukan"));
    }

    #[test]
    fn test_retry_redispatches_active_kind() {
        let mut state = QueryState::new();
        let tag = state.filter_by_category(Some(CategoryId(4)));
        state.resolve(
            &tag,
            Err(ApiError::from(TransportError::ServerFault {
                status: 500,
                path: "/getAllProductByCategory?category=4".to_string(),
            })),
        );

        let retry = state.retry();
        assert_eq!(retry.kind, QueryKind::Category(CategoryId(4)));
        assert!(retry.generation > tag.generation);
        assert!(state.is_loading());
        assert!(state.last_error.is_none());

        assert!(state.resolve(&retry, Ok(vec![sample(5, "Buku", 4)])));
        assert_eq!(state.status, QueryStatus::Ready);
    }

    #[test]
    fn test_retry_from_idle_loads_all() {
        let mut state = QueryState::new();
        assert_eq!(state.status, QueryStatus::Idle);
        assert_eq!(state.retry().kind, QueryKind::All);
    }
}
