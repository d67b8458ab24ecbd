//! Event handling and state transition logic.
//!
//! [`handle_event`] is the only place [`AppState`] changes. It is synchronous and
//! free of I/O: user commands and completed fetches come in as [`Event`]s, state
//! transitions happen in place, and any follow-up work goes out as [`Action`]s.
//!
//! # Event Types
//!
//! - **Query commands**: `LoadAll`, `SearchByText`, `FilterByCategory`, `Retry`
//! - **Input**: `InputChanged`, `InputCleared`, `DebounceElapsed`
//! - **Detail**: `SelectProduct`, `CloseDetail`
//! - **Reference data**: `RefetchCategories`
//! - **Lifecycle**: `Started`, `Shutdown`
//! - **Worker**: `WorkerResponse` with tagged fetch results
//!
//! The returned flag tells the runtime whether the visible state changed and a
//! new snapshot should be published.

use crate::app::input::{DebounceTicket, InputOutcome};
use crate::app::query::QueryTag;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{CategoryId, ProductId};
use crate::worker::{WorkerMessage, WorkerResponse};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Session start: loads the full list and the category cache.
    Started,

    LoadAll,
    /// Immediate (non-debounced) search. Blank text loads everything.
    SearchByText(String),
    /// `None` loads everything.
    FilterByCategory(Option<CategoryId>),
    /// Re-runs the active query after a failure.
    Retry,

    /// Full text of the search box after a keystroke.
    InputChanged(String),
    InputCleared,
    /// The quiescence window for `ticket` has passed.
    DebounceElapsed(DebounceTicket),

    SelectProduct(ProductId),
    CloseDetail,

    RefetchCategories,

    WorkerResponse(WorkerResponse),

    Shutdown,
}

fn fetch_products(tag: QueryTag) -> Action {
    Action::PostToWorker(WorkerMessage::LoadProducts { tag })
}

fn fetch_categories(state: &mut AppState, refresh: bool) -> Action {
    let generation = state.categories.begin();
    Action::PostToWorker(WorkerMessage::LoadCategories { generation, refresh })
}

/// Applies `event` to `state`.
///
/// # Errors
///
/// Currently infallible; the `Result` keeps room for handler-level failures
/// without changing the runtime contract.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event = ?event).entered();

    match event {
        Event::Started => {
            let tag = state.query.load_all();
            Ok((
                true,
                vec![fetch_products(tag), fetch_categories(state, false)],
            ))
        }
        Event::LoadAll => {
            state.input.cancel();
            let tag = state.query.load_all();
            Ok((true, vec![fetch_products(tag)]))
        }
        Event::SearchByText(text) => {
            state.input.cancel();
            let tag = state.query.search_by_text(text);
            Ok((true, vec![fetch_products(tag)]))
        }
        Event::FilterByCategory(category) => {
            state.input.cancel();
            let tag = state.query.filter_by_category(*category);
            Ok((true, vec![fetch_products(tag)]))
        }
        Event::Retry => {
            let tag = state.query.retry();
            tracing::debug!(kind = %tag.kind, "retry requested");
            Ok((true, vec![fetch_products(tag)]))
        }
        Event::InputChanged(text) => {
            let outcome = state.input.changed(text);
            Ok(apply_input(state, outcome))
        }
        Event::InputCleared => {
            let outcome = state.input.cleared();
            Ok(apply_input(state, outcome))
        }
        Event::DebounceElapsed(ticket) => match state.input.elapsed(*ticket) {
            Some(text) => {
                tracing::debug!(query = %text, "input settled");
                let tag = state.query.search_by_text(&text);
                Ok((true, vec![fetch_products(tag)]))
            }
            None => {
                tracing::debug!(ticket = ticket.0, "superseded debounce ticket");
                Ok((false, vec![]))
            }
        },
        Event::SelectProduct(id) => {
            if let Some(product) = state.visible_product(*id).cloned() {
                let tag = state.detail.open(product);
                Ok((
                    true,
                    vec![
                        Action::PostToWorker(WorkerMessage::LoadReviews { tag: tag.clone() }),
                        Action::PostToWorker(WorkerMessage::LoadSentiment { tag }),
                    ],
                ))
            } else {
                tracing::debug!(product = %id, "product not in current list, looking it up");
                let tag = state.detail.begin_lookup(*id);
                Ok((true, vec![Action::PostToWorker(WorkerMessage::LookupProduct { tag })]))
            }
        }
        Event::CloseDetail => {
            if !state.detail.is_active() && state.detail.lookup_error.is_none() {
                return Ok((false, vec![]));
            }
            state.detail.close();
            Ok((true, vec![]))
        }
        Event::RefetchCategories => Ok((true, vec![fetch_categories(state, true)])),
        Event::Shutdown => Ok((false, vec![Action::Shutdown])),
        Event::WorkerResponse(response) => match response {
            WorkerResponse::ProductsLoaded { tag, outcome } => {
                let committed = state.query.resolve(tag, outcome.clone());
                Ok((committed, vec![]))
            }
            WorkerResponse::ProductResolved { tag, outcome } => {
                let was_pending = state.detail.is_current(tag);
                match state.detail.resolve_lookup(tag, outcome.clone()) {
                    Some(opened) => Ok((
                        true,
                        vec![
                            Action::PostToWorker(WorkerMessage::LoadReviews {
                                tag: opened.clone(),
                            }),
                            Action::PostToWorker(WorkerMessage::LoadSentiment { tag: opened }),
                        ],
                    )),
                    None => Ok((was_pending, vec![])),
                }
            }
            WorkerResponse::ReviewsLoaded { tag, outcome } => {
                Ok((state.detail.resolve_reviews(tag, outcome.clone()), vec![]))
            }
            WorkerResponse::SentimentLoaded { tag, outcome } => {
                Ok((state.detail.resolve_sentiment(tag, outcome.clone()), vec![]))
            }
            WorkerResponse::CategoriesLoaded { generation, outcome } => {
                Ok((state.categories.resolve(*generation, outcome), vec![]))
            }
        },
    }
}

/// Turns an input transition into actions.
fn apply_input(state: &mut AppState, outcome: InputOutcome) -> (bool, Vec<Action>) {
    match outcome {
        InputOutcome::Schedule { ticket, after } => {
            (true, vec![Action::ScheduleDebounce { ticket, after }])
        }
        InputOutcome::Emit(text) => {
            let tag = state.query.search_by_text(&text);
            (true, vec![fetch_products(tag)])
        }
    }
}
