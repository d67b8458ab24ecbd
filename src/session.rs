//! Single-owner runtime that drives [`AppState`].
//!
//! One tokio task owns the state and applies events to it strictly one at a
//! time through [`handle_event`]. Fetches and debounce timers run as their own
//! tasks and report back through the same event channel, so every mutation is
//! serialized and no lock guards the state. Presentation code reads immutable
//! snapshots from a [`watch`] channel.
//!
//! ```text
//! SessionHandle ──Event──▶ loop ──handle_event──▶ AppState ──snapshot──▶ watch
//!                            ▲                        │
//!                            └── worker / timer ◀─Action
//! ```

use crate::api::Backend;
use crate::app::{handle_event, Action, AppState, DebounceTicket, Event};
use crate::domain::error::{Result, TrendsError};
use crate::domain::{CategoryId, ProductId};
use crate::transport::{HttpTransport, Transport};
use crate::worker::{FetchWorker, WorkerMessage};
use crate::Config;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, WeakUnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// A running session and its event loop task.
pub struct Session {
    handle: SessionHandle,
    task: JoinHandle<()>,
}

impl Session {
    /// Starts a session against the configured HTTP backend.
    ///
    /// Must be called inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the backend URL is missing or
    /// invalid; no request is sent in that case.
    pub fn start(config: &Config) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        tracing::info!(base_url = %transport.base_url(), "session starting");
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Starts a session over an arbitrary transport.
    #[must_use]
    pub fn with_transport(config: &Config, transport: Arc<dyn Transport>) -> Self {
        let worker = FetchWorker::new(Backend::new(transport));
        let state = AppState::new(config.debounce_window);

        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(state.clone());

        let runtime = Runtime {
            state,
            worker,
            events: events_tx.downgrade(),
            snapshots: snapshots_tx,
        };
        let task = tokio::spawn(runtime.run(events_rx).instrument(tracing::debug_span!("session")));

        Self {
            handle: SessionHandle {
                events: events_tx,
                snapshots: snapshots_rx,
            },
            task,
        }
    }

    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Stops the loop and waits for it to finish. In-flight fetches are
    /// abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`TrendsError::SessionClosed`] if the loop task panicked.
    pub async fn shutdown(self) -> Result<()> {
        // The loop may already be gone; joining below is what matters.
        let _ = self.handle.events.send(Event::Shutdown);
        drop(self.handle);
        self.task.await.map_err(|e| {
            tracing::warn!(error = %e, "session task failed");
            TrendsError::SessionClosed
        })
    }
}

/// Cloneable command and subscription surface of a [`Session`].
///
/// Commands are fire-and-forget; their effect shows up in later snapshots.
#[derive(Clone)]
pub struct SessionHandle {
    events: UnboundedSender<Event>,
    snapshots: watch::Receiver<AppState>,
}

impl SessionHandle {
    fn send(&self, event: Event) -> Result<()> {
        self.events.send(event).map_err(|_| TrendsError::SessionClosed)
    }

    /// Loads the full product list and the category cache.
    ///
    /// # Errors
    ///
    /// Every command fails with [`TrendsError::SessionClosed`] once the loop
    /// has stopped.
    pub fn start(&self) -> Result<()> {
        self.send(Event::Started)
    }

    pub fn load_all(&self) -> Result<()> {
        self.send(Event::LoadAll)
    }

    pub fn search_by_text(&self, text: impl Into<String>) -> Result<()> {
        self.send(Event::SearchByText(text.into()))
    }

    pub fn filter_by_category(&self, category: Option<CategoryId>) -> Result<()> {
        self.send(Event::FilterByCategory(category))
    }

    pub fn retry(&self) -> Result<()> {
        self.send(Event::Retry)
    }

    /// Reports the full search box text after a keystroke (debounced).
    pub fn input_changed(&self, text: impl Into<String>) -> Result<()> {
        self.send(Event::InputChanged(text.into()))
    }

    pub fn input_cleared(&self) -> Result<()> {
        self.send(Event::InputCleared)
    }

    pub fn select_product(&self, id: ProductId) -> Result<()> {
        self.send(Event::SelectProduct(id))
    }

    pub fn close_detail(&self) -> Result<()> {
        self.send(Event::CloseDetail)
    }

    pub fn refetch_categories(&self) -> Result<()> {
        self.send(Event::RefetchCategories)
    }

    /// A receiver that yields every committed state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.snapshots.clone()
    }

    /// The latest committed state.
    #[must_use]
    pub fn snapshot(&self) -> AppState {
        self.snapshots.borrow().clone()
    }
}

struct Runtime {
    state: AppState,
    worker: FetchWorker,
    events: WeakUnboundedSender<Event>,
    snapshots: watch::Sender<AppState>,
}

impl Runtime {
    async fn run(mut self, mut events: UnboundedReceiver<Event>) {
        while let Some(event) = events.recv().await {
            let (render, actions) = match handle_event(&mut self.state, &event) {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::warn!(error = %e, "event handling failed");
                    continue;
                }
            };

            if render {
                self.snapshots.send_replace(self.state.clone());
            }

            for action in actions {
                match action {
                    Action::PostToWorker(message) => self.post_to_worker(message),
                    Action::ScheduleDebounce { ticket, after } => self.schedule_debounce(ticket, after),
                    Action::Shutdown => {
                        tracing::debug!("session shutting down");
                        return;
                    }
                }
            }
        }
        tracing::debug!("all session handles dropped");
    }

    fn post_to_worker(&self, message: WorkerMessage) {
        let worker = self.worker.clone();
        let events = self.events.clone();
        let span = tracing::debug_span!("worker_message", operation = message.operation());

        tokio::spawn(
            async move {
                let response = worker.handle_message(message).await;
                deliver(&events, Event::WorkerResponse(response));
            }
            .instrument(span),
        );
    }

    fn schedule_debounce(&self, ticket: DebounceTicket, after: Duration) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            deliver(&events, Event::DebounceElapsed(ticket));
        });
    }
}

fn deliver(events: &WeakUnboundedSender<Event>, event: Event) {
    let delivered = events.upgrade().is_some_and(|tx| tx.send(event).is_ok());
    if !delivered {
        tracing::debug!("session closed before result arrived");
    }
}
