//! Side effects requested by the event handler.
//!
//! The handler never performs I/O or touches timers. It returns a `Vec<Action>`
//! and the session runtime executes them, feeding results back as events.
//!
//! # Example
//!
//! ```rust
//! use tokotrends::app::{Action, AppState, Event, handle_event};
//! use tokotrends::worker::WorkerMessage;
//!
//! let mut state = AppState::default();
//! let (_, actions) = handle_event(&mut state, &Event::LoadAll)?;
//! assert!(matches!(
//!     actions.as_slice(),
//!     [Action::PostToWorker(WorkerMessage::LoadProducts { .. })]
//! ));
//! # Ok::<(), tokotrends::TrendsError>(())
//! ```

use crate::app::input::DebounceTicket;
use crate::worker::WorkerMessage;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Runs a fetch on the worker; its response comes back as
    /// [`crate::app::Event::WorkerResponse`].
    PostToWorker(WorkerMessage),

    /// Delivers [`crate::app::Event::DebounceElapsed`] with `ticket` once `after`
    /// has passed.
    ScheduleDebounce { ticket: DebounceTicket, after: Duration },

    /// Stops the session loop.
    Shutdown,
}
