//! Application layer coordinating state, events, and actions.
//!
//! This layer sits between the session runtime and the worker/domain layers.
//! Nothing here performs I/O; it is a synchronous state machine driven by
//! [`handle_event`].
//!
//! # Architecture
//!
//! ```text
//! Commands → Events → Event Handler → State Mutations → Actions → Side Effects
//!                          ↑                                  ↓
//!                          └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`query`]: Race-tagged product list state
//! - [`detail`]: Selected product with reviews and sentiment
//! - [`input`]: Debounced search input
//! - [`modes`]: Query kinds and loading status types
//! - [`state`]: Central application state container and view model computation

pub mod actions;
pub mod detail;
pub mod handler;
pub mod input;
pub mod modes;
pub mod query;
pub mod state;

pub use actions::Action;
pub use detail::{DetailState, DetailTag};
pub use handler::{handle_event, Event};
pub use input::{DebounceTicket, InputOutcome, SearchInput};
pub use modes::{QueryKind, QueryStatus, Section};
pub use query::{QueryState, QueryTag};
pub use state::{AppState, CategoriesState};
