//! Fetch worker: turns handler-emitted messages into accessor calls.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol, tagged for race resolution
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::FetchWorker;
pub use messages::{WorkerMessage, WorkerResponse};
