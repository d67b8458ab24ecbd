//! Error types for tokotrends.
//!
//! Failures are split by the layer that detects them:
//!
//! - [`TransportError`]: the HTTP exchange itself failed (unreachable backend,
//!   timeout, non-2xx status).
//! - [`DomainError`]: the exchange succeeded but the envelope signalled a failure
//!   or its payload did not match the expected shape.
//! - [`ConfigError`]: the process is misconfigured; detected before any request.
//!
//! Resource accessors return [`ApiError`], which is either of the first two. It is
//! `Clone` so completed fetches can travel back to the state owner inside events.
//! [`TrendsError`] is the umbrella used at the library and binary boundary.

use std::time::Duration;
use thiserror::Error;

/// Failure of a single HTTP exchange with the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The backend could not be reached at all.
    #[error(
        "cannot connect to the backend at {base_url}; the catalog service appears to be down, \
         make sure it is running and reachable"
    )]
    ConnectionRefused { base_url: String },

    /// The backend answered with a 5xx status.
    #[error("backend failed while serving {path} (HTTP {status}); this is usually temporary, try again")]
    ServerFault { status: u16, path: String },

    /// The backend rejected the request with a 4xx (or other non-success) status.
    #[error("backend rejected the request to {path} (HTTP {status})")]
    ClientFault { status: u16, path: String },

    /// No complete response arrived within the request bound.
    #[error("request to {path} timed out after {}ms", .after.as_millis())]
    Timeout { path: String, after: Duration },

    /// Any other failure while sending the request or reading the body.
    #[error("request to {path} failed: {reason}")]
    Request { path: String, reason: String },
}

impl TransportError {
    /// Whether a manual retry has a reasonable chance of succeeding.
    ///
    /// Client faults are caller errors and will fail the same way again.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::ConnectionRefused { .. } | Self::ServerFault { .. } | Self::Timeout { .. }
        )
    }
}

/// The backend answered, but not with usable data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The envelope carried `error: true`; the message is the backend's own.
    #[error("{message}")]
    Rejected { message: String },

    /// A success envelope without `data` (or with `data: null`).
    #[error("{operation}: backend reported success but returned no data")]
    MissingData { operation: String },

    /// The body was not a valid envelope, or `data` had the wrong shape.
    #[error("{operation}: malformed response: {reason}")]
    Malformed { operation: String, reason: String },
}

/// Error returned by resource accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl ApiError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_transient(),
            Self::Domain(_) => false,
        }
    }
}

/// Startup misconfiguration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(
        "backend URL is not configured; set TOKOTRENDS_API_URL or pass --api-url \
         (for example http://127.0.0.1:5000)"
    )]
    MissingApiUrl,

    #[error(
        "backend URL `{0}` looks like an unfilled placeholder; replace it with the real \
         backend address (for example http://127.0.0.1:5000)"
    )]
    PlaceholderApiUrl(String),

    #[error("backend URL `{url}` is invalid: {reason}")]
    InvalidApiUrl { url: String, reason: String },

    #[error("invalid value `{value}` for `{key}`: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    #[error("cannot load configuration file {path}: {reason}")]
    File { path: String, reason: String },

    #[error("cannot build HTTP client: {0}")]
    Client(String),
}

/// Umbrella error for library entry points and the binary.
#[derive(Debug, Error)]
pub enum TrendsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The session event loop is gone.
    #[error("session closed")]
    SessionClosed,
}

impl From<TransportError> for TrendsError {
    fn from(e: TransportError) -> Self {
        Self::Api(e.into())
    }
}

impl From<DomainError> for TrendsError {
    fn from(e: DomainError) -> Self {
        Self::Api(e.into())
    }
}

/// A specialized `Result` type for tokotrends entry points.
pub type Result<T> = std::result::Result<T, TrendsError>;
