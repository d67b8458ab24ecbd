//! Outbound HTTP to the catalog backend.
//!
//! [`Transport`] is the seam between resource accessors and the network: one
//! call in, one raw response (or a classified [`TransportError`]) out. Any
//! status comes back as a [`RawResponse`]; callers decide whether the body or
//! the status wins. The
//! production implementation is [`HttpTransport`]; tests substitute a scripted
//! double.
//!
//! The transport never retries. Retrying is a user command at the session level.

pub mod http;
#[cfg(test)]
pub(crate) mod scripted;

pub use http::HttpTransport;

use crate::domain::error::TransportError;
use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

/// Which timeout bound applies to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestPurpose {
    /// Catalog reads (products, reviews, categories, sentiment).
    Query,
    /// Reachability checks against `/`.
    HealthProbe,
}

/// A GET request relative to the configured backend base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub params: Vec<(String, String)>,
    pub purpose: RequestPurpose,
}

impl ApiRequest {
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
            purpose: RequestPurpose::Query,
        }
    }

    #[must_use]
    pub fn probe(path: impl Into<String>) -> Self {
        Self {
            purpose: RequestPurpose::HealthProbe,
            ..Self::get(path)
        }
    }

    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    /// Path plus query string, used in logs and error messages.
    #[must_use]
    pub fn target(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self
            .params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

/// Correlation id attached to every call; only used for logs and latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(Uuid);

impl RequestId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A response whose body has not been interpreted yet.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub request_id: RequestId,
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Maps a non-success status to its error class; `None` for 2xx.
    #[must_use]
    pub fn status_error(&self, target: &str) -> Option<TransportError> {
        if self.is_success() {
            None
        } else if (500..600).contains(&self.status) {
            Some(TransportError::ServerFault {
                status: self.status,
                path: target.to_string(),
            })
        } else {
            Some(TransportError::ClientFault {
                status: self.status,
                path: target.to_string(),
            })
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the backend is unreachable, the request
    /// times out, or the body cannot be read. A non-2xx status is not an error
    /// at this level.
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_includes_params_in_order() {
        let request = ApiRequest::get("/getAllProductsByName").param("name", "jam tangan");
        assert_eq!(request.target(), "/getAllProductsByName?name=jam tangan");
        assert_eq!(request.purpose, RequestPurpose::Query);
        assert_eq!(ApiRequest::probe("/").target(), "/");
        assert_eq!(ApiRequest::probe("/").purpose, RequestPurpose::HealthProbe);
    }

    fn raw(status: u16) -> RawResponse {
        RawResponse {
            request_id: RequestId::generate(),
            status,
            body: Vec::new(),
        }
    }

    #[test]
    fn test_status_classification() {
        assert!(raw(200).status_error("/").is_none());
        assert!(raw(204).is_success());
        assert_eq!(
            raw(503).status_error("/getAllProduct"),
            Some(TransportError::ServerFault {
                status: 503,
                path: "/getAllProduct".to_string()
            })
        );
        assert_eq!(
            raw(404).status_error("/getProductById/9"),
            Some(TransportError::ClientFault {
                status: 404,
                path: "/getProductById/9".to_string()
            })
        );
    }

    #[test]
    fn test_request_ids_are_unique() {
        assert_ne!(RequestId::generate(), RequestId::generate());
    }
}
