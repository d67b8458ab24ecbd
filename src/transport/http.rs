//! `reqwest`-backed [`Transport`].

use crate::domain::error::{ConfigError, TransportError};
use crate::transport::{ApiRequest, RawResponse, RequestId, RequestPurpose, Transport};
use crate::Config;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Url;
use std::time::{Duration, Instant};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP client bound to one backend base URL.
///
/// Construction goes through [`Config::api_url`], so an instance can only exist
/// for a validated URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    query_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the base URL is missing, a placeholder, or
    /// not an absolute http(s) URL, or when the HTTP client cannot be built.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let base_url = config.api_url()?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            query_timeout: config.query_timeout,
            probe_timeout: config.probe_timeout,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    const fn timeout_for(&self, purpose: RequestPurpose) -> Duration {
        match purpose {
            RequestPurpose::Query => self.query_timeout,
            RequestPurpose::HealthProbe => self.probe_timeout,
        }
    }

    /// Appends `path` to the base URL, keeping any path prefix the base carries.
    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        let joined = format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path);
        Url::parse(&joined).map_err(|e| TransportError::Request {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn classify(&self, error: &reqwest::Error, target: &str, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                path: target.to_string(),
                after: timeout,
            }
        } else if error.is_connect() {
            TransportError::ConnectionRefused {
                base_url: self.base_url.to_string(),
            }
        } else {
            TransportError::Request {
                path: target.to_string(),
                reason: error.to_string(),
            }
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let request_id = RequestId::generate();
        let timeout = self.timeout_for(request.purpose);
        let target = request.target();
        let url = self.endpoint(&request.path)?;

        tracing::debug!(request_id = %request_id, target = %target, "api request");
        let started = Instant::now();

        let response = match self
            .client
            .get(url)
            .query(&request.params)
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let error = self.classify(&e, &target, timeout);
                tracing::warn!(
                    request_id = %request_id,
                    target = %target,
                    elapsed_ms = elapsed_ms(started),
                    error = %error,
                    "api request failed"
                );
                return Err(error);
            }
        };

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify(&e, &target, timeout))?;

        if status.is_success() {
            tracing::debug!(
                request_id = %request_id,
                target = %target,
                status = status.as_u16(),
                bytes = body.len(),
                elapsed_ms = elapsed_ms(started),
                "api response"
            );
        } else {
            tracing::warn!(
                request_id = %request_id,
                target = %target,
                status = status.as_u16(),
                bytes = body.len(),
                elapsed_ms = elapsed_ms(started),
                "api request rejected"
            );
        }

        Ok(RawResponse {
            request_id,
            status: status.as_u16(),
            body: body.to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> Config {
        Config {
            api_url: Some(url.to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let transport = HttpTransport::new(&config("http://127.0.0.1:5000/api/")).unwrap();
        assert_eq!(
            transport.endpoint("/getAllProduct").unwrap().as_str(),
            "http://127.0.0.1:5000/api/getAllProduct"
        );

        let transport = HttpTransport::new(&config("http://127.0.0.1:5000")).unwrap();
        assert_eq!(
            transport.endpoint("/").unwrap().as_str(),
            "http://127.0.0.1:5000/"
        );
    }

    #[test]
    fn test_timeouts_follow_purpose() {
        let mut config = config("http://127.0.0.1:5000");
        config.query_timeout = Duration::from_secs(10);
        config.probe_timeout = Duration::from_secs(5);
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(transport.timeout_for(RequestPurpose::Query), Duration::from_secs(10));
        assert_eq!(
            transport.timeout_for(RequestPurpose::HealthProbe),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_missing_url_fails_before_any_request() {
        let result = HttpTransport::new(&Config::default());
        assert_eq!(result.unwrap_err(), ConfigError::MissingApiUrl);
    }
}
