//! Strict decoding of the backend's `{error, message, data}` envelope.

use crate::domain::error::DomainError;
use crate::domain::Validate;
use crate::transport::RawResponse;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    error: bool,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Error envelope as it may appear on a non-2xx response. Only the fields
/// needed to recognise a rejection are read.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: bool,
    #[serde(default)]
    message: String,
}

fn rejected(operation: &str, message: String) -> DomainError {
    let message = if message.trim().is_empty() {
        format!("{operation} failed")
    } else {
        message
    };
    DomainError::Rejected { message }
}

/// The backend's rejection carried by `response`, if its body is an
/// `error: true` envelope. Used for non-2xx responses, where the status alone
/// would otherwise hide the backend's message.
#[must_use]
pub fn rejection(operation: &str, response: &RawResponse) -> Option<DomainError> {
    let envelope: ErrorEnvelope = serde_json::from_slice(&response.body).ok()?;
    envelope
        .error
        .then(|| rejected(operation, envelope.message))
}

/// Unwraps the envelope in `response` into a validated `T`.
///
/// `error: true` wins over everything else. A success envelope with no `data`
/// (absent or `null`) is a [`DomainError::MissingData`], never an empty value.
///
/// # Errors
///
/// Returns [`DomainError::Rejected`] with the backend's message, or
/// [`DomainError::MissingData`] / [`DomainError::Malformed`] for bodies that do
/// not carry a well-formed `T`.
pub fn decode<T>(operation: &str, response: &RawResponse) -> Result<T, DomainError>
where
    T: DeserializeOwned + Validate,
{
    let envelope: Envelope =
        serde_json::from_slice(&response.body).map_err(|e| DomainError::Malformed {
            operation: operation.to_string(),
            reason: format!("not a response envelope: {e}"),
        })?;

    if envelope.error {
        return Err(rejected(operation, envelope.message));
    }

    let data = envelope.data.ok_or_else(|| DomainError::MissingData {
        operation: operation.to_string(),
    })?;

    let value: T = serde_json::from_value(data).map_err(|e| DomainError::Malformed {
        operation: operation.to_string(),
        reason: e.to_string(),
    })?;
    value.validate().map_err(|reason| DomainError::Malformed {
        operation: operation.to_string(),
        reason,
    })?;

    Ok(value)
}
