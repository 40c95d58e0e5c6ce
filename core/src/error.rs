//! Error types for the car API client.
//!
//! # Design
//! A request has exactly two ways to fail: the server answered with a status
//! other than the one the operation expects, or no answer arrived at all.
//! Both are `RequestFailure` variants, so callers can tell them apart by
//! type, while `status_code()` still offers the flat numeric view where a
//! missing response reads as `0`.
//!
//! Everything that can go wrong around a request (payload validation,
//! JSON encoding and decoding) lives in `ApiError`.

use thiserror::Error;

/// Status code reported when no HTTP response was received.
pub const TRANSPORT_ERROR_STATUS: u16 = 0;

/// The non-success outcome of a single request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestFailure {
    /// The server replied with a status other than the expected one.
    #[error("HTTP {status} (expected {expected})")]
    Status {
        status: u16,
        expected: u16,
        body: String,
    },

    /// No response arrived: connection refused, DNS, TLS, reset, ...
    #[error("transport error: {0}")]
    Transport(String),
}

impl RequestFailure {
    /// The received status, or `TRANSPORT_ERROR_STATUS` when there was none.
    pub fn status_code(&self) -> u16 {
        match self {
            RequestFailure::Status { status, .. } => *status,
            RequestFailure::Transport(_) => TRANSPORT_ERROR_STATUS,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, RequestFailure::Transport(_))
    }
}

/// Error raised by a `Transport` when the request never produced a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

impl From<TransportError> for RequestFailure {
    fn from(err: TransportError) -> Self {
        RequestFailure::Transport(err.0)
    }
}

/// A form value that cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("field `{field}` is not an integer: {value:?}")]
    NotAnInteger { field: String, value: String },
}

/// Errors returned by client operations that do more than one request.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Request(#[from] RequestFailure),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),
}
