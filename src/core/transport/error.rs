//! Transport error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors that can occur in transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Failed to bind to address.
    #[error("Failed to bind to {address}: {source}")]
    BindError {
        address: String,
        #[source]
        source: std::io::Error,
    },

    /// A message could not be decoded.
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// The referenced SSE session does not exist.
    #[error("Could not find session: {0}")]
    SessionNotFound(String),

    /// The SSE session exists but is no longer accepting messages.
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// HTTP-specific error.
    #[error("HTTP error: {0}")]
    HttpError(String),
}

impl TransportError {
    /// Create a bind error.
    pub fn bind(address: impl Into<String>, source: std::io::Error) -> Self {
        Self::BindError {
            address: address.into(),
            source,
        }
    }

    /// Create a protocol error.
    pub fn protocol(msg: impl Into<String>) -> Self {
        Self::ProtocolError(msg.into())
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Self::HttpError(msg.into())
    }

    /// HTTP status used when this error terminates a request.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::ProtocolError(_) => StatusCode::BAD_REQUEST,
            Self::SessionNotFound(_) => StatusCode::NOT_FOUND,
            Self::SessionClosed(_) => StatusCode::GONE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            TransportError::protocol("bad json").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            TransportError::SessionNotFound("abc".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            TransportError::http("boom").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
