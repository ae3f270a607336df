//! Error types for the portal SDK.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the data service.
#[derive(Error, Debug)]
pub enum PortalError {
    /// API returned an error response not covered by a specific variant
    #[error("API Error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the service
        message: String,
    },

    /// Network or connection error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Request timed out
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Authentication failed (401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Access denied (403)
    #[error("Access denied: {0}")]
    Authorization(String),

    /// Resource not found (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Server error (5xx)
    #[error("Server error: {0}")]
    Server(String),

    /// The token provider could not supply a bearer token
    #[error("Token acquisition failed: {0}")]
    Token(String),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization or deserialization failure
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failure
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Domain-layer failure while converting records or form values
    #[error("Record conversion error: {0}")]
    Record(#[from] dotport_core::CoreError),

    /// The service answered with a body the client cannot use
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result alias used across the SDK.
pub type PortalResult<T> = Result<T, PortalError>;

/// Error envelope the data service returns for failed calls.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl PortalError {
    /// Map a failed response to an error, preferring the service's error
    /// envelope and falling back to the raw body text.
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            401 => PortalError::Authentication(message),
            403 => PortalError::Authorization(message),
            404 => PortalError::NotFound(message),
            500..=599 => PortalError::Server(message),
            _ => PortalError::Api { status, message },
        }
    }

    /// Whether the transport layer retries this failure automatically.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PortalError::Network(_) | PortalError::Timeout(_) | PortalError::Server(_)
        )
    }

    /// HTTP status associated with this error, when one applies.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PortalError::Api { status, .. } => Some(*status),
            PortalError::Authentication(_) => Some(401),
            PortalError::Authorization(_) => Some(403),
            PortalError::NotFound(_) => Some(404),
            PortalError::Server(_) => Some(500),
            _ => None,
        }
    }
}
