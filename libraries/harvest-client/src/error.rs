//! Error types for the backend client.

use harvest_core::HarvestError;
use thiserror::Error;

/// Errors that can occur when talking to the backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Authentication required but no token available
    #[error("Authentication required")]
    AuthRequired,

    /// Credential rejected; carries the provider's message
    #[error("{0}")]
    AuthFailed(String),

    /// Invalid backend URL
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Backend is offline or unreachable
    #[error("Backend unreachable: {0}")]
    ServerUnreachable(String),
}

impl ClientError {
    /// Classify a transport failure
    pub(crate) fn transport(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            Self::ServerUnreachable(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

impl From<ClientError> for HarvestError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::AuthFailed(msg) => HarvestError::Credential(msg),
            ClientError::AuthRequired => HarvestError::AuthRequired,
            ClientError::ServerUnreachable(msg) => HarvestError::Network(msg),
            ClientError::Request(e) => HarvestError::Network(e.to_string()),
            ClientError::ServerError { status, message } => {
                HarvestError::Store(format!("{status}: {message}"))
            }
            ClientError::ParseError(msg) => HarvestError::Store(msg),
            ClientError::InvalidUrl(msg) => HarvestError::InvalidInput(msg),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
