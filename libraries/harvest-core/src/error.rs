/// Core error types for Harvest
use thiserror::Error;

/// Result type alias using `HarvestError`
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Core error type for Harvest
#[derive(Error, Debug)]
pub enum HarvestError {
    /// Credential rejected by the identity provider (bad password, duplicate
    /// account, ...). The message is the provider's own wording.
    #[error("{0}")]
    Credential(String),

    /// Operation needs a signed-in user
    #[error("Authentication required")]
    AuthRequired,

    /// Document store query or read failed
    #[error("Store error: {0}")]
    Store(String),

    /// Backend could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl HarvestError {
    /// Create a credential error
    pub fn credential(msg: impl Into<String>) -> Self {
        Self::Credential(msg.into())
    }

    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Text suitable for a visible error region.
    ///
    /// Credential and validation messages are passed through untouched so the
    /// user sees exactly what the provider (or form check) reported.
    pub fn user_message(&self) -> String {
        match self {
            Self::Credential(msg) | Self::InvalidInput(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
