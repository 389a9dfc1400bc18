//! Types for backend API requests and responses.

use harvest_core::{AuthUser, Document, FieldFilter, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Configuration for connecting to the backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL of the backend (e.g., "https://backend.example.com")
    pub url: String,
    /// Project API key, sent as `?key=` on account endpoints
    pub api_key: Option<String>,
    /// Current id token (if signed in)
    pub id_token: Option<String>,
}

impl BackendConfig {
    /// Create a new config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            id_token: None,
        }
    }

    /// Create a config carrying a previously issued id token.
    pub fn with_token(url: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            id_token: Some(id_token.into()),
        }
    }

    /// Set the project API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

// =============================================================================
// Account Types
// =============================================================================

/// Request body for sign-up and password sign-in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PasswordRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

/// Response from a successful sign-up or sign-in.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Account uid
    pub local_id: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Token validity in seconds (sent as a string by the backend)
    #[serde(default)]
    pub expires_in: Option<String>,
}

impl AuthResponse {
    /// Signed-in user described by this response
    pub fn user(&self) -> AuthUser {
        AuthUser {
            uid: UserId::new(self.local_id.clone()),
            email: self.email.clone(),
        }
    }
}

/// Request body for account lookup.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LookupRequest<'a> {
    pub id_token: &'a str,
}

/// Account lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub users: Vec<LookupUser>,
}

/// One account in a lookup response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupUser {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl LookupUser {
    /// Signed-in user described by this entry
    pub fn user(&self) -> AuthUser {
        AuthUser {
            uid: UserId::new(self.local_id.clone()),
            email: self.email.clone(),
        }
    }
}

// =============================================================================
// Document Types
// =============================================================================

/// Request body for document writes.
#[derive(Debug, Serialize)]
pub(crate) struct WriteRequest<'a> {
    pub fields: &'a Map<String, Value>,
}

/// Request body for collection queries.
#[derive(Debug, Serialize)]
pub(crate) struct QueryRequest<'a> {
    pub collection: &'a str,
    #[serde(rename = "where")]
    pub filters: &'a [FieldFilter],
}

/// Query response.
#[derive(Debug, Deserialize)]
pub(crate) struct QueryResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
}

// =============================================================================
// Error Types
// =============================================================================

/// API error response from the backend.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiError,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    pub message: String,
}

/// Extract the provider's message from an error body, falling back to the
/// raw text when it is not the expected JSON shape.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.to_string())
}
