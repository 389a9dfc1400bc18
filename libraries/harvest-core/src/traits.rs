//! Backend boundary traits
//!
//! Authentication and persistence are delegated to an external backend. These
//! traits are the only surface the dashboard logic sees, so the HTTP client and
//! in-memory test doubles are interchangeable.

use crate::error::Result;
use crate::types::{AuthState, AuthUser, Credentials, Document, FieldFilter};
use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::watch;

/// Identity provider: account creation, sign-in/out, auth-state changes
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a new account and sign it in
    async fn create_account(&self, credentials: &Credentials) -> Result<AuthUser>;

    /// Sign in with an existing credential
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthUser>;

    /// Sign the current user out
    async fn sign_out(&self) -> Result<()>;

    /// Subscribe to auth-state transitions
    ///
    /// The receiver starts at the current state. A dropped sender means the
    /// auth service is gone and must be treated as signed out.
    fn subscribe(&self) -> watch::Receiver<AuthState>;

    /// Current auth state
    fn current_state(&self) -> AuthState {
        self.subscribe().borrow().clone()
    }
}

/// Document store: keyed documents grouped in collections
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create or replace a document
    async fn write_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<()>;

    /// Read a single document; `None` when it does not exist
    async fn read_document(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Read every document in `collection` matching all `filters`
    ///
    /// There is no page limit: the full result set is returned.
    async fn query(&self, collection: &str, filters: &[FieldFilter]) -> Result<Vec<Document>>;
}
