//! Main backend client.

use crate::auth::AuthClient;
use crate::error::{ClientError, Result};
use crate::store::StoreClient;
use crate::types::{AuthResponse, BackendConfig};
use async_trait::async_trait;
use harvest_core::{
    AuthState, AuthUser, Credentials, Document, DocumentStore, FieldFilter, IdentityProvider,
};
use reqwest::Client;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, RwLock};
use tracing::{debug, info, warn};

/// Client for the identity and document backend.
///
/// The client holds the id token of the signed-in account and publishes every
/// auth-state transition on a watch channel.
///
/// # Example
///
/// ```ignore
/// use harvest_client::{BackendConfig, HarvestClient};
///
/// let client = HarvestClient::new(BackendConfig::new("https://backend.example.com"))?;
/// let mut auth = client.auth_state();
///
/// client.sign_in("farmer@example.com", "secret").await?;
/// assert!(auth.borrow_and_update().is_signed_in());
/// ```
pub struct HarvestClient {
    http: Client,
    config: Arc<RwLock<BackendConfig>>,
    auth_tx: watch::Sender<AuthState>,
}

impl HarvestClient {
    /// Create a new client with the given configuration.
    pub fn new(config: BackendConfig) -> Result<Self> {
        // Validate URL
        if config.url.is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        // Parse and normalize URL
        let url = config.url.trim_end_matches('/').to_string();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let normalized_config = BackendConfig {
            url,
            api_key: config.api_key,
            id_token: config.id_token,
        };

        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("Harvest/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Request)?;

        let (auth_tx, _) = watch::channel(AuthState::SignedOut);

        Ok(Self {
            http,
            config: Arc::new(RwLock::new(normalized_config)),
            auth_tx,
        })
    }

    /// Get the backend URL.
    pub async fn url(&self) -> String {
        self.config.read().await.url.clone()
    }

    /// Check if the client holds an id token.
    pub async fn is_authenticated(&self) -> bool {
        self.config.read().await.id_token.is_some()
    }

    /// Current id token, for persisting a session between runs.
    pub async fn id_token(&self) -> Option<String> {
        self.config.read().await.id_token.clone()
    }

    /// Subscribe to auth-state transitions.
    pub fn auth_state(&self) -> watch::Receiver<AuthState> {
        self.auth_tx.subscribe()
    }

    /// Create an account. On success the new account is signed in.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let (url, api_key) = self.account_target().await;
        let response = AuthClient::new(&self.http, &url, api_key.as_deref())
            .sign_up(email, password)
            .await?;

        self.store_session(&response).await;
        Ok(response)
    }

    /// Sign in with email and password.
    ///
    /// On success, the id token is stored for subsequent requests.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let (url, api_key) = self.account_target().await;
        let response = AuthClient::new(&self.http, &url, api_key.as_deref())
            .sign_in(email, password)
            .await?;

        self.store_session(&response).await;
        Ok(response)
    }

    /// Clear the stored token and publish `SignedOut`.
    pub async fn sign_out(&self) {
        let mut config = self.config.write().await;
        config.id_token = None;
        drop(config);

        self.auth_tx.send_replace(AuthState::SignedOut);
        info!("Signed out");
    }

    /// Resolve a stored id token into a signed-in session.
    ///
    /// Returns `None` (and publishes `SignedOut`) when there is no token or the
    /// backend no longer accepts it.
    pub async fn restore_session(&self) -> Result<Option<AuthUser>> {
        let config = self.config.read().await;
        let Some(id_token) = config.id_token.clone() else {
            return Ok(None);
        };
        let url = config.url.clone();
        let api_key = config.api_key.clone();
        drop(config);

        let lookup = AuthClient::new(&self.http, &url, api_key.as_deref())
            .lookup(&id_token)
            .await;

        match lookup {
            Ok(response) => match response.users.first().map(|u| u.user()) {
                Some(user) => {
                    info!(uid = %user.uid, "Session restored");
                    self.auth_tx.send_replace(AuthState::SignedIn(user.clone()));
                    Ok(Some(user))
                }
                None => {
                    warn!("Token lookup returned no account");
                    self.sign_out().await;
                    Ok(None)
                }
            },
            Err(ClientError::AuthRequired) => {
                warn!("Stored token rejected");
                self.sign_out().await;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Validate the current id token.
    pub async fn validate_token(&self) -> Result<bool> {
        let config = self.config.read().await;
        let id_token = match &config.id_token {
            Some(t) => t.clone(),
            None => return Ok(false),
        };
        let url = config.url.clone();
        let api_key = config.api_key.clone();
        drop(config);

        match AuthClient::new(&self.http, &url, api_key.as_deref())
            .lookup(&id_token)
            .await
        {
            Ok(response) => Ok(!response.users.is_empty()),
            Err(ClientError::AuthRequired) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Get a document from the store.
    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let (url, token) = self.store_target().await?;
        StoreClient::new(&self.http, &url, &token)
            .get_document(collection, id)
            .await
    }

    /// Create or replace a document.
    pub async fn set_document(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        let (url, token) = self.store_target().await?;
        StoreClient::new(&self.http, &url, &token)
            .set_document(collection, id, fields)
            .await
    }

    /// Fetch every document matching the filters.
    pub async fn run_query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> Result<Vec<Document>> {
        let (url, token) = self.store_target().await?;
        StoreClient::new(&self.http, &url, &token)
            .run_query(collection, filters)
            .await
    }

    async fn account_target(&self) -> (String, Option<String>) {
        let config = self.config.read().await;
        (config.url.clone(), config.api_key.clone())
    }

    /// Store operations require a signed-in account.
    async fn store_target(&self) -> Result<(String, String)> {
        let config = self.config.read().await;
        let token = config
            .id_token
            .clone()
            .ok_or(ClientError::AuthRequired)?;
        Ok((config.url.clone(), token))
    }

    async fn store_session(&self, response: &AuthResponse) {
        let mut config = self.config.write().await;
        config.id_token = Some(response.id_token.clone());
        drop(config);

        let user = response.user();
        debug!(uid = %user.uid, "Publishing signed-in state");
        self.auth_tx.send_replace(AuthState::SignedIn(user));
    }
}

#[async_trait]
impl IdentityProvider for HarvestClient {
    async fn create_account(&self, credentials: &Credentials) -> harvest_core::Result<AuthUser> {
        let response = self
            .sign_up(&credentials.email, &credentials.password)
            .await?;
        Ok(response.user())
    }

    async fn sign_in(&self, credentials: &Credentials) -> harvest_core::Result<AuthUser> {
        let response = HarvestClient::sign_in(self, &credentials.email, &credentials.password)
            .await?;
        Ok(response.user())
    }

    async fn sign_out(&self) -> harvest_core::Result<()> {
        HarvestClient::sign_out(self).await;
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.auth_tx.subscribe()
    }

    fn current_state(&self) -> AuthState {
        self.auth_tx.borrow().clone()
    }
}

#[async_trait]
impl DocumentStore for HarvestClient {
    async fn write_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> harvest_core::Result<()> {
        Ok(self.set_document(collection, id, &fields).await?)
    }

    async fn read_document(
        &self,
        collection: &str,
        id: &str,
    ) -> harvest_core::Result<Option<Document>> {
        Ok(self.get_document(collection, id).await?)
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[FieldFilter],
    ) -> harvest_core::Result<Vec<Document>> {
        Ok(self.run_query(collection, filters).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_validation() {
        // Valid URLs
        assert!(HarvestClient::new(BackendConfig::new("https://example.com")).is_ok());
        assert!(HarvestClient::new(BackendConfig::new("http://localhost:8080")).is_ok());

        // Invalid URLs
        assert!(HarvestClient::new(BackendConfig::new("")).is_err());
        assert!(HarvestClient::new(BackendConfig::new("not-a-url")).is_err());
        assert!(HarvestClient::new(BackendConfig::new("ftp://example.com")).is_err());
    }

    #[test]
    fn starts_signed_out() {
        let client = HarvestClient::new(BackendConfig::new("https://example.com")).unwrap();
        assert_eq!(client.current_state(), AuthState::SignedOut);
    }
}
