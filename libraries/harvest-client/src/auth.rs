//! Account operations against the identity backend.

use crate::error::{ClientError, Result};
use crate::store::urlencoding;
use crate::types::{api_error_message, AuthResponse, LookupRequest, LookupResponse, PasswordRequest};
use reqwest::Client;
use tracing::{debug, info, warn};

/// Account client for the identity backend.
pub struct AuthClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    api_key: Option<&'a str>,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, api_key: Option<&'a str>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        match self.api_key {
            Some(key) => format!(
                "{}/v1/accounts:{}?key={}",
                self.base_url,
                action,
                urlencoding::encode(key)
            ),
            None => format!("{}/v1/accounts:{}", self.base_url, action),
        }
    }

    /// Create a new email/password account.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.password_request("signUp", email, password).await
    }

    /// Sign in with email and password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthResponse> {
        self.password_request("signInWithPassword", email, password)
            .await
    }

    async fn password_request(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let url = self.endpoint(action);
        debug!(action = %action, email = %email, "Sending account request");

        let request = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();

        if status.is_success() {
            let auth: AuthResponse = response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse account response: {}", e))
            })?;

            info!(action = %action, uid = %auth.local_id, "Account request succeeded");
            Ok(auth)
        } else if matches!(status.as_u16(), 400 | 401 | 403) {
            let error_text = response.text().await.unwrap_or_default();
            let message = api_error_message(&error_text);
            warn!(action = %action, status = %status, error = %message, "Credential rejected");
            Err(ClientError::AuthFailed(message))
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            })
        }
    }

    /// Look up the account an id token belongs to.
    ///
    /// An expired or unknown token is reported as `AuthRequired`.
    pub async fn lookup(&self, id_token: &str) -> Result<LookupResponse> {
        let url = self.endpoint("lookup");
        debug!("Looking up account for id token");

        let response = self
            .http
            .post(&url)
            .json(&LookupRequest { id_token })
            .send()
            .await
            .map_err(ClientError::transport)?;

        let status = response.status();

        if status.is_success() {
            response.json().await.map_err(|e| {
                ClientError::ParseError(format!("Failed to parse lookup response: {}", e))
            })
        } else if matches!(status.as_u16(), 400 | 401) {
            Err(ClientError::AuthRequired)
        } else {
            let error_text = response.text().await.unwrap_or_default();
            Err(ClientError::ServerError {
                status: status.as_u16(),
                message: api_error_message(&error_text),
            })
        }
    }
}
