/// Authentication types
use super::ids::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Email/password credential
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// Account email
    pub email: String,
    /// Plain password, only ever sent to the identity provider
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed-in account as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider-assigned uid; also the key of the profile document
    pub uid: UserId,
    /// Account email, when the provider reports it
    pub email: Option<String>,
}

/// Authentication state published on every transition
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
    /// No user (including the initial unauthenticated state)
    #[default]
    SignedOut,
    /// A user is signed in
    SignedIn(AuthUser),
}

impl AuthState {
    /// The signed-in user, if any
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Self::SignedIn(user) => Some(user),
            Self::SignedOut => None,
        }
    }

    /// Whether a user is signed in
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }
}
