//! Harvest Backend Client
//!
//! HTTP client library for the identity and document backend behind the
//! Harvest marketplace.
//!
//! # Features
//!
//! - **Accounts**: Create account, sign in with email/password, sign out
//! - **Auth state**: Transitions published on a `tokio::sync::watch` channel
//! - **Documents**: Read, write, and query documents by collection
//!
//! `HarvestClient` implements both `harvest_core::IdentityProvider` and
//! `harvest_core::DocumentStore`, so it can be handed straight to the
//! dashboard.
//!
//! # Example
//!
//! ```ignore
//! use harvest_client::{BackendConfig, HarvestClient};
//! use harvest_core::{FieldFilter, CROPS_COLLECTION};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = HarvestClient::new(BackendConfig::new("https://backend.example.com"))?;
//!
//!     let auth = client.sign_in("buyer@example.com", "secret").await?;
//!     println!("Signed in as {}", auth.local_id);
//!
//!     let crops = client
//!         .run_query(CROPS_COLLECTION, &[FieldFilter::eq("status", "available")])
//!         .await?;
//!     println!("Found {} crops", crops.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod error;
mod store;
mod types;

// Re-export main types
pub use client::HarvestClient;
pub use error::{ClientError, Result};
pub use types::{AuthResponse, BackendConfig, LookupResponse, LookupUser};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use store::StoreClient;
