//! Harvest Core
//!
//! Platform-agnostic domain types, boundary traits, and error handling for the
//! Harvest crop marketplace.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `UserProfile`, `Listing`, `Document`, `AuthState`
//! - **Boundary Traits**: `IdentityProvider`, `DocumentStore`
//! - **Error Handling**: Unified `HarvestError` and `Result` types
//!
//! Persistence and authentication live in a remote backend. Everything in
//! this crate is independent of how that backend is reached.
//!
//! # Example
//!
//! ```rust
//! use harvest_core::types::{Document, Listing, ListingStatus};
//! use serde_json::json;
//!
//! let doc = Document::new(
//!     "crop-1",
//!     json!({ "cropName": "Wheat", "price": 20, "status": "available" }),
//! );
//!
//! let listing = Listing::from_document(&doc).unwrap();
//! assert_eq!(listing.name.as_deref(), Some("Wheat"));
//! assert_eq!(listing.status, ListingStatus::Available);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{HarvestError, Result};
pub use traits::{DocumentStore, IdentityProvider};

pub use types::{
    // Identity
    AuthState, AuthUser, Credentials,
    // Documents
    Document, FieldFilter, FilterOp, CROPS_COLLECTION, USERS_COLLECTION,
    // Profiles
    BuyerProfile, FarmerProfile, UserProfile, UserRole,
    // Listings
    Listing, ListingStatus,
    // Ids
    ListingId, UserId,
};
