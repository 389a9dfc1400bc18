//! Harvest - Buyer Dashboard
//!
//! Client-side logic of the buyer dashboard and the account flows around it.
//!
//! This crate provides:
//! - Session gate (auth-state transitions to load-or-redirect decisions)
//! - Profile loading with display-name fallback
//! - Listing loading into a recency-ordered Working Set
//! - Interest-based recommendations (at most four)
//! - Search / category / quality filtering and sorting
//! - Contact-intent stub
//! - Text projection of listings into display cards
//! - Registration, login, and logout flows
//!
//! # Architecture
//!
//! Everything here is platform-agnostic. The backend is reached only through
//! the `IdentityProvider` and `DocumentStore` traits from `harvest-core`, and
//! nothing touches a DOM: the `BuyerDashboard` view model takes typed events
//! and exposes panels for whatever front end renders them.
//!
//! # Example: Filtering a Working Set
//!
//! ```rust
//! use harvest_core::{Document, Listing};
//! use harvest_dashboard::{ListingFilter, SortKey, WorkingSet};
//! use serde_json::json;
//!
//! let docs = [
//!     Document::new("w", json!({ "cropName": "Wheat", "category": "Grain", "price": 20,
//!                                "status": "available", "createdAt": "2024-01-01T00:00:00Z" })),
//!     Document::new("r", json!({ "cropName": "Rice", "category": "Grain", "price": 15,
//!                                "status": "available", "createdAt": "2024-01-02T00:00:00Z" })),
//! ];
//! let listings = docs.iter().map(|d| Listing::from_document(d).unwrap()).collect();
//! let set = WorkingSet::from_listings(listings);
//!
//! let filter = ListingFilter { sort: SortKey::PriceLow, ..Default::default() };
//! let shown: Vec<_> = filter.apply(&set).into_iter().map(|l| l.id).collect();
//! assert_eq!(shown[0].as_str(), "r");
//! ```

#![forbid(unsafe_code)]

pub mod accounts;
pub mod contact;
pub mod controller;
pub mod filter;
pub mod listings;
pub mod profile;
pub mod recommend;
pub mod render;
pub mod session;
pub mod view;

pub use accounts::{
    login, logout, register_buyer, register_farmer, BuyerRegistration, FarmerRegistration,
    LoginForm,
};
pub use contact::{contact_intent, ContactCard, ContactOutcome};
pub use controller::DashboardController;
pub use filter::{ListingFilter, SortKey};
pub use listings::{load_listings, WorkingSet};
pub use profile::{load_profile, ProfileState};
pub use recommend::{recommend, Recommendation, MAX_RECOMMENDATIONS};
pub use render::{crop_count_label, ListingCard};
pub use session::{GateAction, Redirect, Route, SessionGate, REDIRECT_DELAY};
pub use view::{
    BuyerDashboard, DashboardEvent, DashboardUpdate, ListingsPanel, LoadGeneration, LoadTicket,
    RecommendationsPanel,
};
