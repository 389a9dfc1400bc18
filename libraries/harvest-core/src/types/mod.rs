mod auth;
mod document;
mod ids;
mod lenient;
mod listing;
mod profile;

pub use auth::{AuthState, AuthUser, Credentials};
pub use document::{Document, FieldFilter, FilterOp, CROPS_COLLECTION, USERS_COLLECTION};
pub use ids::{ListingId, UserId};
pub use listing::{Listing, ListingStatus};
pub use profile::{BuyerProfile, FarmerProfile, UserProfile, UserRole};
