//! Contact intent stub
//!
//! Looks a listing up in the full Working Set (not the Displayed Subset, so
//! filtered-out listings stay contactable) and produces a "coming soon" card.
//! No network call and no state change.

use crate::listings::WorkingSet;
use crate::render::{
    format_amount, format_date, CONTACT_COMING_SOON, CONTACT_COMING_SOON_DETAIL,
    CROP_NOT_FOUND_NOTICE,
};
use harvest_core::{Listing, ListingId};
use std::fmt;
use tracing::{debug, warn};

/// Modal content for a contact request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCard {
    pub listing_id: ListingId,
    pub crop_name: String,
    /// "{quantity} kg @ ₹{price}/kg"
    pub offer: String,
    /// "{quality} - {category}"
    pub grade: String,
    pub harvest_date: String,
    pub headline: &'static str,
    pub detail: &'static str,
}

impl ContactCard {
    fn from_listing(listing: &Listing) -> Self {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();

        Self {
            listing_id: listing.id.clone(),
            crop_name: text(&listing.name),
            offer: format!(
                "{} kg @ ₹{}/kg",
                format_amount(listing.quantity_or_zero()),
                format_amount(listing.price_or_zero())
            ),
            grade: format!("{} - {}", text(&listing.quality), text(&listing.category)),
            harvest_date: format_date(listing.harvest_date),
            headline: CONTACT_COMING_SOON,
            detail: CONTACT_COMING_SOON_DETAIL,
        }
    }
}

impl fmt::Display for ContactCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.crop_name)?;
        writeln!(f, "  {}", self.offer)?;
        writeln!(f, "  Quality & Category: {}", self.grade)?;
        writeln!(f, "  Harvest Date: {}", self.harvest_date)?;
        writeln!(f)?;
        writeln!(f, "{}", self.headline)?;
        write!(f, "{}", self.detail)
    }
}

/// Result of a contact request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    ComingSoon(ContactCard),
    /// Non-fatal: the id is not in the Working Set
    NotFound,
}

impl ContactOutcome {
    /// Alert text for the not-found case
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Self::NotFound => Some(CROP_NOT_FOUND_NOTICE),
            Self::ComingSoon(_) => None,
        }
    }
}

/// Resolve a contact request against the Working Set
pub fn contact_intent(set: &WorkingSet, id: &ListingId) -> ContactOutcome {
    match set.find(id) {
        Some(listing) => {
            debug!(listing = %id, "Contact requested");
            ContactOutcome::ComingSoon(ContactCard::from_listing(listing))
        }
        None => {
            warn!(listing = %id, "Contact requested for unknown crop");
            ContactOutcome::NotFound
        }
    }
}
