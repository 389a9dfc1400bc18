//! Text projection of listings
//!
//! Front ends render `ListingCard`s however they like; the `Display` impl is
//! the plain-text card used by the CLI.

use chrono::NaiveDate;
use harvest_core::{Listing, ListingId};
use std::fmt;

/// Shown in place of the listing grid when the load fails
pub const LOAD_ERROR_NOTICE: &str =
    "Error loading crops. Please refresh the page or check console.";
/// Shown when the Displayed Subset is empty
pub const EMPTY_NOTICE: &str = "No crops available at the moment. Check back later!";
/// Recommendation placeholder for buyers without interests or listings
pub const BROWSE_ALL_NOTICE: &str = "Browse all crops below.";
/// Interests declared but nothing matched
pub const NO_RECOMMENDATIONS_NOTICE: &str = "No recommendations yet. Browse all crops below.";
/// Contact card headline
pub const CONTACT_COMING_SOON: &str = "Contact Coming Soon!";
/// Contact card detail line
pub const CONTACT_COMING_SOON_DETAIL: &str =
    "Direct messaging and phone contact features will be added soon.";
/// Contact requested for an id outside the Working Set
pub const CROP_NOT_FOUND_NOTICE: &str = "Crop not found";
/// Image used when a listing has none
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://via.placeholder.com/300x200/90EE90/228B22?text=No+Image";

const NOT_AVAILABLE: &str = "N/A";

/// Format a quantity or price, dropping the fraction of integral values
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Format a harvest date for display
pub fn format_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(
        || NOT_AVAILABLE.to_string(),
        |d| d.format("%d %b %Y").to_string(),
    )
}

/// Listing counter text
pub fn crop_count_label(count: usize) -> String {
    format!("{count} crops found")
}

/// Display projection of one listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCard {
    pub id: ListingId,
    pub name: String,
    pub status: String,
    pub category: String,
    pub quantity: String,
    pub quality: String,
    pub harvest_date: String,
    pub price: String,
    pub description: Option<String>,
    pub image_url: String,
    /// Carries the "Recommended" badge
    pub recommended: bool,
}

impl ListingCard {
    pub fn from_listing(listing: &Listing, recommended: bool) -> Self {
        let or = |value: &Option<String>, fallback: &str| {
            value.clone().unwrap_or_else(|| fallback.to_string())
        };

        Self {
            id: listing.id.clone(),
            name: or(&listing.name, "Unnamed Crop"),
            status: listing.status.to_string(),
            category: or(&listing.category, NOT_AVAILABLE),
            quantity: format!("{} kg", format_amount(listing.quantity_or_zero())),
            quality: or(&listing.quality, "Standard"),
            harvest_date: format_date(listing.harvest_date),
            price: format!("₹{}/kg", format_amount(listing.price_or_zero())),
            description: listing.description.clone(),
            image_url: or(&listing.image_url, PLACEHOLDER_IMAGE_URL),
            recommended,
        }
    }
}

impl fmt::Display for ListingCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.status)?;
        if self.recommended {
            f.write_str(" * Recommended")?;
        }
        writeln!(f)?;
        writeln!(f, "  Category: {}", self.category)?;
        writeln!(f, "  Quantity: {}", self.quantity)?;
        writeln!(f, "  Quality:  {}", self.quality)?;
        writeln!(f, "  Harvest:  {}", self.harvest_date)?;
        writeln!(f, "  Price:    {}", self.price)?;
        if let Some(description) = &self.description {
            writeln!(f, "  {description}")?;
        }
        write!(f, "  id: {}", self.id)
    }
}
