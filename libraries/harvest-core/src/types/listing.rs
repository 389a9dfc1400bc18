//! Crop listing types
//!
//! A listing is one sellable batch of a crop. Listings are written by the
//! farmer-side flow; everything here only reads them.

use super::document::Document;
use super::ids::ListingId;
use super::lenient;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability status of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    /// Open for buyers
    Available,
    /// Sold out
    Sold,
    /// Held for a buyer
    Reserved,
    /// Absent or unrecognised status
    Unknown,
}

impl ListingStatus {
    /// Wire value used in store queries
    pub const AVAILABLE: &'static str = "available";

    /// Parse a wire value; unrecognised strings map to `Unknown`
    pub fn parse(s: &str) -> Self {
        match s {
            "available" => Self::Available,
            "sold" => Self::Sold,
            "reserved" => Self::Reserved,
            _ => Self::Unknown,
        }
    }

    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => Self::AVAILABLE,
            Self::Sold => "sold",
            Self::Reserved => "reserved",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One crop-for-sale record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Store-assigned document id
    pub id: ListingId,
    /// Crop name (`cropName` on the wire)
    pub name: Option<String>,
    pub category: Option<String>,
    /// Quantity in kg
    pub quantity: Option<f64>,
    /// Quality grade
    pub quality: Option<String>,
    /// Unit price per kg
    pub price: Option<f64>,
    pub harvest_date: Option<NaiveDate>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub status: ListingStatus,
    pub created_at: Option<DateTime<Utc>>,
}

impl Listing {
    /// Build a listing from a crop document.
    ///
    /// Unusable field values are treated as missing rather than failing the
    /// record, so one malformed document never hides the rest.
    pub fn from_document(doc: &Document) -> Result<Self> {
        let text = |name: &str| doc.field(name).and_then(lenient::text);
        let number = |name: &str| doc.field(name).and_then(lenient::number);

        Ok(Self {
            id: ListingId::new(doc.id.clone()),
            name: text("cropName"),
            category: text("category"),
            quantity: number("quantity"),
            quality: text("quality"),
            price: number("price"),
            harvest_date: doc.field("harvestDate").and_then(lenient::date),
            description: text("description"),
            image_url: text("imageUrl"),
            status: text("status")
                .map(|s| ListingStatus::parse(&s))
                .unwrap_or(ListingStatus::Unknown),
            created_at: doc.field("createdAt").and_then(lenient::timestamp),
        })
    }

    /// Unit price, missing treated as 0
    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    /// Quantity, missing treated as 0
    pub fn quantity_or_zero(&self) -> f64 {
        self.quantity.unwrap_or(0.0)
    }

    /// Whether the listing is open for buyers
    pub fn is_available(&self) -> bool {
        self.status == ListingStatus::Available
    }
}
