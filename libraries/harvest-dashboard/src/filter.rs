//! Filter/Sort engine
//!
//! A pure function of (Working Set, search text, category, quality, sort key)
//! to the Displayed Subset. Every control change recomputes the subset from
//! the full Working Set.

use crate::listings::{newest_first, WorkingSet};
use harvest_core::Listing;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Sort order of the Displayed Subset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Descending by creation timestamp
    #[default]
    Newest,
    /// Ascending by unit price (missing = 0)
    PriceLow,
    /// Descending by unit price (missing = 0)
    PriceHigh,
    /// Descending by quantity (missing = 0)
    Quantity,
}

impl SortKey {
    /// Parse a control value; anything unrecognised sorts by newest
    pub fn parse(value: &str) -> Self {
        match value {
            "price-low" => Self::PriceLow,
            "price-high" => Self::PriceHigh,
            "quantity" => Self::Quantity,
            _ => Self::Newest,
        }
    }

    /// Control value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Quantity => "quantity",
        }
    }

    /// Comparator for this key
    pub fn compare(&self, a: &Listing, b: &Listing) -> Ordering {
        match self {
            Self::PriceLow => a.price_or_zero().total_cmp(&b.price_or_zero()),
            Self::PriceHigh => b.price_or_zero().total_cmp(&a.price_or_zero()),
            Self::Quantity => b.quantity_or_zero().total_cmp(&a.quantity_or_zero()),
            Self::Newest => newest_first(a, b),
        }
    }
}

impl FromStr for SortKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current values of the four dashboard controls
///
/// Empty strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Free text matched against name or category
    pub search: String,
    /// Exact category
    pub category: String,
    /// Exact quality grade
    pub quality: String,
    pub sort: SortKey,
}

impl ListingFilter {
    /// Whether a listing passes all three predicates
    pub fn matches(&self, listing: &Listing) -> bool {
        self.matches_search(listing)
            && exact(&self.category, listing.category.as_deref())
            && exact(&self.quality, listing.quality.as_deref())
    }

    fn matches_search(&self, listing: &Listing) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        let contains = |field: Option<&str>| {
            field.is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        contains(listing.name.as_deref()) || contains(listing.category.as_deref())
    }

    /// Derive the Displayed Subset
    pub fn apply(&self, set: &WorkingSet) -> Vec<Listing> {
        let mut shown: Vec<Listing> = set
            .iter()
            .filter(|listing| self.matches(listing))
            .cloned()
            .collect();

        // sort_by is stable: ties keep Working Set order
        shown.sort_by(|a, b| self.sort.compare(a, b));
        shown
    }
}

fn exact(wanted: &str, actual: Option<&str>) -> bool {
    wanted.is_empty() || actual == Some(wanted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_core::Document;
    use serde_json::{json, Value};

    fn listing(id: &str, fields: Value) -> Listing {
        let mut fields = fields;
        fields["status"] = json!("available");
        Listing::from_document(&Document::new(id, fields)).unwrap()
    }

    fn ids(listings: &[Listing]) -> Vec<&str> {
        listings.iter().map(|l| l.id.as_str()).collect()
    }

    #[test]
    fn sort_key_parse_falls_back_to_newest() {
        assert_eq!(SortKey::parse("price-low"), SortKey::PriceLow);
        assert_eq!(SortKey::parse("price-high"), SortKey::PriceHigh);
        assert_eq!(SortKey::parse("quantity"), SortKey::Quantity);
        assert_eq!(SortKey::parse("newest"), SortKey::Newest);
        assert_eq!(SortKey::parse("alphabetical"), SortKey::Newest);
        assert_eq!("".parse::<SortKey>().unwrap(), SortKey::Newest);
    }

    #[test]
    fn search_matches_name_or_category_case_insensitively() {
        let set = WorkingSet::from_listings(vec![
            listing("a", json!({ "cropName": "Tomato", "category": "Vegetable" })),
            listing("b", json!({ "cropName": "Wheat", "category": "Grain" })),
        ]);

        let by_name = ListingFilter {
            search: "TOM".into(),
            ..Default::default()
        };
        assert_eq!(ids(&by_name.apply(&set)), ["a"]);

        let by_category = ListingFilter {
            search: "grain".into(),
            ..Default::default()
        };
        assert_eq!(ids(&by_category.apply(&set)), ["b"]);
    }

    #[test]
    fn category_and_quality_are_exact_and_conjunctive() {
        let set = WorkingSet::from_listings(vec![
            listing("a", json!({ "cropName": "Rice", "category": "Grain", "quality": "Premium" })),
            listing("b", json!({ "cropName": "Rice", "category": "Grain", "quality": "Standard" })),
            listing("c", json!({ "cropName": "Rice", "category": "grain", "quality": "Premium" })),
        ]);

        let filter = ListingFilter {
            search: "rice".into(),
            category: "Grain".into(),
            quality: "Premium".into(),
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&set)), ["a"]);
    }

    #[test]
    fn empty_search_keeps_nameless_listings() {
        let set = WorkingSet::from_listings(vec![listing("x", json!({}))]);
        assert_eq!(ListingFilter::default().apply(&set).len(), 1);

        let filter = ListingFilter {
            search: "x".into(),
            ..Default::default()
        };
        assert!(filter.apply(&set).is_empty());
    }

    #[test]
    fn price_sorts_treat_missing_as_zero() {
        let set = WorkingSet::from_listings(vec![
            listing("ten", json!({ "price": 10 })),
            listing("none", json!({})),
            listing("five", json!({ "price": "5" })),
        ]);

        let low = ListingFilter {
            sort: SortKey::PriceLow,
            ..Default::default()
        };
        assert_eq!(ids(&low.apply(&set)), ["none", "five", "ten"]);

        let high = ListingFilter {
            sort: SortKey::PriceHigh,
            ..Default::default()
        };
        assert_eq!(ids(&high.apply(&set)), ["ten", "five", "none"]);
    }

    #[test]
    fn quantity_sort_descending() {
        let set = WorkingSet::from_listings(vec![
            listing("small", json!({ "quantity": 5 })),
            listing("big", json!({ "quantity": 500 })),
            listing("none", json!({})),
        ]);

        let filter = ListingFilter {
            sort: SortKey::Quantity,
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&set)), ["big", "small", "none"]);
    }

    #[test]
    fn equal_prices_keep_working_set_order() {
        let set = WorkingSet::from_listings(vec![
            listing("first", json!({ "price": 10, "createdAt": "2024-02-02T00:00:00Z" })),
            listing("second", json!({ "price": 10, "createdAt": "2024-02-01T00:00:00Z" })),
        ]);

        let filter = ListingFilter {
            sort: SortKey::PriceLow,
            ..Default::default()
        };
        assert_eq!(ids(&filter.apply(&set)), ["first", "second"]);
    }
}
