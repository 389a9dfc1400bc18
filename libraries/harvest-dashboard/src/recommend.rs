//! Interest-based recommendations
//!
//! A listing is recommended when its name and any interest term contain one
//! another, ignoring case. Results keep Working Set order (newest first) and
//! are cut at `MAX_RECOMMENDATIONS`; there is no relevance ranking.
//!
//! Containment in either direction means a short interest such as "pea"
//! also matches "Peach".

use crate::listings::WorkingSet;
use harvest_core::Listing;

/// Upper bound on recommended listings
pub const MAX_RECOMMENDATIONS: usize = 4;

/// Outcome of a recommendation pass
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// No interests declared, or nothing to recommend from
    BrowseAll,
    /// Interests and listings exist but none matched
    NoMatches,
    /// Matching listings, at most `MAX_RECOMMENDATIONS`
    Listings(Vec<Listing>),
}

impl Recommendation {
    /// Recommended listings (empty for the placeholder variants)
    pub fn listings(&self) -> &[Listing] {
        match self {
            Self::Listings(listings) => listings,
            _ => &[],
        }
    }
}

/// Whether `name` and `interest` overlap by case-insensitive containment
pub fn interest_matches(name: &str, interest: &str) -> bool {
    let interest = interest.to_lowercase();
    // An empty term is contained in every name, so blank never matches
    if interest.trim().is_empty() {
        return false;
    }
    let name = name.to_lowercase();
    name.contains(&interest) || interest.contains(&name)
}

/// Derive recommendations from the buyer's interests and the Working Set
pub fn recommend(interests: &[String], set: &WorkingSet) -> Recommendation {
    if interests.is_empty() || set.is_empty() {
        return Recommendation::BrowseAll;
    }

    let matched: Vec<Listing> = set
        .iter()
        .filter(|listing| {
            listing.name.as_deref().is_some_and(|name| {
                interests
                    .iter()
                    .any(|interest| interest_matches(name, interest))
            })
        })
        .take(MAX_RECOMMENDATIONS)
        .cloned()
        .collect();

    if matched.is_empty() {
        Recommendation::NoMatches
    } else {
        Recommendation::Listings(matched)
    }
}
