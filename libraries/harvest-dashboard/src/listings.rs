//! Listing loading and the Working Set
//!
//! The Working Set is the full, recency-ordered sequence of available
//! listings for the session. It is rebuilt wholesale on every load and never
//! patched incrementally.

use harvest_core::{
    DocumentStore, FieldFilter, Listing, ListingId, ListingStatus, Result, CROPS_COLLECTION,
};
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Immutable snapshot of the available listings
///
/// Cloning is cheap; every derived view reads the same snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkingSet {
    listings: Arc<[Listing]>,
}

impl WorkingSet {
    /// Build a Working Set.
    ///
    /// Listings that are not available are dropped, and the rest are ordered
    /// newest first (stable for equal timestamps).
    pub fn from_listings(listings: Vec<Listing>) -> Self {
        let mut kept: Vec<Listing> = listings
            .into_iter()
            .filter(|listing| {
                let keep = listing.is_available();
                if !keep {
                    warn!(id = %listing.id, status = %listing.status, "Dropping listing that is not available");
                }
                keep
            })
            .collect();

        kept.sort_by(newest_first);

        Self {
            listings: kept.into(),
        }
    }

    /// Listings in Working Set order
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Listing> {
        self.listings.iter()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Look up a listing by id
    pub fn find(&self, id: &ListingId) -> Option<&Listing> {
        self.listings.iter().find(|listing| &listing.id == id)
    }
}

/// Descending by creation timestamp; listings without one sort last
pub fn newest_first(a: &Listing, b: &Listing) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Query every available listing and build the Working Set.
///
/// One query, no paging, no retry.
pub async fn load_listings<S>(store: &S) -> Result<WorkingSet>
where
    S: DocumentStore + ?Sized,
{
    debug!("Loading available listings");

    let filters = [FieldFilter::eq("status", ListingStatus::AVAILABLE)];
    let docs = store.query(CROPS_COLLECTION, &filters).await?;

    let mut listings = Vec::with_capacity(docs.len());
    for doc in &docs {
        match Listing::from_document(doc) {
            Ok(listing) => {
                debug!(id = %listing.id, name = ?listing.name, "Found listing");
                listings.push(listing);
            }
            Err(e) => warn!(id = %doc.id, error = %e, "Skipping undecodable listing"),
        }
    }

    let set = WorkingSet::from_listings(listings);
    info!(total = set.len(), "Listings loaded");
    Ok(set)
}
