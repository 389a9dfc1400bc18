//! Buyer dashboard view model
//!
//! Owns all per-session state: the signed-in user, the profile, the Working
//! Set, the active filter controls and the open contact card. State lives as
//! long as the session; `end_session` drops it.
//!
//! Loads are two-phase. `begin_*_load` hands out a `LoadTicket`; the matching
//! `complete_*_load` applies the result only if no newer load was started in
//! the meantime, so a slow response can never overwrite fresher state.

use crate::contact::{contact_intent, ContactCard, ContactOutcome};
use crate::filter::{ListingFilter, SortKey};
use crate::listings::WorkingSet;
use crate::profile::ProfileState;
use crate::recommend::{recommend, Recommendation};
use crate::render::{
    crop_count_label, ListingCard, BROWSE_ALL_NOTICE, EMPTY_NOTICE, LOAD_ERROR_NOTICE,
    NO_RECOMMENDATIONS_NOTICE,
};
use harvest_core::{AuthUser, Listing, ListingId, Result, UserProfile};
use tracing::{debug, error, info};

/// Identifies one started load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Monotonic load counter; only the latest ticket is current
#[derive(Debug, Default)]
pub struct LoadGeneration {
    latest: u64,
}

impl LoadGeneration {
    /// Start a new load, superseding all earlier tickets
    pub fn next(&mut self) -> LoadTicket {
        self.latest += 1;
        LoadTicket(self.latest)
    }

    /// Supersede outstanding tickets without starting a load
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.latest
    }
}

/// Typed user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardEvent {
    SearchChanged(String),
    CategoryChanged(String),
    QualityChanged(String),
    SortChanged(SortKey),
    /// "Contact Farmer" pressed on a card
    ContactRequested(ListingId),
    ContactClosed,
}

/// What changed as a result of an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardUpdate {
    /// Displayed Subset recomputed
    ListingsChanged {
        /// Listings now shown
        shown: usize,
    },
    /// Contact card opened
    ContactOpened(ContactCard),
    /// Non-fatal alert; nothing else changed
    Notice(&'static str),
    ContactClosed,
}

/// Contents of the listing grid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingsPanel {
    /// No load has completed yet
    Loading,
    /// Last load failed
    Error(&'static str),
    /// Nothing to show for the current controls
    Empty(&'static str),
    Cards(Vec<ListingCard>),
}

/// Contents of the recommendation strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationsPanel {
    Loading,
    Notice(&'static str),
    Cards(Vec<ListingCard>),
}

/// Dashboard state of one signed-in buyer
#[derive(Debug, Default)]
pub struct BuyerDashboard {
    user: Option<AuthUser>,
    profile: ProfileState,
    working_set: Option<WorkingSet>,
    load_failed: bool,
    filter: ListingFilter,
    displayed: Vec<Listing>,
    contact: Option<ContactCard>,
    profile_loads: LoadGeneration,
    listing_loads: LoadGeneration,
}

impl BuyerDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset for a newly signed-in user, superseding in-flight loads
    pub fn start_session(&mut self, user: AuthUser) {
        info!(uid = %user.uid, "Dashboard session started");
        self.reset();
        self.user = Some(user);
    }

    /// Drop all session state
    pub fn end_session(&mut self) {
        if let Some(user) = self.user.take() {
            info!(uid = %user.uid, "Dashboard session ended");
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.user = None;
        self.profile = ProfileState::Pending;
        self.working_set = None;
        self.load_failed = false;
        self.filter = ListingFilter::default();
        self.displayed.clear();
        self.contact = None;
        self.profile_loads.invalidate();
        self.listing_loads.invalidate();
    }

    pub fn begin_profile_load(&mut self) -> LoadTicket {
        self.profile_loads.next()
    }

    /// Apply a profile fetch. Returns `false` if the ticket was superseded.
    ///
    /// A failed fetch degrades to `Absent` like a missing document.
    pub fn complete_profile_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Option<UserProfile>>,
    ) -> bool {
        if !self.profile_loads.is_current(ticket) {
            debug!(generation = ticket.generation(), "Discarding stale profile load");
            return false;
        }

        self.profile = match result {
            Ok(profile) => ProfileState::from_lookup(profile),
            Err(e) => {
                error!(error = %e, "Error loading user data");
                ProfileState::Absent
            }
        };
        true
    }

    pub fn begin_listings_load(&mut self) -> LoadTicket {
        self.listing_loads.next()
    }

    /// Apply a listing query. Returns `false` if the ticket was superseded.
    ///
    /// On failure the grid shows the error notice; the previous Working Set
    /// is kept so contact lookups keep working.
    pub fn complete_listings_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<WorkingSet>,
    ) -> bool {
        if !self.listing_loads.is_current(ticket) {
            debug!(generation = ticket.generation(), "Discarding stale listings load");
            return false;
        }

        match result {
            Ok(set) => {
                self.working_set = Some(set);
                self.load_failed = false;
                self.recompute();
            }
            Err(e) => {
                error!(error = %e, "Error loading crops");
                self.load_failed = true;
            }
        }
        true
    }

    /// Apply one input event
    pub fn handle(&mut self, event: DashboardEvent) -> DashboardUpdate {
        match event {
            DashboardEvent::SearchChanged(search) => {
                self.filter.search = search;
                self.recompute()
            }
            DashboardEvent::CategoryChanged(category) => {
                self.filter.category = category;
                self.recompute()
            }
            DashboardEvent::QualityChanged(quality) => {
                self.filter.quality = quality;
                self.recompute()
            }
            DashboardEvent::SortChanged(sort) => {
                self.filter.sort = sort;
                self.recompute()
            }
            DashboardEvent::ContactRequested(id) => {
                let set = self.working_set.clone().unwrap_or_default();
                match contact_intent(&set, &id) {
                    ContactOutcome::ComingSoon(card) => {
                        self.contact = Some(card.clone());
                        DashboardUpdate::ContactOpened(card)
                    }
                    outcome @ ContactOutcome::NotFound => {
                        DashboardUpdate::Notice(outcome.notice().unwrap_or_default())
                    }
                }
            }
            DashboardEvent::ContactClosed => {
                self.contact = None;
                DashboardUpdate::ContactClosed
            }
        }
    }

    fn recompute(&mut self) -> DashboardUpdate {
        self.displayed = match &self.working_set {
            Some(set) => self.filter.apply(set),
            None => Vec::new(),
        };
        debug!(
            shown = self.displayed.len(),
            sort = %self.filter.sort,
            "Displayed subset recomputed"
        );
        DashboardUpdate::ListingsChanged {
            shown: self.displayed.len(),
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn profile(&self) -> &ProfileState {
        &self.profile
    }

    /// Header greeting, unset until a profile is loaded
    pub fn greeting(&self) -> Option<String> {
        self.profile.greeting()
    }

    pub fn working_set(&self) -> Option<&WorkingSet> {
        self.working_set.as_ref()
    }

    pub fn filter(&self) -> &ListingFilter {
        &self.filter
    }

    /// Current Displayed Subset
    pub fn displayed(&self) -> &[Listing] {
        &self.displayed
    }

    pub fn contact(&self) -> Option<&ContactCard> {
        self.contact.as_ref()
    }

    pub fn listings_panel(&self) -> ListingsPanel {
        if self.load_failed {
            return ListingsPanel::Error(LOAD_ERROR_NOTICE);
        }
        if self.working_set.is_none() {
            return ListingsPanel::Loading;
        }
        if self.displayed.is_empty() {
            return ListingsPanel::Empty(EMPTY_NOTICE);
        }
        ListingsPanel::Cards(
            self.displayed
                .iter()
                .map(|listing| ListingCard::from_listing(listing, false))
                .collect(),
        )
    }

    /// Current recommendations (always from the full Working Set)
    pub fn recommendation(&self) -> Option<Recommendation> {
        if self.working_set.is_none() && !self.load_failed {
            return None;
        }
        let set = self.working_set.clone().unwrap_or_default();
        Some(recommend(self.profile.interests(), &set))
    }

    pub fn recommendations_panel(&self) -> RecommendationsPanel {
        match self.recommendation() {
            None => RecommendationsPanel::Loading,
            Some(Recommendation::BrowseAll) => RecommendationsPanel::Notice(BROWSE_ALL_NOTICE),
            Some(Recommendation::NoMatches) => {
                RecommendationsPanel::Notice(NO_RECOMMENDATIONS_NOTICE)
            }
            Some(Recommendation::Listings(listings)) => RecommendationsPanel::Cards(
                listings
                    .iter()
                    .map(|listing| ListingCard::from_listing(listing, true))
                    .collect(),
            ),
        }
    }

    /// Counter text for the Displayed Subset
    pub fn crop_count(&self) -> String {
        crop_count_label(self.displayed.len())
    }
}
