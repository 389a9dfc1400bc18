//! Dashboard controller
//!
//! Drives a `BuyerDashboard` from auth-state transitions: the session gate
//! decides, then the profile and listing loads run concurrently and are
//! applied through their tickets.
//!
//! The view sits behind an async mutex that is never held across a backend
//! call, so events and newer transitions are handled while loads are in
//! flight. A load that finishes after its session was replaced is discarded
//! by its ticket.

use crate::accounts;
use crate::listings::load_listings;
use crate::profile::load_profile;
use crate::session::{GateAction, Redirect, Route, SessionGate};
use crate::view::{BuyerDashboard, DashboardEvent, DashboardUpdate, LoadTicket};
use harvest_core::{AuthState, DocumentStore, IdentityProvider, Result, UserId};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Buyer dashboard wired to a backend
pub struct DashboardController<I: ?Sized, S: ?Sized> {
    identity: Arc<I>,
    store: Arc<S>,
    gate: Mutex<SessionGate>,
    view: Mutex<BuyerDashboard>,
}

impl<I, S> DashboardController<I, S>
where
    I: IdentityProvider + ?Sized,
    S: DocumentStore + ?Sized,
{
    pub fn new(identity: Arc<I>, store: Arc<S>) -> Self {
        Self {
            identity,
            store,
            gate: Mutex::new(SessionGate::new()),
            view: Mutex::new(BuyerDashboard::new()),
        }
    }

    /// Lock the view model for reading.
    ///
    /// Drop the guard before awaiting anything else on this controller.
    pub async fn view(&self) -> MutexGuard<'_, BuyerDashboard> {
        self.view.lock().await
    }

    /// React to one auth-state transition
    pub async fn on_auth_state(&self, state: &AuthState) -> GateAction {
        let action = self.gate.lock().await.on_transition(state);

        match &action {
            GateAction::Load(user) => {
                let tickets = {
                    let mut view = self.view.lock().await;
                    view.start_session(user.clone());
                    (view.begin_profile_load(), view.begin_listings_load())
                };
                self.load(&user.uid, tickets).await;
            }
            GateAction::Redirect(_) => self.view.lock().await.end_session(),
        }
        action
    }

    async fn load(
        &self,
        uid: &UserId,
        (profile_ticket, listings_ticket): (LoadTicket, LoadTicket),
    ) {
        let profile = async {
            let result = load_profile(self.store.as_ref(), uid).await;
            self.view
                .lock()
                .await
                .complete_profile_load(profile_ticket, result);
        };
        let listings = async {
            let result = load_listings(self.store.as_ref()).await;
            self.view
                .lock()
                .await
                .complete_listings_load(listings_ticket, result);
        };

        tokio::join!(profile, listings);
    }

    /// Re-run the listing query for the current session
    ///
    /// Returns whether the result was applied.
    pub async fn refresh_listings(&self) -> bool {
        let ticket = {
            let mut view = self.view.lock().await;
            if view.user().is_none() {
                debug!("No session, skipping listings refresh");
                return false;
            }
            view.begin_listings_load()
        };

        let result = load_listings(self.store.as_ref()).await;
        self.view.lock().await.complete_listings_load(ticket, result)
    }

    pub async fn handle(&self, event: DashboardEvent) -> DashboardUpdate {
        self.view.lock().await.handle(event)
    }

    /// Follow auth-state transitions until the visitor must leave.
    ///
    /// Returns the route to navigate to. A transition that arrives while a
    /// load is in flight abandons that load and is handled at once. A closed
    /// channel means the auth service is gone and is treated like a sign-out.
    pub async fn run(&self, mut auth: watch::Receiver<AuthState>) -> Route {
        loop {
            let state = auth.borrow_and_update().clone();

            let changed = tokio::select! {
                action = self.on_auth_state(&state) => {
                    if let GateAction::Redirect(route) = action {
                        return route;
                    }
                    auth.changed().await
                }
                changed = auth.changed() => changed,
            };

            if changed.is_err() {
                warn!("Auth state channel closed, treating as signed out");
                self.gate.lock().await.on_transition(&AuthState::SignedOut);
                self.view.lock().await.end_session();
                return Route::Login;
            }
        }
    }

    /// Sign out and drop the session
    pub async fn logout(&self) -> Result<Redirect> {
        let redirect = accounts::logout(self.identity.as_ref()).await?;
        self.gate.lock().await.on_transition(&AuthState::SignedOut);
        self.view.lock().await.end_session();
        Ok(redirect)
    }
}
