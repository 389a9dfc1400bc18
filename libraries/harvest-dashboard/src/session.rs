//! Session gate and navigation targets
//!
//! The gate turns each auth-state transition into one decision: load the
//! dashboard for the signed-in user, or send the visitor to the login page.

use harvest_core::{AuthState, AuthUser, UserId, UserRole};
use std::time::Duration;
use tracing::{debug, info};

/// Delay before navigating after a successful registration or login
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Navigation target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Landing page
    Entry,
    Login,
    FarmerDashboard,
    BuyerDashboard,
}

impl Route {
    /// Page the route navigates to
    pub fn page(&self) -> &'static str {
        match self {
            Self::Entry => "index.html",
            Self::Login => "login.html",
            Self::FarmerDashboard => "farmer-dashboard.html",
            Self::BuyerDashboard => "buyer-dashboard.html",
        }
    }

    /// Landing dashboard for a role
    pub fn dashboard_for(role: UserRole) -> Self {
        match role {
            UserRole::Farmer => Self::FarmerDashboard,
            UserRole::Buyer => Self::BuyerDashboard,
        }
    }
}

/// A navigation request, optionally delayed and announced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub delay: Duration,
    /// Success text shown while waiting
    pub message: Option<String>,
}

impl Redirect {
    /// Navigate right away
    pub fn immediate(route: Route) -> Self {
        Self {
            route,
            delay: Duration::ZERO,
            message: None,
        }
    }

    /// Navigate after `REDIRECT_DELAY`, showing `message` meanwhile
    pub fn delayed(route: Route, message: Option<String>) -> Self {
        Self {
            route,
            delay: REDIRECT_DELAY,
            message,
        }
    }
}

/// What to do about an auth-state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateAction {
    /// Signed in: load profile and listings for this user
    Load(AuthUser),
    /// Not signed in: hard navigation
    Redirect(Route),
}

/// Tracks the user the dashboard is currently serving
#[derive(Debug, Default)]
pub struct SessionGate {
    current: Option<UserId>,
    transitions: u64,
}

impl SessionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide on a transition. There is no retry: any state other than
    /// signed-in, including a failed auth service, redirects to login.
    pub fn on_transition(&mut self, state: &AuthState) -> GateAction {
        self.transitions += 1;

        match state {
            AuthState::SignedIn(user) => {
                info!(uid = %user.uid, "User signed in");
                self.current = Some(user.uid.clone());
                GateAction::Load(user.clone())
            }
            AuthState::SignedOut => {
                debug!(transitions = self.transitions, "No user, redirecting to login");
                self.current = None;
                GateAction::Redirect(Route::Login)
            }
        }
    }

    /// User currently served, if any
    pub fn current_user(&self) -> Option<&UserId> {
        self.current.as_ref()
    }

    /// Number of transitions seen
    pub fn transitions(&self) -> u64 {
        self.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(uid: &str) -> AuthUser {
        AuthUser {
            uid: UserId::new(uid),
            email: None,
        }
    }

    #[test]
    fn signed_in_triggers_load() {
        let mut gate = SessionGate::new();
        let action = gate.on_transition(&AuthState::SignedIn(user("u1")));

        assert_eq!(action, GateAction::Load(user("u1")));
        assert_eq!(gate.current_user().map(UserId::as_str), Some("u1"));
    }

    #[test]
    fn initial_signed_out_redirects_to_login() {
        let mut gate = SessionGate::new();
        assert_eq!(
            gate.on_transition(&AuthState::SignedOut),
            GateAction::Redirect(Route::Login)
        );
        assert!(gate.current_user().is_none());
    }

    #[test]
    fn sign_out_after_sign_in_clears_user() {
        let mut gate = SessionGate::new();
        gate.on_transition(&AuthState::SignedIn(user("u1")));
        gate.on_transition(&AuthState::SignedOut);

        assert!(gate.current_user().is_none());
        assert_eq!(gate.transitions(), 2);
    }

    #[test]
    fn route_pages() {
        assert_eq!(Route::dashboard_for(UserRole::Buyer).page(), "buyer-dashboard.html");
        assert_eq!(Route::dashboard_for(UserRole::Farmer).page(), "farmer-dashboard.html");
        assert_eq!(Route::Entry.page(), "index.html");
    }

    #[test]
    fn delayed_redirect_uses_standard_delay() {
        let redirect = Redirect::delayed(Route::BuyerDashboard, Some("ok".into()));
        assert_eq!(redirect.delay, Duration::from_millis(1500));
        assert_eq!(Redirect::immediate(Route::Login).delay, Duration::ZERO);
    }
}
