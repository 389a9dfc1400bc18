//! Registration, login and logout flows
//!
//! Forms carry raw field text as entered. Text is trimmed before use except
//! for passwords. Credential errors come back with the identity provider's
//! own message.

use crate::session::{Redirect, Route};
use chrono::Utc;
use harvest_core::{
    BuyerProfile, Credentials, DocumentStore, FarmerProfile, HarvestError, IdentityProvider,
    Result, UserProfile, UserRole, USERS_COLLECTION,
};
use tracing::{error, info};

/// Farmer sign-up form
#[derive(Debug, Clone, Default)]
pub struct FarmerRegistration {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub state: String,
    pub district: String,
    /// Acres, as typed
    pub farm_size: String,
    /// Comma-separated crop names
    pub crops: String,
}

impl FarmerRegistration {
    fn credentials(&self) -> Credentials {
        Credentials::new(self.email.trim(), self.password.as_str())
    }

    /// Profile document content for this form
    pub fn profile(&self) -> UserProfile {
        UserProfile::Farmer(FarmerProfile {
            full_name: self.full_name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            state: self.state.trim().to_string(),
            district: self.district.trim().to_string(),
            farm_size: parse_number(&self.farm_size),
            crops: split_list(&self.crops),
            created_at: Some(Utc::now()),
        })
    }
}

/// Buyer sign-up form
#[derive(Debug, Clone, Default)]
pub struct BuyerRegistration {
    pub business_name: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub business_type: String,
    pub state: String,
    pub city: String,
    /// Comma-separated crop names
    pub interested_crops: String,
}

impl BuyerRegistration {
    fn credentials(&self) -> Credentials {
        Credentials::new(self.email.trim(), self.password.as_str())
    }

    /// Profile document content for this form
    pub fn profile(&self) -> UserProfile {
        UserProfile::Buyer(BuyerProfile {
            business_name: self.business_name.trim().to_string(),
            contact_person: self.contact_person.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            business_type: self.business_type.trim().to_string(),
            state: self.state.trim().to_string(),
            city: self.city.trim().to_string(),
            interested_crops: split_list(&self.interested_crops),
            created_at: Some(Utc::now()),
        })
    }
}

/// Login form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// "farmer" or "buyer"; blank when nothing was selected
    pub user_type: String,
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Create a farmer account and its profile document
pub async fn register_farmer<I, S>(
    identity: &I,
    store: &S,
    form: &FarmerRegistration,
) -> Result<Redirect>
where
    I: IdentityProvider + ?Sized,
    S: DocumentStore + ?Sized,
{
    register(identity, store, &form.credentials(), &form.profile()).await
}

/// Create a buyer account and its profile document
pub async fn register_buyer<I, S>(
    identity: &I,
    store: &S,
    form: &BuyerRegistration,
) -> Result<Redirect>
where
    I: IdentityProvider + ?Sized,
    S: DocumentStore + ?Sized,
{
    register(identity, store, &form.credentials(), &form.profile()).await
}

async fn register<I, S>(
    identity: &I,
    store: &S,
    credentials: &Credentials,
    profile: &UserProfile,
) -> Result<Redirect>
where
    I: IdentityProvider + ?Sized,
    S: DocumentStore + ?Sized,
{
    let role = profile.role();
    let user = identity.create_account(credentials).await?;

    store
        .write_document(USERS_COLLECTION, user.uid.as_str(), profile.to_fields()?)
        .await?;
    info!(uid = %user.uid, role = %role, "Account registered");

    let message = match role {
        UserRole::Farmer => "Farmer registration successful. Redirecting...",
        UserRole::Buyer => "Buyer registration successful. Redirecting...",
    };
    Ok(Redirect::delayed(
        Route::dashboard_for(role),
        Some(message.to_string()),
    ))
}

/// Sign in and go to the dashboard of the selected role
pub async fn login<I>(identity: &I, form: &LoginForm) -> Result<Redirect>
where
    I: IdentityProvider + ?Sized,
{
    if form.user_type.trim().is_empty() {
        return Err(HarvestError::invalid_input("Please select user type."));
    }
    let role: UserRole = form.user_type.parse()?;

    let credentials = Credentials::new(form.email.trim(), form.password.as_str());
    let user = identity.sign_in(&credentials).await?;
    info!(uid = %user.uid, role = %role, "Logged in");

    Ok(Redirect::delayed(Route::dashboard_for(role), None))
}

/// Sign out and return to the entry page
pub async fn logout<I>(identity: &I) -> Result<Redirect>
where
    I: IdentityProvider + ?Sized,
{
    if let Err(e) = identity.sign_out().await {
        error!(error = %e, "Logout error");
        return Err(e);
    }
    info!("User logged out successfully");
    Ok(Redirect::immediate(Route::Entry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_fields_drop_blanks() {
        assert_eq!(split_list(" Rice, Wheat ,, "), ["Rice", "Wheat"]);
        assert!(split_list("").is_empty());
    }

    #[test]
    fn farm_size_parses_or_is_absent() {
        assert_eq!(parse_number(" 2.5 "), Some(2.5));
        assert_eq!(parse_number("two"), None);
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("NaN"), None);
    }

    #[test]
    fn farmer_form_trims_text_but_not_password() {
        let form = FarmerRegistration {
            full_name: "  Meena  ".into(),
            email: " meena@example.com ".into(),
            password: " secret ".into(),
            farm_size: "3".into(),
            crops: "Rice, Millet".into(),
            ..Default::default()
        };

        assert_eq!(form.credentials().email, "meena@example.com");
        assert_eq!(form.credentials().password, " secret ");

        let UserProfile::Farmer(profile) = form.profile() else {
            panic!("expected a farmer profile");
        };
        assert_eq!(profile.full_name, "Meena");
        assert_eq!(profile.farm_size, Some(3.0));
        assert_eq!(profile.crops, ["Rice", "Millet"]);
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn buyer_form_profile_role() {
        let form = BuyerRegistration {
            business_name: "Fresh Foods".into(),
            interested_crops: "rice".into(),
            ..Default::default()
        };
        let profile = form.profile();

        assert_eq!(profile.role(), UserRole::Buyer);
        assert_eq!(profile.interests(), ["rice"]);
    }
}
