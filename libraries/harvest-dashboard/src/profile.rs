//! Profile loading
//!
//! A missing profile document is not an error for the user: it is logged and
//! the dashboard carries on without a display name.

use harvest_core::{DocumentStore, Result, UserId, UserProfile, USERS_COLLECTION};
use tracing::{info, warn};

/// Profile of the signed-in user as far as the dashboard knows it
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProfileState {
    /// Fetch not completed yet
    #[default]
    Pending,
    /// Profile document found
    Loaded(UserProfile),
    /// No usable profile (missing document or failed fetch)
    Absent,
}

impl ProfileState {
    /// Build from a loader result
    pub fn from_lookup(profile: Option<UserProfile>) -> Self {
        profile.map_or(Self::Absent, Self::Loaded)
    }

    /// Loaded profile, if any
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Self::Loaded(profile) => Some(profile),
            _ => None,
        }
    }

    /// Header greeting; unset unless a profile is loaded
    pub fn greeting(&self) -> Option<String> {
        self.profile().map(UserProfile::greeting)
    }

    /// Declared crop interests (empty unless a buyer profile is loaded)
    pub fn interests(&self) -> &[String] {
        match self.profile() {
            Some(profile) => profile.interests(),
            None => &[],
        }
    }
}

/// Fetch exactly one profile document for `uid`.
///
/// `Ok(None)` when the document does not exist. A present document always
/// yields a profile, whatever shape its `userType` tag has.
pub async fn load_profile<S>(store: &S, uid: &UserId) -> Result<Option<UserProfile>>
where
    S: DocumentStore + ?Sized,
{
    let Some(doc) = store.read_document(USERS_COLLECTION, uid.as_str()).await? else {
        warn!(uid = %uid, "No profile document found");
        return Ok(None);
    };

    let profile: UserProfile = doc.decode()?;
    info!(uid = %uid, name = %profile.display_name(), "Profile loaded");
    Ok(Some(profile))
}
