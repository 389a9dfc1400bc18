//! User profile types
//!
//! One profile document per account, written at registration and read-only
//! afterwards. The `userType` field selects the role-specific shape; a
//! document with a missing or unrecognised tag is read as a buyer profile.

use super::lenient;
use crate::error::{HarvestError, Result};
use chrono::{DateTime, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Account role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Seller of crops
    Farmer,
    /// Purchaser of crops
    Buyer,
}

impl UserRole {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Farmer => "farmer",
            Self::Buyer => "buyer",
        }
    }

    /// Name shown when a profile has no usable display field
    pub fn placeholder_name(&self) -> &'static str {
        match self {
            Self::Farmer => "Farmer",
            Self::Buyer => "Buyer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = HarvestError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "farmer" => Ok(Self::Farmer),
            "buyer" => Ok(Self::Buyer),
            other => Err(HarvestError::invalid_input(format!(
                "Unknown user type: {other}"
            ))),
        }
    }
}

/// Farmer profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmerProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub full_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub district: String,
    /// Farm size in acres
    #[serde(default, deserialize_with = "lenient::opt_number")]
    pub farm_size: Option<f64>,
    /// Crops grown
    #[serde(default, deserialize_with = "lenient::list")]
    pub crops: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Buyer profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerProfile {
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_name: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub contact_person: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub email: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub phone: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub business_type: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub state: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub city: String,
    /// Crop names the buyer wants recommendations for
    #[serde(default, deserialize_with = "lenient::list")]
    pub interested_crops: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Profile document of one account
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "userType", rename_all = "lowercase")]
pub enum UserProfile {
    /// Farmer account
    Farmer(FarmerProfile),
    /// Buyer account
    Buyer(BuyerProfile),
}

impl<'de> Deserialize<'de> for UserProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let fields = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_fields(fields).map_err(D::Error::custom)
    }
}

impl UserProfile {
    /// Decode a profile field map.
    ///
    /// Only `"farmer"` (any case) selects the farmer shape.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self> {
        let role = fields
            .get("userType")
            .and_then(lenient::text)
            .and_then(|tag| tag.parse::<UserRole>().ok())
            .unwrap_or(UserRole::Buyer);

        let fields = Value::Object(fields);
        Ok(match role {
            UserRole::Farmer => Self::Farmer(serde_json::from_value(fields)?),
            UserRole::Buyer => Self::Buyer(serde_json::from_value(fields)?),
        })
    }

    /// Account role
    pub fn role(&self) -> UserRole {
        match self {
            Self::Farmer(_) => UserRole::Farmer,
            Self::Buyer(_) => UserRole::Buyer,
        }
    }

    /// Declared crop interests (always empty for farmers)
    pub fn interests(&self) -> &[String] {
        match self {
            Self::Buyer(buyer) => &buyer.interested_crops,
            Self::Farmer(_) => &[],
        }
    }

    /// Display name: first non-blank candidate field, else the role placeholder
    pub fn display_name(&self) -> &str {
        let candidates = match self {
            Self::Buyer(b) => vec![b.business_name.as_str(), b.contact_person.as_str()],
            Self::Farmer(f) => vec![f.full_name.as_str()],
        };

        candidates
            .into_iter()
            .map(str::trim)
            .find(|s| !s.is_empty())
            .unwrap_or_else(|| self.role().placeholder_name())
    }

    /// Header greeting
    pub fn greeting(&self) -> String {
        format!("Welcome, {}", self.display_name())
    }

    /// Serialize into a document field map
    pub fn to_fields(&self) -> Result<serde_json::Map<String, serde_json::Value>> {
        match serde_json::to_value(self)? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Err(HarvestError::Other("profile did not serialize to an object".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Document;
    use serde_json::json;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!(" Buyer ".parse::<UserRole>().unwrap(), UserRole::Buyer);
        assert_eq!("farmer".parse::<UserRole>().unwrap(), UserRole::Farmer);
        assert!("admin".parse::<UserRole>().is_err());
        assert!("".parse::<UserRole>().is_err());
    }

    #[test]
    fn buyer_display_name_precedence() {
        let mut buyer = BuyerProfile {
            business_name: "Fresh Foods Ltd".into(),
            contact_person: "Asha".into(),
            ..Default::default()
        };
        assert_eq!(UserProfile::Buyer(buyer.clone()).display_name(), "Fresh Foods Ltd");

        buyer.business_name = "  ".into();
        assert_eq!(UserProfile::Buyer(buyer.clone()).display_name(), "Asha");

        buyer.contact_person = String::new();
        assert_eq!(UserProfile::Buyer(buyer).display_name(), "Buyer");
    }

    #[test]
    fn farmer_display_name_falls_back_to_placeholder() {
        let profile = UserProfile::Farmer(FarmerProfile::default());
        assert_eq!(profile.display_name(), "Farmer");
        assert_eq!(profile.greeting(), "Welcome, Farmer");
        assert!(profile.interests().is_empty());
    }

    #[test]
    fn decodes_buyer_document() {
        let doc = Document::new(
            "uid-1",
            json!({
                "userType": "buyer",
                "businessName": "Green Grocers",
                "contactPerson": "Ravi",
                "email": "ravi@example.com",
                "interestedCrops": ["Rice", " wheat "],
                "createdAt": "2024-01-01T00:00:00.000Z"
            }),
        );

        let profile: UserProfile = doc.decode().unwrap();
        assert_eq!(profile.role(), UserRole::Buyer);
        assert_eq!(profile.interests(), ["Rice", "wheat"]);
    }

    #[test]
    fn untagged_document_reads_as_buyer() {
        let doc = Document::new(
            "uid-2",
            json!({ "businessName": "Green Grocers", "interestedCrops": ["rice"] }),
        );

        let profile: UserProfile = doc.decode().unwrap();
        assert_eq!(profile.role(), UserRole::Buyer);
        assert_eq!(profile.greeting(), "Welcome, Green Grocers");
        assert_eq!(profile.interests(), ["rice"]);
    }

    #[test]
    fn tag_is_matched_case_insensitively() {
        let doc = Document::new(
            "uid-3",
            json!({ "userType": "Buyer", "contactPerson": "Ravi", "interestedCrops": "wheat" }),
        );
        let profile: UserProfile = doc.decode().unwrap();
        assert_eq!(profile.display_name(), "Ravi");
        assert_eq!(profile.interests(), ["wheat"]);

        let doc = Document::new("uid-4", json!({ "userType": " FARMER ", "fullName": "Meena" }));
        assert_eq!(doc.decode::<UserProfile>().unwrap().role(), UserRole::Farmer);
    }

    #[test]
    fn unknown_tag_and_odd_field_types_still_decode() {
        let doc = Document::new(
            "uid-5",
            json!({ "userType": "admin", "businessName": 42, "phone": null }),
        );

        let profile: UserProfile = doc.decode().unwrap();
        assert_eq!(profile.display_name(), "42");

        let empty = Document::new("uid-6", json!({}));
        assert_eq!(empty.decode::<UserProfile>().unwrap().greeting(), "Welcome, Buyer");
    }

    #[test]
    fn fields_carry_user_type_tag() {
        let profile = UserProfile::Farmer(FarmerProfile {
            full_name: "Meena".into(),
            farm_size: Some(2.5),
            crops: vec!["Rice".into()],
            ..Default::default()
        });

        let fields = profile.to_fields().unwrap();
        assert_eq!(fields["userType"], "farmer");
        assert_eq!(fields["fullName"], "Meena");
        assert_eq!(fields["farmSize"], 2.5);
    }
}
