use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::contact::{ContactType, PhoneLabel};

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

record_id!(
    /// Identifier of a property listing.
    PropertyId
);
record_id!(
    /// Identifier of a property owner.
    OwnerId
);
record_id!(ContactId);
record_id!(
    /// Identifier of a named property list.
    ListId
);
record_id!(MembershipId);

/// A real-estate listing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: u32,
    #[serde(default)]
    pub net_operating_income: Option<f64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub return_on_investment: Option<f64>,
    #[serde(default)]
    pub number_of_units: Option<u32>,
    #[serde(default)]
    pub square_feet: Option<u32>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

impl Property {
    /// Lowercased fields that a free-text search is matched against.
    pub(crate) fn search_haystack(&self) -> [String; 4] {
        [
            self.street_address.to_lowercase(),
            self.city.to_lowercase(),
            self.state.to_lowercase(),
            self.zip_code.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
    #[serde(default)]
    pub mailing_address: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// A phone or e-mail entry belonging to an owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: ContactType,
    #[serde(default)]
    pub label: Option<PhoneLabel>,
    pub priority: u8,
    #[serde(default)]
    pub notes: Option<String>,
    pub owner_id: OwnerId,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// A named grouping of properties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// Join row placing a property on a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyList {
    pub id: MembershipId,
    pub property_id: PropertyId,
    pub list_id: ListId,
    #[serde(default = "Utc::now")]
    pub added_at: DateTime<Utc>,
}
