use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{Duration, TimeZone, Utc};
use serde::Deserialize;

use super::contact::{ContactType, PhoneLabel};
use super::domain::{
    Contact, ContactId, List, ListId, MembershipId, Owner, OwnerId, Property, PropertyId,
    PropertyList,
};
use super::memory::InMemoryCatalog;
use super::repository::{CatalogError, CatalogRepository};

/// Snapshot of catalog rows, loaded in foreign-key order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogSeed {
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub lists: Vec<List>,
    #[serde(default)]
    pub memberships: Vec<PropertyList>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid seed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seed rejected by catalog: {0}")]
    Catalog(#[from] CatalogError),
}

impl CatalogSeed {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SeedError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SeedError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Insert every row into `repository`, parents before children.
    pub fn apply<R: CatalogRepository + ?Sized>(self, repository: &R) -> Result<(), SeedError> {
        for owner in self.owners {
            repository.insert_owner(owner)?;
        }
        for contact in self.contacts {
            repository.insert_contact(contact)?;
        }
        for property in self.properties {
            repository.insert_property(property)?;
        }
        for list in self.lists {
            repository.insert_list(list)?;
        }
        for membership in self.memberships {
            repository.insert_membership(membership)?;
        }
        Ok(())
    }

    pub fn into_catalog(self) -> Result<InMemoryCatalog, SeedError> {
        let catalog = InMemoryCatalog::new();
        self.apply(&catalog)?;
        Ok(catalog)
    }

    /// Small built-in portfolio used when no seed file is configured.
    pub fn demo() -> Self {
        let base = Utc
            .with_ymd_and_hms(2025, 3, 1, 15, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let at = |days: i64| base + Duration::days(days);

        let owners = vec![
            Owner {
                id: OwnerId::from("owner-hollis"),
                name: "Hollis Family Trust".to_string(),
                mailing_address: Some("PO Box 118, Ankeny, IA 50021".to_string()),
                created_at: at(0),
                updated_at: at(0),
            },
            Owner {
                id: OwnerId::from("owner-reyes"),
                name: "Marisol Reyes".to_string(),
                mailing_address: Some("2207 Cottage Grove Ave, Des Moines, IA 50311".to_string()),
                created_at: at(1),
                updated_at: at(1),
            },
        ];

        let contact = |id: &str, owner: &str, kind: ContactType, value: &str, priority: u8| {
            let (phone, email) = if kind.is_phone() {
                (Some(value.to_string()), None)
            } else {
                (None, Some(value.to_string()))
            };
            Contact {
                id: ContactId::from(id),
                phone,
                email,
                contact_type: kind,
                label: (kind == ContactType::Cell && priority == 1).then_some(PhoneLabel::Primary),
                priority,
                notes: None,
                owner_id: OwnerId::from(owner),
                created_at: at(2),
                updated_at: at(2),
            }
        };
        let contacts = vec![
            contact("contact-1", "owner-hollis", ContactType::Cell, "5155550142", 1),
            contact("contact-2", "owner-hollis", ContactType::Email, "trustee@hollis.example", 1),
            contact("contact-3", "owner-reyes", ContactType::Cell, "5155550177", 1),
            contact("contact-4", "owner-reyes", ContactType::Landline, "5155550190", 1),
        ];

        let property = |id: &str, street: &str, zip: u32, units: u32, price: f64, day: i64| {
            Property {
                id: PropertyId::from(id),
                street_address: street.to_string(),
                city: "Des Moines".to_string(),
                state: "IA".to_string(),
                zip_code: zip,
                net_operating_income: Some(price * 0.08),
                price: Some(price),
                return_on_investment: Some(8.0),
                number_of_units: Some(units),
                square_feet: Some(units * 850),
                latitude: None,
                longitude: None,
                owner_id: None,
                created_at: at(day),
                updated_at: at(day),
            }
        };
        let mut properties = vec![
            property("prop-ingersoll", "3012 Ingersoll Ave", 50312, 4, 640_000.0, 3),
            property("prop-beaver", "1408 Beaver Ave", 50310, 2, 315_000.0, 4),
            property("prop-university", "4120 University Ave", 50311, 6, 910_000.0, 5),
        ];
        properties[0].owner_id = Some(OwnerId::from("owner-hollis"));
        properties[1].owner_id = Some(OwnerId::from("owner-reyes"));
        properties[2].owner_id = Some(OwnerId::from("owner-hollis"));

        let lists = vec![List {
            id: ListId::from("list-follow-up"),
            name: "Follow Up".to_string(),
            description: Some("Owners who asked for a callback".to_string()),
            created_at: at(6),
            updated_at: at(6),
        }];

        let memberships = vec![PropertyList {
            id: MembershipId::from("membership-1"),
            property_id: PropertyId::from("prop-ingersoll"),
            list_id: ListId::from("list-follow-up"),
            added_at: at(7),
        }];

        Self {
            owners,
            contacts,
            properties,
            lists,
            memberships,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_seed_satisfies_constraints() {
        let catalog = CatalogSeed::demo().into_catalog().expect("demo seed loads");
        let lists = catalog.lists().expect("lists");
        assert_eq!(lists.len(), 1);
        let members = catalog
            .memberships_for_list(&lists[0].id)
            .expect("memberships");
        assert_eq!(members.len(), 1);
    }

    #[test]
    fn json_seed_defaults_timestamps_and_rejects_dangling_keys() {
        let raw = r#"{
            "properties": [{
                "id": "p1",
                "street_address": "1 Test Street",
                "city": "Test City",
                "state": "WA",
                "zip_code": 12345,
                "owner_id": "missing-owner"
            }]
        }"#;

        let seed = CatalogSeed::from_reader(raw.as_bytes()).expect("seed parses");
        assert_eq!(seed.properties.len(), 1);
        let err = seed.into_catalog().expect_err("dangling owner rejected");
        assert!(matches!(
            err,
            SeedError::Catalog(CatalogError::MissingReference(_))
        ));
    }
}
