use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::domain::{
    Contact, ContactId, List, ListId, Owner, OwnerId, Property, PropertyId, PropertyList,
};
use super::repository::{CatalogError, CatalogRepository, Page, SearchQuery};

#[derive(Debug, Default)]
struct Tables {
    properties: HashMap<PropertyId, Property>,
    owners: HashMap<OwnerId, Owner>,
    contacts: HashMap<ContactId, Contact>,
    lists: HashMap<ListId, List>,
    memberships: Vec<PropertyList>,
}

/// Process-local catalog enforcing the schema's uniqueness and foreign keys.
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalog {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, CatalogError> {
        self.tables
            .read()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, CatalogError> {
        self.tables
            .write()
            .map_err(|_| CatalogError::Unavailable("catalog lock poisoned".to_string()))
    }
}

fn paginate<T>(mut rows: Vec<T>, query: &SearchQuery) -> Page<T> {
    let total_count = rows.len();
    let offset = query.page.offset().min(total_count);
    let end = (offset + query.page.limit as usize).min(total_count);
    rows.truncate(end);
    let items = rows.split_off(offset);
    Page {
        items,
        total_count,
        request: query.page,
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn property(&self, id: &PropertyId) -> Result<Option<Property>, CatalogError> {
        Ok(self.read()?.properties.get(id).cloned())
    }

    fn search_properties(&self, query: &SearchQuery) -> Result<Page<Property>, CatalogError> {
        let tables = self.read()?;
        let needle = query.needle();

        let mut rows: Vec<Property> = tables
            .properties
            .values()
            .filter(|property| match &needle {
                None => true,
                Some(needle) => {
                    property
                        .search_haystack()
                        .iter()
                        .any(|field| field.contains(needle.as_str()))
                        || property
                            .owner_id
                            .as_ref()
                            .and_then(|owner_id| tables.owners.get(owner_id))
                            .map(|owner| owner.name.to_lowercase().contains(needle.as_str()))
                            .unwrap_or(false)
                }
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(paginate(rows, query))
    }

    fn insert_property(&self, property: Property) -> Result<Property, CatalogError> {
        let mut tables = self.write()?;
        if tables.properties.contains_key(&property.id) {
            return Err(CatalogError::Conflict(format!("property {}", property.id)));
        }
        if let Some(owner_id) = &property.owner_id {
            if !tables.owners.contains_key(owner_id) {
                return Err(CatalogError::MissingReference(format!("owner {owner_id}")));
            }
        }
        tables.properties.insert(property.id.clone(), property.clone());
        Ok(property)
    }

    fn properties_for_owner(&self, owner_id: &OwnerId) -> Result<Vec<Property>, CatalogError> {
        let tables = self.read()?;
        let mut rows: Vec<Property> = tables
            .properties
            .values()
            .filter(|property| property.owner_id.as_ref() == Some(owner_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.street_address.cmp(&b.street_address));
        Ok(rows)
    }

    fn owner(&self, id: &OwnerId) -> Result<Option<Owner>, CatalogError> {
        Ok(self.read()?.owners.get(id).cloned())
    }

    fn search_owners(&self, query: &SearchQuery) -> Result<Page<Owner>, CatalogError> {
        let tables = self.read()?;
        let needle = query.needle();

        let mut rows: Vec<Owner> = tables
            .owners
            .values()
            .filter(|owner| match &needle {
                None => true,
                Some(needle) => {
                    owner.name.to_lowercase().contains(needle.as_str())
                        || owner
                            .mailing_address
                            .as_deref()
                            .map(|address| address.to_lowercase().contains(needle.as_str()))
                            .unwrap_or(false)
                }
            })
            .cloned()
            .collect();

        rows.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(paginate(rows, query))
    }

    fn insert_owner(&self, owner: Owner) -> Result<Owner, CatalogError> {
        let mut tables = self.write()?;
        if tables.owners.contains_key(&owner.id) {
            return Err(CatalogError::Conflict(format!("owner {}", owner.id)));
        }
        tables.owners.insert(owner.id.clone(), owner.clone());
        Ok(owner)
    }

    fn contacts_for_owner(&self, owner_id: &OwnerId) -> Result<Vec<Contact>, CatalogError> {
        let tables = self.read()?;
        let mut rows: Vec<Contact> = tables
            .contacts
            .values()
            .filter(|contact| &contact.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            a.contact_type
                .cmp(&b.contact_type)
                .then(a.priority.cmp(&b.priority))
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }

    fn insert_contact(&self, contact: Contact) -> Result<Contact, CatalogError> {
        let mut tables = self.write()?;
        if tables.contacts.contains_key(&contact.id) {
            return Err(CatalogError::Conflict(format!("contact {}", contact.id)));
        }
        if !tables.owners.contains_key(&contact.owner_id) {
            return Err(CatalogError::MissingReference(format!(
                "owner {}",
                contact.owner_id
            )));
        }
        tables.contacts.insert(contact.id.clone(), contact.clone());
        Ok(contact)
    }

    fn list(&self, id: &ListId) -> Result<Option<List>, CatalogError> {
        Ok(self.read()?.lists.get(id).cloned())
    }

    fn lists(&self) -> Result<Vec<List>, CatalogError> {
        let mut rows: Vec<List> = self.read()?.lists.values().cloned().collect();
        rows.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(rows)
    }

    fn insert_list(&self, list: List) -> Result<List, CatalogError> {
        let mut tables = self.write()?;
        if tables.lists.contains_key(&list.id) {
            return Err(CatalogError::Conflict(format!("list {}", list.id)));
        }
        let name = list.name.trim().to_lowercase();
        if tables
            .lists
            .values()
            .any(|existing| existing.name.trim().to_lowercase() == name)
        {
            return Err(CatalogError::Conflict(format!("list name '{}'", list.name)));
        }
        tables.lists.insert(list.id.clone(), list.clone());
        Ok(list)
    }

    fn memberships_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<PropertyList>, CatalogError> {
        let tables = self.read()?;
        Ok(tables
            .memberships
            .iter()
            .filter(|membership| &membership.property_id == property_id)
            .cloned()
            .collect())
    }

    fn memberships_for_list(&self, list_id: &ListId) -> Result<Vec<PropertyList>, CatalogError> {
        let tables = self.read()?;
        Ok(tables
            .memberships
            .iter()
            .filter(|membership| &membership.list_id == list_id)
            .cloned()
            .collect())
    }

    fn insert_membership(&self, membership: PropertyList) -> Result<PropertyList, CatalogError> {
        let mut tables = self.write()?;
        if !tables.properties.contains_key(&membership.property_id) {
            return Err(CatalogError::MissingReference(format!(
                "property {}",
                membership.property_id
            )));
        }
        if !tables.lists.contains_key(&membership.list_id) {
            return Err(CatalogError::MissingReference(format!(
                "list {}",
                membership.list_id
            )));
        }
        if tables.memberships.iter().any(|existing| {
            existing.id == membership.id
                || (existing.property_id == membership.property_id
                    && existing.list_id == membership.list_id)
        }) {
            return Err(CatalogError::Conflict(format!(
                "property {} already on list {}",
                membership.property_id, membership.list_id
            )));
        }
        tables.memberships.push(membership.clone());
        Ok(membership)
    }

    fn delete_membership(
        &self,
        list_id: &ListId,
        property_id: &PropertyId,
    ) -> Result<(), CatalogError> {
        let mut tables = self.write()?;
        let before = tables.memberships.len();
        tables.memberships.retain(|membership| {
            !(&membership.list_id == list_id && &membership.property_id == property_id)
        });
        if tables.memberships.len() == before {
            return Err(CatalogError::NotFound(format!(
                "property {property_id} on list {list_id}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::repository::PageRequest;
    use chrono::{Duration, TimeZone, Utc};

    fn property(id: &str, street: &str, minutes: i64) -> Property {
        let created =
            Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap() + Duration::minutes(minutes);
        Property {
            id: PropertyId::from(id),
            street_address: street.to_string(),
            city: "Des Moines".to_string(),
            state: "IA".to_string(),
            zip_code: 50309,
            net_operating_income: None,
            price: None,
            return_on_investment: None,
            number_of_units: None,
            square_feet: None,
            latitude: None,
            longitude: None,
            owner_id: None,
            created_at: created,
            updated_at: created,
        }
    }

    fn list(id: &str, name: &str) -> List {
        List {
            id: ListId::from(id),
            name: name.to_string(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn membership(list_id: &str, property_id: &str) -> PropertyList {
        PropertyList {
            id: crate::catalog::domain::MembershipId::generate(),
            property_id: PropertyId::from(property_id),
            list_id: ListId::from(list_id),
            added_at: Utc::now(),
        }
    }

    #[test]
    fn search_orders_newest_first_and_pages() {
        let catalog = InMemoryCatalog::new();
        for (index, street) in ["1 Elm St", "2 Oak St", "3 Pine St"].iter().enumerate() {
            catalog
                .insert_property(property(&format!("p{index}"), street, index as i64))
                .expect("insert");
        }

        let query = SearchQuery {
            search: None,
            page: PageRequest::new(1, 2),
        };
        let page = catalog.search_properties(&query).expect("search");
        assert_eq!(page.total_count, 3);
        let streets: Vec<_> = page.items.iter().map(|p| p.street_address.as_str()).collect();
        assert_eq!(streets, vec!["3 Pine St", "2 Oak St"]);

        let query = SearchQuery {
            search: None,
            page: PageRequest::new(5, 2),
        };
        let page = catalog.search_properties(&query).expect("search");
        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn search_matches_owner_name_case_insensitively() {
        let catalog = InMemoryCatalog::new();
        catalog
            .insert_owner(Owner {
                id: OwnerId::from("o1"),
                name: "Harriet Vance".to_string(),
                mailing_address: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .expect("owner");
        let mut owned = property("p1", "10 Walnut St", 0);
        owned.owner_id = Some(OwnerId::from("o1"));
        catalog.insert_property(owned).expect("property");
        catalog
            .insert_property(property("p2", "11 Walnut St", 1))
            .expect("property");

        let query = SearchQuery {
            search: Some("VANCE".to_string()),
            page: PageRequest::default(),
        };
        let page = catalog.search_properties(&query).expect("search");
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].id, PropertyId::from("p1"));
    }

    #[test]
    fn property_requires_existing_owner() {
        let catalog = InMemoryCatalog::new();
        let mut orphan = property("p1", "1 Elm St", 0);
        orphan.owner_id = Some(OwnerId::from("ghost"));
        let err = catalog.insert_property(orphan).expect_err("fk enforced");
        assert!(matches!(err, CatalogError::MissingReference(_)));
    }

    #[test]
    fn list_names_are_unique_ignoring_case() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_list(list("l1", "Cash Buyers")).expect("first");
        let err = catalog
            .insert_list(list("l2", "cash buyers "))
            .expect_err("duplicate name");
        assert!(matches!(err, CatalogError::Conflict(_)));
    }

    #[test]
    fn memberships_are_unique_and_removable() {
        let catalog = InMemoryCatalog::new();
        catalog.insert_property(property("p1", "1 Elm St", 0)).expect("property");
        catalog.insert_list(list("l1", "Follow Up")).expect("list");

        catalog.insert_membership(membership("l1", "p1")).expect("first");
        let err = catalog
            .insert_membership(membership("l1", "p1"))
            .expect_err("duplicate membership");
        assert!(matches!(err, CatalogError::Conflict(_)));

        catalog
            .delete_membership(&ListId::from("l1"), &PropertyId::from("p1"))
            .expect("delete");
        let err = catalog
            .delete_membership(&ListId::from("l1"), &PropertyId::from("p1"))
            .expect_err("already gone");
        assert!(matches!(err, CatalogError::NotFound(_)));
    }
}
