use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use super::contact::{contacts_from_skip_trace, NewContact};
use super::domain::{
    Contact, ContactId, List, ListId, MembershipId, Owner, OwnerId, Property, PropertyId,
    PropertyList,
};
use super::repository::{CatalogError, CatalogRepository, SearchQuery};
use super::views::{
    ContactView, ListMembershipView, ListRef, ListSummary, OwnerPage, OwnerSummary, OwnerView,
    Pagination, PropertyPage, PropertyView,
};

/// Record kinds surfaced in not-found responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Property,
    Owner,
    List,
    Membership,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Entity::Property => "Property",
            Entity::Owner => "Owner",
            Entity::List => "List",
            Entity::Membership => "List membership",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewList {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Service answering catalog reads and writes for the HTTP layer and CLI.
pub struct CatalogService<R> {
    repository: Arc<R>,
}

impl<R> CatalogService<R>
where
    R: CatalogRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn property(&self, id: &PropertyId) -> Result<PropertyView, CatalogServiceError> {
        let property = self
            .repository
            .property(id)?
            .ok_or(CatalogServiceError::NotFound(Entity::Property))?;
        let mut lists = ListCache::default();
        self.property_view(property, &mut lists)
    }

    pub fn search_properties(
        &self,
        query: &SearchQuery,
    ) -> Result<PropertyPage, CatalogServiceError> {
        let page = self.repository.search_properties(query)?;
        let pagination = Pagination::of(&page);
        let mut lists = ListCache::default();
        let properties = page
            .items
            .into_iter()
            .map(|property| self.property_view(property, &mut lists))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(PropertyPage {
            properties,
            pagination,
        })
    }

    fn property_view(
        &self,
        property: Property,
        lists: &mut ListCache,
    ) -> Result<PropertyView, CatalogServiceError> {
        let owner = match &property.owner_id {
            Some(owner_id) => self.repository.owner(owner_id)?.map(|owner| OwnerSummary {
                id: owner.id,
                name: owner.name,
            }),
            None => None,
        };

        let mut memberships = Vec::new();
        for membership in self.repository.memberships_for_property(&property.id)? {
            let Some(list) = lists.get(self.repository.as_ref(), &membership.list_id)? else {
                continue;
            };
            memberships.push(ListMembershipView {
                id: membership.id,
                list_id: membership.list_id,
                property_id: membership.property_id,
                added_at: membership.added_at,
                list,
            });
        }
        memberships.sort_by(|a, b| a.added_at.cmp(&b.added_at));

        Ok(PropertyView {
            property,
            owner,
            lists: memberships,
        })
    }

    pub fn owner(&self, id: &OwnerId) -> Result<OwnerView, CatalogServiceError> {
        let owner = self
            .repository
            .owner(id)?
            .ok_or(CatalogServiceError::NotFound(Entity::Owner))?;
        self.owner_view(owner)
    }

    pub fn search_owners(&self, query: &SearchQuery) -> Result<OwnerPage, CatalogServiceError> {
        let page = self.repository.search_owners(query)?;
        let pagination = Pagination::of(&page);
        let owners = page
            .items
            .into_iter()
            .map(|owner| self.owner_view(owner))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OwnerPage { owners, pagination })
    }

    fn owner_view(&self, owner: Owner) -> Result<OwnerView, CatalogServiceError> {
        let contacts = self
            .repository
            .contacts_for_owner(&owner.id)?
            .into_iter()
            .map(ContactView::from)
            .collect();
        let property_ids = self
            .repository
            .properties_for_owner(&owner.id)?
            .into_iter()
            .map(|property| property.id)
            .collect();
        Ok(OwnerView {
            owner,
            contacts,
            property_ids,
        })
    }

    pub fn create_contact(
        &self,
        owner_id: &OwnerId,
        contact: NewContact,
    ) -> Result<Contact, CatalogServiceError> {
        self.ensure_owner(owner_id)?;
        if !contact.has_channel() {
            return Err(CatalogServiceError::Invalid(
                "a contact needs a phone number or an email address".to_string(),
            ));
        }
        self.insert_contact(owner_id, contact)
    }

    /// Create contacts from a skip-trace CSV export; returns the stored rows.
    pub fn import_contacts<T: Read>(
        &self,
        owner_id: &OwnerId,
        csv: T,
    ) -> Result<Vec<Contact>, CatalogServiceError> {
        self.ensure_owner(owner_id)?;
        let contacts = contacts_from_skip_trace(csv)?;
        let stored = contacts
            .into_iter()
            .map(|contact| self.insert_contact(owner_id, contact))
            .collect::<Result<Vec<_>, _>>()?;
        info!(owner_id = %owner_id, imported = stored.len(), "imported skip-trace contacts");
        Ok(stored)
    }

    fn ensure_owner(&self, owner_id: &OwnerId) -> Result<(), CatalogServiceError> {
        match self.repository.owner(owner_id)? {
            Some(_) => Ok(()),
            None => Err(CatalogServiceError::NotFound(Entity::Owner)),
        }
    }

    fn insert_contact(
        &self,
        owner_id: &OwnerId,
        contact: NewContact,
    ) -> Result<Contact, CatalogServiceError> {
        let now = Utc::now();
        let record = Contact {
            id: ContactId::generate(),
            phone: non_blank(contact.phone),
            email: non_blank(contact.email),
            contact_type: contact.contact_type,
            label: contact.label,
            priority: contact.priority,
            notes: contact.notes,
            owner_id: owner_id.clone(),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_contact(record)?)
    }

    pub fn list_summaries(&self) -> Result<Vec<ListSummary>, CatalogServiceError> {
        self.repository
            .lists()?
            .into_iter()
            .map(|list| -> Result<ListSummary, CatalogServiceError> {
                let property_count = self.repository.memberships_for_list(&list.id)?.len();
                Ok(ListSummary {
                    list,
                    property_count,
                })
            })
            .collect()
    }

    pub fn create_list(&self, request: NewList) -> Result<List, CatalogServiceError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(CatalogServiceError::Invalid(
                "list name is required".to_string(),
            ));
        }
        let now = Utc::now();
        let list = List {
            id: ListId::generate(),
            name: name.to_string(),
            description: non_blank(request.description),
            created_at: now,
            updated_at: now,
        };
        Ok(self.repository.insert_list(list)?)
    }

    pub fn add_to_list(
        &self,
        list_id: &ListId,
        property_id: &PropertyId,
    ) -> Result<PropertyList, CatalogServiceError> {
        if self.repository.list(list_id)?.is_none() {
            return Err(CatalogServiceError::NotFound(Entity::List));
        }
        if self.repository.property(property_id)?.is_none() {
            return Err(CatalogServiceError::NotFound(Entity::Property));
        }
        let membership = PropertyList {
            id: MembershipId::generate(),
            property_id: property_id.clone(),
            list_id: list_id.clone(),
            added_at: Utc::now(),
        };
        Ok(self.repository.insert_membership(membership)?)
    }

    pub fn remove_from_list(
        &self,
        list_id: &ListId,
        property_id: &PropertyId,
    ) -> Result<(), CatalogServiceError> {
        match self.repository.delete_membership(list_id, property_id) {
            Ok(()) => Ok(()),
            Err(CatalogError::NotFound(_)) => {
                Err(CatalogServiceError::NotFound(Entity::Membership))
            }
            Err(other) => Err(other.into()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

/// Lists are few and shared by many properties; fetch each once per request.
#[derive(Default)]
struct ListCache {
    lists: HashMap<ListId, Option<ListRef>>,
}

impl ListCache {
    fn get<R: CatalogRepository + ?Sized>(
        &mut self,
        repository: &R,
        id: &ListId,
    ) -> Result<Option<ListRef>, CatalogError> {
        if let Some(cached) = self.lists.get(id) {
            return Ok(cached.clone());
        }
        let list = repository.list(id)?.as_ref().map(ListRef::from);
        self.lists.insert(id.clone(), list.clone());
        Ok(list)
    }
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogServiceError {
    #[error("{0} not found")]
    NotFound(Entity),
    #[error("{0}")]
    Invalid(String),
    #[error("invalid contact import: {0}")]
    Import(#[from] csv::Error),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
