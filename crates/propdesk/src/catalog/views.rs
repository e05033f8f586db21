//! JSON shapes returned by the catalog routes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::contact::format_phone_number;
use super::domain::{Contact, List, ListId, MembershipId, Owner, OwnerId, Property, PropertyId};
use super::repository::Page;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
    pub total_count: usize,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl Pagination {
    pub fn of<T>(page: &Page<T>) -> Self {
        let limit = page.request.limit;
        let total_pages = page.total_count.div_ceil(limit as usize) as u32;
        let current_page = page.request.page;
        Self {
            current_page,
            total_pages,
            total_count: page.total_count,
            limit,
            has_next_page: current_page < total_pages,
            has_previous_page: current_page > 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListRef {
    pub id: ListId,
    pub name: String,
    pub description: Option<String>,
}

impl From<&List> for ListRef {
    fn from(list: &List) -> Self {
        Self {
            id: list.id.clone(),
            name: list.name.clone(),
            description: list.description.clone(),
        }
    }
}

/// A property's membership with the list embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMembershipView {
    pub id: MembershipId,
    pub list_id: ListId,
    pub property_id: PropertyId,
    pub added_at: DateTime<Utc>,
    pub list: ListRef,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerSummary {
    pub id: OwnerId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyView {
    #[serde(flatten)]
    pub property: Property,
    pub owner: Option<OwnerSummary>,
    pub lists: Vec<ListMembershipView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyPage {
    pub properties: Vec<PropertyView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactView {
    #[serde(flatten)]
    pub contact: Contact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatted_phone: Option<String>,
}

impl From<Contact> for ContactView {
    fn from(contact: Contact) -> Self {
        let formatted_phone = contact.phone.as_deref().map(format_phone_number);
        Self {
            contact,
            formatted_phone,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerView {
    #[serde(flatten)]
    pub owner: Owner,
    pub contacts: Vec<ContactView>,
    pub property_ids: Vec<PropertyId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OwnerPage {
    pub owners: Vec<OwnerView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    #[serde(flatten)]
    pub list: List,
    pub property_count: usize,
}
