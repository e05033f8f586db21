//! Property, owner, contact, and list catalog.

pub mod contact;
pub mod domain;
pub mod memory;
pub mod panel;
pub mod repository;
pub mod router;
pub mod seed;
pub mod service;
pub mod views;

pub use contact::{
    contacts_from_skip_trace, format_phone_number, to_e164, ContactType, NewContact, PhoneLabel,
};
pub use domain::{
    Contact, ContactId, List, ListId, MembershipId, Owner, OwnerId, Property, PropertyId,
    PropertyList,
};
pub use memory::InMemoryCatalog;
pub use panel::{PanelRow, PropertyListPanel};
pub use repository::{CatalogError, CatalogRepository, Page, PageRequest, SearchQuery};
pub use router::catalog_router;
pub use seed::{CatalogSeed, SeedError};
pub use service::{CatalogService, CatalogServiceError, Entity, NewList};
pub use views::{
    ContactView, ListMembershipView, ListRef, ListSummary, OwnerPage, OwnerSummary, OwnerView,
    Pagination, PropertyPage, PropertyView,
};
