use super::domain::{
    Contact, List, ListId, Owner, OwnerId, Property, PropertyId, PropertyList,
};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// One-based page window. Invalid or missing values fall back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Lenient parse of raw query parameters.
    pub fn from_params(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| {
            raw.and_then(|value| value.trim().parse::<u32>().ok())
                .filter(|value| *value > 0)
        };
        let defaults = Self::default();
        Self::new(
            parse(page).unwrap_or(defaults.page),
            parse(limit).unwrap_or(defaults.limit),
        )
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

/// Free-text search plus a page window.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub search: Option<String>,
    pub page: PageRequest,
}

impl SearchQuery {
    /// Lowercased, trimmed needle; `None` when the search matches everything.
    pub fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_lowercase)
    }
}

/// A page of rows plus the unpaged match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub request: PageRequest,
}

/// Storage abstraction over the relational schema.
pub trait CatalogRepository: Send + Sync {
    fn property(&self, id: &PropertyId) -> Result<Option<Property>, CatalogError>;
    fn search_properties(&self, query: &SearchQuery) -> Result<Page<Property>, CatalogError>;
    fn insert_property(&self, property: Property) -> Result<Property, CatalogError>;
    fn properties_for_owner(&self, owner_id: &OwnerId) -> Result<Vec<Property>, CatalogError>;

    fn owner(&self, id: &OwnerId) -> Result<Option<Owner>, CatalogError>;
    fn search_owners(&self, query: &SearchQuery) -> Result<Page<Owner>, CatalogError>;
    fn insert_owner(&self, owner: Owner) -> Result<Owner, CatalogError>;

    fn contacts_for_owner(&self, owner_id: &OwnerId) -> Result<Vec<Contact>, CatalogError>;
    fn insert_contact(&self, contact: Contact) -> Result<Contact, CatalogError>;

    fn list(&self, id: &ListId) -> Result<Option<List>, CatalogError>;
    fn lists(&self) -> Result<Vec<List>, CatalogError>;
    fn insert_list(&self, list: List) -> Result<List, CatalogError>;

    fn memberships_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<PropertyList>, CatalogError>;
    fn memberships_for_list(&self, list_id: &ListId) -> Result<Vec<PropertyList>, CatalogError>;
    fn insert_membership(&self, membership: PropertyList) -> Result<PropertyList, CatalogError>;
    fn delete_membership(
        &self,
        list_id: &ListId,
        property_id: &PropertyId,
    ) -> Result<(), CatalogError>;
}

/// Constraint and availability failures raised by a repository.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("unique constraint violated: {0}")]
    Conflict(String),
    #[error("referenced record not found: {0}")]
    MissingReference(String),
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
}
