use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::error;

use super::contact::NewContact;
use super::domain::{ListId, OwnerId, PropertyId};
use super::repository::{CatalogError, CatalogRepository, PageRequest, SearchQuery};
use super::service::{CatalogService, CatalogServiceError, NewList};
use crate::auth::Authorized;
use crate::error::{json_error, parse_json_body};

/// Query string accepted by the paginated listing routes.
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub id: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
}

impl ListingParams {
    fn search_query(&self) -> SearchQuery {
        SearchQuery {
            search: self.search.clone(),
            page: PageRequest::from_params(self.page.as_deref(), self.limit.as_deref()),
        }
    }

    fn requested_id(&self) -> Option<&str> {
        self.id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRequest {
    pub property_id: Option<String>,
}

/// Router builder exposing property, owner, contact, and list endpoints.
pub fn catalog_router<R>(service: Arc<CatalogService<R>>) -> Router
where
    R: CatalogRepository + 'static,
{
    Router::new()
        .route("/api/properties", get(properties_handler::<R>))
        .route("/api/owners", get(owners_handler::<R>))
        .route(
            "/api/owners/:owner_id/contacts",
            post(create_contact_handler::<R>),
        )
        .route(
            "/api/owners/:owner_id/contacts/import",
            post(import_contacts_handler::<R>),
        )
        .route(
            "/api/lists",
            get(lists_handler::<R>).post(create_list_handler::<R>),
        )
        .route(
            "/api/lists/:list_id/properties",
            post(add_membership_handler::<R>),
        )
        .route(
            "/api/lists/:list_id/properties/:property_id",
            delete(remove_membership_handler::<R>),
        )
        .with_state(service)
}

fn service_error_response(err: CatalogServiceError) -> Response {
    match err {
        CatalogServiceError::NotFound(entity) => {
            json_error(StatusCode::NOT_FOUND, format!("{entity} not found"))
        }
        CatalogServiceError::Invalid(message) => json_error(StatusCode::BAD_REQUEST, message),
        CatalogServiceError::Import(err) => json_error(
            StatusCode::BAD_REQUEST,
            format!("invalid contact import: {err}"),
        ),
        CatalogServiceError::Catalog(CatalogError::Conflict(detail)) => {
            json_error(StatusCode::CONFLICT, format!("already exists: {detail}"))
        }
        CatalogServiceError::Catalog(CatalogError::MissingReference(detail))
        | CatalogServiceError::Catalog(CatalogError::NotFound(detail)) => {
            json_error(StatusCode::NOT_FOUND, format!("not found: {detail}"))
        }
        CatalogServiceError::Catalog(err @ CatalogError::Unavailable(_)) => {
            error!(error = %err, "catalog request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

pub(crate) async fn properties_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    if let Some(id) = params.requested_id() {
        return match service.property(&PropertyId::from(id)) {
            Ok(view) => (StatusCode::OK, Json(view)).into_response(),
            Err(err) => service_error_response(err),
        };
    }

    match service.search_properties(&params.search_query()) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn owners_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
    Query(params): Query<ListingParams>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    if let Some(id) = params.requested_id() {
        return match service.owner(&OwnerId::from(id)) {
            Ok(view) => (StatusCode::OK, Json(view)).into_response(),
            Err(err) => service_error_response(err),
        };
    }

    match service.search_owners(&params.search_query()) {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn create_contact_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
    Path(owner_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let contact: NewContact = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection,
    };

    match service.create_contact(&OwnerId(owner_id), contact) {
        Ok(contact) => (StatusCode::CREATED, Json(contact)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn import_contacts_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
    Path(owner_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
{
    match service.import_contacts(&OwnerId(owner_id), body.as_ref()) {
        Ok(contacts) => (StatusCode::CREATED, Json(contacts)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn lists_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    match service.list_summaries() {
        Ok(lists) => (StatusCode::OK, Json(lists)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn create_list_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let request: NewList = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection,
    };

    match service.create_list(request) {
        Ok(list) => (StatusCode::CREATED, Json(list)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn add_membership_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
    Path(list_id): Path<String>,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
{
    let request: MembershipRequest = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection,
    };
    let Some(property_id) = request
        .property_id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
    else {
        return json_error(StatusCode::BAD_REQUEST, "Property ID is required");
    };

    match service.add_to_list(&ListId(list_id), &PropertyId(property_id)) {
        Ok(membership) => (StatusCode::CREATED, Json(membership)).into_response(),
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn remove_membership_handler<R>(
    _auth: Authorized,
    State(service): State<Arc<CatalogService<R>>>,
    Path((list_id, property_id)): Path<(String, String)>,
) -> Response
where
    R: CatalogRepository + 'static,
{
    match service.remove_from_list(&ListId(list_id), &PropertyId(property_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => service_error_response(err),
    }
}
