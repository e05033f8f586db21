use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use super::client::{CallControl, TelephonyError};
use super::domain::{CallControlId, DialRequest, DEFAULT_HANGUP_REASON};
use crate::auth::Authorized;
use crate::catalog::to_e164;
use crate::error::{json_error, parse_json_body};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HangupRequest {
    #[serde(default)]
    pub call_control_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DialPayload {
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default)]
    pub from: Option<String>,
}

/// Router builder exposing the call-control proxy endpoints.
pub fn telephony_router<C>(client: Arc<C>) -> Router
where
    C: CallControl + 'static,
{
    Router::new()
        .route("/api/telnyx/hangup", post(hangup_handler::<C>))
        .route("/api/telnyx/calls", post(dial_handler::<C>))
        .route(
            "/api/telnyx/calls/:call_control_id",
            get(status_handler::<C>),
        )
        .with_state(client)
}

fn provider_failure(summary: &str, err: TelephonyError) -> Response {
    error!(error = %err, "{summary}");
    let payload = json!({
        "error": summary,
        "details": err.to_string(),
    });
    (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

pub(crate) async fn hangup_handler<C>(
    _auth: Authorized,
    State(client): State<Arc<C>>,
    body: Bytes,
) -> Response
where
    C: CallControl + 'static,
{
    let request: HangupRequest = match parse_json_body(&body) {
        Ok(request) => request,
        Err(rejection) => return rejection,
    };

    let Some(call_control_id) = non_blank(request.call_control_id) else {
        return json_error(StatusCode::BAD_REQUEST, "Call control ID is required");
    };
    let reason = non_blank(request.reason).unwrap_or_else(|| DEFAULT_HANGUP_REASON.to_string());

    match client
        .hangup(&CallControlId(call_control_id), &reason)
        .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(err) => provider_failure("Failed to hangup call", err),
    }
}

pub(crate) async fn dial_handler<C>(
    _auth: Authorized,
    State(client): State<Arc<C>>,
    body: Bytes,
) -> Response
where
    C: CallControl + 'static,
{
    let payload: DialPayload = match parse_json_body(&body) {
        Ok(payload) => payload,
        Err(rejection) => return rejection,
    };

    let Some(raw_to) = non_blank(payload.to) else {
        return json_error(StatusCode::BAD_REQUEST, "Destination number is required");
    };
    let Some(to) = to_e164(&raw_to) else {
        return json_error(
            StatusCode::BAD_REQUEST,
            format!("'{raw_to}' is not a dialable phone number"),
        );
    };
    let from = match non_blank(payload.from) {
        Some(raw) => match to_e164(&raw) {
            Some(from) => Some(from),
            None => {
                return json_error(
                    StatusCode::BAD_REQUEST,
                    format!("'{raw}' is not a dialable caller number"),
                )
            }
        },
        None => None,
    };

    match client.dial(DialRequest { to, from }).await {
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(err) => provider_failure("Failed to initiate call", err),
    }
}

pub(crate) async fn status_handler<C>(
    _auth: Authorized,
    State(client): State<Arc<C>>,
    Path(call_control_id): Path<String>,
) -> Response
where
    C: CallControl + 'static,
{
    match client.status(&CallControlId(call_control_id)).await {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(err) => provider_failure("Failed to fetch call status", err),
    }
}
