use crate::catalog::{CatalogServiceError, SeedError};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::telephony::TelephonyError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Seed(SeedError),
    Catalog(CatalogServiceError),
    Telephony(TelephonyError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Seed(err) => write!(f, "catalog seed error: {}", err),
            AppError::Catalog(err) => write!(f, "catalog error: {}", err),
            AppError::Telephony(err) => write!(f, "telephony error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Seed(err) => Some(err),
            AppError::Catalog(err) => Some(err),
            AppError::Telephony(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<SeedError> for AppError {
    fn from(value: SeedError) -> Self {
        Self::Seed(value)
    }
}

impl From<CatalogServiceError> for AppError {
    fn from(value: CatalogServiceError) -> Self {
        Self::Catalog(value)
    }
}

impl From<TelephonyError> for AppError {
    fn from(value: TelephonyError) -> Self {
        Self::Telephony(value)
    }
}

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "error": message.into() }))).into_response()
}

/// Decode a JSON request body whatever `Content-Type` the client sent.
pub fn parse_json_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|err| {
        json_error(
            StatusCode::BAD_REQUEST,
            format!("invalid request body: {err}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct ListName {
        name: String,
    }

    #[test]
    fn parses_body_without_content_type() {
        let parsed: ListName = parse_json_body(br#"{"name":"Follow Up"}"#).expect("valid json");
        assert_eq!(parsed.name, "Follow Up");
    }

    #[test]
    fn unparseable_body_is_bad_request() {
        let response = parse_json_body::<ListName>(b"{not json").expect_err("invalid json");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
