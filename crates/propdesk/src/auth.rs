//! Bearer-token gate shared by every `/api` route.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::config::AuthConfig;

/// Accepted API tokens, installed on the router as an `Extension`.
#[derive(Clone, Default)]
pub struct ApiAuth {
    tokens: Arc<Vec<String>>,
}

impl ApiAuth {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: Arc::new(tokens.into_iter().map(Into::into).collect()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.tokens.iter().cloned())
    }

    pub fn is_configured(&self) -> bool {
        !self.tokens.is_empty()
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AuthRejection> {
        let token = bearer_token(headers).ok_or(AuthRejection::Unauthorized)?;
        if self.tokens.is_empty() {
            return Err(AuthRejection::Unauthorized);
        }
        let matched = self.tokens.iter().fold(false, |matched, candidate| {
            matched | constant_time_eq(candidate.as_bytes(), token.as_bytes())
        });
        if matched {
            Ok(())
        } else {
            Err(AuthRejection::Forbidden)
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Runs in time proportional to `presented` alone, including on length mismatch.
fn constant_time_eq(expected: &[u8], presented: &[u8]) -> bool {
    let mut diff = expected.len() ^ presented.len();
    for (index, byte) in presented.iter().enumerate() {
        let other = expected.get(index).copied().unwrap_or(0);
        diff |= usize::from(byte ^ other);
    }
    diff == 0
}

/// Extractor proving the request carried an accepted token.
#[derive(Debug, Clone, Copy)]
pub struct Authorized;

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authorized
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(auth) = parts.extensions.get::<ApiAuth>() else {
            warn!(path = %parts.uri.path(), "no API auth installed; rejecting request");
            return Err(AuthRejection::Unauthorized);
        };
        match auth.authorize(&parts.headers) {
            Ok(()) => Ok(Authorized),
            Err(rejection) => {
                warn!(
                    path = %parts.uri.path(),
                    status = %rejection.status(),
                    "request rejected by API gate"
                );
                Err(rejection)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthRejection {
    Unauthorized,
    Forbidden,
}

impl AuthRejection {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthRejection::Unauthorized => StatusCode::UNAUTHORIZED,
            AuthRejection::Forbidden => StatusCode::FORBIDDEN,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let message = match self {
            AuthRejection::Unauthorized => "Unauthorized",
            AuthRejection::Forbidden => "Forbidden",
        };
        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
