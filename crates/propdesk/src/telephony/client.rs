use async_trait::async_trait;
use reqwest::{RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use super::domain::{CallControlId, CallStatus, DialOutcome, DialRequest, HangupOutcome};
use crate::config::TelnyxConfig;

/// Outbound call-control operations. The HTTP layer only talks to this seam.
#[async_trait]
pub trait CallControl: Send + Sync {
    async fn hangup(
        &self,
        call_control_id: &CallControlId,
        reason: &str,
    ) -> Result<HangupOutcome, TelephonyError>;

    async fn dial(&self, request: DialRequest) -> Result<DialOutcome, TelephonyError>;

    async fn status(&self, call_control_id: &CallControlId) -> Result<CallStatus, TelephonyError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TelephonyError {
    #[error("telephony provider is not configured: {0} is unset")]
    NotConfigured(&'static str),
    #[error("invalid telephony base URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("request to telephony provider failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("telephony provider returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("unexpected telephony provider response: {0}")]
    Decode(String),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct ProviderErrors {
    #[serde(default)]
    errors: Vec<ProviderErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DialedCall {
    call_control_id: String,
    #[serde(default)]
    call_leg_id: Option<String>,
    #[serde(default)]
    call_session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallRecord {
    #[serde(default)]
    is_alive: bool,
    #[serde(default)]
    call_duration: Option<u64>,
}

/// Telnyx call-control v2 client.
#[derive(Clone)]
pub struct TelnyxClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
    connection_id: Option<String>,
    from_number: Option<String>,
}

impl std::fmt::Debug for TelnyxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelnyxClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("connection_id", &self.connection_id)
            .field("from_number", &self.from_number)
            .finish()
    }
}

impl TelnyxClient {
    pub fn new(config: &TelnyxConfig) -> Result<Self, TelephonyError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|_| TelephonyError::InvalidBaseUrl(config.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(TelephonyError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            http,
            base_url,
            api_key: config.api_key.clone(),
            connection_id: config.connection_id.clone(),
            from_number: config.from_number.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, TelephonyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TelephonyError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder, TelephonyError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TelephonyError::NotConfigured("TELNYX_API_KEY"))?;
        Ok(request.bearer_auth(api_key))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TelephonyError> {
        let response = self.authorized(request)?.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(TelephonyError::Api {
                status: status.as_u16(),
                message: provider_message(&body),
            });
        }

        serde_json::from_str::<Envelope<T>>(&body)
            .map(|envelope| envelope.data)
            .map_err(|err| TelephonyError::Decode(err.to_string()))
    }
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<ProviderErrors>(body)
        .ok()
        .and_then(|parsed| parsed.errors.into_iter().next())
        .and_then(|error| error.detail.or(error.title))
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty response body".to_string()
            } else {
                trimmed.to_string()
            }
        })
}

#[async_trait]
impl CallControl for TelnyxClient {
    async fn hangup(
        &self,
        call_control_id: &CallControlId,
        reason: &str,
    ) -> Result<HangupOutcome, TelephonyError> {
        let url = self.endpoint(&["calls", call_control_id.as_str(), "actions", "hangup"])?;
        let command_id = uuid::Uuid::new_v4().to_string();
        info!(%call_control_id, reason, %command_id, "requesting call hangup");

        let _: serde_json::Value = self
            .send(self.http.post(url).json(&json!({ "command_id": command_id })))
            .await?;

        Ok(HangupOutcome {
            success: true,
            call_control_id: call_control_id.clone(),
            reason: reason.to_string(),
            command_id,
        })
    }

    async fn dial(&self, request: DialRequest) -> Result<DialOutcome, TelephonyError> {
        let connection_id = self
            .connection_id
            .as_deref()
            .ok_or(TelephonyError::NotConfigured("TELNYX_CONNECTION_ID"))?;
        let from = request
            .from
            .or_else(|| self.from_number.clone())
            .ok_or(TelephonyError::NotConfigured("TELNYX_FROM_NUMBER"))?;

        let url = self.endpoint(&["calls"])?;
        info!(to = %request.to, %from, "dialing outbound call");
        let call: DialedCall = self
            .send(self.http.post(url).json(&json!({
                "connection_id": connection_id,
                "to": request.to,
                "from": from,
            })))
            .await?;

        Ok(DialOutcome {
            call_control_id: CallControlId(call.call_control_id),
            call_leg_id: call.call_leg_id,
            call_session_id: call.call_session_id,
            to: request.to,
            from,
        })
    }

    async fn status(&self, call_control_id: &CallControlId) -> Result<CallStatus, TelephonyError> {
        let url = self.endpoint(&["calls", call_control_id.as_str()])?;
        debug!(%call_control_id, "fetching call status");
        let record: CallRecord = self.send(self.http.get(url)).await?;

        Ok(CallStatus {
            call_control_id: call_control_id.clone(),
            is_alive: record.is_alive,
            call_duration: record.call_duration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keeps_base_path() {
        let config = TelnyxConfig {
            base_url: "https://api.telnyx.com/v2/".to_string(),
            ..TelnyxConfig::default()
        };
        let client = TelnyxClient::new(&config).expect("client builds");
        let url = client
            .endpoint(&["calls", "v3:abc", "actions", "hangup"])
            .expect("endpoint");
        assert_eq!(
            url.as_str(),
            "https://api.telnyx.com/v2/calls/v3:abc/actions/hangup"
        );
    }

    #[test]
    fn rejects_unusable_base_url() {
        let config = TelnyxConfig {
            base_url: "mailto:ops@example.com".to_string(),
            ..TelnyxConfig::default()
        };
        let err = TelnyxClient::new(&config).expect_err("invalid base");
        assert!(matches!(err, TelephonyError::InvalidBaseUrl(_)));
    }

    #[test]
    fn provider_message_prefers_error_detail() {
        let body = r#"{"errors":[{"code":"90018","title":"Call has already ended","detail":"This call is no longer active."}]}"#;
        assert_eq!(provider_message(body), "This call is no longer active.");
        assert_eq!(provider_message("  "), "empty response body");
        assert_eq!(provider_message("gateway timeout"), "gateway timeout");
    }
}
