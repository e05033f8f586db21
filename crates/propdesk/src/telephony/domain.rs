use serde::{Deserialize, Serialize};

/// Provider identifier for an active call leg.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallControlId(pub String);

impl CallControlId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CallControlId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub const DEFAULT_HANGUP_REASON: &str = "client_initiated";

/// Result relayed to the caller after the provider accepted a hangup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HangupOutcome {
    pub success: bool,
    pub call_control_id: CallControlId,
    pub reason: String,
    pub command_id: String,
}

/// Outbound call request. `to` must already be E.164.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialRequest {
    pub to: String,
    pub from: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DialOutcome {
    pub call_control_id: CallControlId,
    pub call_leg_id: Option<String>,
    pub call_session_id: Option<String>,
    pub to: String,
    pub from: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallStatus {
    pub call_control_id: CallControlId,
    pub is_alive: bool,
    pub call_duration: Option<u64>,
}
