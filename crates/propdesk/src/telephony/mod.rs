//! Thin proxy over the hosted call-control API.

pub mod client;
pub mod domain;
pub mod router;

pub use client::{CallControl, TelephonyError, TelnyxClient};
pub use domain::{
    CallControlId, CallStatus, DialOutcome, DialRequest, HangupOutcome, DEFAULT_HANGUP_REASON,
};
pub use router::telephony_router;
