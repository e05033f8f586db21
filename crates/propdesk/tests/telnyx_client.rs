//! Request shape and error mapping of the Telnyx client against a mock provider.

use std::time::Duration;

use httpmock::prelude::*;
use serde_json::json;

use propdesk::config::TelnyxConfig;
use propdesk::telephony::{CallControl, CallControlId, DialRequest, TelephonyError, TelnyxClient};

fn client_for(server: &MockServer) -> TelnyxClient {
    let config = TelnyxConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.base_url(),
        connection_id: Some("conn-42".to_string()),
        from_number: Some("+15155550100".to_string()),
        timeout: Duration::from_secs(5),
    };
    TelnyxClient::new(&config).expect("client builds")
}

#[tokio::test]
async fn hangup_posts_to_call_action_with_bearer_key() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/calls/call-123/actions/hangup")
                .header("Authorization", "Bearer test-key")
                .body_contains("command_id");
            then.status(200)
                .json_body(json!({ "data": { "result": "ok" } }));
        })
        .await;

    let outcome = client_for(&server)
        .hangup(&CallControlId("call-123".to_string()), "client_initiated")
        .await
        .expect("hangup succeeds");

    mock.assert_async().await;
    assert!(outcome.success);
    assert_eq!(outcome.reason, "client_initiated");
    assert!(!outcome.command_id.is_empty());
}

#[tokio::test]
async fn provider_errors_carry_status_and_detail() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/calls/call-ended/actions/hangup");
            then.status(422).json_body(json!({
                "errors": [{
                    "code": "90018",
                    "title": "Call has already ended",
                    "detail": "This call is no longer active and can't receive commands."
                }]
            }));
        })
        .await;

    let err = client_for(&server)
        .hangup(&CallControlId("call-ended".to_string()), "client_initiated")
        .await
        .expect_err("provider rejects");

    match err {
        TelephonyError::Api { status, message } => {
            assert_eq!(status, 422);
            assert!(message.contains("no longer active"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn dial_uses_configured_connection_and_caller() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/calls")
                .json_body(json!({
                    "connection_id": "conn-42",
                    "to": "+15155550142",
                    "from": "+15155550100"
                }));
            then.status(200).json_body(json!({
                "data": {
                    "call_control_id": "v3:new-call",
                    "call_leg_id": "leg-9",
                    "call_session_id": "session-9",
                    "is_alive": false
                }
            }));
        })
        .await;

    let outcome = client_for(&server)
        .dial(DialRequest {
            to: "+15155550142".to_string(),
            from: None,
        })
        .await
        .expect("dial succeeds");

    mock.assert_async().await;
    assert_eq!(outcome.call_control_id, CallControlId("v3:new-call".to_string()));
    assert_eq!(outcome.call_leg_id.as_deref(), Some("leg-9"));
    assert_eq!(outcome.from, "+15155550100");
}

#[tokio::test]
async fn status_reads_liveness() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/calls/call-123");
            then.status(200).json_body(json!({
                "data": {
                    "call_control_id": "call-123",
                    "is_alive": true,
                    "call_duration": 37,
                    "record_type": "call"
                }
            }));
        })
        .await;

    let status = client_for(&server)
        .status(&CallControlId("call-123".to_string()))
        .await
        .expect("status succeeds");

    assert!(status.is_alive);
    assert_eq!(status.call_duration, Some(37));
}

#[tokio::test]
async fn missing_api_key_fails_before_any_request() {
    let config = TelnyxConfig {
        api_key: None,
        ..TelnyxConfig::default()
    };
    let client = TelnyxClient::new(&config).expect("client builds");
    assert!(!client.is_configured());

    let err = client
        .hangup(&CallControlId("call-123".to_string()), "client_initiated")
        .await
        .expect_err("no key");
    assert!(matches!(err, TelephonyError::NotConfigured("TELNYX_API_KEY")));
}

#[tokio::test]
async fn dial_without_caller_number_fails_before_any_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/calls");
            then.status(200);
        })
        .await;
    let config = TelnyxConfig {
        api_key: Some("test-key".to_string()),
        base_url: server.base_url(),
        connection_id: Some("conn-42".to_string()),
        from_number: None,
        timeout: Duration::from_secs(5),
    };
    let client = TelnyxClient::new(&config).expect("client builds");

    let err = client
        .dial(DialRequest {
            to: "+15155550142".to_string(),
            from: None,
        })
        .await
        .expect_err("no caller number");

    assert!(matches!(err, TelephonyError::NotConfigured("TELNYX_FROM_NUMBER")));
    mock.assert_hits_async(0).await;
}
