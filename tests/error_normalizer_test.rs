//! Integration tests for error normalization
//!
//! Feeds envelopes as they arrive from the backend (JSON) through the public API.

use chatter::normalize::{
    normalize, Failure, FailureKind, CONNECTION_REFUSED_MESSAGE, REAUTHENTICATE_MESSAGE,
    UNKNOWN_FAILURE_MESSAGE,
};
use chatter::presentation::{FormError, UNKNOWN_ERROR_MESSAGE};
use chatter::ErrorEnvelope;
use pretty_assertions::assert_eq;
use serde_json::json;

fn envelope(value: serde_json::Value) -> ErrorEnvelope {
    ErrorEnvelope::from_value(&value)
}

#[test]
fn test_connection_refused_message() {
    let msg = normalize(&envelope(json!({ "networkError": { "code": "ECONNREFUSED" } })));
    assert_eq!(msg.as_str(), CONNECTION_REFUSED_MESSAGE);
    assert!(!msg.as_str().is_empty());
    assert!(msg.as_str().chars().next().unwrap().is_uppercase());
}

#[test]
fn test_unauthorized_transport_message_is_stable() {
    let first = normalize(&envelope(json!({ "networkError": { "statusCode": 401 } })));
    let second = normalize(&envelope(json!({ "networkError": { "statusCode": 401 } })));
    assert_eq!(first.as_str(), REAUTHENTICATE_MESSAGE);
    assert_eq!(first, second);
}

#[test]
fn test_nested_list_message_wins_over_entry_message() {
    let msg = normalize(&envelope(json!({
        "errors": [{
            "message": "server exploded",
            "extensions": { "originalError": { "message": ["bad input"] } }
        }]
    })));
    assert_eq!(msg.as_str(), "Bad input");
    assert_eq!(msg.kind(), FailureKind::Application);
}

#[test]
fn test_bare_message() {
    let msg = normalize(&envelope(json!({ "message": "boom" })));
    assert_eq!(msg.as_str(), "Boom");
    assert_eq!(msg.kind(), FailureKind::Unstructured);
}

#[test]
fn test_empty_object_is_unknown() {
    let msg = normalize(&envelope(json!({})));
    assert!(msg.is_unknown());
    assert_eq!(msg.as_str(), UNKNOWN_FAILURE_MESSAGE);
}

#[test]
fn test_malformed_payloads_never_panic() {
    let payloads = [
        json!(null),
        json!(42),
        json!([]),
        json!({ "errors": null }),
        json!({ "errors": [null] }),
        json!({ "errors": [{ "extensions": null }] }),
        json!({ "errors": [{ "extensions": { "originalError": "x" } }] }),
        json!({ "errors": [{ "extensions": { "originalError": { "message": {} } } }] }),
        json!({ "graphQLErrors": "oops" }),
        json!({ "networkError": [] }),
        json!({ "networkError": { "statusCode": -1 } }),
        json!({ "errors": [["oops"]] }),
        json!([{ "message": "oops" }]),
    ];

    for payload in payloads {
        let msg = normalize(&envelope(payload.clone()));
        assert!(!msg.as_str().is_empty(), "{}", payload);
    }
}

#[test]
fn test_array_entries_are_not_read_as_messages() {
    for payload in [
        json!({ "errors": [["oops"]] }),
        json!({ "graphQLErrors": [["oops", { "originalError": { "message": "bad" } }]] }),
        json!({ "networkError": ["ECONNREFUSED"] }),
    ] {
        let msg = normalize(&envelope(payload.clone()));
        assert!(msg.is_unknown(), "{}", payload);
        assert_eq!(msg.as_str(), UNKNOWN_FAILURE_MESSAGE);
    }
}

#[test]
fn test_only_first_character_changes() {
    let msg = normalize(&envelope(json!({
        "errors": [{ "message": "  email must be an email!! " }]
    })));
    assert_eq!(msg.as_str(), "  email must be an email!! ");

    let msg = normalize(&envelope(json!({
        "errors": [{ "message": "eMAIL must be an email" }]
    })));
    assert_eq!(msg.as_str(), "EMAIL must be an email");
}

#[test]
fn test_classification_variants() {
    assert_eq!(
        Failure::classify(&envelope(json!({ "networkError": { "code": "ECONNREFUSED" } }))),
        Failure::Connection
    );
    assert_eq!(
        Failure::classify(&envelope(json!({ "networkError": { "code": "ETIMEDOUT", "statusCode": 504 } }))),
        Failure::Transport {
            status_code: Some(504),
            message: None
        }
    );
    assert_eq!(Failure::classify(&envelope(json!({}))), Failure::Unknown);
}

#[test]
fn test_signup_form_feedback() {
    let mut form = FormError::new();

    form.record(&Err::<(), _>(envelope(json!({
        "errors": [{
            "message": "Bad Request Exception",
            "extensions": { "originalError": { "statusCode": 400, "message": ["email must be an email"] } }
        }]
    }))));
    assert_eq!(form.message(), "Email must be an email");

    form.record(&Err::<(), _>(envelope(json!({ "unexpected": true }))));
    assert_eq!(form.message(), UNKNOWN_ERROR_MESSAGE);

    form.record(&Ok::<(), ErrorEnvelope>(()));
    assert_eq!(form.message(), "");
}
