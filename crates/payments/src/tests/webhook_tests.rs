// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    CompletedCheckout, SIGNATURE_TOLERANCE_SECS, WebhookError, WebhookEvent, parse_event,
    sign_payload, verify_signature,
};

const SECRET: &str = "whsec_test_secret";
const NOW: i64 = 1_704_067_200;
const PAYLOAD: &str = r#"{"type":"checkout.session.completed","data":{"object":{"id":"cs_1","payment_intent":"pi_1","metadata":{"order_ref":"RI-ABCD1234"}}}}"#;

#[test]
fn test_signed_payload_verifies() {
    let header = sign_payload(PAYLOAD, SECRET, NOW).unwrap();
    assert!(header.starts_with(&format!("t={NOW},v1=")));
    assert_eq!(verify_signature(PAYLOAD, &header, SECRET, NOW + 10), Ok(()));
}

#[test]
fn test_any_matching_v1_signature_is_accepted() {
    let header = sign_payload(PAYLOAD, SECRET, NOW).unwrap();
    let with_rotated = header.replace(",v1=", ",v1=00ff,v0=abc,v1=");
    assert_eq!(verify_signature(PAYLOAD, &with_rotated, SECRET, NOW), Ok(()));
}

#[test]
fn test_tampered_body_is_rejected() {
    let header = sign_payload(PAYLOAD, SECRET, NOW).unwrap();
    let tampered = PAYLOAD.replace("pi_1", "pi_2");
    assert_eq!(
        verify_signature(&tampered, &header, SECRET, NOW),
        Err(WebhookError::SignatureMismatch)
    );
}

#[test]
fn test_wrong_secret_is_rejected() {
    let header = sign_payload(PAYLOAD, "whsec_other", NOW).unwrap();
    assert_eq!(
        verify_signature(PAYLOAD, &header, SECRET, NOW),
        Err(WebhookError::SignatureMismatch)
    );
}

#[test]
fn test_stale_timestamp_is_rejected() {
    let header = sign_payload(PAYLOAD, SECRET, NOW).unwrap();
    let later = NOW + SIGNATURE_TOLERANCE_SECS + 1;
    assert_eq!(
        verify_signature(PAYLOAD, &header, SECRET, later),
        Err(WebhookError::TimestampOutsideTolerance {
            timestamp: NOW,
            now: later,
        })
    );
    assert_eq!(
        verify_signature(PAYLOAD, &header, SECRET, NOW + SIGNATURE_TOLERANCE_SECS),
        Ok(())
    );
}

#[test]
fn test_malformed_headers_are_rejected() {
    for header in ["", "v1=abcd", "t=123", "t=abc,v1=00", "garbage"] {
        assert_eq!(
            verify_signature(PAYLOAD, header, SECRET, NOW),
            Err(WebhookError::MalformedHeader),
            "header {header:?}"
        );
    }
}

#[test]
fn test_parse_checkout_completed() {
    let event = parse_event(PAYLOAD).unwrap();
    assert_eq!(
        event,
        WebhookEvent::CheckoutCompleted(CompletedCheckout {
            session_id: String::from("cs_1"),
            payment_intent_id: Some(String::from("pi_1")),
            order_ref: Some(String::from("RI-ABCD1234")),
        })
    );
}

#[test]
fn test_parse_other_events_are_ignored() {
    let event = parse_event(r#"{"type":"charge.refunded","data":{"object":{}}}"#).unwrap();
    assert_eq!(
        event,
        WebhookEvent::Ignored {
            event_type: String::from("charge.refunded")
        }
    );
}

#[test]
fn test_parse_rejects_non_events() {
    assert!(matches!(
        parse_event("not json"),
        Err(WebhookError::MalformedPayload(_))
    ));
    assert!(matches!(
        parse_event(r#"{"type":"checkout.session.completed","data":{"object":{}}}"#),
        Err(WebhookError::MalformedPayload(_))
    ));
}
