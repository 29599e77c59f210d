// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Webhook authentication and decoding.
//!
//! A delivery carries a `Stripe-Signature` header of the form
//! `t=<unix seconds>,v1=<hex>[,v1=<hex>...]`. Each `v1` value is an
//! HMAC-SHA256 of `"{t}.{raw body}"` keyed with the endpoint secret.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::collections::HashMap;

use crate::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Name of the header carrying the signature.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Maximum age, in seconds, of a signed delivery.
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Event type emitted when a customer finishes paying.
pub const CHECKOUT_COMPLETED: &str = "checkout.session.completed";

fn mac_for(secret: &str, timestamp: &str, payload: &str) -> Result<HmacSha256, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::InvalidSecret)?;
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload.as_bytes());
    Ok(mac)
}

/// Produces a signature header for `payload`, as the provider would.
///
/// # Errors
///
/// Returns an error if the secret cannot key an HMAC.
pub fn sign_payload(payload: &str, secret: &str, timestamp: i64) -> Result<String, WebhookError> {
    let t = timestamp.to_string();
    let signature = hex::encode(mac_for(secret, &t, payload)?.finalize().into_bytes());
    Ok(format!("t={t},v1={signature}"))
}

/// Checks a signature header against the raw payload.
///
/// # Arguments
///
/// * `payload` - The raw request body, exactly as received
/// * `header` - The signature header value
/// * `secret` - The endpoint's signing secret
/// * `now` - Current time in Unix seconds
///
/// # Errors
///
/// Returns an error if the header is malformed, the timestamp is outside
/// [`SIGNATURE_TOLERANCE_SECS`] or no `v1` signature matches.
pub fn verify_signature(
    payload: &str,
    header: &str,
    secret: &str,
    now: i64,
) -> Result<(), WebhookError> {
    let mut timestamp: Option<&str> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in header.split(',') {
        let Some((key, value)) = part.trim().split_once('=') else {
            continue;
        };
        match key {
            "t" => timestamp = Some(value),
            // Undecodable entries are skipped.
            "v1" => signatures.extend(hex::decode(value).ok()),
            _ => {}
        }
    }

    let timestamp: &str = timestamp.ok_or(WebhookError::MalformedHeader)?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedHeader);
    }
    let signed_at: i64 = timestamp
        .parse()
        .map_err(|_| WebhookError::MalformedHeader)?;

    if (now - signed_at).abs() > SIGNATURE_TOLERANCE_SECS {
        return Err(WebhookError::TimestampOutsideTolerance {
            timestamp: signed_at,
            now,
        });
    }

    let mac = mac_for(secret, timestamp, payload)?;
    if signatures
        .iter()
        .any(|candidate| mac.clone().verify_slice(candidate).is_ok())
    {
        Ok(())
    } else {
        Err(WebhookError::SignatureMismatch)
    }
}

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    event_type: String,
    data: EventData,
}

#[derive(Debug, Deserialize)]
struct EventData {
    object: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct SessionObject {
    id: String,
    payment_intent: Option<String>,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

/// A completed checkout, as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedCheckout {
    pub session_id: String,
    pub payment_intent_id: Option<String>,
    /// The order reference placed in the session metadata.
    pub order_ref: Option<String>,
}

/// A decoded webhook event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookEvent {
    CheckoutCompleted(CompletedCheckout),
    /// Any event type the service does not act on.
    Ignored { event_type: String },
}

/// Decodes a webhook payload.
///
/// # Errors
///
/// Returns an error if the payload is not valid event JSON.
pub fn parse_event(payload: &str) -> Result<WebhookEvent, WebhookError> {
    let envelope: EventEnvelope = serde_json::from_str(payload)
        .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

    if envelope.event_type != CHECKOUT_COMPLETED {
        return Ok(WebhookEvent::Ignored {
            event_type: envelope.event_type,
        });
    }

    let mut session: SessionObject = serde_json::from_value(envelope.data.object)
        .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

    Ok(WebhookEvent::CheckoutCompleted(CompletedCheckout {
        session_id: session.id,
        payment_intent_id: session.payment_intent,
        order_ref: session.metadata.remove("order_ref"),
    }))
}
