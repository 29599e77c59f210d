// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Errors returned by a payment gateway.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The request never produced an HTTP response.
    #[error("payment provider request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("payment provider rejected the request ({status}): {message}")]
    Provider {
        /// HTTP status returned by the provider.
        status: u16,
        /// The provider's error message.
        message: String,
    },

    /// The provider answered, but the body was not what we expected.
    #[error("unexpected payment provider response: {0}")]
    InvalidResponse(String),

    /// A request body could not be form-encoded.
    #[error("failed to encode payment request: {0}")]
    Encoding(#[from] serde_urlencoded::ser::Error),

    /// The gateway declined the operation without contacting a provider.
    #[error("payment declined: {0}")]
    Declined(String),
}

/// Errors raised while authenticating or decoding a webhook delivery.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The signature header is missing its timestamp or signatures.
    #[error("malformed signature header")]
    MalformedHeader,

    /// No `v1` signature matched the payload.
    #[error("no signature matches the payload")]
    SignatureMismatch,

    /// The signed timestamp is too far from the current time.
    #[error("webhook timestamp {timestamp} is outside the tolerance window (now {now})")]
    TimestampOutsideTolerance {
        /// Timestamp from the header (Unix seconds).
        timestamp: i64,
        /// Current time (Unix seconds).
        now: i64,
    },

    /// The configured secret cannot key an HMAC.
    #[error("invalid webhook secret")]
    InvalidSecret,

    /// The payload is not a well-formed event.
    #[error("malformed webhook payload: {0}")]
    MalformedPayload(String),
}
