// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Payment provider integration.
//!
//! The service needs three things from a provider: a hosted checkout page
//! per subscription, per-meal partial refunds, and authenticated webhooks
//! announcing completed payments. [`PaymentGateway`] is the seam;
//! [`StripeGateway`] talks to Stripe and [`FakePaymentGateway`] keeps
//! everything in memory.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod fake;
mod gateway;
mod stripe;
mod webhook;

#[cfg(test)]
mod tests;

pub use error::{PaymentError, WebhookError};
pub use fake::{FAKE_CHECKOUT_BASE, FakePaymentGateway, RecordedRefund};
pub use gateway::{CheckoutRequest, CheckoutSession, PaymentGateway, RefundReceipt};
pub use stripe::{STRIPE_API_BASE, StripeGateway};
pub use webhook::{
    CHECKOUT_COMPLETED, CompletedCheckout, SIGNATURE_HEADER, SIGNATURE_TOLERANCE_SECS,
    WebhookEvent, parse_event, sign_payload, verify_signature,
};
