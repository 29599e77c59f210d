// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stripe REST client.
//!
//! Stripe takes form-encoded bodies with bracketed keys for nested fields
//! (`line_items[0][quantity]=1`) and answers with JSON.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use royale_meals_domain::Money;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::PaymentError;
use crate::gateway::{CheckoutRequest, CheckoutSession, PaymentGateway, RefundReceipt};

/// Production API root.
pub const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

const CURRENCY: &str = "usd";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Deserialize)]
struct SessionResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefundResponse {
    id: String,
    amount: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Builds the form fields for a checkout session.
pub(crate) fn checkout_form(request: &CheckoutRequest) -> Vec<(&'static str, String)> {
    vec![
        ("mode", String::from("payment")),
        ("line_items[0][price_data][currency]", String::from(CURRENCY)),
        (
            "line_items[0][price_data][product_data][name]",
            request.product_name.clone(),
        ),
        (
            "line_items[0][price_data][unit_amount]",
            request.amount.cents().to_string(),
        ),
        ("line_items[0][quantity]", String::from("1")),
        ("success_url", request.success_url.clone()),
        ("cancel_url", request.cancel_url.clone()),
        ("metadata[order_ref]", request.order_ref.clone()),
        ("metadata[customer_email]", request.customer_email.clone()),
        ("metadata[customer_name]", request.customer_name.clone()),
        ("customer_email", request.customer_email.clone()),
    ]
}

/// Builds the form fields for a partial refund.
pub(crate) fn refund_form(payment_intent_id: &str, amount: Money) -> Vec<(&'static str, String)> {
    vec![
        ("payment_intent", payment_intent_id.to_string()),
        ("amount", amount.cents().to_string()),
    ]
}

/// A [`PaymentGateway`] backed by the Stripe API.
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeGateway {
    /// Creates a client against the production API.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(secret_key: impl Into<String>) -> Result<Self, PaymentError> {
        Self::with_api_base(secret_key, STRIPE_API_BASE)
    }

    /// Creates a client against another API root (a mock server, say).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_api_base(
        secret_key: impl Into<String>,
        api_base: impl Into<String>,
    ) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
        })
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: &[(&'static str, String)],
    ) -> Result<T, PaymentError> {
        let body: String = serde_urlencoded::to_string(form)?;
        let url = format!("{}/{path}", self.api_base);
        debug!(%url, "Calling Stripe");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.secret_key)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        let text: String = response.text().await?;

        if !status.is_success() {
            let message: String = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| text.clone());
            warn!(status = status.as_u16(), %message, path, "Stripe rejected request");
            return Err(PaymentError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| PaymentError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    fn provider_name(&self) -> &'static str {
        "stripe"
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let response: SessionResponse = self
            .post_form("checkout/sessions", &checkout_form(request))
            .await?;

        let url: String = response.url.ok_or_else(|| {
            PaymentError::InvalidResponse(format!("checkout session {} has no url", response.id))
        })?;

        info!(order_ref = %request.order_ref, session_id = %response.id, "Checkout session created");
        Ok(CheckoutSession {
            id: response.id,
            url,
        })
    }

    async fn create_refund(
        &self,
        payment_intent_id: &str,
        amount: Money,
    ) -> Result<RefundReceipt, PaymentError> {
        let response: RefundResponse = self
            .post_form("refunds", &refund_form(payment_intent_id, amount))
            .await?;

        info!(payment_intent_id, refund_id = %response.id, amount = %amount, "Refund created");
        Ok(RefundReceipt {
            id: response.id,
            amount: Money::from_cents(response.amount),
        })
    }
}
