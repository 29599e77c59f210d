// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The payment collaborator seam.

use async_trait::async_trait;
use royale_meals_domain::Money;
use serde::{Deserialize, Serialize};

use crate::error::PaymentError;

/// A request to open a hosted checkout page for one subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    /// The subscription's public order reference, echoed back in the webhook.
    pub order_ref: String,
    pub customer_name: String,
    pub customer_email: String,
    /// The amount charged in one line item.
    pub amount: Money,
    /// Line item description shown on the checkout page.
    pub product_name: String,
    /// Where the customer lands after paying.
    pub success_url: String,
    /// Where the customer lands after abandoning checkout.
    pub cancel_url: String,
}

/// A hosted checkout page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// A refund the provider accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefundReceipt {
    pub id: String,
    pub amount: Money,
}

/// Operations the service needs from a payment provider.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Short name used in logs.
    fn provider_name(&self) -> &'static str;

    /// Opens a checkout session for a single payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or rejects the
    /// request.
    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Refunds part of a captured payment.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be reached or rejects the
    /// refund.
    async fn create_refund(
        &self,
        payment_intent_id: &str,
        amount: Money,
    ) -> Result<RefundReceipt, PaymentError>;
}
