// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory gateway for tests and local runs without provider keys.

use async_trait::async_trait;
use royale_meals_domain::Money;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::info;

use crate::error::PaymentError;
use crate::gateway::{CheckoutRequest, CheckoutSession, PaymentGateway, RefundReceipt};

/// Root of the checkout URLs handed out by the fake.
pub const FAKE_CHECKOUT_BASE: &str = "https://checkout.invalid/pay";

/// A refund call seen by the fake, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRefund {
    pub payment_intent_id: String,
    pub amount: Money,
    pub succeeded: bool,
}

/// Records every call and succeeds unless told otherwise.
#[derive(Debug, Default)]
pub struct FakePaymentGateway {
    checkouts: Mutex<Vec<CheckoutRequest>>,
    refunds: Mutex<Vec<RecordedRefund>>,
    failing_refund_calls: Mutex<HashSet<usize>>,
    fail_checkout: AtomicBool,
    fail_all_refunds: AtomicBool,
    next_id: AtomicU64,
}

impl FakePaymentGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every checkout call fail.
    pub fn set_checkout_failing(&self, failing: bool) {
        self.fail_checkout.store(failing, Ordering::SeqCst);
    }

    /// Makes every refund call fail.
    pub fn set_refunds_failing(&self, failing: bool) {
        self.fail_all_refunds.store(failing, Ordering::SeqCst);
    }

    /// Makes the `call_number`th refund call (1-based) fail.
    pub async fn fail_refund_call(&self, call_number: usize) {
        self.failing_refund_calls.lock().await.insert(call_number);
    }

    /// Checkout requests received so far.
    pub async fn checkout_requests(&self) -> Vec<CheckoutRequest> {
        self.checkouts.lock().await.clone()
    }

    /// Refund calls received so far.
    pub async fn refunds(&self) -> Vec<RecordedRefund> {
        self.refunds.lock().await.clone()
    }

    fn next_id(&self, prefix: &str) -> String {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        format!("{prefix}_fake_{n}")
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    fn provider_name(&self) -> &'static str {
        "fake"
    }

    async fn create_checkout_session(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        if self.fail_checkout.load(Ordering::SeqCst) {
            return Err(PaymentError::Declined(String::from("checkout disabled")));
        }

        let id = self.next_id("cs");
        self.checkouts.lock().await.push(request.clone());
        info!(order_ref = %request.order_ref, session_id = %id, "Fake checkout session created");

        Ok(CheckoutSession {
            url: format!("{FAKE_CHECKOUT_BASE}/{id}"),
            id,
        })
    }

    async fn create_refund(
        &self,
        payment_intent_id: &str,
        amount: Money,
    ) -> Result<RefundReceipt, PaymentError> {
        let mut refunds = self.refunds.lock().await;
        let call_number = refunds.len() + 1;
        let failing = self.fail_all_refunds.load(Ordering::SeqCst)
            || self.failing_refund_calls.lock().await.contains(&call_number);

        refunds.push(RecordedRefund {
            payment_intent_id: payment_intent_id.to_string(),
            amount,
            succeeded: !failing,
        });

        if failing {
            return Err(PaymentError::Declined(format!(
                "refund call {call_number} rejected"
            )));
        }

        Ok(RefundReceipt {
            id: self.next_id("re"),
            amount,
        })
    }
}
