// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod webhook_tests;

use royale_meals_domain::Money;

use crate::CheckoutRequest;

pub fn create_test_checkout() -> CheckoutRequest {
    CheckoutRequest {
        order_ref: String::from("RI-ABCD1234"),
        customer_name: String::from("Asha Rao"),
        customer_email: String::from("asha@example.com"),
        amount: Money::from_cents(4_000),
        product_name: String::from("The Royale Indian - Meal Subscription"),
        success_url: String::from("https://example.com/subscribe/success?order_ref=RI-ABCD1234"),
        cancel_url: String::from("https://example.com/subscribe"),
    }
}
