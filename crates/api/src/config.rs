// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Typed configuration handed to handlers.
//!
//! Nothing in this crate reads the environment; the server builds these
//! values once at startup.

use royale_meals_domain::{DomainError, Money, Tz, validate_meal_price};

/// Line item name shown on the checkout page.
pub const DEFAULT_PRODUCT_NAME: &str = "The Royale Indian - Meal Subscription";

/// Default per-meal price: $10.00.
pub const DEFAULT_MEAL_PRICE: Money = Money::from_cents(1_000);

/// Pricing and checkout redirect settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// Price of one meal, charged at subscription and refunded per eligible cancellation.
    pub meal_price: Money,
    /// Line item name for checkout.
    pub product_name: String,
    /// Public site root used to build checkout redirect URLs.
    pub public_base_url: String,
}

impl PricingConfig {
    /// Creates a pricing configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the meal price is not positive.
    pub fn new(meal_price: Money, public_base_url: &str) -> Result<Self, DomainError> {
        validate_meal_price(meal_price)?;
        Ok(Self {
            meal_price,
            product_name: String::from(DEFAULT_PRODUCT_NAME),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Where checkout sends a paying customer.
    #[must_use]
    pub fn success_url(&self, order_ref: &str) -> String {
        format!(
            "{}/subscribe/success?order_ref={order_ref}&session_id={{CHECKOUT_SESSION_ID}}",
            self.public_base_url
        )
    }

    /// Where checkout sends a customer who backs out.
    #[must_use]
    pub fn cancel_url(&self) -> String {
        format!("{}/subscribe", self.public_base_url)
    }
}

/// Delivery schedule settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    /// Zone in which lunch and dinner hours are wall-clock times.
    pub kitchen_timezone: Tz,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            kitchen_timezone: Tz::UTC,
        }
    }
}

/// Everything the public and admin handlers need besides storage and payments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub pricing: PricingConfig,
    pub schedule: ScheduleConfig,
    /// Webhook signing secret. Unsigned webhooks are accepted when unset.
    pub webhook_secret: Option<String>,
}
