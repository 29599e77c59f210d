// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.
//!
//! The standard subscription is Monday lunch plus Thursday dinner for two
//! weeks, paid at 2024-01-01 10:00 UTC (a Monday). In UTC its deliveries
//! fall on Jan 4 19:00, Jan 8 13:00, Jan 11 19:00 and Jan 15 13:00.

use chrono::{DateTime, Duration, TimeZone, Utc};
use royale_meals_domain::{Money, Order};
use royale_meals_payments::FakePaymentGateway;
use royale_meals_persistence::Persistence;

use crate::{
    AdminAuth, ApiConfig, CustomerRequest, PricingConfig, ScheduleConfig, SelectedDayRequest,
    SubscribeRequest, SubscribeResponse, WebhookResponse, handle_webhook, subscribe,
};

pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const TOKEN_SECRET: &str = "token-secret-for-tests";

pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn subscribed_at() -> DateTime<Utc> {
    utc(2024, 1, 1, 9)
}

pub fn paid_at() -> DateTime<Utc> {
    utc(2024, 1, 1, 10)
}

pub fn create_test_config() -> ApiConfig {
    ApiConfig {
        pricing: PricingConfig::new(Money::from_cents(1_000), "https://royale.example/").unwrap(),
        schedule: ScheduleConfig::default(),
        webhook_secret: None,
    }
}

pub fn create_test_auth() -> AdminAuth {
    AdminAuth::with_cost(ADMIN_PASSWORD, TOKEN_SECRET, Duration::hours(12), 4 /* bcrypt minimum cost */)
        .unwrap()
}

pub fn day(day: &str, meal: &str) -> SelectedDayRequest {
    SelectedDayRequest {
        day: String::from(day),
        meal_type: Some(String::from(meal)),
        meals: Vec::new(),
    }
}

pub fn create_subscribe_request() -> SubscribeRequest {
    SubscribeRequest {
        selected_days: vec![day("Monday", "lunch"), day("Thursday", "dinner")],
        weeks: 2,
        customer: Some(CustomerRequest {
            name: Some(String::from("Asha Rao")),
            email: Some(String::from("asha@example.com")),
            phone: Some(String::from("555-0100")),
            address: Some(String::from("12 Curry Lane")),
        }),
        ..SubscribeRequest::default()
    }
}

pub fn completed_event(session_id: &str, order_ref: Option<&str>, payment_intent: &str) -> String {
    let metadata = order_ref.map_or_else(
        || serde_json::json!({}),
        |r| serde_json::json!({ "order_ref": r }),
    );
    serde_json::json!({
        "type": "checkout.session.completed",
        "data": { "object": {
            "id": session_id,
            "payment_intent": payment_intent,
            "metadata": metadata,
        }}
    })
    .to_string()
}

/// Subscribes with the standard request and confirms payment.
pub async fn create_paid_subscription(
    persistence: &mut Persistence,
    gateway: &FakePaymentGateway,
    config: &ApiConfig,
) -> String {
    let response: SubscribeResponse = subscribe(
        persistence,
        gateway,
        config,
        &create_subscribe_request(),
        subscribed_at(),
    )
    .await
    .unwrap();

    let session_id: String = response.url.rsplit('/').next().unwrap().to_string();
    let payload = completed_event(&session_id, Some(&response.order_ref), "pi_test_1");
    let webhook: WebhookResponse =
        handle_webhook(persistence, config, &payload, None, paid_at()).unwrap();
    assert!(webhook.activated);

    response.order_ref
}

pub fn orders_for(persistence: &mut Persistence, order_ref: &str) -> Vec<Order> {
    let subscription = persistence.get_subscription_by_ref(order_ref).unwrap().unwrap();
    persistence
        .list_orders_for_subscription(subscription.id.unwrap())
        .unwrap()
}
