// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod initialization_tests;
mod subscription_tests;

use chrono::{DateTime, TimeZone, Utc};
use royale_meals_domain::{
    Customer, DeliveryDay, MealType, Money, SelectedDay, Subscription, SubscriptionStatus, Tz,
    generate_delivery_slots,
};

use crate::Persistence;

pub fn utc(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0)
        .single()
        .expect("valid test instant")
}

pub fn create_test_subscription(order_ref: &str, session: &str) -> Subscription {
    Subscription {
        id: None,
        order_ref: order_ref.to_string(),
        customer: Customer {
            name: String::from("Asha Rao"),
            email: String::from("asha@example.com"),
            phone: String::from("555-0100"),
            address: String::from("12 Curry Lane"),
        },
        selected_days: vec![
            SelectedDay::new(DeliveryDay::Monday, MealType::Lunch),
            SelectedDay::new(DeliveryDay::Thursday, MealType::Dinner),
        ],
        num_weeks: 2,
        total_meals: 4,
        total_amount: Money::from_cents(4_000),
        checkout_session_id: Some(session.to_string()),
        payment_intent_id: None,
        status: SubscriptionStatus::Pending,
        created_at: utc(2024, 1, 1, 9),
    }
}

/// Creates, then activates, a subscription with its generated orders.
///
/// Activation happens at 2024-01-01 10:00 UTC, so the orders are
/// Jan 4 19:00, Jan 8 13:00, Jan 11 19:00 and Jan 15 13:00.
pub fn create_active_subscription(
    persistence: &mut Persistence,
    order_ref: &str,
    session: &str,
) -> (Subscription, Vec<i64>) {
    let mut subscription = create_test_subscription(order_ref, session);
    let id = persistence.create_subscription(&subscription).unwrap();
    subscription.id = Some(id);
    subscription.status = SubscriptionStatus::Active;
    subscription.payment_intent_id = Some(format!("pi_{session}"));

    let now = utc(2024, 1, 1, 10);
    let slots =
        generate_delivery_slots(&subscription.selected_days, subscription.num_weeks, now, Tz::UTC)
            .unwrap();
    let order_ids = persistence
        .activate_subscription(&subscription, &slots, Money::from_cents(1_000), now)
        .unwrap()
        .expect("pending subscription activates");
    (subscription, order_ids)
}
