// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use royale_meals_domain::{
    Customer, DeliveryDay, MealType, Money, Order, OrderStatus, RefundStatus, SelectedDay,
    Subscription, SubscriptionStatus,
};

pub fn utc(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
}

pub fn create_test_subscription(status: SubscriptionStatus) -> Subscription {
    Subscription {
        id: Some(7),
        order_ref: String::from("RI-ABCD1234"),
        customer: Customer {
            name: String::from("Priya Shah"),
            email: String::from("priya@example.com"),
            phone: String::from("555-0100"),
            address: String::from("12 Curry Lane"),
        },
        selected_days: vec![
            SelectedDay::new(DeliveryDay::Monday, MealType::Lunch),
            SelectedDay::new(DeliveryDay::Thursday, MealType::Dinner),
        ],
        num_weeks: 2,
        total_meals: 4,
        total_amount: Money::from_cents(4000),
        checkout_session_id: Some(String::from("cs_test_1")),
        payment_intent_id: None,
        status,
        created_at: utc("2024-01-01T00:00:00Z"),
    }
}

pub fn create_test_order(id: i64, status: OrderStatus) -> Order {
    Order {
        id,
        subscription_id: 7,
        order_ref: String::from("RI-ABCD1234"),
        delivery_at: utc("2024-01-08T13:00:00Z"),
        day: DeliveryDay::Monday,
        meal_type: MealType::Lunch,
        meal_price: Money::from_cents(1000),
        status,
        refund_status: RefundStatus::None,
        cancelled_at: None,
        refund_id: None,
    }
}
