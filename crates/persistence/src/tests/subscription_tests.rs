// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use royale_meals_domain::{Money, SubscriptionStatus};

use super::{create_active_subscription, create_test_subscription, utc};
use crate::{Persistence, PersistenceError, SubscriptionFilter};

#[test]
fn test_create_and_fetch_subscription_round_trips_fields() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let subscription = create_test_subscription("RI-ABCD1234", "cs_test_1");

    let id = persistence.create_subscription(&subscription).unwrap();
    let stored = persistence.get_subscription(id).unwrap().unwrap();

    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.order_ref, "RI-ABCD1234");
    assert_eq!(stored.customer, subscription.customer);
    assert_eq!(stored.selected_days, subscription.selected_days);
    assert_eq!(stored.total_amount, Money::from_cents(4_000));
    assert_eq!(stored.status, SubscriptionStatus::Pending);
    assert_eq!(stored.created_at, subscription.created_at);
}

#[test]
fn test_lookup_by_ref_is_case_insensitive() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_subscription(&create_test_subscription("RI-ABCD1234", "cs_test_1"))
        .unwrap();

    let found = persistence.get_subscription_by_ref("  ri-abcd1234 ").unwrap();

    assert!(found.is_some());
}

#[test]
fn test_lookup_of_unknown_ref_returns_none() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    assert!(persistence.get_subscription_by_ref("RI-NOPE0000").unwrap().is_none());
    assert!(persistence.get_subscription(42).unwrap().is_none());
}

#[test]
fn test_duplicate_order_ref_is_a_conflict() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_subscription(&create_test_subscription("RI-ABCD1234", "cs_test_1"))
        .unwrap();

    let result =
        persistence.create_subscription(&create_test_subscription("RI-ABCD1234", "cs_test_2"));

    assert!(matches!(result, Err(PersistenceError::Conflict(_))));
}

#[test]
fn test_lookup_by_checkout_session() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    persistence
        .create_subscription(&create_test_subscription("RI-ABCD1234", "cs_test_1"))
        .unwrap();

    let found = persistence
        .get_subscription_by_checkout_session("cs_test_1")
        .unwrap()
        .unwrap();

    assert_eq!(found.order_ref, "RI-ABCD1234");
}

#[test]
fn test_activation_inserts_orders_and_marks_active() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (subscription, order_ids) =
        create_active_subscription(&mut persistence, "RI-ABCD1234", "cs_test_1");

    assert_eq!(order_ids.len(), 4);

    let stored = persistence
        .get_subscription(subscription.id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Active);
    assert_eq!(stored.payment_intent_id.as_deref(), Some("pi_cs_test_1"));

    let orders = persistence
        .list_orders_for_subscription(subscription.id.unwrap())
        .unwrap();
    let deliveries: Vec<_> = orders.iter().map(|o| o.delivery_at).collect();
    assert_eq!(
        deliveries,
        vec![
            utc(2024, 1, 4, 19),
            utc(2024, 1, 8, 13),
            utc(2024, 1, 11, 19),
            utc(2024, 1, 15, 13),
        ]
    );
    assert!(orders.iter().all(|o| o.order_ref == "RI-ABCD1234"));
}

#[test]
fn test_replayed_activation_inserts_nothing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (subscription, _) =
        create_active_subscription(&mut persistence, "RI-ABCD1234", "cs_test_1");

    let replay = persistence
        .activate_subscription(&subscription, &[], Money::from_cents(1_000), utc(2024, 1, 2, 0))
        .unwrap();

    assert!(replay.is_none());
    let orders = persistence
        .list_orders_for_subscription(subscription.id.unwrap())
        .unwrap();
    assert_eq!(orders.len(), 4);
}

#[test]
fn test_update_subscription_status() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (mut subscription, _) =
        create_active_subscription(&mut persistence, "RI-ABCD1234", "cs_test_1");

    subscription.status = SubscriptionStatus::Cancelled;
    persistence.update_subscription_status(&subscription).unwrap();

    let stored = persistence
        .get_subscription(subscription.id.unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Cancelled);
}

#[test]
fn test_update_of_missing_subscription_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let mut subscription = create_test_subscription("RI-ABCD1234", "cs_test_1");
    subscription.id = Some(99);

    let result = persistence.update_subscription_status(&subscription);

    assert!(matches!(result, Err(PersistenceError::NotFound(_))));
}

#[test]
fn test_list_subscriptions_filters_by_status_and_search() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_active_subscription(&mut persistence, "RI-ACTIVE01", "cs_1");
    let mut pending = create_test_subscription("RI-PENDING1", "cs_2");
    pending.customer.email = String::from("bob@example.com");
    persistence.create_subscription(&pending).unwrap();

    let all = persistence
        .list_subscriptions(&SubscriptionFilter::default())
        .unwrap();
    assert_eq!(all.len(), 2);

    let active = persistence
        .list_subscriptions(&SubscriptionFilter {
            status: Some(SubscriptionStatus::Active),
            search: None,
        })
        .unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].order_ref, "RI-ACTIVE01");

    let by_email = persistence
        .list_subscriptions(&SubscriptionFilter {
            status: None,
            search: Some(String::from("BOB@")),
        })
        .unwrap();
    assert_eq!(by_email.len(), 1);
    assert_eq!(by_email[0].order_ref, "RI-PENDING1");
}

#[test]
fn test_counts_and_revenue_totals() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    create_active_subscription(&mut persistence, "RI-ACTIVE01", "cs_1");
    persistence
        .create_subscription(&create_test_subscription("RI-PENDING1", "cs_2"))
        .unwrap();

    assert_eq!(
        persistence
            .count_subscriptions_by_status(SubscriptionStatus::Active)
            .unwrap(),
        1
    );
    assert_eq!(
        persistence
            .sum_subscription_totals(&[SubscriptionStatus::Active, SubscriptionStatus::Completed])
            .unwrap(),
        Money::from_cents(4_000)
    );
    assert_eq!(
        persistence.sum_subscription_totals(&[]).unwrap(),
        Money::ZERO
    );
}
