// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use royale_meals_domain::{OrderStatus, RefundStatus, SubscriptionStatus};
use royale_meals_payments::FakePaymentGateway;
use royale_meals_persistence::Persistence;

use crate::{
    ApiConfig, ApiError, CancelRequest, ContactRequest, ListSubscriptionsQuery,
    MarkContactReadRequest, OrderQuery, UpdateMenuItemRequest, UpdateOrderRequest,
    UpdateSubscriptionRequest, UpsertContentRequest, cancel_orders, dashboard,
    list_cancellations, list_contacts, list_content, list_menu, list_orders, list_public_menu,
    list_subscriptions, mark_contact_read, revenue_analytics, sales_report, submit_contact,
    subscribe, update_menu_item, update_order_status, update_subscription, upsert_content,
};

use super::helpers::{
    create_paid_subscription, create_subscribe_request, create_test_config, orders_for,
    subscribed_at, utc,
};

async fn create_pending_subscription(
    persistence: &mut Persistence,
    gateway: &FakePaymentGateway,
    config: &ApiConfig,
    email: &str,
) -> String {
    let mut request = create_subscribe_request();
    request.customer.as_mut().unwrap().email = Some(email.to_string());
    subscribe(persistence, gateway, config, &request, subscribed_at())
        .await
        .unwrap()
        .order_ref
}

fn set_order_status(persistence: &mut Persistence, id: i64, status: &str) -> Result<(), ApiError> {
    update_order_status(
        persistence,
        &UpdateOrderRequest {
            id,
            status: status.to_string(),
        },
        utc(2024, 1, 4, 20),
    )
    .map(|_| ())
}

// ============================================================================
// Dashboard
// ============================================================================

#[tokio::test]
async fn test_dashboard_summary() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    let order_ref = create_paid_subscription(&mut persistence, &gateway, &config).await;
    create_pending_subscription(&mut persistence, &gateway, &config, "pending@example.com").await;
    submit_contact(
        &mut persistence,
        &ContactRequest {
            name: String::from("Meera"),
            email: String::from("meera@example.com"),
            phone: None,
            subject: String::from("Hello"),
            message: String::from("Hi there"),
        },
        utc(2024, 1, 2, 9),
    )
    .unwrap();

    let summary = dashboard(&mut persistence, utc(2024, 1, 4, 8)).unwrap();
    assert_eq!(summary.todays_orders, 1);
    assert_eq!(summary.active_subscriptions, 1);
    assert_eq!(summary.delivered_orders, 0);
    assert_eq!(summary.total_revenue_cents, 4_000);
    assert_eq!(summary.unread_contacts, 1);
    assert_eq!(summary.recent_orders.len(), 4);
    assert!(
        summary
            .recent_orders
            .iter()
            .all(|o| o.customer_email == "asha@example.com" && o.order.order_ref == order_ref)
    );

    let first = orders_for(&mut persistence, &order_ref)[0].id;
    set_order_status(&mut persistence, first, "delivered").unwrap();

    let summary = dashboard(&mut persistence, utc(2024, 1, 4, 21)).unwrap();
    assert_eq!(summary.todays_orders, 0);
    assert_eq!(summary.delivered_orders, 1);
}

// ============================================================================
// Subscriptions
// ============================================================================

#[tokio::test]
async fn test_list_subscriptions_filters() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    let paid = create_paid_subscription(&mut persistence, &gateway, &config).await;
    let pending =
        create_pending_subscription(&mut persistence, &gateway, &config, "ravi@example.com").await;

    let all = list_subscriptions(&mut persistence, &ListSubscriptionsQuery::default()).unwrap();
    assert_eq!(all.subscriptions.len(), 2);

    let active = list_subscriptions(
        &mut persistence,
        &ListSubscriptionsQuery {
            status: Some(String::from("active")),
            search: None,
        },
    )
    .unwrap();
    assert_eq!(active.subscriptions.len(), 1);
    assert_eq!(active.subscriptions[0].order_ref, paid);

    let by_email = list_subscriptions(
        &mut persistence,
        &ListSubscriptionsQuery {
            status: Some(String::from("all")),
            search: Some(String::from("RAVI@")),
        },
    )
    .unwrap();
    assert_eq!(by_email.subscriptions.len(), 1);
    assert_eq!(by_email.subscriptions[0].order_ref, pending);

    let by_ref = list_subscriptions(
        &mut persistence,
        &ListSubscriptionsQuery {
            status: None,
            search: Some(paid.to_lowercase()),
        },
    )
    .unwrap();
    assert_eq!(by_ref.subscriptions.len(), 1);
    assert_eq!(by_ref.subscriptions[0].order_ref, paid);

    let bogus = list_subscriptions(
        &mut persistence,
        &ListSubscriptionsQuery {
            status: Some(String::from("bogus")),
            search: None,
        },
    );
    assert!(matches!(bogus, Err(ApiError::InvalidInput { ref field, .. }) if field == "status"));
}

#[tokio::test]
async fn test_mark_subscription_completed() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    let paid = create_paid_subscription(&mut persistence, &gateway, &config).await;
    let pending =
        create_pending_subscription(&mut persistence, &gateway, &config, "ravi@example.com").await;
    let paid_id = persistence.get_subscription_by_ref(&paid).unwrap().unwrap().id.unwrap();
    let pending_id = persistence.get_subscription_by_ref(&pending).unwrap().unwrap().id.unwrap();

    let request = |id: i64, status: &str| UpdateSubscriptionRequest {
        id,
        status: status.to_string(),
    };

    let response = update_subscription(&mut persistence, &request(paid_id, "completed")).unwrap();
    assert_eq!(response.subscription.status, "completed");
    assert_eq!(
        persistence.get_subscription(paid_id).unwrap().unwrap().status,
        SubscriptionStatus::Completed
    );

    let again = update_subscription(&mut persistence, &request(paid_id, "completed"));
    assert!(matches!(again, Err(ApiError::DomainRuleViolation { .. })));

    let unpaid = update_subscription(&mut persistence, &request(pending_id, "completed"));
    assert!(matches!(unpaid, Err(ApiError::DomainRuleViolation { .. })));

    let wrong_status = update_subscription(&mut persistence, &request(pending_id, "active"));
    assert!(matches!(wrong_status, Err(ApiError::InvalidInput { .. })));

    let missing = update_subscription(&mut persistence, &request(424_242, "completed"));
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

// ============================================================================
// Orders
// ============================================================================

#[tokio::test]
async fn test_list_orders_filters() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    create_paid_subscription(&mut persistence, &gateway, &config).await;

    let all = list_orders(&mut persistence, &OrderQuery::default()).unwrap();
    let deliveries: Vec<_> = all.orders.iter().map(|o| o.order.delivery_at).collect();
    assert_eq!(
        deliveries,
        vec![
            utc(2024, 1, 15, 13),
            utc(2024, 1, 11, 19),
            utc(2024, 1, 8, 13),
            utc(2024, 1, 4, 19),
        ]
    );
    assert!(all.orders.iter().all(|o| o.customer_name == "Asha Rao"));

    let ranged = list_orders(
        &mut persistence,
        &OrderQuery {
            status: Some(String::from("upcoming")),
            start_date: Some(String::from("2024-01-08")),
            end_date: Some(String::from("2024-01-11")),
        },
    )
    .unwrap();
    assert_eq!(ranged.orders.len(), 2);

    let delivered = list_orders(
        &mut persistence,
        &OrderQuery {
            status: Some(String::from("delivered")),
            ..OrderQuery::default()
        },
    )
    .unwrap();
    assert!(delivered.orders.is_empty());

    let backwards = list_orders(
        &mut persistence,
        &OrderQuery {
            status: None,
            start_date: Some(String::from("2024-01-11")),
            end_date: Some(String::from("2024-01-08")),
        },
    );
    assert!(matches!(backwards, Err(ApiError::InvalidInput { ref field, .. }) if field == "end_date"));

    let malformed = list_orders(
        &mut persistence,
        &OrderQuery {
            status: None,
            start_date: Some(String::from("01/08/2024")),
            end_date: None,
        },
    );
    assert!(matches!(malformed, Err(ApiError::InvalidInput { ref field, .. }) if field == "start_date"));
}

#[tokio::test]
async fn test_order_status_follows_lifecycle() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    let order_ref = create_paid_subscription(&mut persistence, &gateway, &config).await;
    let orders = orders_for(&mut persistence, &order_ref);

    set_order_status(&mut persistence, orders[0].id, "delivered").unwrap();
    let cancelled = update_order_status(
        &mut persistence,
        &UpdateOrderRequest {
            id: orders[1].id,
            status: String::from("cancelled"),
        },
        utc(2024, 1, 4, 20),
    )
    .unwrap();
    assert_eq!(cancelled.order.status, "cancelled");
    assert_eq!(cancelled.order.refund_status, "no_refund");
    assert_eq!(cancelled.order.cancelled_at, Some(utc(2024, 1, 4, 20)));

    let after = orders_for(&mut persistence, &order_ref);
    assert_eq!(after[0].status, OrderStatus::Delivered);
    assert_eq!(after[1].status, OrderStatus::Cancelled);
    assert_eq!(after[1].refund_status, RefundStatus::NoRefund);
    assert_eq!(after[0].delivery_at, orders[0].delivery_at);

    for (id, status) in [
        (orders[0].id, "cancelled"),
        (orders[0].id, "delivered"),
        (orders[1].id, "delivered"),
    ] {
        let result = set_order_status(&mut persistence, id, status);
        assert!(
            matches!(result, Err(ApiError::DomainRuleViolation { .. })),
            "order {id} -> {status}: {result:?}"
        );
    }

    assert!(matches!(
        set_order_status(&mut persistence, orders[2].id, "upcoming"),
        Err(ApiError::InvalidInput { .. })
    ));
    assert!(matches!(
        set_order_status(&mut persistence, orders[2].id, "shipped"),
        Err(ApiError::InvalidInput { .. })
    ));
    assert!(matches!(
        set_order_status(&mut persistence, 999_999, "delivered"),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[tokio::test]
async fn test_list_cancellations() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    let order_ref = create_paid_subscription(&mut persistence, &gateway, &config).await;

    assert!(
        list_cancellations(&mut persistence)
            .unwrap()
            .cancellations
            .is_empty()
    );

    cancel_orders(
        &mut persistence,
        &gateway,
        &config,
        &CancelRequest {
            order_ref: Some(order_ref.clone()),
            cancel_all: Some(true),
            ..CancelRequest::default()
        },
        utc(2024, 1, 3, 0),
    )
    .await
    .unwrap();

    let listed = list_cancellations(&mut persistence).unwrap();
    assert_eq!(listed.cancellations.len(), 1);
    assert_eq!(listed.cancellations[0].order_ref, order_ref);
    assert_eq!(listed.cancellations[0].total_refund_cents, 3_000);
    assert_eq!(listed.cancellations[0].cancelled_order_ids.len(), 4);
}

// ============================================================================
// Menu, content and contacts
// ============================================================================

#[test]
fn test_menu_item_updates() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let monday = list_menu(&mut persistence).unwrap().items[0].clone();
    assert_eq!(monday.day, "Monday");

    let updated = update_menu_item(
        &mut persistence,
        &UpdateMenuItemRequest {
            id: monday.id,
            curry: Some(String::from("  Chicken Chettinad ")),
            price_cents: Some(1_200),
            discount_percent: Some(25),
            image_url: Some(String::from("https://cdn.example/monday.jpg")),
            ..UpdateMenuItemRequest::default()
        },
    )
    .unwrap();
    assert_eq!(updated.item.curry, "Chicken Chettinad");
    assert_eq!(updated.item.appetizer, monday.appetizer);
    assert_eq!(updated.item.price_cents, 1_200);
    assert_eq!(updated.item.discounted_price_cents, 900);

    let public = list_public_menu(&mut persistence).unwrap();
    assert_eq!(public.items[0].discounted_price_cents, 900);
    assert_eq!(
        public.items[0].image_url.as_deref(),
        Some("https://cdn.example/monday.jpg")
    );

    let bad_discount = update_menu_item(
        &mut persistence,
        &UpdateMenuItemRequest {
            id: monday.id,
            discount_percent: Some(150),
            ..UpdateMenuItemRequest::default()
        },
    );
    assert!(
        matches!(bad_discount, Err(ApiError::InvalidInput { ref field, .. }) if field == "discount_percent")
    );

    let bad_price = update_menu_item(
        &mut persistence,
        &UpdateMenuItemRequest {
            id: monday.id,
            price_cents: Some(0),
            ..UpdateMenuItemRequest::default()
        },
    );
    assert!(matches!(bad_price, Err(ApiError::InvalidInput { ref field, .. }) if field == "price_cents"));

    update_menu_item(
        &mut persistence,
        &UpdateMenuItemRequest {
            id: monday.id,
            is_active: Some(false),
            ..UpdateMenuItemRequest::default()
        },
    )
    .unwrap();
    let public_days: Vec<String> = list_public_menu(&mut persistence)
        .unwrap()
        .items
        .into_iter()
        .map(|i| i.day)
        .collect();
    assert_eq!(public_days, vec!["Tuesday", "Wednesday", "Thursday", "Friday"]);
    assert_eq!(list_menu(&mut persistence).unwrap().items.len(), 5);

    let missing = update_menu_item(
        &mut persistence,
        &UpdateMenuItemRequest {
            id: 99,
            ..UpdateMenuItemRequest::default()
        },
    );
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

#[test]
fn test_content_upsert_by_key() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let request: UpsertContentRequest = serde_json::from_value(serde_json::json!({
        "key": "hero_title",
        "value": "Royal curries, delivered",
        "type": "heading",
    }))
    .unwrap();

    let created = upsert_content(&mut persistence, &request, utc(2024, 1, 1, 9)).unwrap();
    assert_eq!(created.content.content_type, "heading");

    upsert_content(
        &mut persistence,
        &UpsertContentRequest {
            key: String::from("hero_title"),
            value: String::from("Biryani on Fridays"),
            content_type: None,
        },
        utc(2024, 1, 2, 9),
    )
    .unwrap();

    let content = list_content(&mut persistence).unwrap().content;
    assert_eq!(content.len(), 1);
    assert_eq!(content[0].value, "Biryani on Fridays");
    assert_eq!(content[0].content_type, "text");

    let blank = upsert_content(
        &mut persistence,
        &UpsertContentRequest {
            key: String::from(" "),
            value: String::from("x"),
            content_type: None,
        },
        utc(2024, 1, 2, 9),
    );
    assert!(matches!(blank, Err(ApiError::InvalidInput { ref field, .. }) if field == "key"));
}

#[test]
fn test_contacts_can_be_marked_read() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let submitted = submit_contact(
        &mut persistence,
        &ContactRequest {
            name: String::from("Meera"),
            email: String::from("meera@example.com"),
            phone: Some(String::from("555-0142")),
            subject: String::from("Allergies"),
            message: String::from("Is the naan nut free?"),
        },
        utc(2024, 1, 2, 9),
    )
    .unwrap();

    let listed = list_contacts(&mut persistence).unwrap();
    assert_eq!(listed.unread, 1);
    assert_eq!(listed.contacts[0].phone.as_deref(), Some("555-0142"));

    mark_contact_read(
        &mut persistence,
        &MarkContactReadRequest {
            id: submitted.contact_id,
        },
    )
    .unwrap();
    let listed = list_contacts(&mut persistence).unwrap();
    assert_eq!(listed.unread, 0);
    assert!(listed.contacts[0].is_read);

    let missing = mark_contact_read(&mut persistence, &MarkContactReadRequest { id: 404 });
    assert!(matches!(missing, Err(ApiError::ResourceNotFound { .. })));
}

// ============================================================================
// Reports
// ============================================================================

#[tokio::test]
async fn test_sales_report() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    let order_ref = create_paid_subscription(&mut persistence, &gateway, &config).await;
    let orders = orders_for(&mut persistence, &order_ref);

    set_order_status(&mut persistence, orders[0].id, "delivered").unwrap();
    cancel_orders(
        &mut persistence,
        &gateway,
        &config,
        &CancelRequest {
            order_ref: Some(order_ref.clone()),
            order_ids: vec![orders[1].id],
            ..CancelRequest::default()
        },
        utc(2024, 1, 5, 0),
    )
    .await
    .unwrap();

    let report = sales_report(&mut persistence, &OrderQuery::default()).unwrap();
    let dates: Vec<&str> = report.daily.iter().map(|d| d.date.as_str()).collect();
    assert_eq!(dates, vec!["2024-01-04", "2024-01-08", "2024-01-11", "2024-01-15"]);
    assert_eq!(report.daily[0].delivered_count, 1);
    assert_eq!(report.daily[0].revenue_cents, 1_000);
    assert_eq!(report.daily[1].cancelled_count, 1);
    assert_eq!(report.daily[1].revenue_cents, 0);
    assert_eq!(report.daily[1].refunds_cents, 1_000);
    assert_eq!(report.total_revenue_cents, 3_000);
    assert_eq!(report.total_refunds_cents, 1_000);
    assert_eq!(report.net_revenue_cents, 2_000);
    assert_eq!(report.total_orders, 4);

    let ranged = sales_report(
        &mut persistence,
        &OrderQuery {
            status: None,
            start_date: Some(String::from("2024-01-05")),
            end_date: Some(String::from("2024-01-11")),
        },
    )
    .unwrap();
    assert_eq!(ranged.daily.len(), 2);
    assert_eq!(ranged.total_orders, 2);
}

#[tokio::test]
async fn test_revenue_analytics_counts_paid_subscriptions() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let gateway = FakePaymentGateway::new();
    let config = create_test_config();
    create_paid_subscription(&mut persistence, &gateway, &config).await;
    create_pending_subscription(&mut persistence, &gateway, &config, "ravi@example.com").await;

    let analytics = revenue_analytics(&mut persistence).unwrap();
    assert_eq!(analytics.total_orders, 1);
    assert_eq!(analytics.total_revenue_cents, 4_000);
    assert_eq!(analytics.average_order_value_cents, 4_000);

    assert_eq!(analytics.weekly.len(), 1);
    assert_eq!(analytics.weekly[0].key, "2024-01-01");
    assert_eq!(analytics.weekly[0].label, "Jan 1");
    assert_eq!(analytics.monthly[0].key, "2024-01");
    assert_eq!(analytics.monthly[0].label, "Jan 2024");
    assert_eq!(analytics.yearly[0].key, "2024");
    assert_eq!(analytics.yearly[0].revenue_cents, 4_000);
}
