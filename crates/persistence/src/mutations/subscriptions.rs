// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subscription and delivery order mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use royale_meals_domain::{
    DeliverySlot, Money, Order, OrderStatus, Subscription, SubscriptionStatus,
};
use tracing::{debug, info};

use crate::backend::sqlite::last_insert_rowid;
use crate::diesel_schema::{subscription_orders, subscriptions};
use crate::error::PersistenceError;
use crate::timestamps;

/// Inserts a new subscription.
///
/// # Returns
///
/// The assigned subscription ID.
///
/// # Errors
///
/// Returns `Conflict` if the order reference or checkout session is already
/// taken, or another error if the insert fails.
pub fn insert_subscription(
    conn: &mut SqliteConnection,
    subscription: &Subscription,
) -> Result<i64, PersistenceError> {
    let selected_days_json: String = serde_json::to_string(&subscription.selected_days)?;
    let num_weeks = i32::try_from(subscription.num_weeks)
        .map_err(|_| PersistenceError::QueryFailed(String::from("num_weeks out of range")))?;
    let total_meals = i32::try_from(subscription.total_meals)
        .map_err(|_| PersistenceError::QueryFailed(String::from("total_meals out of range")))?;

    diesel::insert_into(subscriptions::table)
        .values((
            subscriptions::order_ref.eq(&subscription.order_ref),
            subscriptions::customer_name.eq(&subscription.customer.name),
            subscriptions::customer_email.eq(&subscription.customer.email),
            subscriptions::customer_phone.eq(&subscription.customer.phone),
            subscriptions::customer_address.eq(&subscription.customer.address),
            subscriptions::selected_days_json.eq(&selected_days_json),
            subscriptions::num_weeks.eq(num_weeks),
            subscriptions::total_meals.eq(total_meals),
            subscriptions::total_amount_cents.eq(subscription.total_amount.cents()),
            subscriptions::checkout_session_id.eq(&subscription.checkout_session_id),
            subscriptions::payment_intent_id.eq(&subscription.payment_intent_id),
            subscriptions::status.eq(subscription.status.as_str()),
            subscriptions::created_at.eq(timestamps::to_column(subscription.created_at)),
        ))
        .execute(conn)?;

    let subscription_id: i64 = last_insert_rowid(conn)?;
    info!(
        subscription_id,
        order_ref = %subscription.order_ref,
        status = %subscription.status,
        "Subscription created"
    );
    Ok(subscription_id)
}

fn require_id(subscription: &Subscription) -> Result<i64, PersistenceError> {
    subscription.id.ok_or_else(|| {
        PersistenceError::NotFound(format!(
            "Subscription {} has no identifier",
            subscription.order_ref
        ))
    })
}

/// Writes a subscription's status and payment intent.
///
/// # Errors
///
/// Returns `NotFound` if no row has the subscription's ID.
pub fn update_subscription_status(
    conn: &mut SqliteConnection,
    subscription: &Subscription,
) -> Result<(), PersistenceError> {
    let subscription_id: i64 = require_id(subscription)?;

    let updated: usize = diesel::update(subscriptions::table.find(subscription_id))
        .set((
            subscriptions::status.eq(subscription.status.as_str()),
            subscriptions::payment_intent_id.eq(&subscription.payment_intent_id),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Subscription {subscription_id}"
        )));
    }

    debug!(subscription_id, status = %subscription.status, "Subscription status updated");
    Ok(())
}

/// Moves a pending subscription to active and inserts its delivery orders.
///
/// The status change is conditional on the row still being `pending`, so a
/// replayed activation inserts nothing and returns `Ok(None)`.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `activated` - The subscription snapshot in `active` state
/// * `slots` - The generated delivery schedule
/// * `meal_price` - Price recorded on each order
/// * `now` - Creation instant for the order rows
///
/// # Returns
///
/// The inserted order IDs, or `None` if the subscription was not pending.
///
/// # Errors
///
/// Returns an error if any write fails; nothing is committed in that case.
pub fn activate_subscription(
    conn: &mut SqliteConnection,
    activated: &Subscription,
    slots: &[DeliverySlot],
    meal_price: Money,
    now: DateTime<Utc>,
) -> Result<Option<Vec<i64>>, PersistenceError> {
    let subscription_id: i64 = require_id(activated)?;
    let created_at: String = timestamps::to_column(now);

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(
            subscriptions::table
                .find(subscription_id)
                .filter(subscriptions::status.eq(SubscriptionStatus::Pending.as_str())),
        )
        .set((
            subscriptions::status.eq(activated.status.as_str()),
            subscriptions::payment_intent_id.eq(&activated.payment_intent_id),
        ))
        .execute(conn)?;

        if updated == 0 {
            debug!(subscription_id, "Subscription no longer pending; skipping activation");
            return Ok(None);
        }

        let mut order_ids: Vec<i64> = Vec::with_capacity(slots.len());
        for slot in slots {
            diesel::insert_into(subscription_orders::table)
                .values((
                    subscription_orders::subscription_id.eq(subscription_id),
                    subscription_orders::delivery_at.eq(timestamps::to_column(slot.delivery_at)),
                    subscription_orders::delivery_day.eq(slot.day.as_str()),
                    subscription_orders::meal_type.eq(slot.meal_type.as_str()),
                    subscription_orders::meal_price_cents.eq(meal_price.cents()),
                    subscription_orders::status.eq(OrderStatus::Upcoming.as_str()),
                    subscription_orders::created_at.eq(&created_at),
                ))
                .execute(conn)?;
            order_ids.push(last_insert_rowid(conn)?);
        }

        info!(
            subscription_id,
            order_ref = %activated.order_ref,
            orders = order_ids.len(),
            "Subscription activated"
        );
        Ok(Some(order_ids))
    })
}

/// Writes an order's mutable fields (status and cancellation bookkeeping).
///
/// The delivery instant is never written.
///
/// # Errors
///
/// Returns `NotFound` if no row has the order's ID.
pub fn update_order(conn: &mut SqliteConnection, order: &Order) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(subscription_orders::table.find(order.id))
        .set((
            subscription_orders::status.eq(order.status.as_str()),
            subscription_orders::refund_status.eq(order.refund_status.as_str()),
            subscription_orders::refund_id.eq(&order.refund_id),
            subscription_orders::cancelled_at.eq(order.cancelled_at.map(timestamps::to_column)),
        ))
        .execute(conn)?;

    if updated == 0 {
        return Err(PersistenceError::NotFound(format!("Order {}", order.id)));
    }

    debug!(order_id = order.id, status = %order.status, refund_status = %order.refund_status, "Order updated");
    Ok(())
}
