// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery order queries.
//!
//! Every query joins the owning subscription so orders carry their public
//! order reference and, for admin listings, the subscriber.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use royale_meals_domain::{DomainError, Money, Order, OrderStatus};
use tracing::debug;

use crate::data_models::{OrderDetails, OrderFilter};
use crate::diesel_schema::{subscription_orders, subscriptions};
use crate::error::PersistenceError;
use crate::queries::subscriptions::SubscriptionRow;
use crate::timestamps;

const TABLE: &str = "subscription_orders";

/// Diesel Queryable struct for order rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = subscription_orders)]
pub(crate) struct OrderRow {
    order_id: i64,
    subscription_id: i64,
    delivery_at: String,
    delivery_day: String,
    meal_type: String,
    meal_price_cents: i64,
    status: String,
    refund_status: String,
    cancelled_at: Option<String>,
    refund_id: Option<String>,
}

impl OrderRow {
    fn into_domain(self, order_ref: String) -> Result<Order, PersistenceError> {
        let corrupt = |e: DomainError| PersistenceError::corrupt(TABLE, &e);
        Ok(Order {
            id: self.order_id,
            subscription_id: self.subscription_id,
            order_ref,
            delivery_at: timestamps::from_column(TABLE, &self.delivery_at)?,
            day: self.delivery_day.parse().map_err(corrupt)?,
            meal_type: self.meal_type.parse().map_err(corrupt)?,
            meal_price: Money::from_cents(self.meal_price_cents),
            status: self.status.parse().map_err(corrupt)?,
            refund_status: self.refund_status.parse().map_err(corrupt)?,
            cancelled_at: timestamps::from_optional_column(TABLE, self.cancelled_at.as_deref())?,
            refund_id: self.refund_id,
        })
    }
}

fn into_orders(rows: Vec<(OrderRow, String)>) -> Result<Vec<Order>, PersistenceError> {
    rows.into_iter()
        .map(|(row, order_ref)| row.into_domain(order_ref))
        .collect()
}

/// Retrieves an order by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the order is not found.
pub fn get_order(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Option<Order>, PersistenceError> {
    debug!(order_id, "Looking up order");

    let result: Result<(OrderRow, String), diesel::result::Error> = subscription_orders::table
        .inner_join(subscriptions::table)
        .filter(subscription_orders::order_id.eq(order_id))
        .select((OrderRow::as_select(), subscriptions::order_ref))
        .first(conn);

    match result {
        Ok((row, order_ref)) => row.into_domain(order_ref).map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Lists a subscription's orders in delivery order.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_orders_for_subscription(
    conn: &mut SqliteConnection,
    subscription_id: i64,
) -> Result<Vec<Order>, PersistenceError> {
    let rows: Vec<(OrderRow, String)> = subscription_orders::table
        .inner_join(subscriptions::table)
        .filter(subscription_orders::subscription_id.eq(subscription_id))
        .order((
            subscription_orders::delivery_at.asc(),
            subscription_orders::order_id.asc(),
        ))
        .select((OrderRow::as_select(), subscriptions::order_ref))
        .load(conn)?;

    debug!(subscription_id, count = rows.len(), "Listed subscription orders");
    into_orders(rows)
}

/// Lists orders with their subscribers for the admin back office,
/// latest delivery first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_order_details(
    conn: &mut SqliteConnection,
    filter: &OrderFilter,
) -> Result<Vec<OrderDetails>, PersistenceError> {
    let mut query = subscription_orders::table
        .inner_join(subscriptions::table)
        .select((OrderRow::as_select(), SubscriptionRow::as_select()))
        .order((
            subscription_orders::delivery_at.desc(),
            subscription_orders::order_id.desc(),
        ))
        .into_boxed();

    if let Some(status) = filter.status {
        query = query.filter(subscription_orders::status.eq(status.as_str()));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(subscription_orders::delivery_at.ge(timestamps::start_of_day(start)));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(subscription_orders::delivery_at.lt(timestamps::end_of_day(end)));
    }

    let rows: Vec<(OrderRow, SubscriptionRow)> = query.load(conn)?;
    debug!(count = rows.len(), "Listed order details");

    rows.into_iter()
        .map(|(order_row, subscription_row)| {
            Ok(OrderDetails {
                customer: subscription_row.customer(),
                order: order_row.into_domain(subscription_row.order_ref().to_string())?,
            })
        })
        .collect()
}

/// Lists orders delivering within an inclusive range of UTC dates,
/// earliest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_orders_in_range(
    conn: &mut SqliteConnection,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<Order>, PersistenceError> {
    let mut query = subscription_orders::table
        .inner_join(subscriptions::table)
        .select((OrderRow::as_select(), subscriptions::order_ref))
        .order((
            subscription_orders::delivery_at.asc(),
            subscription_orders::order_id.asc(),
        ))
        .into_boxed();

    if let Some(start) = start_date {
        query = query.filter(subscription_orders::delivery_at.ge(timestamps::start_of_day(start)));
    }
    if let Some(end) = end_date {
        query = query.filter(subscription_orders::delivery_at.lt(timestamps::end_of_day(end)));
    }

    into_orders(query.load(conn)?)
}

/// Counts orders in `status` delivering within `[from, until)`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_orders_delivering_between(
    conn: &mut SqliteConnection,
    status: OrderStatus,
    from: DateTime<Utc>,
    until: DateTime<Utc>,
) -> Result<i64, PersistenceError> {
    Ok(subscription_orders::table
        .filter(subscription_orders::status.eq(status.as_str()))
        .filter(subscription_orders::delivery_at.ge(timestamps::to_column(from)))
        .filter(subscription_orders::delivery_at.lt(timestamps::to_column(until)))
        .count()
        .get_result(conn)?)
}

/// Counts orders in the given status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_orders_by_status(
    conn: &mut SqliteConnection,
    status: OrderStatus,
) -> Result<i64, PersistenceError> {
    Ok(subscription_orders::table
        .filter(subscription_orders::status.eq(status.as_str()))
        .count()
        .get_result(conn)?)
}

/// Lists the most recently created orders with their subscribers.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_recent_order_details(
    conn: &mut SqliteConnection,
    limit: i64,
) -> Result<Vec<OrderDetails>, PersistenceError> {
    let rows: Vec<(OrderRow, SubscriptionRow)> = subscription_orders::table
        .inner_join(subscriptions::table)
        .select((OrderRow::as_select(), SubscriptionRow::as_select()))
        .order((
            subscription_orders::created_at.desc(),
            subscription_orders::order_id.desc(),
        ))
        .limit(limit)
        .load(conn)?;

    rows.into_iter()
        .map(|(order_row, subscription_row)| {
            Ok(OrderDetails {
                customer: subscription_row.customer(),
                order: order_row.into_domain(subscription_row.order_ref().to_string())?,
            })
        })
        .collect()
}
