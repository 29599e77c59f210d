// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subscription queries.

use diesel::prelude::*;
use diesel::SqliteConnection;
use royale_meals_domain::{
    Customer, Money, SelectedDay, Subscription, SubscriptionStatus, normalize_order_ref,
};
use tracing::debug;

use crate::data_models::SubscriptionFilter;
use crate::diesel_schema::subscriptions;
use crate::error::PersistenceError;
use crate::timestamps;

const TABLE: &str = "subscriptions";

/// Diesel Queryable struct for subscription rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = subscriptions)]
pub(crate) struct SubscriptionRow {
    subscription_id: i64,
    order_ref: String,
    customer_name: String,
    customer_email: String,
    customer_phone: String,
    customer_address: String,
    selected_days_json: String,
    num_weeks: i32,
    total_meals: i32,
    total_amount_cents: i64,
    checkout_session_id: Option<String>,
    payment_intent_id: Option<String>,
    status: String,
    created_at: String,
}

impl SubscriptionRow {
    pub(crate) fn order_ref(&self) -> &str {
        &self.order_ref
    }

    pub(crate) fn customer(&self) -> Customer {
        Customer {
            name: self.customer_name.clone(),
            email: self.customer_email.clone(),
            phone: self.customer_phone.clone(),
            address: self.customer_address.clone(),
        }
    }

    pub(crate) fn into_domain(self) -> Result<Subscription, PersistenceError> {
        let customer: Customer = self.customer();
        let selected_days: Vec<SelectedDay> = serde_json::from_str(&self.selected_days_json)?;
        let status: SubscriptionStatus = self
            .status
            .parse()
            .map_err(|e| PersistenceError::corrupt(TABLE, &e))?;
        let num_weeks = u32::try_from(self.num_weeks).map_err(|_| PersistenceError::CorruptRow {
            table: TABLE,
            message: format!("negative num_weeks {}", self.num_weeks),
        })?;
        let total_meals =
            u32::try_from(self.total_meals).map_err(|_| PersistenceError::CorruptRow {
                table: TABLE,
                message: format!("negative total_meals {}", self.total_meals),
            })?;

        Ok(Subscription {
            id: Some(self.subscription_id),
            order_ref: self.order_ref,
            customer,
            selected_days,
            num_weeks,
            total_meals,
            total_amount: Money::from_cents(self.total_amount_cents),
            checkout_session_id: self.checkout_session_id,
            payment_intent_id: self.payment_intent_id,
            status,
            created_at: timestamps::from_column(TABLE, &self.created_at)?,
        })
    }
}

fn first_or_none(
    result: Result<SubscriptionRow, diesel::result::Error>,
) -> Result<Option<Subscription>, PersistenceError> {
    match result {
        Ok(row) => row.into_domain().map(Some),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves a subscription by its public order reference.
///
/// The reference is matched case-insensitively.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the subscription is not found.
pub fn get_subscription_by_ref(
    conn: &mut SqliteConnection,
    order_ref: &str,
) -> Result<Option<Subscription>, PersistenceError> {
    let normalized: String = normalize_order_ref(order_ref);
    debug!(order_ref = %normalized, "Looking up subscription by order reference");

    first_or_none(
        subscriptions::table
            .filter(subscriptions::order_ref.eq(&normalized))
            .select(SubscriptionRow::as_select())
            .first(conn),
    )
}

/// Retrieves a subscription by the payment provider's checkout session.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the subscription is not found.
pub fn get_subscription_by_checkout_session(
    conn: &mut SqliteConnection,
    checkout_session_id: &str,
) -> Result<Option<Subscription>, PersistenceError> {
    debug!(checkout_session_id, "Looking up subscription by checkout session");

    first_or_none(
        subscriptions::table
            .filter(subscriptions::checkout_session_id.eq(checkout_session_id))
            .select(SubscriptionRow::as_select())
            .first(conn),
    )
}

/// Retrieves a subscription by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the subscription is not found.
pub fn get_subscription(
    conn: &mut SqliteConnection,
    subscription_id: i64,
) -> Result<Option<Subscription>, PersistenceError> {
    first_or_none(
        subscriptions::table
            .find(subscription_id)
            .select(SubscriptionRow::as_select())
            .first(conn),
    )
}

/// Lists subscriptions, newest first.
///
/// # Errors
///
/// Returns an error if the query fails or a row cannot be decoded.
pub fn list_subscriptions(
    conn: &mut SqliteConnection,
    filter: &SubscriptionFilter,
) -> Result<Vec<Subscription>, PersistenceError> {
    let mut query = subscriptions::table
        .select(SubscriptionRow::as_select())
        .order((
            subscriptions::created_at.desc(),
            subscriptions::subscription_id.desc(),
        ))
        .into_boxed();

    if let Some(status) = filter.status {
        query = query.filter(subscriptions::status.eq(status.as_str()));
    }

    if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        // SQLite LIKE is case-insensitive for ASCII.
        let pattern: String = format!("%{search}%");
        query = query.filter(
            subscriptions::customer_email
                .like(pattern.clone())
                .or(subscriptions::order_ref.like(pattern)),
        );
    }

    let rows: Vec<SubscriptionRow> = query.load(conn)?;
    debug!(count = rows.len(), "Listed subscriptions");
    rows.into_iter().map(SubscriptionRow::into_domain).collect()
}

/// Counts subscriptions in the given status.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_subscriptions_by_status(
    conn: &mut SqliteConnection,
    status: SubscriptionStatus,
) -> Result<i64, PersistenceError> {
    Ok(subscriptions::table
        .filter(subscriptions::status.eq(status.as_str()))
        .count()
        .get_result(conn)?)
}

/// Sums `total_amount_cents` over subscriptions in any of `statuses`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn sum_subscription_totals(
    conn: &mut SqliteConnection,
    statuses: &[SubscriptionStatus],
) -> Result<Money, PersistenceError> {
    let names: Vec<&str> = statuses.iter().map(SubscriptionStatus::as_str).collect();
    let totals: Vec<i64> = subscriptions::table
        .filter(subscriptions::status.eq_any(names))
        .select(subscriptions::total_amount_cents)
        .load(conn)?;
    Ok(totals.into_iter().map(Money::from_cents).sum())
}
