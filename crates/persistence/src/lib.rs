// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Royale Meals.
//!
//! Stores subscriptions, their delivery orders, cancellation records, the
//! weekly menu, editable site content and contact form submissions in
//! `SQLite` via Diesel.
//!
//! ## Storage Conventions
//!
//! - Timestamps are RFC 3339 UTC text, so lexical order is chronological
//! - Money is stored as integer cents
//! - Enumerations are stored as their lowercase wire names
//! - Order references are unique case-insensitively
//!
//! ## Testing
//!
//! Tests use `Persistence::new_in_memory()`, which hands out an isolated
//! shared-cache database per call.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use chrono::{DateTime, NaiveDate, Utc};
use diesel::SqliteConnection;
use royale_meals_domain::{
    ContactSubmission, DeliverySlot, MenuItem, Money, Order, OrderStatus, SiteContent,
    Subscription, SubscriptionStatus,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use backend::sqlite::StorageKind;
pub use data_models::{
    CancellationRecord, NewCancellation, NewContactSubmission, OrderDetails, OrderFilter,
    SubscriptionFilter,
};
pub use error::PersistenceError;
pub use mutations::cancellations::CANCELLATION_STATUS_PROCESSED;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Type alias kept for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter owning a single `SQLite` connection.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let conn: SqliteConnection =
            backend::sqlite::open_database(&shared_memory_url, StorageKind::InMemory)?;
        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let conn: SqliteConnection = backend::sqlite::open_database(path_str, StorageKind::File)?;
        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Subscriptions
    // ========================================================================

    /// Inserts a pending subscription and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `Conflict` if the order reference is already taken.
    pub fn create_subscription(
        &mut self,
        subscription: &Subscription,
    ) -> Result<i64, PersistenceError> {
        mutations::subscriptions::insert_subscription(&mut self.conn, subscription)
    }

    /// Retrieves a subscription by its order reference (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_subscription_by_ref(
        &mut self,
        order_ref: &str,
    ) -> Result<Option<Subscription>, PersistenceError> {
        queries::subscriptions::get_subscription_by_ref(&mut self.conn, order_ref)
    }

    /// Retrieves a subscription by its checkout session.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_subscription_by_checkout_session(
        &mut self,
        checkout_session_id: &str,
    ) -> Result<Option<Subscription>, PersistenceError> {
        queries::subscriptions::get_subscription_by_checkout_session(
            &mut self.conn,
            checkout_session_id,
        )
    }

    /// Retrieves a subscription by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_subscription(
        &mut self,
        subscription_id: i64,
    ) -> Result<Option<Subscription>, PersistenceError> {
        queries::subscriptions::get_subscription(&mut self.conn, subscription_id)
    }

    /// Lists subscriptions matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_subscriptions(
        &mut self,
        filter: &SubscriptionFilter,
    ) -> Result<Vec<Subscription>, PersistenceError> {
        queries::subscriptions::list_subscriptions(&mut self.conn, filter)
    }

    /// Counts subscriptions in `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_subscriptions_by_status(
        &mut self,
        status: SubscriptionStatus,
    ) -> Result<i64, PersistenceError> {
        queries::subscriptions::count_subscriptions_by_status(&mut self.conn, status)
    }

    /// Sums the charged totals of subscriptions in any of `statuses`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn sum_subscription_totals(
        &mut self,
        statuses: &[SubscriptionStatus],
    ) -> Result<Money, PersistenceError> {
        queries::subscriptions::sum_subscription_totals(&mut self.conn, statuses)
    }

    /// Writes a subscription's status and payment intent.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the subscription does not exist.
    pub fn update_subscription_status(
        &mut self,
        subscription: &Subscription,
    ) -> Result<(), PersistenceError> {
        mutations::subscriptions::update_subscription_status(&mut self.conn, subscription)
    }

    /// Atomically activates a pending subscription and inserts its orders.
    ///
    /// Returns `Ok(None)` when the subscription was no longer pending.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails.
    pub fn activate_subscription(
        &mut self,
        activated: &Subscription,
        slots: &[DeliverySlot],
        meal_price: Money,
        now: DateTime<Utc>,
    ) -> Result<Option<Vec<i64>>, PersistenceError> {
        mutations::subscriptions::activate_subscription(
            &mut self.conn,
            activated,
            slots,
            meal_price,
            now,
        )
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Retrieves an order by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_order(&mut self, order_id: i64) -> Result<Option<Order>, PersistenceError> {
        queries::orders::get_order(&mut self.conn, order_id)
    }

    /// Lists a subscription's orders in delivery order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_orders_for_subscription(
        &mut self,
        subscription_id: i64,
    ) -> Result<Vec<Order>, PersistenceError> {
        queries::orders::list_orders_for_subscription(&mut self.conn, subscription_id)
    }

    /// Lists orders with their subscribers, latest delivery first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_order_details(
        &mut self,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderDetails>, PersistenceError> {
        queries::orders::list_order_details(&mut self.conn, filter)
    }

    /// Lists orders delivering within the inclusive UTC date range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_orders_in_range(
        &mut self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<Vec<Order>, PersistenceError> {
        queries::orders::list_orders_in_range(&mut self.conn, start_date, end_date)
    }

    /// Counts orders in `status` delivering within `[from, until)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_orders_delivering_between(
        &mut self,
        status: OrderStatus,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<i64, PersistenceError> {
        queries::orders::count_orders_delivering_between(&mut self.conn, status, from, until)
    }

    /// Counts orders in `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_orders_by_status(&mut self, status: OrderStatus) -> Result<i64, PersistenceError> {
        queries::orders::count_orders_by_status(&mut self.conn, status)
    }

    /// Lists the most recently created orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_recent_order_details(
        &mut self,
        limit: i64,
    ) -> Result<Vec<OrderDetails>, PersistenceError> {
        queries::orders::list_recent_order_details(&mut self.conn, limit)
    }

    /// Writes an order's status and cancellation bookkeeping.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the order does not exist.
    pub fn update_order(&mut self, order: &Order) -> Result<(), PersistenceError> {
        mutations::subscriptions::update_order(&mut self.conn, order)
    }

    // ========================================================================
    // Cancellations
    // ========================================================================

    /// Records a processed cancellation request.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn record_cancellation(
        &mut self,
        cancellation: &NewCancellation,
    ) -> Result<i64, PersistenceError> {
        mutations::cancellations::insert_cancellation(&mut self.conn, cancellation)
    }

    /// Lists cancellation records, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cancellations(&mut self) -> Result<Vec<CancellationRecord>, PersistenceError> {
        queries::cancellations::list_cancellations(&mut self.conn)
    }

    // ========================================================================
    // Menu, Content & Contact
    // ========================================================================

    /// Lists menu items Monday through Friday.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_menu_items(&mut self, active_only: bool) -> Result<Vec<MenuItem>, PersistenceError> {
        queries::content::list_menu_items(&mut self.conn, active_only)
    }

    /// Retrieves a menu item by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_menu_item(&mut self, menu_item_id: i64) -> Result<Option<MenuItem>, PersistenceError> {
        queries::content::get_menu_item(&mut self.conn, menu_item_id)
    }

    /// Writes a menu item's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the item does not exist.
    pub fn update_menu_item(&mut self, item: &MenuItem) -> Result<(), PersistenceError> {
        mutations::content::update_menu_item(&mut self.conn, item)
    }

    /// Lists site content entries ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_site_content(&mut self) -> Result<Vec<SiteContent>, PersistenceError> {
        queries::content::list_site_content(&mut self.conn)
    }

    /// Inserts or replaces a site content entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_site_content(
        &mut self,
        content: &SiteContent,
        now: DateTime<Utc>,
    ) -> Result<(), PersistenceError> {
        mutations::content::upsert_site_content(&mut self.conn, content, now)
    }

    /// Stores a contact form submission.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_contact_submission(
        &mut self,
        submission: &NewContactSubmission,
    ) -> Result<i64, PersistenceError> {
        mutations::content::insert_contact_submission(&mut self.conn, submission)
    }

    /// Lists contact form submissions, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_contact_submissions(
        &mut self,
    ) -> Result<Vec<ContactSubmission>, PersistenceError> {
        queries::content::list_contact_submissions(&mut self.conn)
    }

    /// Counts unread contact form submissions.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_unread_contacts(&mut self) -> Result<i64, PersistenceError> {
        queries::content::count_unread_contacts(&mut self.conn)
    }

    /// Marks a contact form submission as read.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the submission does not exist.
    pub fn mark_contact_read(&mut self, contact_id: i64) -> Result<(), PersistenceError> {
        mutations::content::mark_contact_read(&mut self.conn, contact_id)
    }
}
