// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, NaiveDate, Utc};
use royale_meals_domain::{Customer, Money, Order, OrderStatus, SubscriptionStatus};
use serde::{Deserialize, Serialize};

/// A delivery order together with its subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    pub order: Order,
    pub customer: Customer,
}

/// A processed cancellation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationRecord {
    pub cancellation_id: i64,
    pub subscription_id: i64,
    pub order_ref: String,
    pub cancelled_order_ids: Vec<i64>,
    pub total_refund: Money,
    pub refund_eligible_count: u32,
    pub no_refund_count: u32,
    pub refund_failed_count: u32,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new cancellation record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCancellation {
    pub subscription_id: i64,
    pub order_ref: String,
    pub cancelled_order_ids: Vec<i64>,
    pub total_refund: Money,
    pub refund_eligible_count: u32,
    pub no_refund_count: u32,
    pub refund_failed_count: u32,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Fields for a new contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// Filters for the admin subscription listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionFilter {
    pub status: Option<SubscriptionStatus>,
    /// Case-insensitive substring of the email or order reference.
    pub search: Option<String>,
}

/// Filters for order listings. Date bounds are inclusive UTC calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
