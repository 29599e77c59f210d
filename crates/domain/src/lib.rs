// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod analytics;
mod content;
mod error;
mod order_ref;
mod refund;
mod sales;
mod schedule;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use analytics::{
    RevenueAnalytics, RevenueBucket, RevenueTotals, compute_revenue_analytics,
    is_paid_subscription, week_start,
};
pub use content::{ContactSubmission, MenuItem, SiteContent, sort_menu_by_day};
pub use error::DomainError;
pub use order_ref::{ORDER_REF_PREFIX, generate_order_ref, is_valid_order_ref, normalize_order_ref};
pub use refund::{
    CancellationCandidate, CancellationPlan, OrderDecision, REFUND_CUTOFF_HOURS, RefundDecision,
    is_cancellable, is_refund_eligible, plan_cancellation,
};
pub use sales::{DailySales, SalesReport, SalesTotals, compute_sales_report};
pub use schedule::{
    ACTIVATION_DELAY_HOURS, LOOKAHEAD_WEEKS, generate_delivery_slots, parse_kitchen_timezone,
};

// Re-export public types
pub use types::{
    Customer, DeliveryDay, DeliverySlot, MealType, Money, Order, OrderStatus, RefundStatus,
    SelectedDay, Subscription, SubscriptionStatus,
};
pub use validation::{
    MAX_WEEKS, require_field, validate_customer, validate_discount, validate_email,
    validate_meal_price, validate_plan,
};

// chrono_tz is part of the public schedule signature.
pub use chrono_tz::Tz;
