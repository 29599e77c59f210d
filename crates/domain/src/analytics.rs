// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Revenue analytics over paid subscriptions.
//!
//! Subscriptions are grouped by creation instant (UTC) into weekly buckets
//! keyed by the Monday that starts the week, monthly buckets and yearly
//! buckets. Buckets are returned sorted by key.

use crate::types::{Money, Subscription};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One aggregation bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucket {
    /// Sortable bucket key (`2024-01-08`, `2024-01`, `2024`).
    pub key: String,
    /// Human-readable label (`Jan 8`, `Jan 2024`, `2024`).
    pub label: String,
    /// Summed subscription totals.
    pub revenue: Money,
    /// Number of subscriptions in the bucket.
    pub orders: u64,
}

/// Totals across every paid subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueTotals {
    pub revenue: Money,
    pub orders: u64,
    /// `revenue / orders`, truncated to whole cents. Zero when there are no orders.
    pub average_order_value: Money,
}

/// Weekly, monthly and yearly revenue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueAnalytics {
    pub weekly: Vec<RevenueBucket>,
    pub monthly: Vec<RevenueBucket>,
    pub yearly: Vec<RevenueBucket>,
    pub totals: RevenueTotals,
}

/// Returns whether a subscription counts toward revenue.
///
/// A subscription is paid when it carries a positive total and either has a
/// recorded payment intent or has moved past `pending`.
#[must_use]
pub fn is_paid_subscription(subscription: &Subscription) -> bool {
    if subscription.total_amount <= Money::ZERO {
        return false;
    }
    subscription.payment_intent_id.is_some() || subscription.status.is_paid()
}

/// Returns the Monday that starts the week containing `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

#[derive(Default)]
struct Accumulator {
    revenue: Money,
    orders: u64,
}

impl Accumulator {
    fn add(&mut self, amount: Money) {
        self.revenue += amount;
        self.orders += 1;
    }
}

fn into_buckets(
    map: BTreeMap<String, Accumulator>,
    label: impl Fn(&str) -> String,
) -> Vec<RevenueBucket> {
    map.into_iter()
        .map(|(key, acc)| RevenueBucket {
            label: label(&key),
            key,
            revenue: acc.revenue,
            orders: acc.orders,
        })
        .collect()
}

fn week_label(key: &str) -> String {
    NaiveDate::parse_from_str(key, "%Y-%m-%d")
        .map_or_else(|_| key.to_string(), |d| d.format("%b %-d").to_string())
}

fn month_label(key: &str) -> String {
    NaiveDate::parse_from_str(&format!("{key}-01"), "%Y-%m-%d")
        .map_or_else(|_| key.to_string(), |d| d.format("%b %Y").to_string())
}

/// Computes revenue analytics over a set of subscriptions.
///
/// Unpaid subscriptions are ignored.
#[must_use]
pub fn compute_revenue_analytics(subscriptions: &[Subscription]) -> RevenueAnalytics {
    let mut weekly: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut monthly: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut yearly: BTreeMap<String, Accumulator> = BTreeMap::new();
    let mut total = Accumulator::default();

    for subscription in subscriptions.iter().filter(|s| is_paid_subscription(s)) {
        let date: NaiveDate = subscription.created_at.date_naive();
        let amount: Money = subscription.total_amount;

        weekly
            .entry(week_start(date).format("%Y-%m-%d").to_string())
            .or_default()
            .add(amount);
        monthly
            .entry(date.format("%Y-%m").to_string())
            .or_default()
            .add(amount);
        yearly
            .entry(date.format("%Y").to_string())
            .or_default()
            .add(amount);
        total.add(amount);
    }

    let average_order_value = if total.orders == 0 {
        Money::ZERO
    } else {
        #[allow(clippy::cast_possible_wrap)]
        let orders = total.orders as i64;
        Money::from_cents(total.revenue.cents() / orders)
    };

    RevenueAnalytics {
        weekly: into_buckets(weekly, week_label),
        monthly: into_buckets(monthly, month_label),
        yearly: into_buckets(yearly, str::to_string),
        totals: RevenueTotals {
            revenue: total.revenue,
            orders: total.orders,
            average_order_value,
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Customer, SubscriptionStatus};
    use chrono::{DateTime, Utc};

    fn subscription(
        created_at: &str,
        cents: i64,
        status: SubscriptionStatus,
        intent: Option<&str>,
    ) -> Subscription {
        Subscription {
            id: Some(1),
            order_ref: String::from("RI-TEST0001"),
            customer: Customer {
                name: String::from("A"),
                email: String::from("a@example.com"),
                phone: String::from("555"),
                address: String::from("1 Street"),
            },
            selected_days: Vec::new(),
            num_weeks: 1,
            total_meals: 1,
            total_amount: Money::from_cents(cents),
            checkout_session_id: None,
            payment_intent_id: intent.map(str::to_string),
            status,
            created_at: DateTime::parse_from_rfc3339(created_at)
                .unwrap()
                .with_timezone(&Utc),
        }
    }

    #[test]
    fn test_week_start_is_monday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        let monday = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(week_start(sunday), monday);
        assert_eq!(week_start(monday), monday);
    }

    #[test]
    fn test_paid_filter() {
        assert!(!is_paid_subscription(&subscription(
            "2024-01-01T00:00:00Z",
            1000,
            SubscriptionStatus::Pending,
            None
        )));
        assert!(is_paid_subscription(&subscription(
            "2024-01-01T00:00:00Z",
            1000,
            SubscriptionStatus::Pending,
            Some("pi_1")
        )));
        assert!(is_paid_subscription(&subscription(
            "2024-01-01T00:00:00Z",
            1000,
            SubscriptionStatus::Cancelled,
            None
        )));
        assert!(!is_paid_subscription(&subscription(
            "2024-01-01T00:00:00Z",
            0,
            SubscriptionStatus::Active,
            Some("pi_1")
        )));
    }

    #[test]
    fn test_buckets_and_totals() {
        let subs = vec![
            subscription("2024-01-09T10:00:00Z", 4000, SubscriptionStatus::Active, None),
            subscription("2024-01-14T23:00:00Z", 2000, SubscriptionStatus::Completed, None),
            subscription("2024-02-01T00:00:00Z", 1000, SubscriptionStatus::Active, None),
            subscription("2025-03-01T00:00:00Z", 1000, SubscriptionStatus::Pending, None),
        ];

        let analytics = compute_revenue_analytics(&subs);

        assert_eq!(analytics.weekly.len(), 2);
        assert_eq!(analytics.weekly[0].key, "2024-01-08");
        assert_eq!(analytics.weekly[0].label, "Jan 8");
        assert_eq!(analytics.weekly[0].revenue, Money::from_cents(6000));
        assert_eq!(analytics.weekly[0].orders, 2);

        assert_eq!(analytics.monthly[0].key, "2024-01");
        assert_eq!(analytics.monthly[0].label, "Jan 2024");
        assert_eq!(analytics.monthly[1].key, "2024-02");

        assert_eq!(analytics.yearly.len(), 1);
        assert_eq!(analytics.yearly[0].label, "2024");

        assert_eq!(analytics.totals.revenue, Money::from_cents(7000));
        assert_eq!(analytics.totals.orders, 3);
        assert_eq!(analytics.totals.average_order_value, Money::from_cents(2333));
    }

    #[test]
    fn test_empty_input() {
        let analytics = compute_revenue_analytics(&[]);
        assert!(analytics.weekly.is_empty());
        assert_eq!(analytics.totals.average_order_value, Money::ZERO);
    }
}
