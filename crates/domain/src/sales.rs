// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{Money, Order, OrderStatus, RefundStatus};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sales for one delivery date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    /// The delivery date (UTC calendar day).
    pub date: NaiveDate,
    pub order_count: u64,
    /// Meal prices of delivered and upcoming orders.
    pub revenue: Money,
    /// Meal prices actually returned to customers.
    pub refunds: Money,
    pub delivered_count: u64,
    pub cancelled_count: u64,
}

impl DailySales {
    const fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            order_count: 0,
            revenue: Money::ZERO,
            refunds: Money::ZERO,
            delivered_count: 0,
            cancelled_count: 0,
        }
    }
}

/// Totals across the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesTotals {
    pub revenue: Money,
    pub refunds: Money,
    /// `revenue - refunds`.
    pub net: Money,
    pub total_orders: u64,
}

/// Daily sales breakdown sorted by date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReport {
    pub daily: Vec<DailySales>,
    pub totals: SalesTotals,
}

/// Aggregates delivery orders into a per-day sales report.
///
/// Cancelled orders count toward the day's order and cancellation counts but
/// not its revenue. Refunded orders add their meal price to refunds only when
/// the provider issued a refund id; a failed refund returned nothing.
#[must_use]
pub fn compute_sales_report(orders: &[Order]) -> SalesReport {
    let mut days: BTreeMap<NaiveDate, DailySales> = BTreeMap::new();

    for order in orders {
        let date = order.delivery_at.date_naive();
        let day = days
            .entry(date)
            .or_insert_with(|| DailySales::empty(date));

        day.order_count += 1;
        match order.status {
            OrderStatus::Upcoming => day.revenue += order.meal_price,
            OrderStatus::Delivered => {
                day.revenue += order.meal_price;
                day.delivered_count += 1;
            }
            OrderStatus::Cancelled => day.cancelled_count += 1,
        }
        if order.refund_status == RefundStatus::Refunded && order.refund_id.is_some() {
            day.refunds += order.meal_price;
        }
    }

    let daily: Vec<DailySales> = days.into_values().collect();
    let revenue: Money = daily.iter().map(|d| d.revenue).sum();
    let refunds: Money = daily.iter().map(|d| d.refunds).sum();
    let total_orders: u64 = daily.iter().map(|d| d.order_count).sum();

    SalesReport {
        daily,
        totals: SalesTotals {
            revenue,
            refunds,
            net: revenue - refunds,
            total_orders,
        },
    }
}
