// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of orders, subscriptions and sales.
//!
//! Amounts are written as dollars with two decimals, timestamps as UTC.

use chrono::{DateTime, NaiveDate, Utc};
use royale_meals_domain::{SalesReport, SelectedDay, Subscription};
use royale_meals_persistence::OrderDetails;

use crate::error::ApiError;

/// MIME type of every export.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

const ORDER_HEADERS: &[&str] = &[
    "Order ID",
    "Subscription ID",
    "Customer Name",
    "Customer Email",
    "Customer Phone",
    "Customer Address",
    "Delivery Date",
    "Day",
    "Meal Type",
    "Meal Price",
    "Status",
    "Refund Status",
    "Cancelled At",
];

const SUBSCRIPTION_HEADERS: &[&str] = &[
    "Order ID",
    "Customer Name",
    "Customer Email",
    "Customer Phone",
    "Customer Address",
    "Selected Days",
    "Num Weeks",
    "Total Meals",
    "Total Amount",
    "Status",
    "Payment Intent",
];

const SALES_HEADERS: &[&str] = &["Date", "Total Orders", "Revenue", "Refunds", "Net"];

/// What to export. Unrecognized names export orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    Orders,
    Subscriptions,
    Sales,
}

impl ExportKind {
    #[must_use]
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("subscriptions") => Self::Subscriptions,
            Some("sales") => Self::Sales,
            _ => Self::Orders,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::Subscriptions => "subscriptions",
            Self::Sales => "sales",
        }
    }

    /// `<type>-export-<YYYY-MM-DD>.csv`
    #[must_use]
    pub fn filename(&self, today: NaiveDate) -> String {
        format!("{}-export-{}.csv", self.as_str(), today.format("%Y-%m-%d"))
    }
}

/// A rendered export ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn format_selected_days(days: &[SelectedDay]) -> String {
    days.iter()
        .map(|d| format!("{} {}", d.day, d.meal_type))
        .collect::<Vec<String>>()
        .join("; ")
}

fn write_csv(headers: &[&str], rows: Vec<Vec<String>>) -> Result<String, ApiError> {
    let csv_error = |e: &dyn std::fmt::Display| ApiError::Internal {
        message: format!("Failed to write CSV: {e}"),
    };

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers).map_err(|e| csv_error(&e))?;
    for row in rows {
        writer.write_record(&row).map_err(|e| csv_error(&e))?;
    }

    let bytes: Vec<u8> = writer.into_inner().map_err(|e| csv_error(&e))?;
    String::from_utf8(bytes).map_err(|e| csv_error(&e))
}

/// Renders orders with their subscribers.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn export_orders(orders: &[OrderDetails]) -> Result<String, ApiError> {
    let rows: Vec<Vec<String>> = orders
        .iter()
        .map(|details| {
            let order = &details.order;
            vec![
                order.id.to_string(),
                order.order_ref.clone(),
                details.customer.name.clone(),
                details.customer.email.clone(),
                details.customer.phone.clone(),
                details.customer.address.clone(),
                format_timestamp(order.delivery_at),
                order.day.to_string(),
                order.meal_type.to_string(),
                order.meal_price.to_decimal_string(),
                order.status.to_string(),
                order.refund_status.to_string(),
                order.cancelled_at.map(format_timestamp).unwrap_or_default(),
            ]
        })
        .collect();

    write_csv(ORDER_HEADERS, rows)
}

/// Renders subscriptions.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn export_subscriptions(subscriptions: &[Subscription]) -> Result<String, ApiError> {
    let rows: Vec<Vec<String>> = subscriptions
        .iter()
        .map(|s| {
            vec![
                s.order_ref.clone(),
                s.customer.name.clone(),
                s.customer.email.clone(),
                s.customer.phone.clone(),
                s.customer.address.clone(),
                format_selected_days(&s.selected_days),
                s.num_weeks.to_string(),
                s.total_meals.to_string(),
                s.total_amount.to_decimal_string(),
                s.status.to_string(),
                s.payment_intent_id.clone().unwrap_or_default(),
            ]
        })
        .collect();

    write_csv(SUBSCRIPTION_HEADERS, rows)
}

/// Renders the per-day sales report.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn export_sales(report: &SalesReport) -> Result<String, ApiError> {
    let rows: Vec<Vec<String>> = report
        .daily
        .iter()
        .map(|day| {
            vec![
                day.date.format("%Y-%m-%d").to_string(),
                day.order_count.to_string(),
                day.revenue.to_decimal_string(),
                day.refunds.to_decimal_string(),
                (day.revenue - day.refunds).to_decimal_string(),
            ]
        })
        .collect();

    write_csv(SALES_HEADERS, rows)
}
