// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Field names are snake_case; the camelCase spellings accepted by the
//! storefront are kept as aliases. Money is integer cents in `_cents` fields.

use chrono::{DateTime, Utc};
use royale_meals_domain::{
    ContactSubmission, Customer, MenuItem, Order, RevenueAnalytics, SalesReport, SelectedDay,
    SiteContent, Subscription, is_cancellable, is_refund_eligible,
};
use royale_meals_persistence::{CancellationRecord, OrderDetails};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Subscribe
// ---------------------------------------------------------------------------

/// Customer details nested under `customer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

/// One weekday entry on the subscribe form.
///
/// Either a single `meal_type` or a list of `meals` may be given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedDayRequest {
    pub day: String,
    #[serde(default, alias = "mealType")]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub meals: Vec<String>,
}

/// API request to start a subscription checkout.
///
/// Customer fields may be given at the top level or under `customer`; the
/// top-level value wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default, alias = "selectedDays")]
    pub selected_days: Vec<SelectedDayRequest>,
    #[serde(default)]
    pub weeks: i64,
    #[serde(default)]
    pub customer: Option<CustomerRequest>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl SubscribeRequest {
    /// Merges top-level and nested customer fields, trimming whitespace.
    #[must_use]
    pub fn resolved_customer(&self) -> Customer {
        let nested: CustomerRequest = self.customer.clone().unwrap_or_default();
        let pick = |top: &Option<String>, inner: Option<String>| -> String {
            top.clone()
                .filter(|v| !v.trim().is_empty())
                .or(inner)
                .unwrap_or_default()
                .trim()
                .to_string()
        };

        Customer {
            name: pick(&self.name, nested.name),
            email: pick(&self.email, nested.email),
            phone: pick(&self.phone, nested.phone),
            address: pick(&self.address, nested.address),
        }
    }
}

/// API response for a created checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeResponse {
    /// Hosted checkout page to redirect the customer to.
    pub url: String,
    pub order_ref: String,
    pub total_meals: u32,
    pub total_amount_cents: i64,
}

// ---------------------------------------------------------------------------
// Webhook
// ---------------------------------------------------------------------------

/// API response acknowledging a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookResponse {
    pub received: bool,
    /// Whether this delivery activated a subscription.
    pub activated: bool,
    pub order_ref: Option<String>,
    pub orders_created: usize,
}

impl WebhookResponse {
    pub(crate) const fn acknowledged(order_ref: Option<String>) -> Self {
        Self {
            received: true,
            activated: false,
            order_ref,
            orders_created: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared views
// ---------------------------------------------------------------------------

/// A subscription as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionInfo {
    pub subscription_id: i64,
    pub order_ref: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub selected_days: Vec<SelectedDay>,
    pub num_weeks: u32,
    pub total_meals: u32,
    pub total_amount_cents: i64,
    pub status: String,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Subscription> for SubscriptionInfo {
    fn from(subscription: &Subscription) -> Self {
        Self {
            subscription_id: subscription.id.unwrap_or_default(),
            order_ref: subscription.order_ref.clone(),
            customer_name: subscription.customer.name.clone(),
            customer_email: subscription.customer.email.clone(),
            customer_phone: subscription.customer.phone.clone(),
            customer_address: subscription.customer.address.clone(),
            selected_days: subscription.selected_days.clone(),
            num_weeks: subscription.num_weeks,
            total_meals: subscription.total_meals,
            total_amount_cents: subscription.total_amount.cents(),
            status: subscription.status.to_string(),
            payment_intent_id: subscription.payment_intent_id.clone(),
            created_at: subscription.created_at,
        }
    }
}

/// A delivery order as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderInfo {
    pub order_id: i64,
    pub subscription_id: i64,
    pub order_ref: String,
    pub delivery_at: DateTime<Utc>,
    pub day: String,
    pub meal_type: String,
    pub meal_price_cents: i64,
    pub status: String,
    pub refund_status: String,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub refund_id: Option<String>,
}

impl From<&Order> for OrderInfo {
    fn from(order: &Order) -> Self {
        Self {
            order_id: order.id,
            subscription_id: order.subscription_id,
            order_ref: order.order_ref.clone(),
            delivery_at: order.delivery_at,
            day: order.day.to_string(),
            meal_type: order.meal_type.to_string(),
            meal_price_cents: order.meal_price.cents(),
            status: order.status.to_string(),
            refund_status: order.refund_status.to_string(),
            cancelled_at: order.cancelled_at,
            refund_id: order.refund_id.clone(),
        }
    }
}

/// An order together with its subscriber, for the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetailsInfo {
    #[serde(flatten)]
    pub order: OrderInfo,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
}

impl From<&OrderDetails> for OrderDetailsInfo {
    fn from(details: &OrderDetails) -> Self {
        Self {
            order: OrderInfo::from(&details.order),
            customer_name: details.customer.name.clone(),
            customer_email: details.customer.email.clone(),
            customer_phone: details.customer.phone.clone(),
            customer_address: details.customer.address.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

/// An order on the tracking page, with what the customer may still do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedOrderInfo {
    #[serde(flatten)]
    pub order: OrderInfo,
    /// Upcoming and not yet past.
    pub cancellable: bool,
    /// Cancelling now would refund the meal.
    pub refund_eligible: bool,
}

impl TrackedOrderInfo {
    pub(crate) fn new(order: &Order, now: DateTime<Utc>) -> Self {
        let cancellable: bool = !order.status.is_terminal() && is_cancellable(order.delivery_at, now);
        Self {
            order: OrderInfo::from(order),
            cancellable,
            refund_eligible: cancellable && is_refund_eligible(order.delivery_at, now),
        }
    }
}

/// API response for the order tracking page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResponse {
    pub subscription: SubscriptionInfo,
    /// Sorted by delivery time.
    pub orders: Vec<TrackedOrderInfo>,
}

// ---------------------------------------------------------------------------
// Cancel
// ---------------------------------------------------------------------------

/// API request to cancel deliveries.
///
/// `cancel_type` of `"all"` or `"single"` (with `single_order_id`) is
/// accepted as an older spelling of `cancel_all` / `order_ids`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    #[serde(default, alias = "orderRef", alias = "orderId", alias = "order_id")]
    pub order_ref: Option<String>,
    #[serde(default, alias = "orderIds")]
    pub order_ids: Vec<i64>,
    #[serde(default, alias = "cancelAll")]
    pub cancel_all: Option<bool>,
    #[serde(default)]
    pub cancel_type: Option<String>,
    #[serde(default, alias = "singleOrderId")]
    pub single_order_id: Option<i64>,
}

/// Which orders a cancel request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CancelSelection {
    AllUpcoming,
    Orders(Vec<i64>),
}

impl CancelRequest {
    /// Resolves the request's selection, or `None` if it selects nothing.
    #[must_use]
    pub fn selection(&self) -> Option<CancelSelection> {
        let cancel_all: bool = self
            .cancel_all
            .unwrap_or_else(|| self.cancel_type.as_deref() == Some("all"));
        if cancel_all {
            return Some(CancelSelection::AllUpcoming);
        }

        if !self.order_ids.is_empty() {
            return Some(CancelSelection::Orders(self.order_ids.clone()));
        }

        match (self.cancel_type.as_deref(), self.single_order_id) {
            (Some("single"), Some(id)) => Some(CancelSelection::Orders(vec![id])),
            _ => None,
        }
    }
}

/// API response for a processed cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelResponse {
    pub success: bool,
    pub order_ref: String,
    pub cancelled_order_ids: Vec<i64>,
    /// Selected orders left `upcoming` because their cancellation could not
    /// be stored. No refund was requested for them.
    pub failed_order_ids: Vec<i64>,
    /// Orders whose meal price was actually returned.
    pub refunded_count: u32,
    pub no_refund_count: u32,
    /// Refund-eligible orders whose refund could not be issued.
    pub refund_failed_count: u32,
    pub total_refund_cents: i64,
    pub subscription_status: String,
    pub message: String,
}

// ---------------------------------------------------------------------------
// Public content
// ---------------------------------------------------------------------------

/// A menu item with its price after discount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItemInfo {
    pub id: i64,
    pub day: String,
    pub appetizer: String,
    pub curry: String,
    pub biryani: String,
    pub egg: String,
    pub naan: String,
    pub price_cents: i64,
    pub discount_percent: u8,
    pub discounted_price_cents: i64,
    pub description: String,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl From<&MenuItem> for MenuItemInfo {
    fn from(item: &MenuItem) -> Self {
        Self {
            id: item.id,
            day: item.day.to_string(),
            appetizer: item.appetizer.clone(),
            curry: item.curry.clone(),
            biryani: item.biryani.clone(),
            egg: item.egg.clone(),
            naan: item.naan.clone(),
            price_cents: item.price.cents(),
            discount_percent: item.discount_percent,
            discounted_price_cents: item.discounted_price().cents(),
            description: item.description.clone(),
            image_url: item.image_url.clone(),
            is_active: item.is_active,
        }
    }
}

/// API response listing menu items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuResponse {
    pub items: Vec<MenuItemInfo>,
}

/// A site content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContentInfo {
    pub key: String,
    pub value: String,
    pub content_type: String,
}

impl From<&SiteContent> for SiteContentInfo {
    fn from(content: &SiteContent) -> Self {
        Self {
            key: content.key.clone(),
            value: content.value.clone(),
            content_type: content.content_type.clone(),
        }
    }
}

/// API response listing site content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentResponse {
    pub content: Vec<SiteContentInfo>,
}

/// API request submitting the contact form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// API response for a stored contact submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactResponse {
    pub success: bool,
    pub contact_id: i64,
}

// ---------------------------------------------------------------------------
// Admin
// ---------------------------------------------------------------------------

/// API request to log in to the back office.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// API response carrying an admin bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// API response for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardResponse {
    /// Upcoming orders delivering today (UTC).
    pub todays_orders: i64,
    pub active_subscriptions: i64,
    pub delivered_orders: i64,
    pub total_revenue_cents: i64,
    pub unread_contacts: i64,
    pub recent_orders: Vec<OrderDetailsInfo>,
}

/// Query parameters for the subscription listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSubscriptionsQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

/// API response listing subscriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListSubscriptionsResponse {
    pub subscriptions: Vec<SubscriptionInfo>,
}

/// API request to change a subscription's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub id: i64,
    pub status: String,
}

/// API response for a subscription status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSubscriptionResponse {
    pub success: bool,
    pub subscription: SubscriptionInfo,
}

/// Query parameters shared by the order listing, sales report and export.
///
/// Dates are inclusive `YYYY-MM-DD` UTC calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}

/// API response listing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOrdersResponse {
    pub orders: Vec<OrderDetailsInfo>,
}

/// API request to change an order's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    pub id: i64,
    pub status: String,
}

/// API response for an order status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateOrderResponse {
    pub success: bool,
    pub order: OrderInfo,
}

/// A cancellation record as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancellationInfo {
    pub cancellation_id: i64,
    pub subscription_id: i64,
    pub order_ref: String,
    pub cancelled_order_ids: Vec<i64>,
    pub total_refund_cents: i64,
    pub refund_eligible_count: u32,
    pub no_refund_count: u32,
    pub refund_failed_count: u32,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<&CancellationRecord> for CancellationInfo {
    fn from(record: &CancellationRecord) -> Self {
        Self {
            cancellation_id: record.cancellation_id,
            subscription_id: record.subscription_id,
            order_ref: record.order_ref.clone(),
            cancelled_order_ids: record.cancelled_order_ids.clone(),
            total_refund_cents: record.total_refund.cents(),
            refund_eligible_count: record.refund_eligible_count,
            no_refund_count: record.no_refund_count,
            refund_failed_count: record.refund_failed_count,
            reason: record.reason.clone(),
            status: record.status.clone(),
            created_at: record.created_at,
        }
    }
}

/// API response listing cancellation records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListCancellationsResponse {
    pub cancellations: Vec<CancellationInfo>,
}

/// API request to edit a menu item. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMenuItemRequest {
    pub id: i64,
    #[serde(default)]
    pub appetizer: Option<String>,
    #[serde(default)]
    pub curry: Option<String>,
    #[serde(default)]
    pub biryani: Option<String>,
    #[serde(default)]
    pub egg: Option<String>,
    #[serde(default)]
    pub naan: Option<String>,
    #[serde(default)]
    pub price_cents: Option<i64>,
    #[serde(default)]
    pub discount_percent: Option<i64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// API response for an edited menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateMenuItemResponse {
    pub success: bool,
    pub item: MenuItemInfo,
}

/// API request to create or replace a content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertContentRequest {
    pub key: String,
    pub value: String,
    #[serde(default, alias = "type")]
    pub content_type: Option<String>,
}

/// API response for an upserted content entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertContentResponse {
    pub success: bool,
    pub content: SiteContentInfo,
}

/// A contact submission as exposed over the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&ContactSubmission> for ContactInfo {
    fn from(contact: &ContactSubmission) -> Self {
        Self {
            id: contact.id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            phone: contact.phone.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
            is_read: contact.is_read,
            created_at: contact.created_at,
        }
    }
}

/// API response listing contact submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListContactsResponse {
    pub contacts: Vec<ContactInfo>,
    pub unread: i64,
}

/// API request to mark a contact submission read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkContactReadRequest {
    pub id: i64,
}

/// A bare success acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// One day of the sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySalesInfo {
    pub date: String,
    pub order_count: u64,
    pub revenue_cents: i64,
    pub refunds_cents: i64,
    pub delivered_count: u64,
    pub cancelled_count: u64,
}

/// API response for the sales report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesResponse {
    pub daily: Vec<DailySalesInfo>,
    pub total_revenue_cents: i64,
    pub total_refunds_cents: i64,
    pub net_revenue_cents: i64,
    pub total_orders: u64,
}

impl From<&SalesReport> for SalesResponse {
    fn from(report: &SalesReport) -> Self {
        Self {
            daily: report
                .daily
                .iter()
                .map(|day| DailySalesInfo {
                    date: day.date.format("%Y-%m-%d").to_string(),
                    order_count: day.order_count,
                    revenue_cents: day.revenue.cents(),
                    refunds_cents: day.refunds.cents(),
                    delivered_count: day.delivered_count,
                    cancelled_count: day.cancelled_count,
                })
                .collect(),
            total_revenue_cents: report.totals.revenue.cents(),
            total_refunds_cents: report.totals.refunds.cents(),
            net_revenue_cents: report.totals.net.cents(),
            total_orders: report.totals.total_orders,
        }
    }
}

/// One revenue bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueBucketInfo {
    pub key: String,
    pub label: String,
    pub revenue_cents: i64,
    pub orders: u64,
}

/// API response for revenue analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub weekly: Vec<RevenueBucketInfo>,
    pub monthly: Vec<RevenueBucketInfo>,
    pub yearly: Vec<RevenueBucketInfo>,
    pub total_revenue_cents: i64,
    pub total_orders: u64,
    pub average_order_value_cents: i64,
}

impl From<&RevenueAnalytics> for AnalyticsResponse {
    fn from(analytics: &RevenueAnalytics) -> Self {
        let buckets = |buckets: &[royale_meals_domain::RevenueBucket]| -> Vec<RevenueBucketInfo> {
            buckets
                .iter()
                .map(|b| RevenueBucketInfo {
                    key: b.key.clone(),
                    label: b.label.clone(),
                    revenue_cents: b.revenue.cents(),
                    orders: b.orders,
                })
                .collect()
        };

        Self {
            weekly: buckets(&analytics.weekly),
            monthly: buckets(&analytics.monthly),
            yearly: buckets(&analytics.yearly),
            total_revenue_cents: analytics.totals.revenue.cents(),
            total_orders: analytics.totals.orders,
            average_order_value_cents: analytics.totals.average_order_value.cents(),
        }
    }
}

/// Query parameters for the CSV export.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportQuery {
    #[serde(default, rename = "type")]
    pub export_type: Option<String>,
    #[serde(default, alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(default, alias = "endDate")]
    pub end_date: Option<String>,
}
