// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the Royale Meals subscription service.
//!
//! Handlers validate requests, drive the lifecycle rules in the core crate
//! and translate every lower-layer error into [`ApiError`]. Transport
//! concerns (routing, headers, status codes) belong to the server.

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

mod auth;
mod config;
mod error;
mod export;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{ADMIN_SUBJECT, AdminAuth, AdminClaims, DEFAULT_TOKEN_TTL_HOURS, IssuedToken};
pub use config::{ApiConfig, DEFAULT_MEAL_PRICE, DEFAULT_PRODUCT_NAME, PricingConfig, ScheduleConfig};
pub use error::{ApiError, AuthError, translate_core_error, translate_domain_error};
pub use export::{CSV_CONTENT_TYPE, ExportFile, ExportKind};
pub use handlers::{
    admin_login, authenticate_admin, cancel_orders, dashboard, export, handle_webhook,
    list_cancellations, list_contacts, list_content, list_menu, list_orders, list_public_menu,
    list_subscriptions, mark_contact_read, parse_selected_days, revenue_analytics, sales_report,
    submit_contact, subscribe, track_subscription, update_menu_item, update_order_status,
    update_subscription, upsert_content,
};
pub use request_response::{
    AnalyticsResponse, CancelRequest, CancelResponse, CancelSelection, CancellationInfo,
    ContactInfo, ContactRequest, ContactResponse, ContentResponse, CustomerRequest,
    DailySalesInfo, DashboardResponse, ExportQuery, ListCancellationsResponse,
    ListContactsResponse, ListOrdersResponse, ListSubscriptionsQuery, ListSubscriptionsResponse,
    LoginRequest, LoginResponse, MarkContactReadRequest, MenuItemInfo, MenuResponse,
    OrderDetailsInfo, OrderInfo, OrderQuery, RevenueBucketInfo, SalesResponse,
    SelectedDayRequest, SiteContentInfo, SubscribeRequest, SubscribeResponse, SubscriptionInfo,
    SuccessResponse, TrackResponse, TrackedOrderInfo, UpdateMenuItemRequest,
    UpdateMenuItemResponse, UpdateOrderRequest, UpdateOrderResponse, UpdateSubscriptionRequest,
    UpdateSubscriptionResponse, UpsertContentRequest, UpsertContentResponse, WebhookResponse,
};
