// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for the storefront and the admin back office.
//!
//! Handlers take the current instant explicitly and never read the clock.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use royale_meals::{
    Activation, OrderCommand, SubscriptionCommand, TransitionResult, activate_subscription,
    apply_order, apply_subscription, has_no_upcoming_orders,
};
use royale_meals_domain::{
    CancellationCandidate, CancellationPlan, DeliveryDay, MealType, MenuItem, Money, Order,
    OrderStatus, RefundDecision, RefundStatus, SelectedDay, SiteContent, Subscription,
    SubscriptionStatus, compute_revenue_analytics, compute_sales_report, generate_order_ref,
    plan_cancellation, require_field, sort_menu_by_day, validate_customer, validate_discount,
    validate_email, validate_meal_price, validate_plan,
};
use royale_meals_payments::{
    CheckoutRequest, CheckoutSession, CompletedCheckout, PaymentGateway, WebhookEvent,
    parse_event, verify_signature,
};
use royale_meals_persistence::{
    NewCancellation, NewContactSubmission, OrderDetails, OrderFilter, Persistence,
    SubscriptionFilter,
};
use tracing::{debug, info, warn};

use crate::auth::{AdminAuth, AdminClaims, IssuedToken};
use crate::config::ApiConfig;
use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::export::{
    CSV_CONTENT_TYPE, ExportFile, ExportKind, export_orders, export_sales, export_subscriptions,
};
use crate::request_response::{
    AnalyticsResponse, CancelRequest, CancelResponse, CancelSelection, CancellationInfo,
    ContactInfo, ContactRequest, ContactResponse, ContentResponse, DashboardResponse,
    ExportQuery, ListCancellationsResponse, ListContactsResponse, ListOrdersResponse,
    ListSubscriptionsQuery, ListSubscriptionsResponse, LoginRequest, LoginResponse,
    MarkContactReadRequest, MenuItemInfo, MenuResponse, OrderDetailsInfo, OrderInfo, OrderQuery,
    SalesResponse, SelectedDayRequest, SiteContentInfo, SubscribeRequest, SubscribeResponse,
    SubscriptionInfo, SuccessResponse, TrackResponse, TrackedOrderInfo, UpdateMenuItemRequest,
    UpdateMenuItemResponse, UpdateOrderRequest, UpdateOrderResponse, UpdateSubscriptionRequest,
    UpdateSubscriptionResponse, UpsertContentRequest, UpsertContentResponse, WebhookResponse,
};

/// How many fresh references to try before giving up.
const ORDER_REF_ATTEMPTS: usize = 10;

/// Orders shown on the dashboard's recent activity list.
const RECENT_ORDER_LIMIT: i64 = 10;

const CANCEL_ALL_REASON: &str = "Cancel all upcoming orders";
const CANCEL_SELECTED_REASON: &str = "Cancel selected orders";
const DEFAULT_CONTENT_TYPE: &str = "text";

fn saturating_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn subscription_id(subscription: &Subscription) -> Result<i64, ApiError> {
    subscription.id.ok_or_else(|| ApiError::Internal {
        message: format!("Subscription {} has no identifier", subscription.order_ref),
    })
}

/// Parses an optional status filter. Blank and `all` mean no filter.
fn parse_status_filter<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: FromStr<Err = royale_meals_domain::DomainError>,
{
    match value.map(str::trim) {
        None | Some("" | "all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(translate_domain_error),
    }
}

/// Parses an optional `YYYY-MM-DD` query value.
fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, ApiError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| ApiError::invalid(field, format!("Expected YYYY-MM-DD, got '{s}': {e}"))),
    }
}

fn parse_date_range(
    start: Option<&str>,
    end: Option<&str>,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), ApiError> {
    let start_date: Option<NaiveDate> = parse_date("start_date", start)?;
    let end_date: Option<NaiveDate> = parse_date("end_date", end)?;

    if let (Some(s), Some(e)) = (start_date, end_date)
        && s > e
    {
        return Err(ApiError::invalid(
            "end_date",
            format!("End date {e} is before start date {s}"),
        ));
    }

    Ok((start_date, end_date))
}

/// Expands the subscribe form's day entries into distinct (day, meal) pairs.
///
/// Entries with neither `meal_type` nor `meals` are skipped. Repeated pairs
/// keep their first position.
///
/// # Errors
///
/// Returns an error if a day or meal name is not recognised.
pub fn parse_selected_days(entries: &[SelectedDayRequest]) -> Result<Vec<SelectedDay>, ApiError> {
    let mut seen: HashSet<SelectedDay> = HashSet::new();
    let mut selected: Vec<SelectedDay> = Vec::new();

    for entry in entries {
        let meals: Vec<&str> = if entry.meals.is_empty() {
            entry.meal_type.as_deref().into_iter().collect()
        } else {
            entry.meals.iter().map(String::as_str).collect()
        };
        if meals.is_empty() {
            continue;
        }

        let day: DeliveryDay = entry.day.trim().parse().map_err(translate_domain_error)?;
        for meal in meals {
            let meal_type: MealType = meal.trim().parse().map_err(translate_domain_error)?;
            let pair = SelectedDay::new(day, meal_type);
            if seen.insert(pair) {
                selected.push(pair);
            }
        }
    }

    Ok(selected)
}

fn unused_order_ref(persistence: &mut Persistence) -> Result<String, ApiError> {
    for _ in 0..ORDER_REF_ATTEMPTS {
        let candidate: String = generate_order_ref();
        if persistence.get_subscription_by_ref(&candidate)?.is_none() {
            return Ok(candidate);
        }
        debug!(order_ref = %candidate, "Order reference already taken; retrying");
    }

    Err(ApiError::Internal {
        message: String::from("Could not allocate an unused order reference"),
    })
}

// ===========================================================================
// Storefront
// ===========================================================================

/// Starts a subscription: prices the plan, opens a checkout session and
/// stores the subscription as `pending`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `gateway` - The payment collaborator
/// * `config` - Pricing and schedule settings
/// * `request` - The subscribe form
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if:
/// - No day/meal pair is selected or a name is unrecognised
/// - The week count is outside 1..=12
/// - A customer field is missing or the email is malformed
/// - The payment provider rejects the checkout
/// - The subscription cannot be stored
pub async fn subscribe(
    persistence: &mut Persistence,
    gateway: &dyn PaymentGateway,
    config: &ApiConfig,
    request: &SubscribeRequest,
    now: DateTime<Utc>,
) -> Result<SubscribeResponse, ApiError> {
    let selected_days: Vec<SelectedDay> = parse_selected_days(&request.selected_days)?;
    let num_weeks: u32 =
        validate_plan(&selected_days, request.weeks).map_err(translate_domain_error)?;
    let customer = request.resolved_customer();
    validate_customer(&customer).map_err(translate_domain_error)?;

    let total_meals: u32 = saturating_count(selected_days.len())
        .checked_mul(num_weeks)
        .ok_or_else(|| ApiError::invalid("weeks", "Plan is too large"))?;
    let total_amount: Money = config.pricing.meal_price.times(u64::from(total_meals));

    let order_ref: String = unused_order_ref(persistence)?;

    let checkout: CheckoutSession = gateway
        .create_checkout_session(&CheckoutRequest {
            order_ref: order_ref.clone(),
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            amount: total_amount,
            product_name: config.pricing.product_name.clone(),
            success_url: config.pricing.success_url(&order_ref),
            cancel_url: config.pricing.cancel_url(),
        })
        .await?;

    let subscription = Subscription {
        id: None,
        order_ref: order_ref.clone(),
        customer,
        selected_days,
        num_weeks,
        total_meals,
        total_amount,
        checkout_session_id: Some(checkout.id.clone()),
        payment_intent_id: None,
        status: SubscriptionStatus::Pending,
        created_at: now,
    };
    persistence.create_subscription(&subscription)?;

    info!(
        order_ref = %order_ref,
        total_meals,
        total_amount = %total_amount,
        provider = gateway.provider_name(),
        "Subscription checkout started"
    );

    Ok(SubscribeResponse {
        url: checkout.url,
        order_ref,
        total_meals,
        total_amount_cents: total_amount.cents(),
    })
}

fn find_checkout_subscription(
    persistence: &mut Persistence,
    checkout: &CompletedCheckout,
) -> Result<Subscription, ApiError> {
    let found: Option<Subscription> = match checkout.order_ref.as_deref() {
        Some(order_ref) => persistence.get_subscription_by_ref(order_ref)?,
        None => persistence.get_subscription_by_checkout_session(&checkout.session_id)?,
    };

    found.ok_or_else(|| {
        ApiError::not_found(
            "Subscription",
            format!(
                "No subscription for checkout session {}",
                checkout.session_id
            ),
        )
    })
}

/// Processes a payment provider webhook.
///
/// A completed checkout activates its pending subscription and persists the
/// generated delivery orders. Deliveries for a subscription that is no
/// longer pending are acknowledged without changes.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `config` - Webhook secret, pricing and schedule settings
/// * `payload` - The raw request body
/// * `signature` - The signature header, if sent
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if:
/// - A secret is configured and the signature is missing or invalid
/// - The payload is not a well-formed event
/// - No subscription matches the checkout
/// - The schedule cannot be generated or stored
pub fn handle_webhook(
    persistence: &mut Persistence,
    config: &ApiConfig,
    payload: &str,
    signature: Option<&str>,
    now: DateTime<Utc>,
) -> Result<WebhookResponse, ApiError> {
    if let Some(secret) = config.webhook_secret.as_deref() {
        let header: &str = signature.ok_or_else(|| ApiError::AuthenticationFailed {
            reason: String::from("Missing webhook signature header"),
        })?;
        verify_signature(payload, header, secret, now.timestamp())?;
    } else {
        debug!("No webhook secret configured; accepting unsigned event");
    }

    let checkout: CompletedCheckout = match parse_event(payload)? {
        WebhookEvent::CheckoutCompleted(checkout) => checkout,
        WebhookEvent::Ignored { event_type } => {
            debug!(event_type = %event_type, "Ignoring webhook event");
            return Ok(WebhookResponse::acknowledged(None));
        }
    };

    let subscription: Subscription = find_checkout_subscription(persistence, &checkout)?;
    if subscription.status != SubscriptionStatus::Pending {
        info!(
            order_ref = %subscription.order_ref,
            status = %subscription.status,
            "Checkout already processed"
        );
        return Ok(WebhookResponse::acknowledged(Some(subscription.order_ref)));
    }

    let activation: Activation = activate_subscription(
        &subscription,
        checkout.payment_intent_id,
        now,
        config.schedule.kitchen_timezone,
    )
    .map_err(translate_core_error)?;

    let Some(order_ids) = persistence.activate_subscription(
        &activation.subscription,
        &activation.slots,
        config.pricing.meal_price,
        now,
    )?
    else {
        return Ok(WebhookResponse::acknowledged(Some(subscription.order_ref)));
    };

    info!(
        order_ref = %subscription.order_ref,
        orders = order_ids.len(),
        transition = activation.transition.name,
        "{}",
        activation.transition.details
    );

    Ok(WebhookResponse {
        received: true,
        activated: true,
        order_ref: Some(subscription.order_ref),
        orders_created: order_ids.len(),
    })
}

/// Returns a subscription and its deliveries for the tracking page.
///
/// # Errors
///
/// Returns an error if the reference is blank or unknown.
pub fn track_subscription(
    persistence: &mut Persistence,
    order_ref: &str,
    now: DateTime<Utc>,
) -> Result<TrackResponse, ApiError> {
    if order_ref.trim().is_empty() {
        return Err(ApiError::invalid("order_ref", "Order reference is required"));
    }

    let subscription: Subscription = persistence
        .get_subscription_by_ref(order_ref)?
        .ok_or_else(|| ApiError::not_found("Subscription", "Subscription not found"))?;
    let orders: Vec<Order> = persistence.list_orders_for_subscription(subscription_id(&subscription)?)?;

    Ok(TrackResponse {
        subscription: SubscriptionInfo::from(&subscription),
        orders: orders
            .iter()
            .map(|order| TrackedOrderInfo::new(order, now))
            .collect(),
    })
}

/// Running totals while a cancellation batch is processed.
#[derive(Debug, Default)]
struct RefundTally {
    refunded: u32,
    failed: u32,
    no_refund: u32,
    total: Money,
}

/// Requests the refund for one eligible order. Failures are logged and
/// counted, never returned.
async fn refund_order(
    gateway: &dyn PaymentGateway,
    subscription: &Subscription,
    order: &Order,
    amount: Money,
    tally: &mut RefundTally,
) -> Option<String> {
    let Some(payment_intent_id) = subscription.payment_intent_id.as_deref() else {
        warn!(
            order_ref = %subscription.order_ref,
            order_id = order.id,
            "Refund skipped: subscription has no payment intent"
        );
        tally.failed += 1;
        return None;
    };

    match gateway.create_refund(payment_intent_id, amount).await {
        Ok(receipt) => {
            tally.refunded += 1;
            tally.total += receipt.amount;
            Some(receipt.id)
        }
        Err(e) => {
            warn!(
                order_ref = %subscription.order_ref,
                order_id = order.id,
                error = %e,
                "Refund failed; cancelling without refund id"
            );
            tally.failed += 1;
            None
        }
    }
}

/// Cancels deliveries, refunding those more than 48 hours away.
///
/// Orders are processed one at a time. Each order is stored as cancelled
/// before its refund is requested; the refund id is written afterwards. An
/// order whose cancellation cannot be stored is skipped, gets no refund and
/// is reported in `failed_order_ids`. A failed refund never stops the
/// batch: the order is still cancelled as `refunded` but carries no refund
/// id and is reported in `refund_failed_count` rather than the totals. When
/// every upcoming order is cancelled via cancel-all, the subscription
/// becomes `cancelled`.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `gateway` - The payment collaborator
/// * `config` - Pricing settings (the per-meal refund amount)
/// * `request` - The cancel request
/// * `now` - The current instant
///
/// # Errors
///
/// Returns an error if:
/// - The order reference is missing or unknown
/// - The request selects neither specific orders nor cancel-all
/// - Nothing selected is still cancellable
/// - A lifecycle rule is violated
/// - No selected order could be stored as cancelled, or the cancellation
///   record cannot be written
pub async fn cancel_orders(
    persistence: &mut Persistence,
    gateway: &dyn PaymentGateway,
    config: &ApiConfig,
    request: &CancelRequest,
    now: DateTime<Utc>,
) -> Result<CancelResponse, ApiError> {
    let order_ref: &str = request
        .order_ref
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .ok_or_else(|| ApiError::invalid("order_ref", "Order reference is required"))?;

    let subscription: Subscription = persistence
        .get_subscription_by_ref(order_ref)?
        .ok_or_else(|| ApiError::not_found("Subscription", "Subscription not found"))?;
    let sub_id: i64 = subscription_id(&subscription)?;

    let selection: CancelSelection = request.selection().ok_or_else(|| {
        ApiError::invalid("order_ids", "Must provide orderIds or set cancelAll to true")
    })?;

    let orders: Vec<Order> = persistence.list_orders_for_subscription(sub_id)?;
    let wanted: Option<HashSet<i64>> = match &selection {
        CancelSelection::AllUpcoming => None,
        CancelSelection::Orders(ids) => Some(ids.iter().copied().collect()),
    };
    let by_id: HashMap<i64, &Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Upcoming)
        .filter(|o| wanted.as_ref().is_none_or(|ids| ids.contains(&o.id)))
        .map(|o| (o.id, o))
        .collect();

    let mut candidates: Vec<CancellationCandidate> = by_id
        .values()
        .map(|o| CancellationCandidate {
            order_id: o.id,
            delivery_at: o.delivery_at,
        })
        .collect();
    candidates.sort_by_key(|c| (c.delivery_at, c.order_id));

    let meal_price: Money = config.pricing.meal_price;
    let plan: CancellationPlan = plan_cancellation(&candidates, now, meal_price);
    if plan.is_empty() {
        return Err(ApiError::not_found("Order", "No orders found to cancel"));
    }

    let mut tally = RefundTally::default();
    let mut cancelled_order_ids: Vec<i64> = Vec::with_capacity(plan.decisions.len());
    let mut failed_order_ids: Vec<i64> = Vec::new();

    for decision in &plan.decisions {
        let Some(order) = by_id.get(&decision.order_id).copied() else {
            continue;
        };

        // Cancelled first; the refund id is written once the refund exists.
        let result: TransitionResult<Order> = apply_order(
            order,
            OrderCommand::Cancel {
                refund_status: decision.decision.refund_status(),
                refund_id: None,
                cancelled_at: now,
            },
        )
        .map_err(translate_core_error)?;
        if let Err(e) = persistence.update_order(&result.new_state) {
            warn!(
                order_ref = %subscription.order_ref,
                order_id = order.id,
                error = %e,
                "Order cancellation not stored; skipping it"
            );
            failed_order_ids.push(order.id);
            continue;
        }
        debug!(order_id = order.id, "{}", result.transition.details);
        cancelled_order_ids.push(order.id);

        match decision.decision {
            RefundDecision::Refund => {
                let Some(refund_id) =
                    refund_order(gateway, &subscription, order, meal_price, &mut tally).await
                else {
                    continue;
                };
                let mut refunded: Order = result.new_state;
                refunded.refund_id = Some(refund_id);
                if let Err(e) = persistence.update_order(&refunded) {
                    warn!(
                        order_id = order.id,
                        refund_id = ?refunded.refund_id,
                        error = %e,
                        "Refund issued but its id was not stored"
                    );
                }
            }
            RefundDecision::NoRefund => tally.no_refund += 1,
        }
    }

    if cancelled_order_ids.is_empty() {
        return Err(ApiError::Internal {
            message: String::from("No orders could be cancelled"),
        });
    }

    let cancel_all: bool = selection == CancelSelection::AllUpcoming;
    persistence.record_cancellation(&NewCancellation {
        subscription_id: sub_id,
        order_ref: subscription.order_ref.clone(),
        cancelled_order_ids: cancelled_order_ids.clone(),
        total_refund: tally.total,
        refund_eligible_count: tally.refunded + tally.failed,
        no_refund_count: tally.no_refund,
        refund_failed_count: tally.failed,
        reason: String::from(if cancel_all {
            CANCEL_ALL_REASON
        } else {
            CANCEL_SELECTED_REASON
        }),
        created_at: now,
    })?;

    let mut subscription_status: SubscriptionStatus = subscription.status;
    if cancel_all && subscription.status == SubscriptionStatus::Active {
        let remaining: Vec<Order> = persistence.list_orders_for_subscription(sub_id)?;
        if has_no_upcoming_orders(&remaining) {
            let result: TransitionResult<Subscription> =
                apply_subscription(&subscription, SubscriptionCommand::Cancel)
                    .map_err(translate_core_error)?;
            persistence.update_subscription_status(&result.new_state)?;
            subscription_status = result.new_state.status;
            info!(order_ref = %subscription.order_ref, "{}", result.transition.details);
        }
    }

    info!(
        order_ref = %subscription.order_ref,
        cancelled = cancelled_order_ids.len(),
        refunded = tally.refunded,
        no_refund = tally.no_refund,
        refund_failed = tally.failed,
        not_cancelled = failed_order_ids.len(),
        total_refund = %tally.total,
        "Cancellation processed"
    );

    Ok(CancelResponse {
        success: true,
        order_ref: subscription.order_ref,
        message: format!(
            "Cancelled {} order(s); refunded {}",
            cancelled_order_ids.len(),
            tally.total
        ),
        cancelled_order_ids,
        failed_order_ids,
        refunded_count: tally.refunded,
        no_refund_count: tally.no_refund,
        refund_failed_count: tally.failed,
        total_refund_cents: tally.total.cents(),
        subscription_status: subscription_status.to_string(),
    })
}

/// Lists active menu items, Monday first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_public_menu(persistence: &mut Persistence) -> Result<MenuResponse, ApiError> {
    let mut items: Vec<MenuItem> = persistence.list_menu_items(true)?;
    sort_menu_by_day(&mut items);
    Ok(MenuResponse {
        items: items.iter().map(MenuItemInfo::from).collect(),
    })
}

/// Lists all site content entries.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_content(persistence: &mut Persistence) -> Result<ContentResponse, ApiError> {
    Ok(ContentResponse {
        content: persistence
            .list_site_content()?
            .iter()
            .map(SiteContentInfo::from)
            .collect(),
    })
}

/// Stores a contact form submission as unread.
///
/// # Errors
///
/// Returns an error if a required field is blank, the email is malformed
/// or the insert fails.
pub fn submit_contact(
    persistence: &mut Persistence,
    request: &ContactRequest,
    now: DateTime<Utc>,
) -> Result<ContactResponse, ApiError> {
    require_field("name", &request.name).map_err(translate_domain_error)?;
    require_field("email", &request.email).map_err(translate_domain_error)?;
    require_field("subject", &request.subject).map_err(translate_domain_error)?;
    require_field("message", &request.message).map_err(translate_domain_error)?;
    validate_email(request.email.trim()).map_err(translate_domain_error)?;

    let contact_id: i64 = persistence.create_contact_submission(&NewContactSubmission {
        name: request.name.trim().to_string(),
        email: request.email.trim().to_string(),
        phone: request
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from),
        subject: request.subject.trim().to_string(),
        message: request.message.trim().to_string(),
        created_at: now,
    })?;

    info!(contact_id, "Contact submission received");
    Ok(ContactResponse {
        success: true,
        contact_id,
    })
}

// ===========================================================================
// Admin
// ===========================================================================

/// Exchanges the admin password for a bearer token.
///
/// # Errors
///
/// Returns an error if the password is wrong.
pub fn admin_login(
    auth: &AdminAuth,
    request: &LoginRequest,
    now: DateTime<Utc>,
) -> Result<LoginResponse, ApiError> {
    let issued: IssuedToken = auth.login(&request.password, now)?;
    Ok(LoginResponse {
        success: true,
        token: issued.token,
        expires_at: issued.expires_at,
    })
}

/// Validates the bearer token from an admin request.
///
/// # Errors
///
/// Returns an error if the token is absent, malformed, tampered with or
/// expired.
pub fn authenticate_admin(
    auth: &AdminAuth,
    bearer_token: Option<&str>,
    now: DateTime<Utc>,
) -> Result<AdminClaims, ApiError> {
    let token: &str = bearer_token
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::AuthenticationFailed {
            reason: String::from("Missing bearer token"),
        })?;

    auth.validate(token, now).map_err(|e| {
        warn!(error = %e, "Admin token rejected");
        ApiError::from(e)
    })
}

/// Summarises today's deliveries, revenue and recent activity.
///
/// # Errors
///
/// Returns an error if any query fails.
pub fn dashboard(
    persistence: &mut Persistence,
    now: DateTime<Utc>,
) -> Result<DashboardResponse, ApiError> {
    let today_start: DateTime<Utc> = now.date_naive().and_time(chrono::NaiveTime::MIN).and_utc();
    let tomorrow_start: DateTime<Utc> = today_start + Duration::days(1);

    let todays_orders: i64 = persistence.count_orders_delivering_between(
        OrderStatus::Upcoming,
        today_start,
        tomorrow_start,
    )?;
    let active_subscriptions: i64 =
        persistence.count_subscriptions_by_status(SubscriptionStatus::Active)?;
    let delivered_orders: i64 = persistence.count_orders_by_status(OrderStatus::Delivered)?;
    let total_revenue: Money = persistence
        .sum_subscription_totals(&[SubscriptionStatus::Active, SubscriptionStatus::Completed])?;
    let unread_contacts: i64 = persistence.count_unread_contacts()?;
    let recent: Vec<OrderDetails> = persistence.list_recent_order_details(RECENT_ORDER_LIMIT)?;

    Ok(DashboardResponse {
        todays_orders,
        active_subscriptions,
        delivered_orders,
        total_revenue_cents: total_revenue.cents(),
        unread_contacts,
        recent_orders: recent.iter().map(OrderDetailsInfo::from).collect(),
    })
}

/// Lists subscriptions, newest first.
///
/// # Errors
///
/// Returns an error if the status filter is unknown or the query fails.
pub fn list_subscriptions(
    persistence: &mut Persistence,
    query: &ListSubscriptionsQuery,
) -> Result<ListSubscriptionsResponse, ApiError> {
    let filter = SubscriptionFilter {
        status: parse_status_filter(query.status.as_deref())?,
        search: query.search.clone(),
    };
    let subscriptions: Vec<Subscription> = persistence.list_subscriptions(&filter)?;

    Ok(ListSubscriptionsResponse {
        subscriptions: subscriptions.iter().map(SubscriptionInfo::from).collect(),
    })
}

/// Marks an active subscription completed.
///
/// # Errors
///
/// Returns an error if the subscription is unknown, the status is not
/// `completed` or the subscription is not active.
pub fn update_subscription(
    persistence: &mut Persistence,
    request: &UpdateSubscriptionRequest,
) -> Result<UpdateSubscriptionResponse, ApiError> {
    let subscription: Subscription = persistence
        .get_subscription(request.id)?
        .ok_or_else(|| ApiError::not_found("Subscription", format!("Subscription {}", request.id)))?;

    let status: SubscriptionStatus = request.status.trim().parse().map_err(translate_domain_error)?;
    if status != SubscriptionStatus::Completed {
        return Err(ApiError::invalid(
            "status",
            format!("Subscriptions can only be marked completed, not {status}"),
        ));
    }

    let result: TransitionResult<Subscription> =
        apply_subscription(&subscription, SubscriptionCommand::Complete)
            .map_err(translate_core_error)?;
    persistence.update_subscription_status(&result.new_state)?;
    info!(order_ref = %subscription.order_ref, "{}", result.transition.details);

    Ok(UpdateSubscriptionResponse {
        success: true,
        subscription: SubscriptionInfo::from(&result.new_state),
    })
}

/// Lists orders with their subscribers, latest delivery first.
///
/// # Errors
///
/// Returns an error if a filter is malformed or the query fails.
pub fn list_orders(
    persistence: &mut Persistence,
    query: &OrderQuery,
) -> Result<ListOrdersResponse, ApiError> {
    let (start_date, end_date) =
        parse_date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let filter = OrderFilter {
        status: parse_status_filter(query.status.as_deref())?,
        start_date,
        end_date,
    };

    Ok(ListOrdersResponse {
        orders: persistence
            .list_order_details(&filter)?
            .iter()
            .map(OrderDetailsInfo::from)
            .collect(),
    })
}

/// Moves an upcoming order to `delivered` or `cancelled`.
///
/// Admin cancellation never refunds; refunds go through the customer
/// cancellation flow.
///
/// # Errors
///
/// Returns an error if the order is unknown, the status is not a target
/// status or the order is already delivered or cancelled.
pub fn update_order_status(
    persistence: &mut Persistence,
    request: &UpdateOrderRequest,
    now: DateTime<Utc>,
) -> Result<UpdateOrderResponse, ApiError> {
    let order: Order = persistence
        .get_order(request.id)?
        .ok_or_else(|| ApiError::not_found("Order", format!("Order {}", request.id)))?;

    let status: OrderStatus = request.status.trim().parse().map_err(translate_domain_error)?;
    let command: OrderCommand = match status {
        OrderStatus::Delivered => OrderCommand::MarkDelivered,
        OrderStatus::Cancelled => OrderCommand::Cancel {
            refund_status: RefundStatus::NoRefund,
            refund_id: None,
            cancelled_at: now,
        },
        OrderStatus::Upcoming => {
            return Err(ApiError::invalid(
                "status",
                "Orders cannot be moved back to upcoming",
            ));
        }
    };

    let result: TransitionResult<Order> = apply_order(&order, command).map_err(translate_core_error)?;
    persistence.update_order(&result.new_state)?;
    info!(order_id = order.id, "{}", result.transition.details);

    Ok(UpdateOrderResponse {
        success: true,
        order: OrderInfo::from(&result.new_state),
    })
}

/// Lists cancellation records, newest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_cancellations(
    persistence: &mut Persistence,
) -> Result<ListCancellationsResponse, ApiError> {
    Ok(ListCancellationsResponse {
        cancellations: persistence
            .list_cancellations()?
            .iter()
            .map(CancellationInfo::from)
            .collect(),
    })
}

/// Lists every menu item, active or not, Monday first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_menu(persistence: &mut Persistence) -> Result<MenuResponse, ApiError> {
    let mut items: Vec<MenuItem> = persistence.list_menu_items(false)?;
    sort_menu_by_day(&mut items);
    Ok(MenuResponse {
        items: items.iter().map(MenuItemInfo::from).collect(),
    })
}

fn replace_if_some(target: &mut String, value: Option<&String>) {
    if let Some(v) = value {
        v.trim().clone_into(target);
    }
}

/// Edits a menu item. Fields absent from the request keep their values.
///
/// # Errors
///
/// Returns an error if the item is unknown, the price is not positive or
/// the discount is outside 0-100.
pub fn update_menu_item(
    persistence: &mut Persistence,
    request: &UpdateMenuItemRequest,
) -> Result<UpdateMenuItemResponse, ApiError> {
    let mut item: MenuItem = persistence
        .get_menu_item(request.id)?
        .ok_or_else(|| ApiError::not_found("MenuItem", format!("Menu item {}", request.id)))?;

    replace_if_some(&mut item.appetizer, request.appetizer.as_ref());
    replace_if_some(&mut item.curry, request.curry.as_ref());
    replace_if_some(&mut item.biryani, request.biryani.as_ref());
    replace_if_some(&mut item.egg, request.egg.as_ref());
    replace_if_some(&mut item.naan, request.naan.as_ref());
    replace_if_some(&mut item.description, request.description.as_ref());

    if let Some(cents) = request.price_cents {
        let price = Money::from_cents(cents);
        validate_meal_price(price).map_err(translate_domain_error)?;
        item.price = price;
    }
    if let Some(percent) = request.discount_percent {
        item.discount_percent = validate_discount(percent).map_err(translate_domain_error)?;
    }
    if let Some(url) = request.image_url.as_deref() {
        let url: &str = url.trim();
        item.image_url = (!url.is_empty()).then(|| url.to_string());
    }
    if let Some(active) = request.is_active {
        item.is_active = active;
    }

    persistence.update_menu_item(&item)?;
    info!(menu_item_id = item.id, day = %item.day, "Menu item updated");

    Ok(UpdateMenuItemResponse {
        success: true,
        item: MenuItemInfo::from(&item),
    })
}

/// Creates or replaces a site content entry by key.
///
/// # Errors
///
/// Returns an error if the key is blank or the write fails.
pub fn upsert_content(
    persistence: &mut Persistence,
    request: &UpsertContentRequest,
    now: DateTime<Utc>,
) -> Result<UpsertContentResponse, ApiError> {
    require_field("key", &request.key).map_err(translate_domain_error)?;

    let content = SiteContent {
        key: request.key.trim().to_string(),
        value: request.value.clone(),
        content_type: request
            .content_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string(),
    };
    persistence.upsert_site_content(&content, now)?;
    info!(key = %content.key, "Site content updated");

    Ok(UpsertContentResponse {
        success: true,
        content: SiteContentInfo::from(&content),
    })
}

/// Lists contact submissions, newest first, with the unread count.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_contacts(persistence: &mut Persistence) -> Result<ListContactsResponse, ApiError> {
    let contacts = persistence.list_contact_submissions()?;
    let unread: i64 = persistence.count_unread_contacts()?;
    Ok(ListContactsResponse {
        contacts: contacts.iter().map(ContactInfo::from).collect(),
        unread,
    })
}

/// Marks a contact submission read.
///
/// # Errors
///
/// Returns an error if the submission is unknown.
pub fn mark_contact_read(
    persistence: &mut Persistence,
    request: &MarkContactReadRequest,
) -> Result<SuccessResponse, ApiError> {
    persistence.mark_contact_read(request.id)?;
    debug!(contact_id = request.id, "Contact submission marked read");
    Ok(SuccessResponse { success: true })
}

/// Aggregates deliveries by day over an optional date range.
///
/// # Errors
///
/// Returns an error if a date is malformed or the query fails.
pub fn sales_report(
    persistence: &mut Persistence,
    query: &OrderQuery,
) -> Result<SalesResponse, ApiError> {
    let (start_date, end_date) =
        parse_date_range(query.start_date.as_deref(), query.end_date.as_deref())?;
    let orders: Vec<Order> = persistence.list_orders_in_range(start_date, end_date)?;
    Ok(SalesResponse::from(&compute_sales_report(&orders)))
}

/// Buckets paid subscription revenue by week, month and year.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn revenue_analytics(persistence: &mut Persistence) -> Result<AnalyticsResponse, ApiError> {
    let subscriptions: Vec<Subscription> =
        persistence.list_subscriptions(&SubscriptionFilter::default())?;
    Ok(AnalyticsResponse::from(&compute_revenue_analytics(
        &subscriptions,
    )))
}

/// Renders a CSV export.
///
/// Orders and sales are bounded by delivery date, subscriptions by
/// creation date.
///
/// # Errors
///
/// Returns an error if a date is malformed, a query fails or the CSV
/// cannot be written.
pub fn export(
    persistence: &mut Persistence,
    query: &ExportQuery,
    now: DateTime<Utc>,
) -> Result<ExportFile, ApiError> {
    let kind = ExportKind::parse(query.export_type.as_deref());
    let (start_date, end_date) =
        parse_date_range(query.start_date.as_deref(), query.end_date.as_deref())?;

    let body: String = match kind {
        ExportKind::Orders => export_orders(&persistence.list_order_details(&OrderFilter {
            status: None,
            start_date,
            end_date,
        })?)?,
        ExportKind::Subscriptions => {
            let subscriptions: Vec<Subscription> = persistence
                .list_subscriptions(&SubscriptionFilter::default())?
                .into_iter()
                .filter(|s| {
                    let created: NaiveDate = s.created_at.date_naive();
                    start_date.is_none_or(|d| created >= d) && end_date.is_none_or(|d| created <= d)
                })
                .collect();
            export_subscriptions(&subscriptions)?
        }
        ExportKind::Sales => export_sales(&compute_sales_report(
            &persistence.list_orders_in_range(start_date, end_date)?,
        ))?,
    };

    info!(export_type = kind.as_str(), bytes = body.len(), "Export generated");
    Ok(ExportFile {
        filename: kind.filename(now.date_naive()),
        content_type: CSV_CONTENT_TYPE,
        body,
    })
}
