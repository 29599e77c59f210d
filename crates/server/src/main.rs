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
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod session;

use axum::{
    Json, Router,
    extract::{Path, Query, State as AxumState},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{Duration, Utc};
use clap::Parser;
use royale_meals_api::{
    AdminAuth, AnalyticsResponse, ApiConfig, ApiError, CancelRequest, CancelResponse,
    ContactRequest, ContactResponse, ContentResponse, DEFAULT_TOKEN_TTL_HOURS, DashboardResponse,
    ExportFile, ExportQuery, ListCancellationsResponse, ListContactsResponse, ListOrdersResponse,
    ListSubscriptionsQuery, ListSubscriptionsResponse, LoginRequest, LoginResponse,
    MarkContactReadRequest, MenuResponse, OrderQuery, PricingConfig, SalesResponse,
    ScheduleConfig, SubscribeRequest, SubscribeResponse, SuccessResponse, TrackResponse,
    UpdateMenuItemRequest, UpdateMenuItemResponse, UpdateOrderRequest, UpdateOrderResponse,
    UpdateSubscriptionRequest, UpdateSubscriptionResponse, UpsertContentRequest,
    UpsertContentResponse, WebhookResponse, admin_login, cancel_orders, dashboard, export,
    handle_webhook, list_cancellations, list_contacts, list_content, list_menu, list_orders,
    list_public_menu, list_subscriptions, mark_contact_read, revenue_analytics, sales_report,
    submit_contact, subscribe, track_subscription, update_menu_item, update_order_status,
    update_subscription, upsert_content,
};
use royale_meals_domain::{Money, parse_kitchen_timezone};
use royale_meals_payments::{FakePaymentGateway, PaymentGateway, SIGNATURE_HEADER, StripeGateway};
use royale_meals_persistence::Persistence;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::AdminSession;

/// Royale Meals Server - HTTP server for the meal subscription service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "ROYALE_DATABASE")]
    database: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "ROYALE_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, env = "ROYALE_BIND", default_value = "127.0.0.1")]
    bind: String,

    /// Price of a single meal, in cents
    #[arg(long, env = "ROYALE_MEAL_PRICE_CENTS", default_value_t = 1000)]
    meal_price_cents: i64,

    /// Shared admin password
    #[arg(long, env = "ROYALE_ADMIN_PASSWORD", hide_env_values = true)]
    admin_password: String,

    /// Secret used to sign admin tokens
    #[arg(long, env = "ROYALE_TOKEN_SECRET", hide_env_values = true)]
    token_secret: String,

    /// Admin token lifetime in hours
    #[arg(long, env = "ROYALE_TOKEN_TTL_HOURS", default_value_t = DEFAULT_TOKEN_TTL_HOURS)]
    token_ttl_hours: i64,

    /// Stripe secret API key
    #[arg(long, env = "STRIPE_SECRET_KEY", hide_env_values = true)]
    stripe_secret_key: Option<String>,

    /// Stripe webhook signing secret. Unsigned webhooks are accepted when unset.
    #[arg(long, env = "STRIPE_WEBHOOK_SECRET", hide_env_values = true)]
    stripe_webhook_secret: Option<String>,

    /// Public site root used for checkout redirects
    #[arg(long, env = "ROYALE_PUBLIC_BASE_URL", default_value = "http://localhost:3000")]
    public_base_url: String,

    /// IANA timezone in which lunch and dinner hours are wall-clock times
    #[arg(long, env = "ROYALE_KITCHEN_TIMEZONE", default_value = "UTC")]
    kitchen_timezone: String,

    /// Use the in-memory payment gateway instead of Stripe
    #[arg(long, env = "ROYALE_FAKE_PAYMENTS")]
    fake_payments: bool,
}

/// Application state shared across handlers.
///
/// The single `SQLite` connection sits behind a Mutex; each request holds
/// the lock for its duration, including payment calls. A slow checkout or
/// refund batch therefore stalls every other route until the gateway's
/// request timeout fires.
#[derive(Clone)]
struct AppState {
    persistence: Arc<Mutex<Persistence>>,
    gateway: Arc<dyn PaymentGateway>,
    config: Arc<ApiConfig>,
    auth: Arc<AdminAuth>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let status: StatusCode = match &err {
            ApiError::AuthenticationFailed { .. } => StatusCode::UNAUTHORIZED,
            ApiError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            ApiError::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::DomainRuleViolation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PaymentProvider { .. } => {
                error!(error = %err, "Payment provider error");
                StatusCode::BAD_GATEWAY
            }
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

// ============================================================================
// Storefront
// ============================================================================

/// Handler for POST `/api/subscribe`.
///
/// Stores a pending subscription and returns the checkout URL.
async fn handle_subscribe(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>, HttpError> {
    info!(
        days = req.selected_days.len(),
        weeks = req.weeks,
        "Handling subscribe request"
    );

    let mut persistence = app_state.persistence.lock().await;
    let response: SubscribeResponse = subscribe(
        &mut persistence,
        app_state.gateway.as_ref(),
        &app_state.config,
        &req,
        Utc::now(),
    )
    .await?;
    drop(persistence);

    info!(order_ref = %response.order_ref, "Checkout session created");
    Ok(Json(response))
}

/// Handler for POST `/api/webhook`.
///
/// The body is read raw so the signature can be checked over the exact bytes.
async fn handle_payment_webhook(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<WebhookResponse>, HttpError> {
    let signature: Option<&str> = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let mut persistence = app_state.persistence.lock().await;
    let response: WebhookResponse =
        handle_webhook(&mut persistence, &app_state.config, &body, signature, Utc::now())?;
    drop(persistence);

    Ok(Json(response))
}

/// Handler for GET `/api/track/{order_ref}`.
async fn handle_track(
    AxumState(app_state): AxumState<AppState>,
    Path(order_ref): Path<String>,
) -> Result<Json<TrackResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let response: TrackResponse = track_subscription(&mut persistence, &order_ref, Utc::now())?;
    Ok(Json(response))
}

/// Handler for POST `/api/cancel`.
///
/// Refunds are issued one order at a time while the lock is held.
async fn handle_cancel(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<CancelResponse>, HttpError> {
    info!(order_ref = ?req.order_ref, "Handling cancel request");

    let mut persistence = app_state.persistence.lock().await;
    let response: CancelResponse = cancel_orders(
        &mut persistence,
        app_state.gateway.as_ref(),
        &app_state.config,
        &req,
        Utc::now(),
    )
    .await?;
    drop(persistence);

    if response.refund_failed_count > 0 {
        warn!(
            order_ref = %response.order_ref,
            failed = response.refund_failed_count,
            "Cancellation finished with failed refunds"
        );
    }
    Ok(Json(response))
}

/// Handler for GET `/api/menu`.
async fn handle_public_menu(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MenuResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_public_menu(&mut persistence)?))
}

/// Handler for GET `/api/content` and GET `/api/admin/content`.
async fn handle_list_content(
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ContentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_content(&mut persistence)?))
}

/// Handler for POST `/api/contact`.
async fn handle_contact(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<ContactRequest>,
) -> Result<Json<ContactResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(submit_contact(&mut persistence, &req, Utc::now())?))
}

// ============================================================================
// Admin
// ============================================================================

/// Handler for POST `/api/admin/login`.
///
/// The bcrypt check runs on the blocking pool.
async fn handle_admin_login(
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, HttpError> {
    let auth: Arc<AdminAuth> = Arc::clone(&app_state.auth);
    let response: LoginResponse =
        tokio::task::spawn_blocking(move || admin_login(&auth, &req, Utc::now()))
            .await
            .map_err(|e| {
                HttpError::from(ApiError::Internal {
                    message: format!("Login task failed: {e}"),
                })
            })??;
    info!(expires_at = %response.expires_at, "Admin logged in");
    Ok(Json(response))
}

/// Handler for GET `/api/admin/dashboard`.
async fn handle_dashboard(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<DashboardResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(dashboard(&mut persistence, Utc::now())?))
}

/// Handler for GET `/api/admin/subscriptions`.
async fn handle_list_subscriptions(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ListSubscriptionsQuery>,
) -> Result<Json<ListSubscriptionsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_subscriptions(&mut persistence, &query)?))
}

/// Handler for PUT `/api/admin/subscriptions`.
async fn handle_update_subscription(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpdateSubscriptionRequest>,
) -> Result<Json<UpdateSubscriptionResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_subscription(&mut persistence, &req)?))
}

/// Handler for GET `/api/admin/orders`.
async fn handle_list_orders(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<ListOrdersResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_orders(&mut persistence, &query)?))
}

/// Handler for PUT `/api/admin/orders`.
async fn handle_update_order(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<UpdateOrderResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_order_status(&mut persistence, &req, Utc::now())?))
}

/// Handler for GET `/api/admin/cancellations`.
async fn handle_list_cancellations(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListCancellationsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_cancellations(&mut persistence)?))
}

/// Handler for GET `/api/admin/menu`.
async fn handle_admin_menu(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<MenuResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_menu(&mut persistence)?))
}

/// Handler for PUT `/api/admin/menu`.
async fn handle_update_menu_item(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpdateMenuItemRequest>,
) -> Result<Json<UpdateMenuItemResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(update_menu_item(&mut persistence, &req)?))
}

async fn handle_admin_content(
    _session: AdminSession,
    state: AxumState<AppState>,
) -> Result<Json<ContentResponse>, HttpError> {
    handle_list_content(state).await
}

/// Handler for PUT `/api/admin/content`.
async fn handle_upsert_content(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<UpsertContentRequest>,
) -> Result<Json<UpsertContentResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(upsert_content(&mut persistence, &req, Utc::now())?))
}

/// Handler for GET `/api/admin/contact`.
async fn handle_list_contacts(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<ListContactsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(list_contacts(&mut persistence)?))
}

/// Handler for PUT `/api/admin/contact`.
async fn handle_mark_contact_read(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Json(req): Json<MarkContactReadRequest>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(mark_contact_read(&mut persistence, &req)?))
}

/// Handler for GET `/api/admin/sales`.
async fn handle_sales(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<OrderQuery>,
) -> Result<Json<SalesResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(sales_report(&mut persistence, &query)?))
}

/// Handler for GET `/api/admin/analytics`.
async fn handle_analytics(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
) -> Result<Json<AnalyticsResponse>, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(revenue_analytics(&mut persistence)?))
}

/// Handler for GET `/api/admin/export`.
///
/// Responds with a CSV attachment rather than JSON.
async fn handle_export(
    _session: AdminSession,
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let file: ExportFile = export(&mut persistence, &query, Utc::now())?;
    drop(persistence);

    let disposition: String = format!("attachment; filename=\"{}\"", file.filename);
    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.body,
    )
        .into_response())
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/api/subscribe", post(handle_subscribe))
        .route("/api/webhook", post(handle_payment_webhook))
        .route("/api/track/{order_ref}", get(handle_track))
        .route("/api/cancel", post(handle_cancel))
        .route("/api/menu", get(handle_public_menu))
        .route("/api/content", get(handle_list_content))
        .route("/api/contact", post(handle_contact))
        .route("/api/admin/login", post(handle_admin_login))
        .route("/api/admin/dashboard", get(handle_dashboard))
        .route(
            "/api/admin/subscriptions",
            get(handle_list_subscriptions).put(handle_update_subscription),
        )
        .route(
            "/api/admin/orders",
            get(handle_list_orders).put(handle_update_order),
        )
        .route("/api/admin/cancellations", get(handle_list_cancellations))
        .route(
            "/api/admin/menu",
            get(handle_admin_menu).put(handle_update_menu_item),
        )
        .route(
            "/api/admin/content",
            get(handle_admin_content).put(handle_upsert_content),
        )
        .route(
            "/api/admin/contact",
            get(handle_list_contacts).put(handle_mark_contact_read),
        )
        .route("/api/admin/sales", get(handle_sales))
        .route("/api/admin/analytics", get(handle_analytics))
        .route("/api/admin/export", get(handle_export))
        .with_state(app_state)
}

/// Chooses the payment gateway. Stripe is required unless fake payments
/// were asked for explicitly.
fn build_gateway(args: &Args) -> Result<Arc<dyn PaymentGateway>, Box<dyn std::error::Error>> {
    if args.fake_payments {
        warn!("Using in-memory fake payments; no money will move");
        return Ok(Arc::new(FakePaymentGateway::new()));
    }

    match args
        .stripe_secret_key
        .as_deref()
        .map(str::trim)
        .filter(|key| !key.is_empty())
    {
        Some(key) => {
            info!("Using Stripe payments");
            Ok(Arc::new(StripeGateway::new(key)?))
        }
        None => Err("A Stripe secret key is required unless --fake-payments is given".into()),
    }
}

fn build_api_config(args: &Args) -> Result<ApiConfig, Box<dyn std::error::Error>> {
    let pricing: PricingConfig =
        PricingConfig::new(Money::from_cents(args.meal_price_cents), &args.public_base_url)?;
    let schedule = ScheduleConfig {
        kitchen_timezone: parse_kitchen_timezone(&args.kitchen_timezone)?,
    };
    let webhook_secret: Option<String> = args
        .stripe_webhook_secret
        .clone()
        .filter(|secret| !secret.trim().is_empty());
    if webhook_secret.is_none() {
        warn!("No webhook secret configured; unsigned webhooks will be accepted");
    }

    info!(
        meal_price = %pricing.meal_price,
        kitchen_timezone = %schedule.kitchen_timezone,
        "Loaded pricing and schedule configuration"
    );

    Ok(ApiConfig {
        pricing,
        schedule,
        webhook_secret,
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Royale Meals Server");

    let gateway: Arc<dyn PaymentGateway> = build_gateway(&args)?;
    let config: ApiConfig = build_api_config(&args)?;
    let auth: AdminAuth = AdminAuth::new(
        &args.admin_password,
        &args.token_secret,
        Duration::hours(args.token_ttl_hours),
    )?;

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        gateway,
        config: Arc::new(config),
        auth: Arc::new(auth),
    };

    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
