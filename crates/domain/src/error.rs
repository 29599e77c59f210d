// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Weekday name is not a delivery day (Monday through Friday).
    InvalidDeliveryDay(String),
    /// Meal type is not lunch or dinner.
    InvalidMealType(String),
    /// Order status string is not recognized.
    InvalidOrderStatus(String),
    /// Refund status string is not recognized.
    InvalidRefundStatus(String),
    /// Subscription status string is not recognized.
    InvalidSubscriptionStatus(String),
    /// No (day, meal) pairs were selected.
    EmptySelection,
    /// Week count is outside the offered range.
    InvalidWeekCount {
        /// The rejected week count.
        weeks: i64,
        /// The maximum week count offered.
        max: u32,
    },
    /// A required customer field is missing or blank.
    MissingCustomerField(&'static str),
    /// Customer email does not look like an email address.
    InvalidEmail(String),
    /// Meal price must be positive.
    InvalidMealPrice {
        /// The rejected price in cents.
        cents: i64,
    },
    /// Discount percent must be within 0..=100.
    InvalidDiscount {
        /// The rejected percentage.
        percent: i64,
    },
    /// An order lifecycle transition is not allowed from its current state.
    InvalidOrderTransition {
        /// The order identifier.
        order_id: i64,
        /// The order's current status.
        from: String,
        /// The attempted transition.
        action: &'static str,
    },
    /// A subscription lifecycle transition is not allowed from its current state.
    InvalidSubscriptionTransition {
        /// The subscription's order reference.
        order_ref: String,
        /// The subscription's current status.
        from: String,
        /// The attempted transition.
        action: &'static str,
    },
    /// Kitchen timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// A wall-clock delivery time does not map to a single instant.
    UnresolvableLocalTime {
        /// The local date and time that failed to resolve.
        local: String,
        /// The timezone it was interpreted in.
        timezone: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse a timestamp string.
    TimestampParseError {
        /// The invalid timestamp string.
        value: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDeliveryDay(day) => {
                write!(f, "Invalid delivery day '{day}': must be Monday through Friday")
            }
            Self::InvalidMealType(meal) => {
                write!(f, "Invalid meal type '{meal}': must be lunch or dinner")
            }
            Self::InvalidOrderStatus(status) => write!(f, "Invalid order status: {status}"),
            Self::InvalidRefundStatus(status) => write!(f, "Invalid refund status: {status}"),
            Self::InvalidSubscriptionStatus(status) => {
                write!(f, "Invalid subscription status: {status}")
            }
            Self::EmptySelection => write!(f, "At least one delivery day must be selected"),
            Self::InvalidWeekCount { weeks, max } => {
                write!(f, "Invalid week count: {weeks}. Must be between 1 and {max}")
            }
            Self::MissingCustomerField(field) => write!(f, "Missing required field: {field}"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {email}"),
            Self::InvalidMealPrice { cents } => {
                write!(f, "Invalid meal price: {cents} cents. Must be greater than 0")
            }
            Self::InvalidDiscount { percent } => {
                write!(f, "Invalid discount: {percent}%. Must be between 0 and 100")
            }
            Self::InvalidOrderTransition {
                order_id,
                from,
                action,
            } => write!(f, "Order {order_id} cannot {action}: order is {from}"),
            Self::InvalidSubscriptionTransition {
                order_ref,
                from,
                action,
            } => write!(
                f,
                "Subscription {order_ref} cannot {action}: subscription is {from}"
            ),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: {tz}"),
            Self::UnresolvableLocalTime { local, timezone } => {
                write!(
                    f,
                    "Could not resolve local time {local} in {timezone} (ambiguous or non-existent due to DST)"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::TimestampParseError { value, error } => {
                write!(f, "Failed to parse timestamp '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
