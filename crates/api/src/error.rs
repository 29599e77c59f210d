// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use royale_meals::CoreError;
use royale_meals_domain::DomainError;
use royale_meals_payments::{PaymentError, WebhookError};
use royale_meals_persistence::PersistenceError;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
        }
    }
}

impl std::error::Error for AuthError {}

impl AuthError {
    pub(crate) fn failed(reason: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            reason: reason.into(),
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The payment provider failed or rejected a request.
    PaymentProvider {
        /// A description of the provider failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PaymentProvider { message } => write!(f, "Payment provider error: {message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(resource_type: &str, message: impl Into<String>) -> Self {
        Self::ResourceNotFound {
            resource_type: resource_type.to_string(),
            message: message.into(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(message) => Self::ResourceNotFound {
                resource_type: String::from("Record"),
                message,
            },
            PersistenceError::Conflict(message) => Self::DomainRuleViolation {
                rule: String::from("unique_record"),
                message,
            },
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        Self::PaymentProvider {
            message: err.to_string(),
        }
    }
}

impl From<WebhookError> for ApiError {
    fn from(err: WebhookError) -> Self {
        match err {
            WebhookError::MalformedPayload(message) => Self::InvalidInput {
                field: String::from("body"),
                message,
            },
            other => Self::AuthenticationFailed {
                reason: format!("Webhook signature verification failed: {other}"),
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidDeliveryDay(_) => ApiError::invalid("day", message),
        DomainError::InvalidMealType(_) => ApiError::invalid("meal_type", message),
        DomainError::InvalidOrderStatus(_)
        | DomainError::InvalidRefundStatus(_)
        | DomainError::InvalidSubscriptionStatus(_) => ApiError::invalid("status", message),
        DomainError::EmptySelection => ApiError::invalid("selected_days", message),
        DomainError::InvalidWeekCount { .. } => ApiError::invalid("weeks", message),
        DomainError::MissingCustomerField(field) => ApiError::invalid(field, message),
        DomainError::InvalidEmail(_) => ApiError::invalid("email", message),
        DomainError::InvalidMealPrice { .. } => ApiError::invalid("price_cents", message),
        DomainError::InvalidDiscount { .. } => ApiError::invalid("discount_percent", message),
        DomainError::InvalidOrderTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("order_lifecycle"),
            message,
        },
        DomainError::InvalidSubscriptionTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("subscription_lifecycle"),
            message,
        },
        DomainError::InvalidTimezone(_) => ApiError::invalid("kitchen_timezone", message),
        DomainError::UnresolvableLocalTime { .. } | DomainError::DateArithmeticOverflow { .. } => {
            ApiError::DomainRuleViolation {
                rule: String::from("delivery_schedule"),
                message,
            }
        }
        DomainError::TimestampParseError { .. } => ApiError::invalid("date", message),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::NotPersisted(what) => ApiError::Internal {
            message: format!("{what} has not been persisted"),
        },
    }
}
