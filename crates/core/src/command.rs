// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::{DateTime, Utc};
use royale_meals_domain::RefundStatus;

/// A requested change to a single delivery order.
///
/// Commands are the only way to request order state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderCommand {
    /// The meal was delivered.
    MarkDelivered,
    /// The customer cancelled the delivery.
    Cancel {
        /// `Refunded` or `NoRefund`; never `None`.
        refund_status: RefundStatus,
        /// Payment provider refund identifier, when one was issued.
        refund_id: Option<String>,
        /// The cancellation instant.
        cancelled_at: DateTime<Utc>,
    },
}

impl OrderCommand {
    /// Short verb phrase used in errors and logs.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::MarkDelivered => "be marked delivered",
            Self::Cancel { .. } => "be cancelled",
        }
    }
}

/// A requested change to a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionCommand {
    /// Payment was confirmed.
    Activate {
        /// Payment provider payment intent.
        payment_intent_id: Option<String>,
    },
    /// No upcoming deliveries remain after a cancel-all.
    Cancel,
    /// An admin closed the subscription out.
    Complete,
}

impl SubscriptionCommand {
    /// Short verb phrase used in errors and logs.
    #[must_use]
    pub const fn action(&self) -> &'static str {
        match self {
            Self::Activate { .. } => "be activated",
            Self::Cancel => "be cancelled",
            Self::Complete => "be completed",
        }
    }
}
