// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cancellation refund eligibility.
//!
//! An upcoming order cancelled strictly more than 48 hours before its
//! delivery earns a refund of one meal's price. Orders whose delivery instant
//! is at or before `now` cannot be cancelled at all and are reported back as
//! skipped.

use crate::types::{Money, RefundStatus};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Minimum lead time, exclusive, for a refund-eligible cancellation.
pub const REFUND_CUTOFF_HOURS: i64 = 48;

/// Returns whether cancelling a delivery at `delivery_at` earns a refund.
///
/// The boundary is exclusive: exactly 48 hours ahead is not eligible.
#[must_use]
pub fn is_refund_eligible(delivery_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    delivery_at - now > Duration::hours(REFUND_CUTOFF_HOURS)
}

/// Returns whether a delivery at `delivery_at` can still be cancelled.
#[must_use]
pub fn is_cancellable(delivery_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    delivery_at > now
}

/// An upcoming order considered for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancellationCandidate {
    /// The order identifier.
    pub order_id: i64,
    /// The order's delivery instant.
    pub delivery_at: DateTime<Utc>,
}

/// Refund outcome for one cancelled order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundDecision {
    /// Cancel and refund one meal's price.
    Refund,
    /// Cancel without a refund.
    NoRefund,
}

impl RefundDecision {
    /// The refund status recorded on the order for this decision.
    #[must_use]
    pub const fn refund_status(&self) -> RefundStatus {
        match self {
            Self::Refund => RefundStatus::Refunded,
            Self::NoRefund => RefundStatus::NoRefund,
        }
    }
}

/// Decision for a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderDecision {
    pub order_id: i64,
    pub delivery_at: DateTime<Utc>,
    pub decision: RefundDecision,
}

/// The result of planning a cancellation batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPlan {
    /// One decision per cancellable candidate, in input order.
    pub decisions: Vec<OrderDecision>,
    /// Candidates whose delivery instant has already passed.
    pub skipped_past: Vec<i64>,
    /// Number of refund-eligible orders.
    pub refund_eligible_count: usize,
    /// Number of orders cancelled without refund.
    pub no_refund_count: usize,
    /// `refund_eligible_count × meal_price`.
    pub total_refund: Money,
}

impl CancellationPlan {
    /// Returns true when nothing in the batch can be cancelled.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }
}

/// Partitions upcoming orders into refund and no-refund cancellations.
///
/// # Arguments
///
/// * `candidates` - Orders already filtered to `upcoming` by the caller
/// * `now` - The cancellation instant
/// * `meal_price` - Refund amount per eligible order
///
/// # Returns
///
/// A plan carrying a decision for every cancellable candidate and the
/// aggregate refund. Candidates at or before `now` land in `skipped_past`.
#[must_use]
pub fn plan_cancellation(
    candidates: &[CancellationCandidate],
    now: DateTime<Utc>,
    meal_price: Money,
) -> CancellationPlan {
    let mut decisions: Vec<OrderDecision> = Vec::with_capacity(candidates.len());
    let mut skipped_past: Vec<i64> = Vec::new();

    for candidate in candidates {
        if !is_cancellable(candidate.delivery_at, now) {
            skipped_past.push(candidate.order_id);
            continue;
        }

        let decision = if is_refund_eligible(candidate.delivery_at, now) {
            RefundDecision::Refund
        } else {
            RefundDecision::NoRefund
        };

        decisions.push(OrderDecision {
            order_id: candidate.order_id,
            delivery_at: candidate.delivery_at,
            decision,
        });
    }

    let refund_eligible_count: usize = decisions
        .iter()
        .filter(|d| d.decision == RefundDecision::Refund)
        .count();
    let no_refund_count: usize = decisions.len() - refund_eligible_count;
    let total_refund: Money = meal_price.times(refund_eligible_count as u64);

    CancellationPlan {
        decisions,
        skipped_past,
        refund_eligible_count,
        no_refund_count,
        total_refund,
    }
}
