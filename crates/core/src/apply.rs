// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{OrderCommand, SubscriptionCommand};
use crate::error::CoreError;
use crate::state::{Activation, Transition, TransitionResult};
use chrono::{DateTime, Utc};
use royale_meals_domain::{
    DeliverySlot, DomainError, Order, OrderStatus, RefundStatus, Subscription,
    SubscriptionStatus, Tz, generate_delivery_slots,
};

/// Applies a command to a delivery order, producing a new order snapshot.
///
/// Orders move forward only: `upcoming → delivered` or `upcoming → cancelled`.
///
/// # Arguments
///
/// * `order` - The current order (immutable)
/// * `command` - The command to apply
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the updated order
/// * `Err(CoreError)` if the transition is not allowed
///
/// # Errors
///
/// Returns an error if:
/// - The order is already delivered or cancelled
/// - A cancellation carries `RefundStatus::None`
pub fn apply_order(
    order: &Order,
    command: OrderCommand,
) -> Result<TransitionResult<Order>, CoreError> {
    if order.status != OrderStatus::Upcoming {
        return Err(CoreError::DomainViolation(
            DomainError::InvalidOrderTransition {
                order_id: order.id,
                from: order.status.to_string(),
                action: command.action(),
            },
        ));
    }

    let mut new_order: Order = order.clone();

    let transition: Transition = match command {
        OrderCommand::MarkDelivered => {
            new_order.status = OrderStatus::Delivered;
            Transition::new(
                "MarkDelivered",
                format!("Order {} for {} delivered", order.id, order.order_ref),
            )
        }
        OrderCommand::Cancel {
            refund_status,
            refund_id,
            cancelled_at,
        } => {
            if refund_status == RefundStatus::None {
                return Err(CoreError::DomainViolation(
                    DomainError::InvalidRefundStatus(refund_status.to_string()),
                ));
            }

            new_order.status = OrderStatus::Cancelled;
            new_order.refund_status = refund_status;
            new_order.refund_id = refund_id;
            new_order.cancelled_at = Some(cancelled_at);
            Transition::new(
                "CancelOrder",
                format!(
                    "Order {} for {} cancelled ({refund_status})",
                    order.id, order.order_ref
                ),
            )
        }
    };

    Ok(TransitionResult {
        new_state: new_order,
        transition,
    })
}

/// Applies a command to a subscription, producing a new subscription snapshot.
///
/// Allowed transitions:
/// - `pending → active` (`Activate`)
/// - `active → cancelled` (`Cancel`)
/// - `active → completed` (`Complete`)
///
/// # Errors
///
/// Returns an error for every other (status, command) combination.
pub fn apply_subscription(
    subscription: &Subscription,
    command: SubscriptionCommand,
) -> Result<TransitionResult<Subscription>, CoreError> {
    let reject = |command: &SubscriptionCommand| {
        CoreError::DomainViolation(DomainError::InvalidSubscriptionTransition {
            order_ref: subscription.order_ref.clone(),
            from: subscription.status.to_string(),
            action: command.action(),
        })
    };

    let mut new_subscription: Subscription = subscription.clone();

    let transition: Transition = match (subscription.status, &command) {
        (SubscriptionStatus::Pending, SubscriptionCommand::Activate { payment_intent_id }) => {
            new_subscription.status = SubscriptionStatus::Active;
            new_subscription
                .payment_intent_id
                .clone_from(payment_intent_id);
            Transition::new(
                "ActivateSubscription",
                format!("Subscription {} activated", subscription.order_ref),
            )
        }
        (SubscriptionStatus::Active, SubscriptionCommand::Cancel) => {
            new_subscription.status = SubscriptionStatus::Cancelled;
            Transition::new(
                "CancelSubscription",
                format!(
                    "Subscription {} cancelled: no upcoming deliveries remain",
                    subscription.order_ref
                ),
            )
        }
        (SubscriptionStatus::Active, SubscriptionCommand::Complete) => {
            new_subscription.status = SubscriptionStatus::Completed;
            Transition::new(
                "CompleteSubscription",
                format!("Subscription {} completed", subscription.order_ref),
            )
        }
        _ => return Err(reject(&command)),
    };

    Ok(TransitionResult {
        new_state: new_subscription,
        transition,
    })
}

/// Activates a pending subscription and generates its delivery schedule.
///
/// # Arguments
///
/// * `subscription` - The pending subscription
/// * `payment_intent_id` - The confirmed payment intent, if the provider sent one
/// * `now` - The activation instant
/// * `tz` - The kitchen timezone
///
/// # Errors
///
/// Returns an error if:
/// - The subscription is not pending
/// - The subscription has no identifier
/// - The schedule cannot be generated
pub fn activate_subscription(
    subscription: &Subscription,
    payment_intent_id: Option<String>,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<Activation, CoreError> {
    if subscription.id.is_none() {
        return Err(CoreError::NotPersisted("Subscription"));
    }

    let result: TransitionResult<Subscription> = apply_subscription(
        subscription,
        SubscriptionCommand::Activate { payment_intent_id },
    )?;

    let slots: Vec<DeliverySlot> = generate_delivery_slots(
        &subscription.selected_days,
        subscription.num_weeks,
        now,
        tz,
    )?;

    Ok(Activation {
        subscription: result.new_state,
        slots,
        transition: result.transition,
    })
}
