// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_order, utc};
use crate::{CoreError, OrderCommand, apply_order, has_no_upcoming_orders};
use royale_meals_domain::{DomainError, Order, OrderStatus, RefundStatus};

fn cancel_command(refund_status: RefundStatus) -> OrderCommand {
    OrderCommand::Cancel {
        refund_status,
        refund_id: Some(String::from("re_1")),
        cancelled_at: utc("2024-01-05T09:00:00Z"),
    }
}

#[test]
fn test_mark_delivered_moves_upcoming_forward() {
    let order: Order = create_test_order(1, OrderStatus::Upcoming);
    let result = apply_order(&order, OrderCommand::MarkDelivered).unwrap();

    assert_eq!(result.new_state.status, OrderStatus::Delivered);
    assert_eq!(result.new_state.delivery_at, order.delivery_at);
    assert_eq!(result.transition.name, "MarkDelivered");
    // Input snapshot is untouched.
    assert_eq!(order.status, OrderStatus::Upcoming);
}

#[test]
fn test_cancel_records_refund_bookkeeping() {
    let order: Order = create_test_order(1, OrderStatus::Upcoming);
    let result = apply_order(&order, cancel_command(RefundStatus::Refunded)).unwrap();

    let cancelled: Order = result.new_state;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(cancelled.refund_status, RefundStatus::Refunded);
    assert_eq!(cancelled.refund_id.as_deref(), Some("re_1"));
    assert_eq!(cancelled.cancelled_at, Some(utc("2024-01-05T09:00:00Z")));
    assert_eq!(cancelled.delivery_at, order.delivery_at);
}

#[test]
fn test_cancel_rejects_none_refund_status() {
    let order: Order = create_test_order(1, OrderStatus::Upcoming);
    let err = apply_order(&order, cancel_command(RefundStatus::None)).unwrap_err();

    assert_eq!(
        err,
        CoreError::DomainViolation(DomainError::InvalidRefundStatus(String::from("none")))
    );
}

#[test]
fn test_terminal_orders_reject_every_command() {
    for status in [OrderStatus::Delivered, OrderStatus::Cancelled] {
        let order: Order = create_test_order(3, status);

        for command in [
            OrderCommand::MarkDelivered,
            cancel_command(RefundStatus::NoRefund),
        ] {
            let err = apply_order(&order, command).unwrap_err();
            assert!(matches!(
                err,
                CoreError::DomainViolation(DomainError::InvalidOrderTransition { order_id: 3, .. })
            ));
        }
    }
}

#[test]
fn test_transition_error_message() {
    let order: Order = create_test_order(3, OrderStatus::Delivered);
    let err = apply_order(&order, OrderCommand::MarkDelivered).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Domain violation: Order 3 cannot be marked delivered: order is delivered"
    );
}

#[test]
fn test_has_no_upcoming_orders() {
    let delivered: Order = create_test_order(1, OrderStatus::Delivered);
    let cancelled: Order = create_test_order(2, OrderStatus::Cancelled);
    let upcoming: Order = create_test_order(3, OrderStatus::Upcoming);

    assert!(has_no_upcoming_orders(&[]));
    assert!(has_no_upcoming_orders(&[delivered.clone(), cancelled.clone()]));
    assert!(!has_no_upcoming_orders(&[delivered, cancelled, upcoming]));
}
