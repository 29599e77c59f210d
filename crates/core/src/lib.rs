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
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use royale_meals_domain::{Order, OrderStatus};

// Re-export public types and functions
pub use apply::{activate_subscription, apply_order, apply_subscription};
pub use command::{OrderCommand, SubscriptionCommand};
pub use error::CoreError;
pub use state::{Activation, Transition, TransitionResult};

/// Returns whether a subscription with these orders has nothing left to deliver.
///
/// A subscription is cancelled after a cancel-all only when this holds.
#[must_use]
pub fn has_no_upcoming_orders(orders: &[Order]) -> bool {
    !orders.iter().any(|o| o.status == OrderStatus::Upcoming)
}
