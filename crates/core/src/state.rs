// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use royale_meals_domain::{DeliverySlot, Subscription};

/// Description of an applied transition, for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Transition name (e.g. `MarkDelivered`).
    pub name: &'static str,
    /// Human-readable summary.
    pub details: String,
}

impl Transition {
    pub(crate) fn new(name: &'static str, details: String) -> Self {
        Self { name, details }
    }
}

/// The result of a successful lifecycle transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
/// The input snapshot is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult<T> {
    /// The new snapshot after the transition.
    pub new_state: T,
    /// What happened.
    pub transition: Transition,
}

/// The result of activating a paid subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    /// The subscription in `active` state.
    pub subscription: Subscription,
    /// The delivery schedule to persist as orders.
    pub slots: Vec<DeliverySlot>,
    /// What happened.
    pub transition: Transition,
}
