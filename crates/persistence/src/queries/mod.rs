// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `subscriptions`: Subscription lookups, listings and revenue sums
//! - `orders`: Delivery order lookups, listings and counts
//! - `cancellations`: Processed cancellation records
//! - `content`: Menu items, site content and contact submissions

pub mod cancellations;
pub mod content;
pub mod orders;
pub mod subscriptions;
