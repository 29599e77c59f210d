// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations.
//!
//! ## Module Organization
//!
//! - `subscriptions`: Subscription inserts, activation and order updates
//! - `cancellations`: Cancellation records
//! - `content`: Menu edits, site content upserts and contact submissions

pub mod cancellations;
pub mod content;
pub mod subscriptions;
