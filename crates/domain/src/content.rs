// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{DeliveryDay, Money};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The dishes served on one delivery weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: i64,
    pub day: DeliveryDay,
    pub appetizer: String,
    pub curry: String,
    pub biryani: String,
    pub egg: String,
    pub naan: String,
    /// List price per meal.
    pub price: Money,
    /// Discount applied to `price`, 0..=100.
    pub discount_percent: u8,
    pub description: String,
    pub image_url: Option<String>,
    pub is_active: bool,
}

impl MenuItem {
    /// Returns the price after the discount.
    #[must_use]
    pub const fn discounted_price(&self) -> Money {
        self.price.discounted(self.discount_percent)
    }
}

/// Sorts menu items Monday through Friday.
pub fn sort_menu_by_day(items: &mut [MenuItem]) {
    items.sort_by_key(|item| item.day);
}

/// An editable piece of site copy, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteContent {
    pub key: String,
    pub value: String,
    /// Free-form hint for the editor (`text`, `html`, `image`).
    pub content_type: String,
}

/// A message left through the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
