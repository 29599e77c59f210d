// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A weekday on which meals are delivered.
///
/// Deliveries only happen Monday through Friday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeliveryDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl DeliveryDay {
    /// All delivery days in calendar order.
    pub const ALL: [Self; 5] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
    ];

    /// Converts this day to its display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
        }
    }

    /// Returns the ISO day number (Monday = 1).
    #[must_use]
    pub const fn number_from_monday(&self) -> u32 {
        match self {
            Self::Monday => 1,
            Self::Tuesday => 2,
            Self::Wednesday => 3,
            Self::Thursday => 4,
            Self::Friday => 5,
        }
    }

    /// Maps a calendar weekday to a delivery day, if deliveries happen on it.
    #[must_use]
    pub const fn from_weekday(weekday: chrono::Weekday) -> Option<Self> {
        match weekday {
            chrono::Weekday::Mon => Some(Self::Monday),
            chrono::Weekday::Tue => Some(Self::Tuesday),
            chrono::Weekday::Wed => Some(Self::Wednesday),
            chrono::Weekday::Thu => Some(Self::Thursday),
            chrono::Weekday::Fri => Some(Self::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl FromStr for DeliveryDay {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|day| day.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::InvalidDeliveryDay(s.to_string()))
    }
}

impl std::fmt::Display for DeliveryDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The meal delivered in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealType {
    Lunch,
    Dinner,
}

impl MealType {
    /// Converts this meal type to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        }
    }

    /// Returns the wall-clock delivery hour for this meal.
    #[must_use]
    pub const fn delivery_hour(&self) -> u32 {
        match self {
            Self::Lunch => 13,
            Self::Dinner => 19,
        }
    }
}

impl FromStr for MealType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            _ => Err(DomainError::InvalidMealType(s.to_string())),
        }
    }
}

impl std::fmt::Display for MealType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A (weekday, meal) pair chosen at subscription time.
///
/// Immutable once the subscription is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedDay {
    /// The delivery weekday.
    pub day: DeliveryDay,
    /// The meal delivered on that day.
    pub meal_type: MealType,
}

impl SelectedDay {
    /// Creates a new selected day.
    #[must_use]
    pub const fn new(day: DeliveryDay, meal_type: MealType) -> Self {
        Self { day, meal_type }
    }
}

/// A concrete future delivery produced by the schedule generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeliverySlot {
    /// The delivery instant (UTC).
    pub delivery_at: DateTime<Utc>,
    /// The delivery weekday.
    pub day: DeliveryDay,
    /// The meal delivered.
    pub meal_type: MealType,
}

/// A monetary amount in integer cents.
///
/// Using minor units keeps repeated summation exact.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero cents.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from cents.
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the amount in cents.
    #[must_use]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Multiplies this amount by a count, saturating on overflow.
    #[must_use]
    pub const fn times(&self, count: u64) -> Self {
        #[allow(clippy::cast_possible_wrap)]
        let count = if count > i64::MAX as u64 {
            i64::MAX
        } else {
            count as i64
        };
        Self(self.0.saturating_mul(count))
    }

    /// Applies a percentage discount, rounding the discount down to whole cents.
    #[must_use]
    pub const fn discounted(&self, percent: u8) -> Self {
        let percent = if percent > 100 { 100 } else { percent as i64 };
        Self(self.0 - (self.0 * percent) / 100)
    }

    /// Formats the amount as dollars with two decimals (e.g. `10.00`).
    #[must_use]
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        format!("{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0 < 0 {
            write!(f, "-${}", Self(-self.0).to_decimal_string())
        } else {
            write!(f, "${}", self.to_decimal_string())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

/// Lifecycle state of an individual delivery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Scheduled and not yet delivered.
    #[default]
    Upcoming,
    /// Delivered. Terminal.
    Delivered,
    /// Cancelled by the customer. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidOrderStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Refund bookkeeping for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    /// No cancellation has happened.
    #[default]
    None,
    /// Cancelled inside the refund window.
    Refunded,
    /// Cancelled too close to delivery for a refund.
    NoRefund,
}

impl RefundStatus {
    /// Converts this refund status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Refunded => "refunded",
            Self::NoRefund => "no_refund",
        }
    }
}

impl FromStr for RefundStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" | "" => Ok(Self::None),
            "refunded" => Ok(Self::Refunded),
            "no_refund" => Ok(Self::NoRefund),
            _ => Err(DomainError::InvalidRefundStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RefundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle state of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created, awaiting payment confirmation.
    #[default]
    Pending,
    /// Paid; delivery orders exist.
    Active,
    /// Every upcoming order was cancelled. Terminal.
    Cancelled,
    /// Marked complete by an admin. Terminal.
    Completed,
}

impl SubscriptionStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns whether a subscription in this state has been paid for.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self, Self::Active | Self::Completed | Self::Cancelled)
    }
}

impl FromStr for SubscriptionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(DomainError::InvalidSubscriptionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contact and delivery details for a subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

/// A meal subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// The database identifier. `None` until persisted.
    pub id: Option<i64>,
    /// The public order reference (e.g. `RI-7K2M9Q4Z`).
    pub order_ref: String,
    /// The subscriber.
    pub customer: Customer,
    /// The selected (day, meal) pairs.
    pub selected_days: Vec<SelectedDay>,
    /// Number of weeks subscribed.
    pub num_weeks: u32,
    /// Total meals across the subscription.
    pub total_meals: u32,
    /// Total charged.
    pub total_amount: Money,
    /// Payment provider checkout session.
    pub checkout_session_id: Option<String>,
    /// Payment provider payment intent, recorded on activation.
    pub payment_intent_id: Option<String>,
    /// Current lifecycle state.
    pub status: SubscriptionStatus,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

/// A single scheduled delivery belonging to a subscription.
///
/// The delivery instant is fixed at creation; only `status`, `refund_status`
/// and the cancellation bookkeeping fields change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// The database identifier.
    pub id: i64,
    /// The owning subscription.
    pub subscription_id: i64,
    /// The owning subscription's public order reference.
    pub order_ref: String,
    /// The delivery instant (UTC).
    pub delivery_at: DateTime<Utc>,
    /// The delivery weekday.
    pub day: DeliveryDay,
    /// The meal delivered.
    pub meal_type: MealType,
    /// Price of this meal at subscription time.
    pub meal_price: Money,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Refund bookkeeping.
    pub refund_status: RefundStatus,
    /// When the order was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// Payment provider refund identifier, when a refund was issued.
    pub refund_id: Option<String>,
}
