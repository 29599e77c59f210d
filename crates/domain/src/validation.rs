// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Customer, Money, SelectedDay};

/// The longest plan offered, in weeks.
pub const MAX_WEEKS: u32 = 12;

/// Validates a subscription's day selection and duration.
///
/// # Arguments
///
/// * `selected` - The (day, meal) pairs
/// * `weeks` - The requested number of weeks, as received
///
/// # Returns
///
/// * `Ok(weeks)` narrowed to `u32` if the plan is valid
/// * `Err(DomainError)` otherwise
///
/// # Errors
///
/// Returns an error if:
/// - No pairs are selected
/// - `weeks` is outside `1..=MAX_WEEKS`
pub fn validate_plan(selected: &[SelectedDay], weeks: i64) -> Result<u32, DomainError> {
    if selected.is_empty() {
        return Err(DomainError::EmptySelection);
    }

    match u32::try_from(weeks) {
        Ok(w) if (1..=MAX_WEEKS).contains(&w) => Ok(w),
        _ => Err(DomainError::InvalidWeekCount {
            weeks,
            max: MAX_WEEKS,
        }),
    }
}

/// Validates that every customer field is present.
///
/// # Errors
///
/// Returns an error if any field is blank or the email has no `@`.
pub fn validate_customer(customer: &Customer) -> Result<(), DomainError> {
    require_field("name", &customer.name)?;
    require_field("email", &customer.email)?;
    require_field("phone", &customer.phone)?;
    require_field("address", &customer.address)?;
    validate_email(&customer.email)
}

/// Validates that a required text field is not blank.
///
/// # Errors
///
/// Returns `MissingCustomerField` naming `field` when `value` is blank.
pub fn require_field(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::MissingCustomerField(field));
    }
    Ok(())
}

/// Performs a shallow shape check on an email address.
///
/// # Errors
///
/// Returns an error unless the address has a non-empty local part and a
/// domain containing a dot.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let email = email.trim();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !domain.contains('@')
        });

    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidEmail(email.to_string()))
    }
}

/// Validates a configured or edited meal price.
///
/// # Errors
///
/// Returns an error if the price is not strictly positive.
pub fn validate_meal_price(price: Money) -> Result<(), DomainError> {
    if price <= Money::ZERO {
        return Err(DomainError::InvalidMealPrice {
            cents: price.cents(),
        });
    }
    Ok(())
}

/// Validates a menu discount percentage.
///
/// # Errors
///
/// Returns an error if the value is outside `0..=100`.
pub fn validate_discount(percent: i64) -> Result<u8, DomainError> {
    u8::try_from(percent)
        .ok()
        .filter(|p| *p <= 100)
        .ok_or(DomainError::InvalidDiscount { percent })
}
