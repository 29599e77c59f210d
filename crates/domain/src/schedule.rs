// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Delivery schedule generation for newly activated subscriptions.
//!
//! Given the (day, meal) pairs a customer picked and a number of weeks, this
//! module produces the concrete delivery instants that become order rows.
//!
//! ## Invariants
//!
//! - Exactly `|selected| × weeks` slots are returned
//! - Slots are strictly increasing in time and unique
//! - Every slot is strictly later than `now + 24h` (the activation floor)
//! - Delivery hours are wall-clock times in the kitchen timezone
//!   (lunch 13:00, dinner 19:00); returned instants are UTC
//!
//! ## Look-ahead
//!
//! The week-0 occurrence of a pair is at least one calendar day away and may
//! fall inside the activation floor. Every later occurrence is at least seven
//! days away and always clears it. Searching `weeks + 2` weeks therefore
//! yields at least `weeks + 1` surviving slots per pair, and since every pair
//! repeats with the same weekly period the earliest `|selected| × weeks` of
//! them contain exactly `weeks` occurrences of each pair.

use crate::error::DomainError;
use crate::types::{DeliverySlot, SelectedDay};
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Hours after activation before the first delivery may occur.
pub const ACTIVATION_DELAY_HOURS: i64 = 24;

/// Extra weeks searched beyond the requested count.
pub const LOOKAHEAD_WEEKS: u32 = 2;

/// Parses an IANA timezone name for wall-clock delivery hours.
///
/// # Errors
///
/// Returns an error if the name is not a known timezone.
pub fn parse_kitchen_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse()
        .map_err(|_| DomainError::InvalidTimezone(name.to_string()))
}

/// Generates the delivery slots for a subscription.
///
/// # Arguments
///
/// * `selected` - The (day, meal) pairs; duplicates are collapsed
/// * `weeks` - Number of weeks subscribed
/// * `now` - The activation instant
/// * `tz` - The kitchen timezone delivery hours are expressed in
///
/// # Returns
///
/// Slots sorted ascending by delivery instant. An empty selection or zero
/// weeks yields an empty schedule; callers are expected to reject those
/// inputs before getting here.
///
/// # Errors
///
/// Returns an error if:
/// - A delivery date overflows the calendar
/// - A delivery wall-clock time is ambiguous or non-existent in `tz`
///
/// # Example
///
/// ```text
/// now      = 2024-01-01T00:00:00Z (Monday)
/// selected = [(Monday, lunch)]
/// weeks    = 1
///
/// floor    = 2024-01-02T00:00:00Z
/// week 0   → 2024-01-08T13:00:00Z   (kept)
/// week 1   → 2024-01-15T13:00:00Z   (kept, truncated away)
/// result   = [2024-01-08T13:00:00Z]
/// ```
pub fn generate_delivery_slots(
    selected: &[SelectedDay],
    weeks: u32,
    now: DateTime<Utc>,
    tz: Tz,
) -> Result<Vec<DeliverySlot>, DomainError> {
    let pairs: Vec<SelectedDay> = unique_pairs(selected);
    let quota: usize = pairs.len() * weeks as usize;
    if quota == 0 {
        return Ok(Vec::new());
    }

    let floor: DateTime<Utc> = now + Duration::hours(ACTIVATION_DELAY_HOURS);
    let local_today: NaiveDate = now.with_timezone(&tz).date_naive();
    let today_number: u32 = local_today.weekday().number_from_monday();

    let search_weeks: u32 = weeks.saturating_add(LOOKAHEAD_WEEKS);
    let mut slots: Vec<DeliverySlot> = Vec::with_capacity(pairs.len() * search_weeks as usize);

    for week in 0..search_weeks {
        for pair in &pairs {
            let days_ahead: u64 =
                u64::from(days_until(today_number, pair.day.number_from_monday()))
                    + 7 * u64::from(week);

            let delivery_at: DateTime<Utc> =
                delivery_instant(local_today, days_ahead, pair.meal_type.delivery_hour(), tz)?;

            if delivery_at > floor {
                slots.push(DeliverySlot {
                    delivery_at,
                    day: pair.day,
                    meal_type: pair.meal_type,
                });
            }
        }
    }

    slots.sort_by_key(|slot| slot.delivery_at);
    slots.truncate(quota);
    Ok(slots)
}

/// Collapses duplicate pairs, keeping first-seen order.
fn unique_pairs(selected: &[SelectedDay]) -> Vec<SelectedDay> {
    let mut pairs: Vec<SelectedDay> = Vec::with_capacity(selected.len());
    for pair in selected {
        if !pairs.contains(pair) {
            pairs.push(*pair);
        }
    }
    pairs
}

/// Days from `today` to the next occurrence of `target` strictly after today.
///
/// Both arguments are ISO day numbers (Monday = 1). Returns 1..=7.
const fn days_until(today: u32, target: u32) -> u32 {
    let diff = (target + 7 - today) % 7;
    if diff == 0 { 7 } else { diff }
}

/// Resolves `start + days` at `hour:00` local time to a UTC instant.
fn delivery_instant(
    start: NaiveDate,
    days: u64,
    hour: u32,
    tz: Tz,
) -> Result<DateTime<Utc>, DomainError> {
    let date: NaiveDate =
        start
            .checked_add_days(Days::new(days))
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("adding {days} days to {start}"),
            })?;

    let naive = date
        .and_hms_opt(hour, 0, 0)
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("setting hour {hour} on {date}"),
        })?;

    let local = tz
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| DomainError::UnresolvableLocalTime {
            local: naive.to_string(),
            timezone: tz.name().to_string(),
        })?;

    Ok(local.with_timezone(&Utc))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{DeliveryDay, MealType};

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn pair(day: DeliveryDay, meal_type: MealType) -> SelectedDay {
        SelectedDay::new(day, meal_type)
    }

    #[test]
    fn test_days_until_is_strictly_future() {
        assert_eq!(days_until(1, 1), 7); // Monday -> next Monday
        assert_eq!(days_until(1, 2), 1); // Monday -> Tuesday
        assert_eq!(days_until(5, 1), 3); // Friday -> Monday
        assert_eq!(days_until(7, 1), 1); // Sunday -> Monday
        assert_eq!(days_until(6, 5), 6); // Saturday -> Friday
    }

    #[test]
    fn test_single_monday_lunch_from_new_year() {
        let now = utc("2024-01-01T00:00:00Z");
        let slots = generate_delivery_slots(
            &[pair(DeliveryDay::Monday, MealType::Lunch)],
            1,
            now,
            Tz::UTC,
        )
        .unwrap();

        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].delivery_at, utc("2024-01-08T13:00:00Z"));
        assert!(slots[0].delivery_at > utc("2024-01-02T00:00:00Z"));
        assert_eq!(slots[0].day, DeliveryDay::Monday);
        assert_eq!(slots[0].meal_type, MealType::Lunch);
    }

    #[test]
    fn test_activation_floor_skips_next_day_slot() {
        // Monday 14:00; Tuesday lunch is only 23 hours away.
        let now = utc("2024-01-01T14:00:00Z");
        let slots = generate_delivery_slots(
            &[pair(DeliveryDay::Tuesday, MealType::Lunch)],
            2,
            now,
            Tz::UTC,
        )
        .unwrap();

        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].delivery_at, utc("2024-01-09T13:00:00Z"));
        assert_eq!(slots[1].delivery_at, utc("2024-01-16T13:00:00Z"));
    }

    #[test]
    fn test_next_day_dinner_survives_floor() {
        // Monday 14:00; Tuesday dinner is 29 hours away.
        let now = utc("2024-01-01T14:00:00Z");
        let slots = generate_delivery_slots(
            &[pair(DeliveryDay::Tuesday, MealType::Dinner)],
            1,
            now,
            Tz::UTC,
        )
        .unwrap();

        assert_eq!(slots[0].delivery_at, utc("2024-01-02T19:00:00Z"));
    }

    #[test]
    fn test_mixed_selection_is_balanced_per_pair() {
        let now = utc("2024-01-01T14:00:00Z");
        let selected = [
            pair(DeliveryDay::Tuesday, MealType::Lunch),
            pair(DeliveryDay::Wednesday, MealType::Lunch),
            pair(DeliveryDay::Friday, MealType::Dinner),
        ];
        let slots = generate_delivery_slots(&selected, 3, now, Tz::UTC).unwrap();

        assert_eq!(slots.len(), 9);
        for p in &selected {
            let count = slots
                .iter()
                .filter(|s| s.day == p.day && s.meal_type == p.meal_type)
                .count();
            assert_eq!(count, 3, "pair {p:?} should appear once per week");
        }
    }

    #[test]
    fn test_duplicate_pairs_are_collapsed() {
        let now = utc("2024-01-01T00:00:00Z");
        let selected = [
            pair(DeliveryDay::Monday, MealType::Lunch),
            pair(DeliveryDay::Monday, MealType::Lunch),
        ];
        let slots = generate_delivery_slots(&selected, 2, now, Tz::UTC).unwrap();

        assert_eq!(slots.len(), 2);
        assert!(slots[0].delivery_at < slots[1].delivery_at);
    }

    #[test]
    fn test_empty_selection_yields_empty_schedule() {
        let now = utc("2024-01-01T00:00:00Z");
        assert!(generate_delivery_slots(&[], 4, now, Tz::UTC).unwrap().is_empty());
        assert!(
            generate_delivery_slots(&[pair(DeliveryDay::Monday, MealType::Lunch)], 0, now, Tz::UTC)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_count_order_and_floor_hold_for_every_start_and_selection() {
        let start = utc("2024-03-04T00:00:00Z");
        let all_pairs: Vec<SelectedDay> = DeliveryDay::ALL
            .into_iter()
            .flat_map(|d| [pair(d, MealType::Lunch), pair(d, MealType::Dinner)])
            .collect();

        // Every hour of a full week as the activation instant.
        for hour in 0..(7 * 24) {
            let now = start + Duration::hours(hour);
            let floor = now + Duration::hours(ACTIVATION_DELAY_HOURS);

            for size in 1..=all_pairs.len() {
                let selected = &all_pairs[..size];
                for weeks in [1_u32, 2, 5, 12] {
                    let slots = generate_delivery_slots(selected, weeks, now, Tz::UTC).unwrap();

                    assert_eq!(slots.len(), size * weeks as usize);
                    assert!(slots.iter().all(|s| s.delivery_at > floor));
                    assert!(slots.windows(2).all(|w| w[0].delivery_at < w[1].delivery_at));
                }
            }
        }
    }

    #[test]
    fn test_kitchen_timezone_converts_to_utc() {
        // 2024-01-01 is in EST (UTC-5); 13:00 local is 18:00 UTC.
        let tz = parse_kitchen_timezone("America/New_York").unwrap();
        let now = utc("2024-01-01T05:00:00Z");
        let slots = generate_delivery_slots(
            &[pair(DeliveryDay::Wednesday, MealType::Lunch)],
            1,
            now,
            tz,
        )
        .unwrap();

        assert_eq!(slots[0].delivery_at, utc("2024-01-03T18:00:00Z"));
    }

    #[test]
    fn test_local_today_drives_weekday_math() {
        // 2024-01-02T03:00Z is still Monday evening in New York.
        let tz = parse_kitchen_timezone("America/New_York").unwrap();
        let now = utc("2024-01-02T03:00:00Z");
        let slots = generate_delivery_slots(
            &[pair(DeliveryDay::Wednesday, MealType::Dinner)],
            1,
            now,
            tz,
        )
        .unwrap();

        // Wednesday 19:00 EST = Thursday 00:00 UTC.
        assert_eq!(slots[0].delivery_at, utc("2024-01-04T00:00:00Z"));
    }

    #[test]
    fn test_skipped_local_date_is_unresolvable() {
        // Samoa jumped from 2011-12-29 straight to 2011-12-31.
        let tz = parse_kitchen_timezone("Pacific/Apia").unwrap();
        let result = generate_delivery_slots(
            &[pair(DeliveryDay::Friday, MealType::Lunch)],
            1,
            utc("2011-12-27T00:00:00Z"),
            tz,
        );

        match result {
            Err(DomainError::UnresolvableLocalTime { local, timezone }) => {
                assert!(local.starts_with("2011-12-30"));
                assert_eq!(timezone, "Pacific/Apia");
            }
            other => panic!("expected unresolvable local time, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_timezone_is_rejected() {
        assert!(matches!(
            parse_kitchen_timezone("Mars/Olympus_Mons"),
            Err(DomainError::InvalidTimezone(_))
        ));
    }
}
