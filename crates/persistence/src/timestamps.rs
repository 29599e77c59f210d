// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp columns are RFC 3339 UTC text with second precision
//! (`2024-01-08T13:00:00Z`), so lexical order equals chronological order.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::error::PersistenceError;

/// Formats an instant for storage.
pub fn to_column(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses a stored instant.
pub fn from_column(table: &'static str, value: &str) -> Result<DateTime<Utc>, PersistenceError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| PersistenceError::CorruptRow {
            table,
            message: format!("invalid timestamp '{value}': {e}"),
        })
}

/// Parses an optional stored instant.
pub fn from_optional_column(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<DateTime<Utc>>, PersistenceError> {
    value.map(|v| from_column(table, v)).transpose()
}

/// Lower bound (inclusive) covering the whole of `date` in UTC.
pub fn start_of_day(date: NaiveDate) -> String {
    format!("{}T00:00:00Z", date.format("%Y-%m-%d"))
}

/// Upper bound (exclusive) covering the whole of `date` in UTC.
pub fn end_of_day(date: NaiveDate) -> String {
    start_of_day(date.succ_opt().unwrap_or(date))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_column_format_is_sortable() {
        let a = from_column("t", "2024-01-08T13:00:00Z").unwrap();
        let b = from_column("t", "2024-01-10T09:30:00+00:00").unwrap();
        assert_eq!(to_column(a), "2024-01-08T13:00:00Z");
        assert!(to_column(a) < to_column(b));
    }

    #[test]
    fn test_day_bounds_enclose_the_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        let last_second = "2024-01-08T23:59:59Z".to_string();
        assert_eq!(start_of_day(date), "2024-01-08T00:00:00Z");
        assert!(last_second < end_of_day(date));
        assert_eq!(end_of_day(date), "2024-01-09T00:00:00Z");
    }

    #[test]
    fn test_bad_timestamp_is_corrupt_row() {
        assert!(matches!(
            from_column("subscriptions", "yesterday"),
            Err(PersistenceError::CorruptRow { table: "subscriptions", .. })
        ));
    }
}
