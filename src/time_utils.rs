// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for the trailing contribution window.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};

/// Length of the contribution window in days.
pub const WINDOW_DAYS: i64 = 365;

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Cutoff instant one window before `now`.
pub fn one_year_ago(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(WINDOW_DAYS)
}

/// Inclusive `(start, end)` calendar dates of the trailing window ending at
/// `now`: exactly `WINDOW_DAYS` dates, today included.
///
/// `start` is the day after the `one_year_ago` cutoff date, matching GitLab's
/// exclusive `after` filter.
pub fn trailing_window(now: DateTime<Utc>) -> (NaiveDate, NaiveDate) {
    let end = now.date_naive();
    (end - Duration::days(WINDOW_DAYS - 1), end)
}

/// UTC calendar date of an RFC3339 timestamp, if it parses.
pub fn utc_date_of(timestamp: &str) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(timestamp)
        .ok()
        .map(|dt| dt.with_timezone(&Utc).date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utc_date_truncates_offset() {
        // 23:30 at -02:00 is already the next day in UTC
        let date = utc_date_of("2025-03-01T23:30:00-02:00").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 2).unwrap());
    }

    #[test]
    fn test_utc_date_rejects_garbage() {
        assert_eq!(utc_date_of("yesterday"), None);
    }

    #[test]
    fn test_trailing_window_holds_365_dates() {
        let now = DateTime::parse_from_rfc3339("2025-06-15T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let (start, end) = trailing_window(now);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 6, 15).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 6, 16).unwrap());
        assert_eq!(start.iter_days().take_while(|d| *d <= end).count(), 365);
        assert_eq!(format_utc_rfc3339(now), "2025-06-15T12:00:00Z");
    }

    #[test]
    fn test_window_starts_after_cutoff_date() {
        let now = DateTime::parse_from_rfc3339("2025-03-01T00:00:01Z")
            .unwrap()
            .with_timezone(&Utc);
        let (start, _) = trailing_window(now);
        assert_eq!(start, one_year_ago(now).date_naive().succ_opt().unwrap());
    }
}
