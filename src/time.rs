//! Calendar helpers turning timestamps into the components used by the calculators.
//!
//! Astronomical quantities are evaluated on the UTC calendar; the local clock
//! and the UTC offset only enter the time offset and the event times.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveTime, Timelike, Utc};

/// Minutes per day.
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Calendar components of one timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeComponents {
    /// Day of year on the UTC calendar, 1-based.
    pub day_of_year: u32,
    /// Days in the UTC year, 365 or 366.
    pub days_in_year: u32,
    /// Fractional hour of the UTC day.
    pub utc_hour: f64,
    /// Minutes since local midnight on the wall clock.
    pub clock_minutes: f64,
    /// UTC offset of the timestamp in minutes, east positive.
    pub offset_minutes: f64,
}

impl TimeComponents {
    /// Splits a timestamp into its calendar components.
    #[must_use]
    pub fn from_datetime(timestamp: &DateTime<FixedOffset>) -> Self {
        let utc = timestamp.with_timezone(&Utc);
        Self {
            day_of_year: utc.ordinal(),
            days_in_year: days_in_year(utc.year()),
            utc_hour: fractional_hours(utc.time()),
            clock_minutes: fractional_hours(timestamp.time()) * 60.0,
            offset_minutes: f64::from(timestamp.offset().local_minus_utc()) / 60.0,
        }
    }
}

/// Days in a Gregorian year.
#[must_use]
pub const fn days_in_year(year: i32) -> u32 {
    if is_leap_year(year) { 366 } else { 365 }
}

/// Whether `year` is a Gregorian leap year.
#[must_use]
pub const fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Hours since midnight including minutes, seconds and nanoseconds.
#[must_use]
pub fn fractional_hours(time: NaiveTime) -> f64 {
    f64::from(time.hour())
        + f64::from(time.minute()) / 60.0
        + (f64::from(time.second()) + f64::from(time.nanosecond()) / 1e9) / 3600.0
}

/// Local midnight of the day containing `timestamp`, keeping its offset.
#[must_use]
pub fn local_midnight(timestamp: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let time = timestamp.time();
    let since_midnight = Duration::seconds(i64::from(time.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(time.nanosecond()));
    *timestamp - since_midnight
}

/// Adds fractional minutes to a timestamp with millisecond resolution.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn add_minutes(timestamp: DateTime<FixedOffset>, minutes: f64) -> DateTime<FixedOffset> {
    timestamp + Duration::milliseconds((minutes * 60_000.0).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_year(2024), 366);
        assert_eq!(days_in_year(2023), 365);
    }

    #[test]
    fn test_components_use_utc_calendar() {
        // 00:30 local on January 1st is still December 31st in UTC
        let timestamp = "2023-01-01T00:30:00+01:00"
            .parse::<DateTime<FixedOffset>>()
            .unwrap();
        let components = TimeComponents::from_datetime(&timestamp);
        assert_eq!(components.day_of_year, 365);
        assert_eq!(components.days_in_year, 365);
        assert!((components.utc_hour - 23.5).abs() < 1e-12);
        assert!((components.clock_minutes - 30.0).abs() < 1e-12);
        assert!((components.offset_minutes - 60.0).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_hours() {
        let time = NaiveTime::from_hms_milli_opt(12, 30, 36, 500).unwrap();
        assert!((fractional_hours(time) - (12.5 + 36.5 / 3600.0)).abs() < 1e-12);
    }

    #[test]
    fn test_local_midnight_and_add_minutes() {
        let timestamp = "2023-06-21T14:45:10+02:00"
            .parse::<DateTime<FixedOffset>>()
            .unwrap();
        let midnight = local_midnight(&timestamp);
        assert_eq!(midnight.to_rfc3339(), "2023-06-21T00:00:00+02:00");
        let later = add_minutes(midnight, 90.5);
        assert_eq!(later.to_rfc3339(), "2023-06-21T01:30:30+02:00");
    }
}
