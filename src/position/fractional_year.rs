//! Fractional year and day angle.

use super::finish;
use crate::Result;
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::time::TimeComponents;
use crate::types::TimeSeries;
use core::f64::consts::TAU;

fn fractional_year_values(timestamps: &TimeSeries) -> Vec<f64> {
    timestamps
        .iter()
        .map(|timestamp| {
            let t = TimeComponents::from_datetime(timestamp);
            TAU / f64::from(t.days_in_year)
                * (f64::from(t.day_of_year) - 1.0 + (t.utc_hour - 12.0) / 24.0)
        })
        .collect()
}

/// NOAA fractional year `γ = 2π/daysInYear · (doy − 1 + (hour − 12)/24)`.
///
/// The first half of January 1st gives a negative angle, which is clamped to 0.
///
/// # Errors
/// Returns `RangeViolation` if a value falls outside [0, 2π].
pub fn fractional_year_noaa(timestamps: &TimeSeries) -> Result<AngularQuantity> {
    let values = fractional_year_values(timestamps)
        .into_iter()
        .map(|gamma| gamma.max(0.0))
        .collect();
    finish(Quantity::FractionalYear, Algorithm::Noaa, values)
}

/// Legacy PVGIS fractional year: the NOAA expression without clamping.
///
/// Negative values on the morning of January 1st are kept and flagged.
///
/// # Errors
/// Returns `RangeViolation` only for non-finite input.
pub fn fractional_year_pvis(timestamps: &TimeSeries) -> Result<AngularQuantity> {
    finish(
        Quantity::FractionalYear,
        Algorithm::Pvis,
        fractional_year_values(timestamps),
    )
}

/// Hofierka day angle `j' = 2π · doy / daysInYear`.
///
/// # Errors
/// Returns `RangeViolation` if a value falls outside [0, 2π].
pub fn day_angle_hofierka(timestamps: &TimeSeries) -> Result<AngularQuantity> {
    let values = timestamps
        .iter()
        .map(|timestamp| {
            let t = TimeComponents::from_datetime(timestamp);
            TAU * f64::from(t.day_of_year) / f64::from(t.days_in_year)
        })
        .collect();
    finish(Quantity::DayAngle, Algorithm::Hofierka, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, FixedOffset};

    fn series(timestamps: &[&str]) -> TimeSeries {
        TimeSeries::new(
            timestamps
                .iter()
                .map(|s| s.parse::<DateTime<FixedOffset>>().unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_fractional_year_noaa_clamps_new_year_morning() {
        let timestamps = series(&["2023-01-01T00:00:00Z", "2023-01-01T12:00:00Z"]);
        let gamma = fractional_year_noaa(&timestamps).unwrap();
        assert_eq!(gamma.values(), &[0.0, 0.0]);
        assert!(gamma.out_of_range().is_empty());
    }

    #[test]
    fn test_fractional_year_pvis_keeps_negative_values() {
        let timestamps = series(&["2023-01-01T00:00:00Z", "2023-07-02T12:00:00Z"]);
        let gamma = fractional_year_pvis(&timestamps).unwrap();
        assert!((gamma.values()[0] + TAU / 365.0 / 2.0).abs() < 1e-12);
        assert_eq!(gamma.out_of_range(), &[0]);
        assert!((gamma.values()[1] - TAU * 182.0 / 365.0).abs() < 1e-12);
    }

    #[test]
    fn test_fractional_year_within_range_over_leap_year() {
        let start = "2024-01-01T00:00:00Z".parse::<DateTime<FixedOffset>>().unwrap();
        let end = "2025-01-01T00:00:00Z".parse::<DateTime<FixedOffset>>().unwrap();
        let timestamps = TimeSeries::range(start, end, chrono::Duration::hours(7)).unwrap();
        let gamma = fractional_year_noaa(&timestamps).unwrap();
        assert!(gamma.values().iter().all(|&g| (0.0..TAU).contains(&g)));
        assert!(gamma.values().windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_day_angle() {
        let timestamps = series(&["2023-12-31T18:00:00Z", "2024-12-31T00:00:00Z"]);
        let day_angle = day_angle_hofierka(&timestamps).unwrap();
        assert!((day_angle.values()[0] - TAU).abs() < 1e-12);
        assert!((day_angle.values()[1] - TAU).abs() < 1e-12);
        assert_eq!(day_angle.algorithm(), Some(Algorithm::Hofierka));
    }
}
