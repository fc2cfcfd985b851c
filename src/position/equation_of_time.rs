//! Equation of time in minutes.
//!
//! Tabulated values put 1 January at about −3.99 min. At noon UTC the Milne
//! form gives −3.71 min and the NOAA series, the default timing family,
//! gives −2.90 min.

#![allow(clippy::unreadable_literal)]

use super::{check_inputs, finish};
use crate::Result;
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::time::TimeComponents;
use crate::types::TimeSeries;
use core::f64::consts::TAU;

/// NOAA equation of time from the fractional year.
///
/// `eot = 229.18 · (0.000075 + 0.001868 cos γ − 0.032077 sin γ − 0.014615 cos 2γ − 0.040849 sin 2γ)`
///
/// # Errors
/// Returns `RangeViolation` outside ±20 minutes.
///
/// # Example
/// ```
/// use pvgis_core::TimeSeries;
/// use pvgis_core::position::{equation_of_time, fractional_year};
///
/// let timestamps = TimeSeries::new(vec!["2023-01-01T12:00:00Z".parse().unwrap()]).unwrap();
/// let gamma = fractional_year::fractional_year_noaa(&timestamps).unwrap();
/// let eot = equation_of_time::equation_of_time_noaa(&gamma).unwrap();
/// assert!((eot.values()[0] + 2.904).abs() < 0.001);
/// ```
pub fn equation_of_time_noaa(fractional_year: &AngularQuantity) -> Result<AngularQuantity> {
    let values = fractional_year
        .radians()
        .iter()
        .map(|&gamma| {
            229.18
                * (0.000075 + 0.001868 * gamma.cos()
                    - 0.032077 * gamma.sin()
                    - 0.014615 * (2.0 * gamma).cos()
                    - 0.040849 * (2.0 * gamma).sin())
        })
        .collect();
    finish(Quantity::EquationOfTime, Algorithm::Noaa, values)
}

/// Milne (1921) equation of time.
///
/// `eot = 9.87 sin 2b − 7.53 cos b − 1.5 sin b` with `b = 2π/365 · (doy − 81)`.
///
/// # Errors
/// Returns `RangeViolation` outside ±20 minutes.
pub fn equation_of_time_milne(timestamps: &TimeSeries) -> Result<AngularQuantity> {
    let values = timestamps
        .iter()
        .map(|timestamp| {
            let t = TimeComponents::from_datetime(timestamp);
            let b = TAU / 365.0 * (f64::from(t.day_of_year) - 81.0);
            9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
        })
        .collect();
    finish(Quantity::EquationOfTime, Algorithm::Milne1921, values)
}

/// Equation of time of `algorithm`, checked against the time series length.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for a family without an equation of time,
/// `DataAlignment` for a misaligned fractional year, or `RangeViolation`.
pub fn equation_of_time(
    algorithm: Algorithm,
    timestamps: &TimeSeries,
    fractional_year: &AngularQuantity,
) -> Result<AngularQuantity> {
    check_inputs(timestamps.len(), &[fractional_year])?;
    match algorithm {
        Algorithm::Noaa => equation_of_time_noaa(fractional_year),
        Algorithm::Milne1921 => equation_of_time_milne(timestamps),
        other => Err(crate::Error::unsupported_algorithm(
            Quantity::EquationOfTime,
            other,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::fractional_year::fractional_year_noaa;
    use chrono::{DateTime, Duration, FixedOffset};

    fn year_2023() -> TimeSeries {
        let start = "2023-01-01T12:00:00Z".parse::<DateTime<FixedOffset>>().unwrap();
        TimeSeries::range(start, start + Duration::days(365), Duration::days(1)).unwrap()
    }

    #[test]
    fn test_noaa_extrema() {
        let gamma = fractional_year_noaa(&year_2023()).unwrap();
        let eot = equation_of_time_noaa(&gamma).unwrap();
        let max = eot.values().iter().copied().fold(f64::MIN, f64::max);
        let min = eot.values().iter().copied().fold(f64::MAX, f64::min);
        // early November maximum, mid February minimum
        assert!((max - 16.4).abs() < 0.5, "max {max}");
        assert!((min + 14.3).abs() < 0.5, "min {min}");
    }

    #[test]
    fn test_milne_new_year() {
        let timestamps =
            TimeSeries::new(vec!["2023-01-01T12:00:00Z".parse().unwrap()]).unwrap();
        let eot = equation_of_time_milne(&timestamps).unwrap();
        assert!((eot.values()[0] + 3.99).abs() < 0.5);
        assert_eq!(eot.algorithm(), Some(Algorithm::Milne1921));
    }

    #[test]
    fn test_families_agree_within_a_minute() {
        let timestamps = year_2023();
        let gamma = fractional_year_noaa(&timestamps).unwrap();
        let noaa = equation_of_time(Algorithm::Noaa, &timestamps, &gamma).unwrap();
        let milne = equation_of_time(Algorithm::Milne1921, &timestamps, &gamma).unwrap();
        for (a, b) in noaa.values().iter().zip(milne.values()) {
            assert!((a - b).abs() < 1.5, "{a} vs {b}");
        }
        assert!(equation_of_time(Algorithm::Jenco, &timestamps, &gamma).is_err());
    }
}
