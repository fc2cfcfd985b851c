//! Solar declination.

#![allow(clippy::unreadable_literal)]

use super::finish;
use crate::constants::{ECCENTRICITY_CORRECTION_FACTOR, PERIGEE_OFFSET};
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::time::TimeComponents;
use crate::types::TimeSeries;
use crate::{Error, Result};

/// Orbit eccentricity terms of the single-sine declination and the
/// extraterrestrial irradiance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrbitParameters {
    /// Phase offset of the perigee, radians.
    pub perigee_offset: f64,
    /// Amplitude of the eccentricity correction.
    pub eccentricity: f64,
}

impl Default for OrbitParameters {
    fn default() -> Self {
        Self {
            perigee_offset: PERIGEE_OFFSET,
            eccentricity: ECCENTRICITY_CORRECTION_FACTOR,
        }
    }
}

/// NOAA six-term Fourier series of the fractional year.
///
/// # Errors
/// Returns `RangeViolation` outside ±24°.
pub fn declination_noaa(fractional_year: &AngularQuantity) -> Result<AngularQuantity> {
    let values = fractional_year
        .radians()
        .iter()
        .map(|&gamma| {
            0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
                - 0.006758 * (2.0 * gamma).cos()
                + 0.000907 * (2.0 * gamma).sin()
                - 0.002697 * (3.0 * gamma).cos()
                + 0.00148 * (3.0 * gamma).sin()
        })
        .collect();
    finish(Quantity::Declination, Algorithm::Noaa, values)
}

fn single_sine(angle: f64, orbit: OrbitParameters) -> f64 {
    (0.3978
        * (angle - 1.4 + orbit.eccentricity * (angle - orbit.perigee_offset).sin()).sin())
    .asin()
}

/// Single-sine declination of Hofierka (2002) over the day angle.
///
/// `δ = asin(0.3978 · sin(j − 1.4 + e · sin(j − perigee)))`. The same
/// expression serves the Jenčo family, which only changes the tag.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for a family other than Hofierka or Jenco.
/// Out-of-range values are only flagged.
pub fn declination_hofierka(
    algorithm: Algorithm,
    day_angle: &AngularQuantity,
    orbit: OrbitParameters,
) -> Result<AngularQuantity> {
    if !matches!(algorithm, Algorithm::Hofierka | Algorithm::Jenco) {
        return Err(Error::unsupported_algorithm(Quantity::Declination, algorithm));
    }
    let values = day_angle
        .radians()
        .iter()
        .map(|&angle| single_sine(angle, orbit))
        .collect();
    finish(Quantity::Declination, algorithm, values)
}

/// Legacy PVGIS declination: the negated single-sine form over the
/// unclamped fractional year.
///
/// The sign is kept as the legacy code computes it, so northern summer
/// yields negative values.
///
/// # Errors
/// Returns `RangeViolation` outside ±24°.
pub fn declination_pvis(
    fractional_year: &AngularQuantity,
    orbit: OrbitParameters,
) -> Result<AngularQuantity> {
    let values = fractional_year
        .radians()
        .iter()
        .map(|&gamma| -single_sine(gamma, orbit))
        .collect();
    finish(Quantity::Declination, Algorithm::Pvis, values)
}

/// Hargreaves declination
/// `23.45° · sin(2π/daysInYear · (284 + doy + 0.4 · sin(2π/daysInYear · (doy − 100))))`.
///
/// # Errors
/// Returns `RangeViolation` outside ±24°.
pub fn declination_hargreaves(timestamps: &TimeSeries) -> Result<AngularQuantity> {
    let amplitude = 23.45_f64.to_radians();
    let values = timestamps
        .iter()
        .map(|timestamp| {
            let t = TimeComponents::from_datetime(timestamp);
            let degrees_per_day = 360.0 / f64::from(t.days_in_year);
            let doy = f64::from(t.day_of_year);
            let inner = (degrees_per_day * (doy - 100.0)).to_radians().sin();
            amplitude * (degrees_per_day * (284.0 + doy + 0.4 * inner)).to_radians().sin()
        })
        .collect();
    finish(Quantity::Declination, Algorithm::Hargreaves, values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::fractional_year::{
        day_angle_hofierka, fractional_year_noaa, fractional_year_pvis,
    };
    use chrono::{DateTime, Duration, FixedOffset};

    const SOLSTICE_DECLINATION: f64 = 0.4090;

    fn solstice() -> TimeSeries {
        TimeSeries::new(vec!["2023-06-21T12:00:00Z".parse().unwrap()]).unwrap()
    }

    #[test]
    fn test_noaa_solstice() {
        let gamma = fractional_year_noaa(&solstice()).unwrap();
        let delta = declination_noaa(&gamma).unwrap();
        assert!((delta.values()[0] - SOLSTICE_DECLINATION).abs() < 0.002);
    }

    #[test]
    fn test_hofierka_and_jenco_share_formula() {
        let day_angle = day_angle_hofierka(&solstice()).unwrap();
        let orbit = OrbitParameters::default();
        let hofierka = declination_hofierka(Algorithm::Hofierka, &day_angle, orbit).unwrap();
        let jenco = declination_hofierka(Algorithm::Jenco, &day_angle, orbit).unwrap();
        assert!((hofierka.values()[0] - SOLSTICE_DECLINATION).abs() < 0.002);
        assert_eq!(hofierka.values(), jenco.values());
        assert_eq!(jenco.algorithm(), Some(Algorithm::Jenco));
        assert!(declination_hofierka(Algorithm::Noaa, &day_angle, orbit).is_err());
    }

    #[test]
    fn test_pvis_sign() {
        let gamma = fractional_year_pvis(&solstice()).unwrap();
        let delta = declination_pvis(&gamma, OrbitParameters::default()).unwrap();
        assert!((delta.values()[0] + SOLSTICE_DECLINATION).abs() < 0.005);
    }

    #[test]
    fn test_hargreaves_annual_cycle() {
        let start = "2023-01-01T00:00:00Z".parse::<DateTime<FixedOffset>>().unwrap();
        let timestamps =
            TimeSeries::range(start, start + Duration::days(365), Duration::days(1)).unwrap();
        let delta = declination_hargreaves(&timestamps).unwrap();
        let max = delta.values().iter().copied().fold(f64::MIN, f64::max);
        let min = delta.values().iter().copied().fold(f64::MAX, f64::min);
        assert!((max - 23.45_f64.to_radians()).abs() < 0.001);
        assert!((min + 23.45_f64.to_radians()).abs() < 0.001);
    }
}
