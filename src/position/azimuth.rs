//! Solar azimuth.
//!
//! Families count from different origins; every result carries its
//! [`AzimuthOrigin`] and all origins increase clockwise.

use super::{check_inputs, finish};
use crate::math::{clip, normalize_radians_0_to_tau};
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::types::Location;
use crate::units::{AzimuthOrigin, convert_azimuth_origin};
use crate::{Error, Result};
use core::f64::consts::{PI, TAU};

/// NOAA azimuth, clockwise from North.
///
/// `cos θ = (sinφ cos z − sinδ) / (cosφ sin z)`, then `θ + π` after solar
/// noon and `3π − θ` before, modulo 2π.
///
/// # Errors
/// Returns `DataAlignment` for misaligned inputs and `RangeViolation` for
/// non-finite values.
pub fn azimuth_noaa(
    location: &Location,
    declination: &AngularQuantity,
    hour_angle: &AngularQuantity,
    zenith: &AngularQuantity,
) -> Result<AngularQuantity> {
    check_inputs(declination.len(), &[hour_angle, zenith])?;
    let (sin_lat, cos_lat) = location.latitude().sin_cos();
    let values = declination
        .radians()
        .iter()
        .zip(hour_angle.radians().iter())
        .zip(zenith.radians().iter())
        .map(|((&delta, &omega), &zenith)| {
            let cosine = (sin_lat * zenith.cos() - delta.sin()) / (cos_lat * zenith.sin());
            let theta = clip(cosine, -1.0, 1.0).acos();
            if omega > 0.0 {
                normalize_radians_0_to_tau(theta + PI)
            } else {
                normalize_radians_0_to_tau(3.0 * PI - theta)
            }
        })
        .collect();
    Ok(finish(Quantity::Azimuth, Algorithm::Noaa, values)?.with_origin(AzimuthOrigin::North))
}

/// Jenčo azimuth derived from the altitude, East origin.
///
/// `cos A = (sinφ sin a − sinδ) / (cosφ cos a)` gives the angle from South;
/// afternoon values (positive hour angle) lie west of South.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for a family other than Jenco or Hofierka
/// and `DataAlignment` for misaligned inputs. Out-of-range values are only
/// flagged.
pub fn azimuth_jenco(
    algorithm: Algorithm,
    location: &Location,
    declination: &AngularQuantity,
    hour_angle: &AngularQuantity,
    altitude: &AngularQuantity,
) -> Result<AngularQuantity> {
    if !matches!(algorithm, Algorithm::Jenco | Algorithm::Hofierka) {
        return Err(Error::unsupported_algorithm(Quantity::Azimuth, algorithm));
    }
    check_inputs(declination.len(), &[hour_angle, altitude])?;
    let (sin_lat, cos_lat) = location.latitude().sin_cos();
    let values = declination
        .radians()
        .iter()
        .zip(hour_angle.radians().iter())
        .zip(altitude.radians().iter())
        .map(|((&delta, &omega), &altitude)| {
            let cosine = (sin_lat * altitude.sin() - delta.sin()) / (cos_lat * altitude.cos());
            let from_south = clip(cosine, -1.0, 1.0).acos();
            let from_south = if omega > 0.0 {
                from_south
            } else {
                normalize_radians_0_to_tau(TAU - from_south)
            };
            convert_azimuth_origin(from_south, AzimuthOrigin::South, AzimuthOrigin::East)
        })
        .collect();
    Ok(finish(Quantity::Azimuth, algorithm, values)?.with_origin(AzimuthOrigin::East))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Unit;
    use crate::position::zenith::{altitude_hofierka, zenith_noaa};
    use core::f64::consts::FRAC_PI_2;

    fn quantity(kind: Quantity, values: Vec<f64>) -> AngularQuantity {
        AngularQuantity::new(kind, values, Unit::Radians).unwrap()
    }

    #[test]
    fn test_noaa_noon_is_south() {
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        let delta = quantity(Quantity::Declination, vec![0.1]);
        let omega = quantity(Quantity::HourAngle, vec![0.0]);
        let zenith = zenith_noaa(&location, &delta, &omega, false).unwrap();
        let azimuth = azimuth_noaa(&location, &delta, &omega, &zenith).unwrap();
        assert!((azimuth.values()[0] - PI).abs() < 1e-6);
        assert_eq!(azimuth.origin(), Some(AzimuthOrigin::North));
    }

    #[test]
    fn test_noaa_morning_east_afternoon_west() {
        let location = Location::from_degrees(0.0, 45.0, 0.0).unwrap();
        let delta = quantity(Quantity::Declination, vec![0.0, 0.0]);
        let omega = quantity(Quantity::HourAngle, vec![-FRAC_PI_2 * 0.8, FRAC_PI_2 * 0.8]);
        let zenith = zenith_noaa(&location, &delta, &omega, false).unwrap();
        let azimuth = azimuth_noaa(&location, &delta, &omega, &zenith).unwrap();
        assert!((0.0..PI).contains(&azimuth.values()[0]));
        assert!((PI..TAU).contains(&azimuth.values()[1]));
        // symmetric around the meridian
        assert!((azimuth.values()[0] + azimuth.values()[1] - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_jenco_matches_noaa_after_origin_shift() {
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        let omegas = vec![-2.0, -1.0, -0.3, 0.4, 1.2, 2.5];
        let delta = quantity(Quantity::Declination, vec![0.3; omegas.len()]);
        let omega = quantity(Quantity::HourAngle, omegas);
        let zenith = zenith_noaa(&location, &delta, &omega, false).unwrap();
        let noaa = azimuth_noaa(&location, &delta, &omega, &zenith).unwrap();
        let altitude = altitude_hofierka(Algorithm::Jenco, &location, &delta, &omega).unwrap();
        let jenco = azimuth_jenco(Algorithm::Jenco, &location, &delta, &omega, &altitude)
            .unwrap()
            .to_origin(AzimuthOrigin::North)
            .unwrap();
        for (a, b) in noaa.values().iter().zip(jenco.values()) {
            assert!((a - b).abs() < 1e-6, "{a} vs {b}");
        }
    }

    #[test]
    fn test_jenco_origin_is_east() {
        let location = Location::from_degrees(0.0, 45.0, 0.0).unwrap();
        let delta = quantity(Quantity::Declination, vec![0.0]);
        let omega = quantity(Quantity::HourAngle, vec![0.0]);
        let altitude = altitude_hofierka(Algorithm::Hofierka, &location, &delta, &omega).unwrap();
        let azimuth =
            azimuth_jenco(Algorithm::Hofierka, &location, &delta, &omega, &altitude).unwrap();
        // due south is a quarter turn clockwise from east
        assert!((azimuth.values()[0] - FRAC_PI_2).abs() < 1e-6);
        assert_eq!(azimuth.origin(), Some(AzimuthOrigin::East));
    }

    #[test]
    fn test_azimuths_over_a_day_stay_below_a_full_turn() {
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        let omegas: Vec<f64> = (0..=96).map(|i| -PI + f64::from(i) * PI / 48.0).collect();
        let delta = quantity(Quantity::Declination, vec![0.2; omegas.len()]);
        let omega = quantity(Quantity::HourAngle, omegas);
        let zenith = zenith_noaa(&location, &delta, &omega, false).unwrap();
        let altitude = altitude_hofierka(Algorithm::Jenco, &location, &delta, &omega).unwrap();
        let noaa = azimuth_noaa(&location, &delta, &omega, &zenith).unwrap();
        let jenco = azimuth_jenco(Algorithm::Jenco, &location, &delta, &omega, &altitude).unwrap();
        for value in noaa.values().iter().chain(jenco.values()) {
            assert!((0.0..TAU).contains(value), "{value}");
        }
    }
}
