//! Time offset, true solar time and hour angle.

use super::{check_inputs, finish};
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::time::{MINUTES_PER_DAY, TimeComponents};
use crate::types::{Location, TimeSeries};
use crate::{Error, Result};
use chrono::Duration;
use core::f64::consts::{PI, TAU};

/// Time offset in minutes: `eot + 4 · longitude° − UTC offset`.
///
/// The family tag follows the equation of time it was derived from.
///
/// # Errors
/// Returns `DataAlignment` for a misaligned equation of time and
/// `RangeViolation` outside ±720 minutes.
pub fn time_offset(
    timestamps: &TimeSeries,
    location: &Location,
    equation_of_time: &AngularQuantity,
) -> Result<AngularQuantity> {
    check_inputs(timestamps.len(), &[equation_of_time])?;
    let longitude_minutes = 4.0 * location.longitude_degrees();
    let values = timestamps
        .iter()
        .zip(equation_of_time.minutes().iter())
        .map(|(timestamp, &eot)| {
            let t = TimeComponents::from_datetime(timestamp);
            eot + longitude_minutes - t.offset_minutes
        })
        .collect();
    finish(
        Quantity::TimeOffset,
        family_of(equation_of_time),
        values,
    )
}

/// True solar time in minutes since solar midnight: `(clock minutes + offset) mod 1440`.
///
/// # Errors
/// Returns `DataAlignment` for a misaligned offset and `RangeViolation` for
/// non-finite values.
pub fn true_solar_time(
    timestamps: &TimeSeries,
    time_offset: &AngularQuantity,
) -> Result<AngularQuantity> {
    check_inputs(timestamps.len(), &[time_offset])?;
    let values = timestamps
        .iter()
        .zip(time_offset.minutes().iter())
        .map(|(timestamp, &offset)| {
            let t = TimeComponents::from_datetime(timestamp);
            (t.clock_minutes + offset).rem_euclid(MINUTES_PER_DAY)
        })
        .collect();
    finish(Quantity::TrueSolarTime, family_of(time_offset), values)
}

/// NOAA hour angle `(tst − 720) · π/720`, shifted by 2π below −π.
///
/// # Errors
/// Returns `RangeViolation` outside [−π, π].
pub fn hour_angle_noaa(true_solar_time: &AngularQuantity) -> Result<AngularQuantity> {
    let values = true_solar_time
        .minutes()
        .iter()
        .map(|&tst| {
            let hour_angle = (tst - 720.0) * PI / 720.0;
            if hour_angle < -PI {
                hour_angle + TAU
            } else {
                hour_angle
            }
        })
        .collect();
    finish(Quantity::HourAngle, Algorithm::Noaa, values)
}

/// Hour angle of the r.sun and legacy PVGIS code, `(tst/60 − 12) · 15°`.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for a family other than Hofierka or PVIS,
/// `RangeViolation` outside [−π, π].
pub fn hour_angle_hofierka(
    algorithm: Algorithm,
    true_solar_time: &AngularQuantity,
) -> Result<AngularQuantity> {
    if !matches!(algorithm, Algorithm::Hofierka | Algorithm::Pvis) {
        return Err(Error::unsupported_algorithm(Quantity::HourAngle, algorithm));
    }
    let values = true_solar_time
        .minutes()
        .iter()
        .map(|&tst| (tst / 60.0 - 12.0) * 15f64.to_radians())
        .collect();
    finish(Quantity::HourAngle, algorithm, values)
}

/// Time elapsed since the most recent solar noon, per timestamp.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn local_solar_time(true_solar_time: &AngularQuantity) -> Vec<Duration> {
    true_solar_time
        .minutes()
        .iter()
        .map(|&tst| {
            let since_noon = (tst - 720.0).rem_euclid(MINUTES_PER_DAY);
            Duration::milliseconds((since_noon * 60_000.0).round() as i64)
        })
        .collect()
}

fn family_of(quantity: &AngularQuantity) -> Algorithm {
    quantity.algorithm().unwrap_or(Algorithm::Noaa)
}
