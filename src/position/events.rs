//! Sunrise, solar noon and sunset.

use super::{check_inputs, finish};
use crate::math::clip;
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::time::{TimeComponents, add_minutes, local_midnight};
use crate::types::{Location, SunriseResult, TimeSeries};
use crate::Result;
use chrono::{DateTime, FixedOffset};
use core::f64::consts::{FRAC_PI_2, PI};

/// Sunrise and sunset of one day.
pub type SolarEvents = SunriseResult<DateTime<FixedOffset>>;

/// Position of the sun relative to the event zenith for one day.
enum DayKind {
    Regular(f64),
    AllDay,
    AllNight,
}

/// `cos(z_ref)/(cosφ cosδ) − tanφ tanδ`, classified into polar cases.
fn classify(latitude: f64, declination: f64, event_zenith: f64) -> DayKind {
    let denominator = latitude.cos() * declination.cos();
    if denominator.abs() < f64::EPSILON {
        // at a pole the sun circles at an altitude equal to the declination
        return if latitude.signum() * declination > FRAC_PI_2 - event_zenith {
            DayKind::AllDay
        } else {
            DayKind::AllNight
        };
    }
    let argument = event_zenith.cos() / denominator - latitude.tan() * declination.tan();
    if argument > 1.0 {
        DayKind::AllNight
    } else if argument < -1.0 {
        DayKind::AllDay
    } else {
        DayKind::Regular(argument.acos())
    }
}

/// Hour angle at which the sun's center reaches `event_zenith`.
///
/// `acos(clip(cos(z_ref)/(cosφ cosδ) − tanφ tanδ, −1, 1))`. Polar days give
/// π and polar nights 0.
///
/// # Errors
/// Returns `RangeViolation` for non-finite values.
pub fn event_hour_angle(
    location: &Location,
    declination: &AngularQuantity,
    event_zenith: f64,
) -> Result<AngularQuantity> {
    let values = declination
        .radians()
        .iter()
        .map(
            |&delta| match classify(location.latitude(), delta, event_zenith) {
                DayKind::Regular(hour_angle) => clip(hour_angle, 0.0, PI),
                DayKind::AllDay => PI,
                DayKind::AllNight => 0.0,
            },
        )
        .collect();
    finish(Quantity::EventHourAngle, Algorithm::Noaa, values)
}

/// Sunrise, solar noon and sunset on the local day of every timestamp.
///
/// Minutes from local midnight are `720 − eot + utc offset − 4 · longitude° ∓ 4 · ω°`,
/// where ω is the event hour angle.
///
/// # Errors
/// Returns `DataAlignment` for misaligned inputs.
pub fn solar_events(
    timestamps: &TimeSeries,
    location: &Location,
    equation_of_time: &AngularQuantity,
    declination: &AngularQuantity,
    event_zenith: f64,
) -> Result<Vec<SolarEvents>> {
    check_inputs(timestamps.len(), &[equation_of_time, declination])?;
    let longitude_minutes = 4.0 * location.longitude_degrees();
    let events = timestamps
        .iter()
        .zip(equation_of_time.minutes().iter())
        .zip(declination.radians().iter())
        .map(|((timestamp, &eot), &delta)| {
            let t = TimeComponents::from_datetime(timestamp);
            let midnight = local_midnight(timestamp);
            let noon = 720.0 - eot + t.offset_minutes - longitude_minutes;
            let transit = add_minutes(midnight, noon);
            match classify(location.latitude(), delta, event_zenith) {
                DayKind::Regular(hour_angle) => {
                    let half_day = 4.0 * hour_angle.to_degrees();
                    SunriseResult::RegularDay {
                        sunrise: add_minutes(midnight, noon - half_day),
                        transit,
                        sunset: add_minutes(midnight, noon + half_day),
                    }
                }
                DayKind::AllDay => SunriseResult::AllDay { transit },
                DayKind::AllNight => SunriseResult::AllNight { transit },
            }
        })
        .collect();
    Ok(events)
}
