//! Solar zenith and altitude.

use super::{check_inputs, finish};
use crate::math::clip;
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::refraction::refracted_zenith_series;
use crate::types::Location;
use crate::{Error, Result};
use core::f64::consts::FRAC_PI_2;

/// Cosine of the zenith, `sinφ sinδ + cosφ cosδ cos h`, per timestamp.
fn cosine_zenith(
    location: &Location,
    declination: &AngularQuantity,
    hour_angle: &AngularQuantity,
) -> Vec<f64> {
    let (sin_lat, cos_lat) = location.latitude().sin_cos();
    declination
        .radians()
        .iter()
        .zip(hour_angle.radians().iter())
        .map(|(&delta, &omega)| sin_lat * delta.sin() + cos_lat * delta.cos() * omega.cos())
        .collect()
}

/// NOAA solar zenith `acos(sinφ sinδ + cosφ cosδ cos h)`.
///
/// With `apply_refraction` the zenith is lowered by the atmospheric
/// refraction at the geometric altitude.
///
/// # Errors
/// Returns `DataAlignment` if declination and hour angle differ in length
/// and `RangeViolation` outside [0, π + 0.0146].
pub fn zenith_noaa(
    location: &Location,
    declination: &AngularQuantity,
    hour_angle: &AngularQuantity,
    apply_refraction: bool,
) -> Result<AngularQuantity> {
    check_inputs(declination.len(), &[hour_angle])?;
    let geometric: Vec<f64> = cosine_zenith(location, declination, hour_angle)
        .into_iter()
        .map(|cosine| clip(cosine, -1.0, 1.0).acos())
        .collect();
    let values = if apply_refraction {
        refracted_zenith_series(&geometric)
    } else {
        geometric
    };
    finish(Quantity::Zenith, Algorithm::Noaa, values)
}

/// NOAA altitude, the complement of the zenith.
///
/// # Errors
/// Returns `RangeViolation` outside [−π/2 − 0.0146, π/2].
pub fn altitude_noaa(zenith: &AngularQuantity) -> Result<AngularQuantity> {
    let values = zenith
        .radians()
        .iter()
        .map(|&zenith| FRAC_PI_2 - zenith)
        .collect();
    finish(Quantity::Altitude, Algorithm::Noaa, values)
}

/// Altitude computed directly as `asin(cosφ cosδ cos h + sinφ sinδ)`, as
/// r.sun and the legacy PVGIS code do.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for a family other than Hofierka, Jenco or
/// PVIS and `DataAlignment` for misaligned inputs. Out-of-range values are
/// only flagged.
pub fn altitude_hofierka(
    algorithm: Algorithm,
    location: &Location,
    declination: &AngularQuantity,
    hour_angle: &AngularQuantity,
) -> Result<AngularQuantity> {
    if !matches!(
        algorithm,
        Algorithm::Hofierka | Algorithm::Jenco | Algorithm::Pvis
    ) {
        return Err(Error::unsupported_algorithm(Quantity::Altitude, algorithm));
    }
    check_inputs(declination.len(), &[hour_angle])?;
    let values = cosine_zenith(location, declination, hour_angle)
        .into_iter()
        .map(f64::asin)
        .collect();
    finish(Quantity::Altitude, algorithm, values)
}
