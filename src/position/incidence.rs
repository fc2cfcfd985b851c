//! Solar incidence on an oriented and tilted surface.
//!
//! Two conventions are in use: the angle between the sun vector and the
//! surface normal, and its complement, the angle between the sun vector and
//! the surface plane. Calculators work on the complementary angle and
//! convert at the end.

use super::{check_inputs, finish};
use crate::math::clip;
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity};
use crate::types::{Location, SurfaceGeometry};
use crate::units::{AzimuthOrigin, convert_azimuth_origin};
use crate::Result;
use core::f64::consts::FRAC_PI_2;

/// Which angle an incidence value measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IncidenceDefinition {
    /// Angle between the sun vector and the surface normal.
    #[default]
    Normal,
    /// Angle between the sun vector and the surface plane (`π/2 − normal`).
    Complementary,
}

/// Output convention of the incidence calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IncidenceSettings {
    /// Angle to report.
    pub definition: IncidenceDefinition,
    /// Replace angles of a sun behind the surface or below the horizon by
    /// the angle of no direct irradiance.
    pub zero_negative: bool,
}

impl Default for IncidenceSettings {
    fn default() -> Self {
        Self {
            definition: IncidenceDefinition::Normal,
            zero_negative: true,
        }
    }
}

impl IncidenceSettings {
    /// Applies masking and the output definition to a complementary angle.
    fn finish_angle(self, complementary: f64, below_horizon: bool) -> f64 {
        let complementary = if self.zero_negative && (complementary < 0.0 || below_horizon) {
            0.0
        } else {
            complementary
        };
        match self.definition {
            IncidenceDefinition::Complementary => complementary,
            IncidenceDefinition::Normal => FRAC_PI_2 - complementary,
        }
    }
}

/// Iqbal (1983) incidence from zenith and azimuth.
///
/// `cos θ = cosβ cos z + sinβ sin z cos(azimuth − orientation)`. Azimuths
/// in any origin are shifted to the surface's North origin first.
///
/// # Errors
/// Returns `DataAlignment` for misaligned inputs and `InvalidParameter` for
/// an azimuth without origin. Out-of-range values are only flagged.
pub fn incidence_iqbal(
    surface: &SurfaceGeometry,
    zenith: &AngularQuantity,
    azimuth: &AngularQuantity,
    settings: IncidenceSettings,
) -> Result<AngularQuantity> {
    check_inputs(zenith.len(), &[azimuth])?;
    let azimuth = azimuth.to_origin(surface.origin())?;
    let (sin_tilt, cos_tilt) = surface.tilt().sin_cos();
    let values = zenith
        .radians()
        .iter()
        .zip(azimuth.radians().iter())
        .map(|(&zenith, &azimuth)| {
            let cosine = cos_tilt * zenith.cos()
                + sin_tilt * zenith.sin() * (azimuth - surface.orientation()).cos();
            let normal = clip(cosine, -1.0, 1.0).acos();
            settings.finish_angle(FRAC_PI_2 - normal, zenith > FRAC_PI_2)
        })
        .collect();
    finish(Quantity::Incidence, Algorithm::Iqbal, values)
}

/// Orientation measured clockwise from South (west positive).
fn orientation_from_south(surface: &SurfaceGeometry) -> f64 {
    convert_azimuth_origin(surface.orientation(), surface.origin(), AzimuthOrigin::South)
}

/// Jenčo (1992) incidence through the relative inclined latitude and longitude.
///
/// The inclined surface is treated as horizontal at latitude
/// `φ' = asin(sinφ cosβ − cosφ sinβ cosγ)`, shifted in longitude by
/// `λ' = atan2(sinβ sinγ, cosφ cosβ + sinφ sinβ cosγ)`; then
/// `sin θc = cosφ' cosδ cos(h − λ') + sinφ' sinδ`.
///
/// # Errors
/// Returns `DataAlignment` for misaligned inputs. Out-of-range values are
/// only flagged.
pub fn incidence_jenco(
    location: &Location,
    surface: &SurfaceGeometry,
    declination: &AngularQuantity,
    hour_angle: &AngularQuantity,
    altitude: &AngularQuantity,
    settings: IncidenceSettings,
) -> Result<AngularQuantity> {
    check_inputs(declination.len(), &[hour_angle, altitude])?;
    let (sin_lat, cos_lat) = location.latitude().sin_cos();
    let (sin_tilt, cos_tilt) = surface.tilt().sin_cos();
    let (sin_gamma, cos_gamma) = orientation_from_south(surface).sin_cos();

    let relative_latitude =
        clip(sin_lat * cos_tilt - cos_lat * sin_tilt * cos_gamma, -1.0, 1.0).asin();
    let relative_longitude =
        (sin_tilt * sin_gamma).atan2(cos_lat * cos_tilt + sin_lat * sin_tilt * cos_gamma);
    let (sin_rel_lat, cos_rel_lat) = relative_latitude.sin_cos();

    let values = declination
        .radians()
        .iter()
        .zip(hour_angle.radians().iter())
        .zip(altitude.radians().iter())
        .map(|((&delta, &omega), &altitude)| {
            let sine = cos_rel_lat * delta.cos() * (omega - relative_longitude).cos()
                + sin_rel_lat * delta.sin();
            settings.finish_angle(clip(sine, -1.0, 1.0).asin(), altitude < 0.0)
        })
        .collect();
    finish(Quantity::Incidence, Algorithm::Jenco, values)
}

/// Legacy PVGIS incidence from declination, hour angle, tilt and orientation.
///
/// ```text
/// cos θ = sinφ (sinδ cosβ + cosδ cosγ cos h sinβ)
///       + cosφ (cosδ cos h cosβ − sinδ cosγ sinβ)
///       + cosδ sinγ sin h sinβ
/// ```
/// with γ measured from South.
///
/// # Errors
/// Returns `DataAlignment` for misaligned inputs. Out-of-range values are
/// only flagged.
pub fn incidence_pvis(
    location: &Location,
    surface: &SurfaceGeometry,
    declination: &AngularQuantity,
    hour_angle: &AngularQuantity,
    settings: IncidenceSettings,
) -> Result<AngularQuantity> {
    check_inputs(declination.len(), &[hour_angle])?;
    let (sin_lat, cos_lat) = location.latitude().sin_cos();
    let (sin_tilt, cos_tilt) = surface.tilt().sin_cos();
    let (sin_gamma, cos_gamma) = orientation_from_south(surface).sin_cos();

    let values = declination
        .radians()
        .iter()
        .zip(hour_angle.radians().iter())
        .map(|(&delta, &omega)| {
            let (sin_delta, cos_delta) = delta.sin_cos();
            let (sin_omega, cos_omega) = omega.sin_cos();
            let cosine = sin_lat
                * (sin_delta * cos_tilt + cos_delta * cos_gamma * cos_omega * sin_tilt)
                + cos_lat * (cos_delta * cos_omega * cos_tilt - sin_delta * cos_gamma * sin_tilt)
                + cos_delta * sin_gamma * sin_omega * sin_tilt;
            let sine_altitude = cos_lat * cos_delta * cos_omega + sin_lat * sin_delta;
            let normal = clip(cosine, -1.0, 1.0).acos();
            settings.finish_angle(FRAC_PI_2 - normal, sine_altitude < 0.0)
        })
        .collect();
    finish(Quantity::Incidence, Algorithm::Pvis, values)
}
