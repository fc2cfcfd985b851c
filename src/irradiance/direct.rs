//! Clear-sky beam irradiance after Hofierka and Šúri (2002).

#![allow(clippy::unreadable_literal)]

use crate::math::polynomial;

/// Solar altitude corrected for refraction along the optical path, degrees.
///
/// Input and output are in degrees.
#[must_use]
pub fn refracted_altitude(altitude: f64) -> f64 {
    let a = altitude;
    a + 0.061359 * (0.1594 + 1.123 * a + 0.065656 * a * a)
        / (1.0 + 28.9344 * a + 277.3971 * a * a)
}

/// Kasten and Young relative optical air mass with elevation correction.
///
/// `elevation` in meters, `refracted_altitude` in degrees.
#[must_use]
pub fn optical_air_mass(elevation: f64, refracted_altitude: f64) -> f64 {
    let pressure_ratio = (-elevation / 8434.5).exp();
    let offset = refracted_altitude + 6.07995;
    let term = if offset > 0.0 {
        0.50572 * offset.powf(-1.6364)
    } else {
        0.0
    };
    pressure_ratio / (refracted_altitude.to_radians().sin() + term)
}

/// Rayleigh optical thickness at air mass `m` (Kasten 1996).
#[must_use]
pub fn rayleigh_optical_thickness(air_mass: f64) -> f64 {
    if air_mass <= 20.0 {
        1.0 / polynomial(&[6.6296, 1.7513, -0.1202, 0.0065, -0.00013], air_mass)
    } else {
        1.0 / (10.4 + 0.718 * air_mass)
    }
}

/// Clear-sky beam normal irradiance, W/m².
///
/// `B0c = G0 · exp(−0.8662 · TL · m · δR(m))`.
#[must_use]
pub fn clear_sky_direct_normal(extraterrestrial_normal: f64, linke_turbidity: f64, air_mass: f64) -> f64 {
    extraterrestrial_normal
        * (-0.8662 * linke_turbidity * air_mass * rayleigh_optical_thickness(air_mass)).exp()
}

/// Beam normal irradiance recovered from a horizontal measurement.
#[must_use]
pub fn direct_normal_from_horizontal(direct_horizontal: f64, altitude: f64) -> f64 {
    let sine = altitude.sin();
    if altitude > 0.0 && sine > f64::EPSILON {
        direct_horizontal / sine
    } else {
        0.0
    }
}

/// Beam irradiance on a surface whose normal makes an angle with cosine
/// `incidence_cosine` with the sun, before angular losses.
#[must_use]
pub fn direct_inclined(direct_normal: f64, incidence_cosine: f64) -> f64 {
    direct_normal * incidence_cosine.max(0.0)
}
