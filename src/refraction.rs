//! Atmospheric refraction correction of the solar zenith.
//!
//! Piecewise approximation of the NOAA solar calculator. The correction is
//! expressed in arcseconds over the geometric altitude and converted to
//! degrees; it vanishes above 85°.

#![allow(clippy::unreadable_literal)]

use core::f64::consts::FRAC_PI_2;

/// Altitude above which no correction is applied, degrees.
const NO_CORRECTION_ABOVE: f64 = 85.0;
/// Upper bound of the low-altitude polynomial, degrees.
const POLYNOMIAL_ABOVE: f64 = 5.0;
/// Lower bound of the low-altitude polynomial, degrees.
const BELOW_HORIZON: f64 = -0.575;

/// Refraction correction in degrees for a geometric altitude in degrees.
///
/// # Example
/// ```
/// use pvgis_core::refraction::refraction_correction;
///
/// assert_eq!(refraction_correction(86.0), 0.0);
/// // about half a degree on the horizon
/// assert!((refraction_correction(0.0) - 0.482).abs() < 0.001);
/// ```
#[must_use]
pub fn refraction_correction(altitude: f64) -> f64 {
    let arcseconds = if altitude > NO_CORRECTION_ABOVE {
        0.0
    } else if altitude > POLYNOMIAL_ABOVE {
        let t = altitude.to_radians().tan();
        58.1 / t - 0.07 / t.powi(3) + 0.000086 / t.powi(5)
    } else if altitude > BELOW_HORIZON {
        let a = altitude;
        1735.0 + a * (-518.2 + a * (103.4 + a * (-12.79 + a * 0.711)))
    } else {
        -20.774 / altitude.to_radians().tan()
    };
    arcseconds / 3600.0
}

/// Zenith in radians corrected for refraction: `zenith − correction`.
#[must_use]
pub fn refracted_zenith(zenith: f64) -> f64 {
    let altitude = (FRAC_PI_2 - zenith).to_degrees();
    zenith - refraction_correction(altitude).to_radians()
}

/// Slice form of [`refracted_zenith`].
#[must_use]
pub fn refracted_zenith_series(zenith: &[f64]) -> Vec<f64> {
    zenith.iter().map(|&z| refracted_zenith(z)).collect()
}
