//! Sky diffuse irradiance: clear-sky horizontal (Hofierka 2002) and inclined (Muneer 1990).

#![allow(clippy::unreadable_literal)]

use crate::constants::{LOW_SUN_ALTITUDE, TERM_N_IN_SHADE};
use crate::math::{polynomial, wrap_radians_pi};
use core::f64::consts::PI;

/// Diffuse transmission at zenith for a Linke turbidity factor.
#[must_use]
pub fn diffuse_transmission(linke_turbidity: f64) -> f64 {
    polynomial(&[-0.015843, 0.030543, 0.0003797], linke_turbidity)
}

/// Coefficients `A1..A3` of the diffuse solar altitude function.
#[must_use]
pub fn diffuse_altitude_coefficients(linke_turbidity: f64, transmission: f64) -> [f64; 3] {
    let tl = linke_turbidity;
    let mut a1 = polynomial(&[0.26463, -0.061581, 0.0031408], tl);
    if a1 * transmission < 0.0022 {
        a1 = 0.0022 / transmission;
    }
    let a2 = polynomial(&[2.04020, 0.018945, -0.011161], tl);
    let a3 = polynomial(&[-1.3025, 0.039231, 0.0085079], tl);
    [a1, a2, a3]
}

/// Clear-sky diffuse irradiance on a horizontal plane, W/m².
///
/// Zero below the horizon.
#[must_use]
pub fn clear_sky_diffuse_horizontal(
    extraterrestrial_normal: f64,
    linke_turbidity: f64,
    altitude: f64,
) -> f64 {
    if altitude <= 0.0 {
        return 0.0;
    }
    let transmission = diffuse_transmission(linke_turbidity);
    let [a1, a2, a3] = diffuse_altitude_coefficients(linke_turbidity, transmission);
    let sine = altitude.sin();
    let altitude_function = a1 + a2 * sine + a3 * sine * sine;
    (extraterrestrial_normal * transmission * altitude_function).max(0.0)
}

/// Muneer anisotropy term `n` from the beam fraction `kb = B_h / G0_h`.
#[must_use]
pub fn term_n(kb: f64) -> f64 {
    0.00263 - 0.712 * kb - 0.6883 * kb * kb
}

/// Muneer sky-view function `F(n)` of a surface tilted by `tilt`.
#[must_use]
pub fn sky_view_function(tilt: f64, n: f64) -> f64 {
    let half = (tilt / 2.0).sin();
    (1.0 + tilt.cos()) / 2.0 + (tilt.sin() - tilt * tilt.cos() - PI * half * half) * n
}

/// Regime the Muneer model applies at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffuseRegime {
    /// Horizontal surface: the horizontal diffuse is returned unchanged.
    Flat,
    /// Sun below the horizon.
    Night,
    /// Surface in shade or facing away from the sun.
    Shaded,
    /// Sun at or above [`LOW_SUN_ALTITUDE`].
    Sunlit,
    /// Sun just above the horizon, circumsolar term from the surface geometry.
    PotentiallySunlit,
}

/// Inputs of [`diffuse_inclined`] at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffuseSample {
    /// Diffuse horizontal irradiance, W/m².
    pub diffuse_horizontal: f64,
    /// Direct horizontal irradiance, W/m².
    pub direct_horizontal: f64,
    /// Extraterrestrial horizontal irradiance, W/m².
    pub extraterrestrial_horizontal: f64,
    /// Solar altitude, radians.
    pub altitude: f64,
    /// Solar azimuth, radians clockwise from North.
    pub azimuth: f64,
    /// Cosine of the incidence angle on the surface, negative behind it.
    pub incidence_cosine: f64,
    /// Sun hidden by the horizon or an explicit shadow.
    pub in_shade: bool,
}

impl DiffuseSample {
    /// Regime for a surface of `tilt`, tilts at or below `flat_threshold` being flat.
    #[must_use]
    pub fn regime(&self, tilt: f64, flat_threshold: f64) -> DiffuseRegime {
        if tilt <= flat_threshold {
            DiffuseRegime::Flat
        } else if self.altitude < 0.0 {
            DiffuseRegime::Night
        } else if self.in_shade || self.incidence_cosine < 0.0 {
            DiffuseRegime::Shaded
        } else if self.altitude >= LOW_SUN_ALTITUDE {
            DiffuseRegime::Sunlit
        } else {
            DiffuseRegime::PotentiallySunlit
        }
    }
}

/// Diffuse irradiance on a surface of `tilt` and `orientation` (radians
/// clockwise from North), before angular losses.
#[must_use]
pub fn diffuse_inclined(
    sample: &DiffuseSample,
    tilt: f64,
    orientation: f64,
    flat_threshold: f64,
) -> f64 {
    let dh = sample.diffuse_horizontal;
    let kb = if sample.extraterrestrial_horizontal > 0.0 {
        sample.direct_horizontal / sample.extraterrestrial_horizontal
    } else {
        0.0
    };
    match sample.regime(tilt, flat_threshold) {
        DiffuseRegime::Flat => dh,
        DiffuseRegime::Night => 0.0,
        DiffuseRegime::Shaded => dh * sky_view_function(tilt, TERM_N_IN_SHADE),
        DiffuseRegime::Sunlit => {
            let f = sky_view_function(tilt, term_n(kb));
            dh * (f * (1.0 - kb) + kb * sample.incidence_cosine / sample.altitude.sin())
        }
        DiffuseRegime::PotentiallySunlit => {
            let f = sky_view_function(tilt, term_n(kb));
            let relative_azimuth = wrap_radians_pi(sample.azimuth - orientation);
            let circumsolar =
                tilt.sin() * relative_azimuth.cos() / (0.1 - 0.008 * sample.altitude);
            dh * (f * (1.0 - kb) + kb * circumsolar)
        }
    }
    .max(0.0)
}
