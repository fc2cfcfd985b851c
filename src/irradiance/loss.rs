//! Reflection losses at the module cover (Martin and Ruiz 2005).

use crate::constants::AOI_CONSTANTS;
use crate::{Error, Result};
use core::f64::consts::PI;

/// Tilts below this many radians use the limit of the reflected-light factor.
const TILT_EPSILON: f64 = 1e-6;

/// Fraction of direct irradiance transmitted at an incidence with cosine
/// `incidence_cosine`, normalized to normal incidence.
///
/// # Errors
/// Returns `InvalidParameter` for a non-positive angular loss coefficient.
pub fn direct_transmission(incidence_cosine: f64, coefficient: f64) -> Result<f64> {
    check_coefficient(coefficient)?;
    if incidence_cosine <= 0.0 {
        return Ok(0.0);
    }
    Ok((1.0 - (-incidence_cosine / coefficient).exp()) / (1.0 - (-1.0 / coefficient).exp()))
}

/// Fraction of isotropic irradiance transmitted when it arrives with the
/// effective angular factor `x`.
///
/// # Errors
/// Returns `InvalidParameter` for a non-positive angular loss coefficient.
pub fn isotropic_transmission(x: f64, coefficient: f64) -> Result<f64> {
    check_coefficient(coefficient)?;
    let c1 = 4.0 / (3.0 * PI);
    let c2 = AOI_CONSTANTS[0];
    Ok(1.0 - (-(c1 * x + c2 * x * x) / coefficient).exp())
}

/// Angular factor of sky diffuse light on a surface tilted by `tilt`.
#[must_use]
pub fn diffuse_angular_factor(tilt: f64) -> f64 {
    let sine = tilt.sin();
    sine + (PI - tilt - sine) / (1.0 + tilt.cos())
}

/// Angular factor of ground-reflected light on a surface tilted by `tilt`.
#[must_use]
pub fn reflected_angular_factor(tilt: f64) -> f64 {
    if tilt < TILT_EPSILON {
        // (β − sin β)/(1 − cos β) vanishes with β
        return 0.0;
    }
    let sine = tilt.sin();
    sine + (tilt - sine) / (1.0 - tilt.cos())
}

fn check_coefficient(coefficient: f64) -> Result<()> {
    if !coefficient.is_finite() || coefficient <= 0.0 {
        return Err(Error::invalid_parameter("angular loss coefficient", coefficient));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::ANGULAR_LOSS_COEFFICIENT;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn test_direct_transmission() {
        let a = ANGULAR_LOSS_COEFFICIENT;
        assert!((direct_transmission(1.0, a).unwrap() - 1.0).abs() < 1e-12);
        let oblique = direct_transmission(60f64.to_radians().cos(), a).unwrap();
        assert!(oblique > 0.9 && oblique < 1.0, "{oblique}");
        assert!(direct_transmission(0.1, a).unwrap() < oblique);
        assert_eq!(direct_transmission(-0.3, a).unwrap(), 0.0);
        assert!(direct_transmission(0.5, 0.0).is_err());
    }

    #[test]
    fn test_angular_factors() {
        // a horizontal surface sees the sky at π/2 and no ground
        assert!((diffuse_angular_factor(0.0) - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(reflected_angular_factor(0.0), 0.0);
        // a vertical surface sees sky and ground alike
        let vertical = FRAC_PI_2;
        assert!(
            (diffuse_angular_factor(vertical) - reflected_angular_factor(vertical)).abs() < 1e-12
        );
        assert!(reflected_angular_factor(1e-3) < 0.01);
    }

    #[test]
    fn test_isotropic_transmission() {
        let a = ANGULAR_LOSS_COEFFICIENT;
        let sky = isotropic_transmission(diffuse_angular_factor(0.0), a).unwrap();
        assert!(sky > 0.9 && sky < 1.0, "{sky}");
        let ground = isotropic_transmission(reflected_angular_factor(0.2), a).unwrap();
        assert!(ground < sky);
        assert!(isotropic_transmission(1.0, -1.0).is_err());
    }
}
