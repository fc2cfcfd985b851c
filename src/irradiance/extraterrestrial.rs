//! Irradiance at the top of the atmosphere.

use crate::position::declination::OrbitParameters;

/// Extraterrestrial normal irradiance for one day angle, W/m².
///
/// `G0 = I0 · (1 + e · cos(j − perigee))`.
#[must_use]
pub fn extraterrestrial_normal(day_angle: f64, solar_constant: f64, orbit: OrbitParameters) -> f64 {
    solar_constant * (1.0 + orbit.eccentricity * (day_angle - orbit.perigee_offset).cos())
}

/// Extraterrestrial irradiance on a horizontal plane, zero below the horizon.
#[must_use]
pub fn extraterrestrial_horizontal(normal: f64, altitude: f64) -> f64 {
    if altitude > 0.0 {
        normal * altitude.sin()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SOLAR_CONSTANT;
    use core::f64::consts::{FRAC_PI_2, TAU};

    #[test]
    fn test_orbit_extremes() {
        let orbit = OrbitParameters::default();
        // perihelion in early January, aphelion in early July
        let january = extraterrestrial_normal(TAU * 3.0 / 365.0, SOLAR_CONSTANT, orbit);
        let july = extraterrestrial_normal(TAU * 185.0 / 365.0, SOLAR_CONSTANT, orbit);
        assert!(january > 1400.0 && january < 1410.0, "{january}");
        assert!(july > 1313.0 && july < 1320.0, "{july}");
    }

    #[test]
    fn test_horizontal_projection() {
        assert_eq!(extraterrestrial_horizontal(1361.0, FRAC_PI_2), 1361.0);
        assert!((extraterrestrial_horizontal(1361.0, 30f64.to_radians()) - 680.5).abs() < 1e-9);
        assert_eq!(extraterrestrial_horizontal(1361.0, -0.1), 0.0);
    }
}
