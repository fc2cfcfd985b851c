//! Units of angular and temporal values and azimuth origin conventions.

use crate::math::{minutes_to_radians, normalize_radians_0_to_tau, radians_to_minutes};
use crate::{Error, Result};
use core::f64::consts::{FRAC_PI_2, PI};
use core::fmt;
use core::str::FromStr;

/// Unit of an angular or temporal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unit {
    /// Radians, the canonical angle unit.
    Radians,
    /// Degrees.
    Degrees,
    /// Minutes of time (1440 per day).
    Minutes,
}

impl Unit {
    /// Name used in diagnostics and for parsing.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Radians => "radians",
            Self::Degrees => "degrees",
            Self::Minutes => "minutes",
        }
    }

    /// Converts `value` expressed in `self` to radians.
    ///
    /// Minutes are interpreted as time, one day being a full turn.
    #[must_use]
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            Self::Radians => value,
            Self::Degrees => value.to_radians(),
            Self::Minutes => minutes_to_radians(value),
        }
    }

    /// Converts `value` in radians to `self`.
    #[must_use]
    pub fn from_radians(self, value: f64) -> f64 {
        match self {
            Self::Radians => value,
            Self::Degrees => value.to_degrees(),
            Self::Minutes => radians_to_minutes(value),
        }
    }

    /// Converts `value` from `self` to `target`.
    #[must_use]
    pub fn convert(self, value: f64, target: Self) -> f64 {
        if self == target {
            return value;
        }
        target.from_radians(self.to_radians(value))
    }
}

impl FromStr for Unit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "radians" | "rad" => Ok(Self::Radians),
            "degrees" | "deg" | "°" => Ok(Self::Degrees),
            "minutes" | "min" => Ok(Self::Minutes),
            _ => Err(Error::invalid_unit(s)),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction from which an azimuth is counted, always increasing clockwise.
///
/// Families disagree on where zero lies, so every azimuth and incidence value
/// carries its origin and is converted through [`convert_azimuth_origin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AzimuthOrigin {
    /// 0 = North, π/2 = East (compass bearing).
    North,
    /// 0 = East, π/2 = South.
    East,
    /// 0 = South, π/2 = West.
    South,
}

impl AzimuthOrigin {
    /// Compass bearing of this origin, in radians.
    #[must_use]
    pub const fn bearing(self) -> f64 {
        match self {
            Self::North => 0.0,
            Self::East => FRAC_PI_2,
            Self::South => PI,
        }
    }
}

impl fmt::Display for AzimuthOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
        })
    }
}

/// Re-expresses an azimuth in radians counted from `from` as counted from `to`.
///
/// The result lies in [0, 2π).
#[must_use]
pub fn convert_azimuth_origin(azimuth: f64, from: AzimuthOrigin, to: AzimuthOrigin) -> f64 {
    if from == to {
        return azimuth;
    }
    normalize_radians_0_to_tau(azimuth + from.bearing() - to.bearing())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_parse_units() {
        assert_eq!("radians".parse::<Unit>().unwrap(), Unit::Radians);
        assert_eq!("Degrees".parse::<Unit>().unwrap(), Unit::Degrees);
        assert_eq!(" minutes ".parse::<Unit>().unwrap(), Unit::Minutes);
        assert_eq!(
            "gradians".parse::<Unit>(),
            Err(Error::invalid_unit("gradians"))
        );
    }

    #[test]
    fn test_convert_units() {
        assert!((Unit::Degrees.convert(180.0, Unit::Radians) - PI).abs() < EPSILON);
        assert!((Unit::Radians.convert(PI, Unit::Minutes) - 720.0).abs() < 1e-9);
        assert!((Unit::Minutes.convert(4.0, Unit::Degrees) - 1.0).abs() < 1e-9);
        assert_eq!(Unit::Degrees.convert(12.5, Unit::Degrees), 12.5);
    }

    #[test]
    fn test_degree_round_trip() {
        for degrees in [-180.0, -45.5, 0.0, 23.44, 90.0, 359.9] {
            let radians = Unit::Degrees.convert(degrees, Unit::Radians);
            let back = Unit::Radians.convert(radians, Unit::Degrees);
            assert!((back - degrees).abs() < 1e-10);
        }
    }

    #[test]
    fn test_convert_azimuth_origin() {
        // due south
        let south = PI;
        assert!(
            convert_azimuth_origin(south, AzimuthOrigin::North, AzimuthOrigin::South).abs()
                < EPSILON
        );
        assert!(
            (convert_azimuth_origin(south, AzimuthOrigin::North, AzimuthOrigin::East)
                - FRAC_PI_2)
                .abs()
                < EPSILON
        );
        // due east counted from south is three quarters of a turn
        let east_from_south =
            convert_azimuth_origin(FRAC_PI_2, AzimuthOrigin::North, AzimuthOrigin::South);
        assert!((east_from_south - 1.5 * PI).abs() < EPSILON);
        let back =
            convert_azimuth_origin(east_from_south, AzimuthOrigin::South, AzimuthOrigin::North);
        assert!((back - FRAC_PI_2).abs() < EPSILON);
    }
}
