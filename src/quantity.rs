//! Tagged angular and temporal values with declared units and valid ranges.

use crate::models::Algorithm;
use crate::units::{AzimuthOrigin, Unit, convert_azimuth_origin};
use crate::{Error, Result};
use core::f64::consts::{FRAC_PI_2, PI, TAU};
use core::fmt;
use std::borrow::Cow;

/// Kind of a computed quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Quantity {
    /// Earth's orbital position over the year.
    FractionalYear,
    /// Day of year expressed as an angle.
    DayAngle,
    /// Difference between apparent and mean solar time.
    EquationOfTime,
    /// Offset between clock time and true solar time.
    TimeOffset,
    /// Minutes since true solar midnight.
    TrueSolarTime,
    /// Angular displacement from local solar noon, negative before noon.
    HourAngle,
    /// Angle between the sun's rays and the equatorial plane.
    Declination,
    /// Angle between the sun and the local vertical.
    Zenith,
    /// Angle between the sun and the horizon.
    Altitude,
    /// Horizontal direction of the sun.
    Azimuth,
    /// Angle between the sun's rays and a surface.
    Incidence,
    /// Hour angle of sunrise and sunset.
    EventHourAngle,
}

impl Quantity {
    /// Every kind, in pipeline dependency order.
    pub const ALL: [Self; 12] = [
        Self::FractionalYear,
        Self::DayAngle,
        Self::EquationOfTime,
        Self::TimeOffset,
        Self::TrueSolarTime,
        Self::HourAngle,
        Self::Declination,
        Self::Zenith,
        Self::Altitude,
        Self::Azimuth,
        Self::Incidence,
        Self::EventHourAngle,
    ];

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FractionalYear => "fractional year",
            Self::DayAngle => "day angle",
            Self::EquationOfTime => "equation of time",
            Self::TimeOffset => "time offset",
            Self::TrueSolarTime => "true solar time",
            Self::HourAngle => "solar hour angle",
            Self::Declination => "solar declination",
            Self::Zenith => "solar zenith",
            Self::Altitude => "solar altitude",
            Self::Azimuth => "solar azimuth",
            Self::Incidence => "solar incidence",
            Self::EventHourAngle => "event hour angle",
        }
    }

    /// Unit in which the range is declared and calculators report values.
    #[must_use]
    pub const fn canonical_unit(self) -> Unit {
        match self {
            Self::EquationOfTime | Self::TimeOffset | Self::TrueSolarTime => Unit::Minutes,
            _ => Unit::Radians,
        }
    }

    /// Inclusive valid range in the canonical unit.
    #[must_use]
    pub const fn range(self) -> (f64, f64) {
        match self {
            Self::FractionalYear | Self::DayAngle | Self::Azimuth => (0.0, TAU),
            Self::EquationOfTime => (-20.0, 20.0),
            Self::TimeOffset => (-720.0, 720.0),
            Self::TrueSolarTime => (0.0, 1440.0),
            Self::HourAngle => (-PI, PI),
            // ±24°
            Self::Declination => (-0.418_879_020_478_639, 0.418_879_020_478_639),
            Self::Zenith => (0.0, PI + crate::constants::ZENITH_REFRACTION_TOLERANCE),
            Self::Altitude => (
                -FRAC_PI_2 - crate::constants::ZENITH_REFRACTION_TOLERANCE,
                FRAC_PI_2,
            ),
            Self::Incidence | Self::EventHourAngle => (0.0, PI),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What to do with a computed value outside its quantity's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RangePolicy {
    /// Fail the computation with [`Error::RangeViolation`].
    Raise,
    /// Log a warning, keep the value and record its index.
    Warn,
}

/// Series of one quantity with its unit, provenance and range diagnostics.
///
/// Values are never clamped on construction. Conversions return new values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngularQuantity {
    kind: Quantity,
    values: Vec<f64>,
    unit: Unit,
    algorithm: Option<Algorithm>,
    origin: Option<AzimuthOrigin>,
    out_of_range: Vec<usize>,
}

impl AngularQuantity {
    /// Creates a validated quantity, failing on any out-of-range value.
    ///
    /// # Errors
    /// Returns `RangeViolation` for a non-finite or out-of-range value.
    ///
    /// # Example
    /// ```
    /// use pvgis_core::{AngularQuantity, Quantity, Unit};
    ///
    /// let zenith = AngularQuantity::new(Quantity::Zenith, vec![30.0, 60.0], Unit::Degrees).unwrap();
    /// assert!((zenith.radians()[0] - 30f64.to_radians()).abs() < 1e-12);
    /// assert!(AngularQuantity::new(Quantity::Zenith, vec![200.0], Unit::Degrees).is_err());
    /// ```
    pub fn new(kind: Quantity, values: Vec<f64>, unit: Unit) -> Result<Self> {
        Self::validated(kind, values, unit, None, RangePolicy::Raise)
    }

    /// Creates a quantity tagged with the algorithm that produced it, applying
    /// the calculator's range policy.
    ///
    /// # Errors
    /// Returns `RangeViolation` when `policy` is [`RangePolicy::Raise`] and a
    /// value is non-finite or outside the range.
    pub fn validated(
        kind: Quantity,
        values: Vec<f64>,
        unit: Unit,
        algorithm: Option<Algorithm>,
        policy: RangePolicy,
    ) -> Result<Self> {
        let out_of_range = check_range(kind, &values, unit, policy)?;
        Ok(Self {
            kind,
            values,
            unit,
            algorithm,
            origin: None,
            out_of_range,
        })
    }

    /// Attaches the azimuth origin of the values.
    #[must_use]
    pub fn with_origin(mut self, origin: AzimuthOrigin) -> Self {
        self.origin = Some(origin);
        self
    }

    /// Quantity kind.
    #[must_use]
    pub const fn kind(&self) -> Quantity {
        self.kind
    }

    /// Unit of [`Self::values`].
    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }

    /// Algorithm family that produced the values.
    #[must_use]
    pub const fn algorithm(&self) -> Option<Algorithm> {
        self.algorithm
    }

    /// Azimuth origin, for azimuth and surface orientation values.
    #[must_use]
    pub const fn origin(&self) -> Option<AzimuthOrigin> {
        self.origin
    }

    /// Indices flagged by a warning range policy.
    #[must_use]
    pub fn out_of_range(&self) -> &[usize] {
        &self.out_of_range
    }

    /// Raw values in [`Self::unit`].
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in `unit`, borrowed when no conversion is needed.
    #[must_use]
    pub fn in_unit(&self, unit: Unit) -> Cow<'_, [f64]> {
        if unit == self.unit {
            Cow::Borrowed(&self.values)
        } else {
            Cow::Owned(
                self.values
                    .iter()
                    .map(|&value| self.unit.convert(value, unit))
                    .collect(),
            )
        }
    }

    /// Values in radians.
    #[must_use]
    pub fn radians(&self) -> Cow<'_, [f64]> {
        self.in_unit(Unit::Radians)
    }

    /// Values in degrees.
    #[must_use]
    pub fn degrees(&self) -> Cow<'_, [f64]> {
        self.in_unit(Unit::Degrees)
    }

    /// Values in minutes of time.
    #[must_use]
    pub fn minutes(&self) -> Cow<'_, [f64]> {
        self.in_unit(Unit::Minutes)
    }

    /// Returns a copy expressed in `unit`, keeping kind, provenance and diagnostics.
    #[must_use]
    pub fn convert(&self, unit: Unit) -> Self {
        Self {
            values: self.in_unit(unit).into_owned(),
            unit,
            ..self.clone()
        }
    }

    /// Returns a copy with azimuths re-expressed from another origin.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if the values carry no origin.
    pub fn to_origin(&self, origin: AzimuthOrigin) -> Result<Self> {
        let Some(from) = self.origin else {
            return Err(Error::invalid_parameter("azimuth origin", f64::NAN));
        };
        let values = self
            .radians()
            .iter()
            .map(|&azimuth| {
                Unit::Radians.convert(convert_azimuth_origin(azimuth, from, origin), self.unit)
            })
            .collect();
        Ok(Self {
            values,
            origin: Some(origin),
            ..self.clone()
        })
    }
}

/// Checks every value of a series against the range of `kind`.
///
/// Returns the indices of flagged values under [`RangePolicy::Warn`].
///
/// # Errors
/// Returns `RangeViolation` for the first offending value under [`RangePolicy::Raise`].
pub fn check_range(
    kind: Quantity,
    values: &[f64],
    unit: Unit,
    policy: RangePolicy,
) -> Result<Vec<usize>> {
    let canonical = kind.canonical_unit();
    let (min, max) = kind.range();
    let mut flagged = Vec::new();
    for (index, &value) in values.iter().enumerate() {
        let value = unit.convert(value, canonical);
        if value.is_finite() && (min..=max).contains(&value) {
            continue;
        }
        match policy {
            RangePolicy::Raise => {
                return Err(Error::range_violation(kind, (min, max), value, index));
            }
            RangePolicy::Warn => flagged.push(index),
        }
    }
    if let Some(&first) = flagged.first() {
        tracing::warn!(
            quantity = kind.name(),
            count = flagged.len(),
            first_index = first,
            min,
            max,
            "values out of the expected range"
        );
    }
    Ok(flagged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_every_kind() {
        for kind in Quantity::ALL {
            let (min, max) = kind.range();
            let middle = (min + max) / 2.0;
            let quantity =
                AngularQuantity::new(kind, vec![min, middle, max], kind.canonical_unit()).unwrap();
            let back = quantity.convert(Unit::Degrees).convert(quantity.unit());
            for (a, b) in quantity.values().iter().zip(back.values()) {
                assert!((a - b).abs() < 1e-9, "{kind}: {a} != {b}");
            }
            assert_eq!(back.kind(), kind);
        }
    }

    #[test]
    fn test_raise_policy() {
        let result = AngularQuantity::new(Quantity::HourAngle, vec![0.0, 4.0], Unit::Radians);
        assert_eq!(
            result,
            Err(Error::range_violation(Quantity::HourAngle, (-PI, PI), 4.0, 1))
        );

        let nan = AngularQuantity::new(Quantity::Zenith, vec![f64::NAN], Unit::Radians);
        assert!(matches!(nan, Err(Error::RangeViolation { index: 0, .. })));
    }

    #[test]
    fn test_warn_policy_keeps_values() {
        let quantity = AngularQuantity::validated(
            Quantity::Declination,
            vec![0.1, 0.6, -0.7],
            Unit::Radians,
            Some(Algorithm::Hofierka),
            RangePolicy::Warn,
        )
        .unwrap();
        assert_eq!(quantity.values(), &[0.1, 0.6, -0.7]);
        assert_eq!(quantity.out_of_range(), &[1, 2]);
        assert_eq!(quantity.algorithm(), Some(Algorithm::Hofierka));
    }

    #[test]
    fn test_minutes_range_checked_in_minutes() {
        let eot = |values, unit| AngularQuantity::new(Quantity::EquationOfTime, values, unit);
        assert!(eot(vec![-3.9], Unit::Minutes).is_ok());
        assert!(eot(vec![25.0], Unit::Minutes).is_err());
        // the same 25 minutes given as an angle
        assert!(eot(vec![Unit::Minutes.to_radians(25.0)], Unit::Radians).is_err());
    }

    #[test]
    fn test_to_origin() {
        let azimuth = AngularQuantity::new(Quantity::Azimuth, vec![180.0, 90.0], Unit::Degrees)
            .unwrap()
            .with_origin(AzimuthOrigin::North);
        let from_south = azimuth.to_origin(AzimuthOrigin::South).unwrap();
        assert_eq!(from_south.unit(), Unit::Degrees);
        assert!(from_south.values()[0].abs() < 1e-9);
        assert!((from_south.values()[1] - 270.0).abs() < 1e-9);

        let bare = AngularQuantity::new(Quantity::Azimuth, vec![1.0], Unit::Radians).unwrap();
        assert!(bare.to_origin(AzimuthOrigin::East).is_err());
    }
}
