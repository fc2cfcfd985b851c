//! Horizon profiles and the in-shade test.

use crate::constants::HORIZON_INTERVAL_DEFAULT;
use crate::error::check_alignment;
use crate::math::normalize_radians_0_to_tau;
use crate::quantity::{AngularQuantity, Quantity};
use crate::units::AzimuthOrigin;
use crate::{Error, Result};
use core::f64::consts::TAU;

/// Heights of the surrounding horizon sampled at equal azimuth steps.
///
/// Sample `i` lies at azimuth `i · interval`, measured clockwise from North.
/// The samples cover the full circle, and the segment after the last sample
/// closes back onto the first one.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizonProfile {
    heights: Vec<f64>,
    interval: f64,
}

impl HorizonProfile {
    /// Creates a profile from heights and sampling interval in radians.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for an empty profile, a non-positive
    /// interval or samples that do not fit within one turn.
    #[allow(clippy::cast_precision_loss)]
    pub fn new(heights: Vec<f64>, interval: f64) -> Result<Self> {
        if heights.is_empty() {
            return Err(Error::invalid_parameter("horizon heights", 0.0));
        }
        if !interval.is_finite() || interval <= 0.0 {
            return Err(Error::invalid_parameter("horizon interval", interval));
        }
        let span = interval * heights.len() as f64;
        if span > TAU + 1e-9 {
            return Err(Error::invalid_parameter("horizon span", span.to_degrees()));
        }
        if let Some(&height) = heights.iter().find(|h| !h.is_finite()) {
            return Err(Error::invalid_parameter("horizon height", height));
        }
        Ok(Self { heights, interval })
    }

    /// Creates a profile from heights in degrees, sampled every `interval` degrees.
    ///
    /// # Errors
    /// See [`HorizonProfile::new`].
    pub fn from_degrees(heights: &[f64], interval: f64) -> Result<Self> {
        Self::new(
            heights.iter().map(|h| h.to_radians()).collect(),
            interval.to_radians(),
        )
    }

    /// Creates a profile from heights in degrees at the default 15° interval.
    ///
    /// # Errors
    /// See [`HorizonProfile::new`].
    pub fn from_degrees_default_interval(heights: &[f64]) -> Result<Self> {
        Self::from_degrees(heights, HORIZON_INTERVAL_DEFAULT)
    }

    /// Heights in radians.
    #[must_use]
    pub fn heights(&self) -> &[f64] {
        &self.heights
    }

    /// Sampling interval in radians.
    #[must_use]
    pub const fn interval(&self) -> f64 {
        self.interval
    }

    /// Horizon height at `azimuth` (radians from North) by linear interpolation.
    ///
    /// # Example
    /// ```
    /// use pvgis_core::shading::HorizonProfile;
    ///
    /// let profile = HorizonProfile::from_degrees(&[0.0, 10.0, 20.0, 10.0], 90.0).unwrap();
    /// let height = profile.interpolate(45f64.to_radians()).to_degrees();
    /// assert!((height - 5.0).abs() < 1e-9);
    /// // between the last sample and North
    /// let height = profile.interpolate(315f64.to_radians()).to_degrees();
    /// assert!((height - 5.0).abs() < 1e-9);
    /// ```
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn interpolate(&self, azimuth: f64) -> f64 {
        let azimuth = normalize_radians_0_to_tau(azimuth);
        let last = self.heights.len() - 1;
        let index = ((azimuth / self.interval).floor() as usize).min(last);
        let start = self.interval * index as f64;
        let (end, upper) = if index == last {
            (TAU, self.heights[0])
        } else {
            (start + self.interval, self.heights[index + 1])
        };
        let fraction = (azimuth - start) / (end - start);
        self.heights[index] + (upper - self.heights[index]) * fraction
    }

    /// Horizon height along an azimuth series of any origin.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for an azimuth without origin.
    pub fn heights_along(&self, azimuth: &AngularQuantity) -> Result<Vec<f64>> {
        let azimuth = azimuth.to_origin(AzimuthOrigin::North)?;
        Ok(azimuth.radians().iter().map(|&a| self.interpolate(a)).collect())
    }
}

/// Whether the sun at `altitude` and `azimuth` (radians from North) is hidden.
///
/// The sun is hidden when an explicit shadow indicator is set or when it is
/// below the horizon height interpolated from `profile`. Without a profile
/// the terrain is flat and the test compares against zero.
#[must_use]
pub fn in_shade(
    altitude: f64,
    azimuth: f64,
    profile: Option<&HorizonProfile>,
    shadow_indicator: bool,
) -> bool {
    shadow_indicator || altitude < profile.map_or(0.0, |p| p.interpolate(azimuth))
}

/// Per-timestamp [`in_shade`] over altitude and azimuth series.
///
/// # Errors
/// Returns `DataAlignment` for series of different length, `InvalidParameter`
/// for an azimuth without origin and `IncompatibleAlgorithms` when the
/// series are not an altitude and an azimuth.
pub fn surface_in_shade(
    altitude: &AngularQuantity,
    azimuth: &AngularQuantity,
    profile: Option<&HorizonProfile>,
    shadow_indicator: Option<&[bool]>,
) -> Result<Vec<bool>> {
    if altitude.kind() != Quantity::Altitude || azimuth.kind() != Quantity::Azimuth {
        return Err(Error::incompatible_algorithms(
            "shading needs an altitude and an azimuth series",
        ));
    }
    check_alignment("solar azimuth", altitude.len(), azimuth.len())?;
    if let Some(indicator) = shadow_indicator {
        check_alignment("shadow indicator", altitude.len(), indicator.len())?;
    }
    let azimuth = azimuth.to_origin(AzimuthOrigin::North)?;
    let shaded: Vec<bool> = altitude
        .radians()
        .iter()
        .zip(azimuth.radians().iter())
        .enumerate()
        .map(|(i, (&alt, &az))| {
            let flag = shadow_indicator.is_some_and(|s| s[i]);
            in_shade(alt, az, profile, flag)
        })
        .collect();
    tracing::debug!(
        shaded = shaded.iter().filter(|&&s| s).count(),
        total = shaded.len(),
        "surface in shade"
    );
    Ok(shaded)
}
