//! Core data types: location, surface, time series and solar event results.

use crate::constants::{SURFACE_ORIENTATION_DEFAULT, SURFACE_TILT_DEFAULT};
use crate::error::{
    check_alignment, check_elevation, check_latitude, check_longitude, check_surface_orientation,
    check_surface_tilt,
};
use crate::units::AzimuthOrigin;
use crate::{Error, Result};
use chrono::{DateTime, Duration, FixedOffset, TimeZone};

/// Geographic site of a computation.
///
/// Angles are stored in radians. Read-only once created.
///
/// # Example
/// ```
/// # use pvgis_core::Location;
/// let ispra = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
/// assert!((ispra.latitude_degrees() - 45.812).abs() < 1e-12);
/// assert!(Location::from_degrees(8.628, 95.0, 214.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Location {
    longitude: f64,
    latitude: f64,
    elevation: f64,
}

impl Location {
    /// Creates a location from longitude and latitude in degrees and elevation in meters.
    ///
    /// # Errors
    /// Returns `InvalidLongitude`, `InvalidLatitude` or `InvalidElevation`.
    pub fn from_degrees(longitude: f64, latitude: f64, elevation: f64) -> Result<Self> {
        check_longitude(longitude)?;
        check_latitude(latitude)?;
        check_elevation(elevation)?;
        Ok(Self {
            longitude: longitude.to_radians(),
            latitude: latitude.to_radians(),
            elevation,
        })
    }

    /// Creates a location from longitude and latitude in radians and elevation in meters.
    ///
    /// # Errors
    /// Returns `InvalidLongitude`, `InvalidLatitude` or `InvalidElevation`.
    pub fn from_radians(longitude: f64, latitude: f64, elevation: f64) -> Result<Self> {
        Self::from_degrees(longitude.to_degrees(), latitude.to_degrees(), elevation)
    }

    /// Longitude in radians, east positive.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Latitude in radians, north positive.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Elevation above sea level in meters.
    #[must_use]
    pub const fn elevation(&self) -> f64 {
        self.elevation
    }

    /// Longitude in degrees.
    #[must_use]
    pub fn longitude_degrees(&self) -> f64 {
        self.longitude.to_degrees()
    }

    /// Latitude in degrees.
    #[must_use]
    pub fn latitude_degrees(&self) -> f64 {
        self.latitude.to_degrees()
    }
}

/// Orientation and tilt of a receiving surface.
///
/// Orientation is counted clockwise from North (180° faces south), tilt from
/// the horizontal. Both are stored in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurfaceGeometry {
    orientation: f64,
    tilt: f64,
}

impl SurfaceGeometry {
    /// Creates a surface from orientation and tilt in degrees.
    ///
    /// # Errors
    /// Returns `InvalidSurface` for an orientation outside 0–360° or a tilt outside 0–90°.
    pub fn from_degrees(orientation: f64, tilt: f64) -> Result<Self> {
        check_surface_orientation(orientation)?;
        check_surface_tilt(tilt)?;
        Ok(Self {
            orientation: orientation.to_radians(),
            tilt: tilt.to_radians(),
        })
    }

    /// Creates a horizontal surface.
    #[must_use]
    pub const fn horizontal() -> Self {
        Self {
            orientation: core::f64::consts::PI,
            tilt: 0.0,
        }
    }

    /// Orientation in radians, clockwise from North.
    #[must_use]
    pub const fn orientation(&self) -> f64 {
        self.orientation
    }

    /// Tilt in radians from the horizontal.
    #[must_use]
    pub const fn tilt(&self) -> f64 {
        self.tilt
    }

    /// Origin against which [`Self::orientation`] is counted.
    #[must_use]
    pub const fn origin(&self) -> AzimuthOrigin {
        AzimuthOrigin::North
    }

    /// Whether the tilt is small enough to treat the surface as horizontal.
    #[must_use]
    pub fn is_flat(&self) -> bool {
        self.tilt <= crate::constants::SURFACE_TILT_HORIZONTALLY_FLAT_PANEL_THRESHOLD
    }
}

impl Default for SurfaceGeometry {
    fn default() -> Self {
        Self {
            orientation: SURFACE_ORIENTATION_DEFAULT.to_radians(),
            tilt: SURFACE_TILT_DEFAULT.to_radians(),
        }
    }
}

/// Ordered, offset-aware timestamps shared by every derived series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    timestamps: Vec<DateTime<FixedOffset>>,
}

impl TimeSeries {
    /// Creates a time series from ordered timestamps.
    ///
    /// # Errors
    /// Returns `EmptyTimeSeries` for no timestamps and `InvalidDateTime` when
    /// the timestamps are not in ascending order.
    pub fn new(timestamps: Vec<DateTime<FixedOffset>>) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(Error::EmptyTimeSeries);
        }
        if timestamps.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(Error::invalid_datetime(
                "timestamps must be in ascending order",
            ));
        }
        Ok(Self { timestamps })
    }

    /// Converts timestamps in any time zone to a series keeping their UTC offsets.
    ///
    /// # Errors
    /// Same as [`Self::new`].
    pub fn from_datetimes<Tz: TimeZone>(
        datetimes: impl IntoIterator<Item = DateTime<Tz>>,
    ) -> Result<Self> {
        Self::new(datetimes.into_iter().map(|dt| dt.fixed_offset()).collect())
    }

    /// Timestamps from `start` (inclusive) to `end` (exclusive) every `step`.
    ///
    /// # Errors
    /// Returns `InvalidDateTime` for a non-positive step and `EmptyTimeSeries`
    /// when `end` is not after `start`.
    ///
    /// # Example
    /// ```
    /// use chrono::{DateTime, Duration, FixedOffset};
    /// use pvgis_core::TimeSeries;
    ///
    /// let start: DateTime<FixedOffset> = "2010-01-27T00:10:00Z".parse().unwrap();
    /// let end: DateTime<FixedOffset> = "2010-01-29T00:00:00Z".parse().unwrap();
    /// let series = TimeSeries::range(start, end, Duration::hours(1)).unwrap();
    /// assert_eq!(series.len(), 48);
    /// ```
    pub fn range(
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
        step: Duration,
    ) -> Result<Self> {
        if step <= Duration::zero() {
            return Err(Error::invalid_datetime("step must be positive"));
        }
        let mut timestamps = Vec::new();
        let mut current = start;
        while current < end {
            timestamps.push(current);
            current += step;
        }
        Self::new(timestamps)
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Always false: a time series holds at least one timestamp.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamps as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[DateTime<FixedOffset>] {
        &self.timestamps
    }

    /// Iterates over the timestamps.
    pub fn iter(&self) -> impl Iterator<Item = &DateTime<FixedOffset>> {
        self.timestamps.iter()
    }

    /// Spacing between the first two timestamps, if there are two.
    #[must_use]
    pub fn step(&self) -> Option<Duration> {
        match self.timestamps.as_slice() {
            [first, second, ..] => Some(*second - *first),
            _ => None,
        }
    }
}

impl<'a> IntoIterator for &'a TimeSeries {
    type Item = &'a DateTime<FixedOffset>;
    type IntoIter = core::slice::Iter<'a, DateTime<FixedOffset>>;

    fn into_iter(self) -> Self::IntoIter {
        self.timestamps.iter()
    }
}

/// Sunrise, solar noon and sunset of one day.
///
/// Near the poles the sun may stay above or below the horizon for the whole
/// day; only solar noon is defined then.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SunriseResult<T> {
    /// The sun rises and sets.
    RegularDay {
        /// Sunrise.
        sunrise: T,
        /// Solar noon.
        transit: T,
        /// Sunset.
        sunset: T,
    },
    /// Polar day.
    AllDay {
        /// Solar noon.
        transit: T,
    },
    /// Polar night.
    AllNight {
        /// Solar noon, with the sun below the horizon.
        transit: T,
    },
}

impl<T> SunriseResult<T> {
    /// Solar noon, defined for every kind of day.
    pub const fn transit(&self) -> &T {
        match self {
            Self::RegularDay { transit, .. } | Self::AllDay { transit } | Self::AllNight { transit } => {
                transit
            }
        }
    }

    /// Whether the sun both rises and sets.
    pub const fn is_regular_day(&self) -> bool {
        matches!(self, Self::RegularDay { .. })
    }

    /// Whether the sun stays up all day.
    pub const fn is_polar_day(&self) -> bool {
        matches!(self, Self::AllDay { .. })
    }

    /// Whether the sun stays down all day.
    pub const fn is_polar_night(&self) -> bool {
        matches!(self, Self::AllNight { .. })
    }

    /// Sunrise, if the sun rises.
    pub const fn sunrise(&self) -> Option<&T> {
        match self {
            Self::RegularDay { sunrise, .. } => Some(sunrise),
            Self::AllDay { .. } | Self::AllNight { .. } => None,
        }
    }

    /// Sunset, if the sun sets.
    pub const fn sunset(&self) -> Option<&T> {
        match self {
            Self::RegularDay { sunset, .. } => Some(sunset),
            Self::AllDay { .. } | Self::AllNight { .. } => None,
        }
    }

    /// Applies `f` to every moment of the day.
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> SunriseResult<U> {
        match self {
            Self::RegularDay {
                sunrise,
                transit,
                sunset,
            } => SunriseResult::RegularDay {
                sunrise: f(sunrise),
                transit: f(transit),
                sunset: f(sunset),
            },
            Self::AllDay { transit } => SunriseResult::AllDay { transit: f(transit) },
            Self::AllNight { transit } => SunriseResult::AllNight { transit: f(transit) },
        }
    }
}

/// A model input given once for the whole series or once per timestamp.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Series {
    /// Same value at every timestamp.
    Constant(f64),
    /// One value per timestamp.
    Values(Vec<f64>),
}

impl Series {
    /// Value at timestamp `index`.
    ///
    /// Callers check the length first with [`Series::check_len`].
    #[must_use]
    pub fn at(&self, index: usize) -> f64 {
        match self {
            Self::Constant(value) => *value,
            Self::Values(values) => values[index],
        }
    }

    /// Checks that a per-timestamp series has `expected` values.
    ///
    /// # Errors
    /// Returns `DataAlignment` for a series of another length.
    pub fn check_len(&self, name: &'static str, expected: usize) -> Result<()> {
        match self {
            Self::Constant(_) => Ok(()),
            Self::Values(values) => check_alignment(name, expected, values.len()),
        }
    }

    /// Checks every value with `check`.
    ///
    /// # Errors
    /// Returns the first error of `check`.
    pub fn try_for_each(&self, check: impl Fn(f64) -> Result<()>) -> Result<()> {
        match self {
            Self::Constant(value) => check(*value),
            Self::Values(values) => values.iter().try_for_each(|&value| check(value)),
        }
    }
}

impl From<f64> for Series {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self::Values(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Utc};

    #[test]
    fn test_location_creation() {
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        assert!((location.longitude() - 8.628_f64.to_radians()).abs() < 1e-15);
        assert!((location.latitude_degrees() - 45.812).abs() < 1e-12);
        assert_eq!(location.elevation(), 214.0);

        let same =
            Location::from_radians(location.longitude(), location.latitude(), 214.0).unwrap();
        assert!((same.longitude_degrees() - 8.628).abs() < 1e-12);

        assert!(matches!(
            Location::from_degrees(181.0, 0.0, 0.0),
            Err(Error::InvalidLongitude { .. })
        ));
        assert!(matches!(
            Location::from_degrees(0.0, 0.0, -10.0),
            Err(Error::InvalidElevation { .. })
        ));
    }

    #[test]
    fn test_surface_geometry() {
        let default = SurfaceGeometry::default();
        assert!((default.orientation().to_degrees() - 180.0).abs() < 1e-12);
        assert!((default.tilt().to_degrees() - 45.0).abs() < 1e-12);
        assert!(!default.is_flat());
        assert!(SurfaceGeometry::horizontal().is_flat());
        assert!(SurfaceGeometry::from_degrees(180.0, 0.0).unwrap().is_flat());
        assert!(SurfaceGeometry::from_degrees(180.0, 95.0).is_err());
    }

    #[test]
    fn test_time_series_validation() {
        assert_eq!(TimeSeries::new(Vec::new()), Err(Error::EmptyTimeSeries));

        let early = "2023-06-21T10:00:00Z".parse::<DateTime<FixedOffset>>().unwrap();
        let late = "2023-06-21T11:00:00Z".parse::<DateTime<FixedOffset>>().unwrap();
        assert!(TimeSeries::new(vec![late, early]).is_err());

        let series = TimeSeries::new(vec![early, late]).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.step(), Some(Duration::hours(1)));
    }

    #[test]
    fn test_time_series_range_and_conversion() {
        let start = "2023-01-01T00:00:00+01:00"
            .parse::<DateTime<FixedOffset>>()
            .unwrap();
        let end = start + Duration::days(1);
        let series = TimeSeries::range(start, end, Duration::minutes(15)).unwrap();
        assert_eq!(series.len(), 96);
        assert!(TimeSeries::range(start, end, Duration::zero()).is_err());
        assert_eq!(
            TimeSeries::range(end, start, Duration::hours(1)),
            Err(Error::EmptyTimeSeries)
        );

        let utc = TimeSeries::from_datetimes([Utc.with_ymd_and_hms(2023, 6, 21, 12, 0, 0).unwrap()])
            .unwrap();
        assert_eq!(utc.as_slice()[0].offset().local_minus_utc(), 0);
    }

    #[test]
    fn test_series_broadcast_and_length() {
        let constant = Series::from(25.0);
        assert_eq!(constant.at(7), 25.0);
        assert!(constant.check_len("temperature", 3).is_ok());

        let values = Series::from(vec![1.0, 2.0]);
        assert_eq!(values.at(1), 2.0);
        assert!(matches!(
            values.check_len("temperature", 3),
            Err(Error::DataAlignment { .. })
        ));
        let positive = |v: f64| {
            if v > 1.5 { Ok(()) } else { Err(Error::invalid_parameter("v", v)) }
        };
        assert_eq!(values.try_for_each(positive), Err(Error::invalid_parameter("v", 1.0)));
    }

    #[test]
    fn test_sunrise_result_accessors() {
        let at = |hour: u32| Utc.with_ymd_and_hms(2023, 6, 21, hour, 0, 0).unwrap();
        let day = SunriseResult::RegularDay {
            sunrise: at(4),
            transit: at(11),
            sunset: at(19),
        };
        assert!(day.is_regular_day() && !day.is_polar_day());
        assert_eq!(day.sunset(), Some(&at(19)));

        let hours = day.map(|moment| moment.hour());
        assert_eq!(hours.sunrise(), Some(&4));
        assert_eq!(hours.transit(), &11);

        let night = SunriseResult::AllNight { transit: at(11) };
        assert!(night.is_polar_night());
        assert_eq!(night.sunrise(), None);
        assert_eq!(night.map(|moment| moment.hour()).transit(), &11);
    }
}
