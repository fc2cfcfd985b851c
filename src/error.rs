//! Error types for the solar geometry, irradiance and power library.

use crate::quantity::Quantity;
use core::fmt;

/// Result type alias for operations in this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur during position, irradiance or power calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Unknown unit name (must be one of radians, degrees or minutes).
    InvalidUnit {
        /// The unit name provided.
        unit: String,
    },
    /// Unknown algorithm family name.
    UnknownAlgorithm {
        /// The name provided.
        name: String,
    },
    /// No calculator is registered for the requested quantity and algorithm.
    UnsupportedAlgorithm {
        /// The quantity requested.
        quantity: Quantity,
        /// Name of the algorithm requested.
        algorithm: String,
    },
    /// Invalid latitude value (must be between -90 and +90 degrees).
    InvalidLatitude {
        /// The invalid latitude value provided, in degrees.
        value: f64,
    },
    /// Invalid longitude value (must be between -180 and +180 degrees).
    InvalidLongitude {
        /// The invalid longitude value provided, in degrees.
        value: f64,
    },
    /// Invalid site elevation (must be between 0 and 8848 meters).
    InvalidElevation {
        /// The invalid elevation provided, in meters.
        value: f64,
    },
    /// Invalid surface tilt or orientation.
    InvalidSurface {
        /// Description of the surface constraint violation.
        message: &'static str,
        /// The invalid value, in degrees.
        value: f64,
    },
    /// Invalid date/time input.
    InvalidDateTime {
        /// Description of the date/time constraint violation.
        message: &'static str,
    },
    /// A time series with no timestamps.
    EmptyTimeSeries,
    /// A computed value lies outside the physical range of its quantity.
    RangeViolation {
        /// The quantity that was computed.
        quantity: Quantity,
        /// Lower bound of the valid range, in the quantity's canonical unit.
        min: f64,
        /// Upper bound of the valid range, in the quantity's canonical unit.
        max: f64,
        /// The offending value.
        value: f64,
        /// Position of the offending value in its series.
        index: usize,
    },
    /// Two series that must be aligned have different lengths.
    DataAlignment {
        /// Name of the series that does not match.
        series: &'static str,
        /// Expected length (the time series length).
        expected: usize,
        /// Actual length.
        actual: usize,
    },
    /// A scalar model parameter outside its accepted range.
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// An incidence model paired with a position family it cannot consume.
    IncompatibleAlgorithms {
        /// Description of the pairing problem.
        message: &'static str,
    },
    /// Failure reported by an external time series source.
    Source {
        /// Description provided by the source.
        message: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUnit { unit } => {
                write!(
                    f,
                    "invalid unit '{unit}' (must be radians, degrees or minutes)"
                )
            }
            Self::UnknownAlgorithm { name } => write!(f, "unknown algorithm '{name}'"),
            Self::UnsupportedAlgorithm {
                quantity,
                algorithm,
            } => {
                write!(f, "no {algorithm} algorithm registered for {quantity}")
            }
            Self::InvalidLatitude { value } => {
                write!(
                    f,
                    "invalid latitude {value}° (must be between -90° and +90°)"
                )
            }
            Self::InvalidLongitude { value } => {
                write!(
                    f,
                    "invalid longitude {value}° (must be between -180° and +180°)"
                )
            }
            Self::InvalidElevation { value } => {
                write!(
                    f,
                    "invalid elevation {value} m (must be between 0 and 8848 m)"
                )
            }
            Self::InvalidSurface { message, value } => {
                write!(f, "invalid surface {value}°: {message}")
            }
            Self::InvalidDateTime { message } => {
                write!(f, "invalid date/time: {message}")
            }
            Self::EmptyTimeSeries => write!(f, "time series contains no timestamps"),
            Self::RangeViolation {
                quantity,
                min,
                max,
                value,
                index,
            } => {
                write!(
                    f,
                    "{quantity} {value} at index {index} is out of the expected range [{min}, {max}]"
                )
            }
            Self::DataAlignment {
                series,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{series} has {actual} values but the time series has {expected}"
                )
            }
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid {name} {value}")
            }
            Self::IncompatibleAlgorithms { message } => {
                write!(f, "incompatible algorithms: {message}")
            }
            Self::Source { message } => write!(f, "time series source: {message}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// Creates an invalid unit error.
    #[must_use]
    pub fn invalid_unit(unit: &str) -> Self {
        Self::InvalidUnit {
            unit: unit.to_owned(),
        }
    }

    /// Creates an unknown algorithm error.
    #[must_use]
    pub fn unknown_algorithm(name: &str) -> Self {
        Self::UnknownAlgorithm {
            name: name.to_owned(),
        }
    }

    /// Creates an unsupported algorithm error.
    #[must_use]
    pub fn unsupported_algorithm(quantity: Quantity, algorithm: impl fmt::Display) -> Self {
        Self::UnsupportedAlgorithm {
            quantity,
            algorithm: algorithm.to_string(),
        }
    }

    /// Creates an invalid latitude error.
    #[must_use]
    pub const fn invalid_latitude(value: f64) -> Self {
        Self::InvalidLatitude { value }
    }

    /// Creates an invalid longitude error.
    #[must_use]
    pub const fn invalid_longitude(value: f64) -> Self {
        Self::InvalidLongitude { value }
    }

    /// Creates an invalid elevation error.
    #[must_use]
    pub const fn invalid_elevation(value: f64) -> Self {
        Self::InvalidElevation { value }
    }

    /// Creates an invalid surface error.
    #[must_use]
    pub const fn invalid_surface(message: &'static str, value: f64) -> Self {
        Self::InvalidSurface { message, value }
    }

    /// Creates an invalid date/time error.
    #[must_use]
    pub const fn invalid_datetime(message: &'static str) -> Self {
        Self::InvalidDateTime { message }
    }

    /// Creates a range violation error.
    #[must_use]
    pub const fn range_violation(
        quantity: Quantity,
        range: (f64, f64),
        value: f64,
        index: usize,
    ) -> Self {
        let (min, max) = range;
        Self::RangeViolation {
            quantity,
            min,
            max,
            value,
            index,
        }
    }

    /// Creates a data alignment error.
    #[must_use]
    pub const fn data_alignment(series: &'static str, expected: usize, actual: usize) -> Self {
        Self::DataAlignment {
            series,
            expected,
            actual,
        }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub const fn invalid_parameter(name: &'static str, value: f64) -> Self {
        Self::InvalidParameter { name, value }
    }

    /// Creates an incompatible algorithms error.
    #[must_use]
    pub const fn incompatible_algorithms(message: &'static str) -> Self {
        Self::IncompatibleAlgorithms { message }
    }

    /// Creates an error reported by an external time series source.
    #[must_use]
    pub fn source(message: impl Into<String>) -> Self {
        Self::Source {
            message: message.into(),
        }
    }
}

/// Checks a latitude in degrees.
///
/// # Errors
/// Returns `InvalidLatitude` outside [-90°, 90°], NaN included.
pub fn check_latitude(latitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::invalid_latitude(latitude));
    }
    Ok(())
}

/// Checks a longitude in degrees.
///
/// # Errors
/// Returns `InvalidLongitude` outside [-180°, 180°], NaN included.
pub fn check_longitude(longitude: f64) -> Result<()> {
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::invalid_longitude(longitude));
    }
    Ok(())
}

/// Validates the site elevation is between sea level and the highest summit.
///
/// # Errors
/// Returns `InvalidElevation` if elevation is outside 0 to 8848 meters.
pub fn check_elevation(elevation: f64) -> Result<()> {
    if !(crate::constants::ELEVATION_MINIMUM..=crate::constants::ELEVATION_MAXIMUM)
        .contains(&elevation)
    {
        return Err(Error::invalid_elevation(elevation));
    }
    Ok(())
}

/// Validates a surface tilt between horizontal (0°) and vertical (90°).
///
/// # Errors
/// Returns `InvalidSurface` for tilts outside 0 to 90 degrees.
pub fn check_surface_tilt(tilt: f64) -> Result<()> {
    if !(0.0..=90.0).contains(&tilt) {
        return Err(Error::invalid_surface(
            "tilt must be between 0° and 90°",
            tilt,
        ));
    }
    Ok(())
}

/// Validates a surface orientation between 0° and 360° (clockwise from North).
///
/// # Errors
/// Returns `InvalidSurface` for orientations outside 0 to 360 degrees.
pub fn check_surface_orientation(orientation: f64) -> Result<()> {
    if !(0.0..=360.0).contains(&orientation) {
        return Err(Error::invalid_surface(
            "orientation must be between 0° and 360°",
            orientation,
        ));
    }
    Ok(())
}

/// Validates that a derived series has the same length as the time series.
///
/// # Errors
/// Returns `DataAlignment` when the lengths differ.
pub fn check_alignment(series: &'static str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(Error::data_alignment(series, expected, actual));
    }
    Ok(())
}

/// Validates a Linke turbidity factor (0 to 8).
///
/// # Errors
/// Returns `InvalidParameter` outside the accepted range.
pub fn check_linke_turbidity(value: f64) -> Result<()> {
    if !(crate::constants::LINKE_TURBIDITY_MINIMUM..=crate::constants::LINKE_TURBIDITY_MAXIMUM)
        .contains(&value)
    {
        return Err(Error::invalid_parameter("Linke turbidity factor", value));
    }
    Ok(())
}
