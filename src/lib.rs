//! # PVGIS Core
//!
//! Solar position, clear-sky irradiance and photovoltaic power for a site and
//! a series of timestamps.
//!
//! The crate computes the apparent position of the sun (fractional year,
//! equation of time, true solar time, hour angle, declination, zenith,
//! altitude, azimuth, incidence on a tilted surface, sunrise and sunset),
//! decomposes irradiance on that surface into direct, diffuse and
//! ground-reflected components and estimates the power a photovoltaic array
//! delivers.
//!
//! ## Features
//!
//! - Several published algorithm families per quantity (NOAA, Hofierka,
//!   Jenčo, PVIS, Hargreaves, Milne, Iqbal), chosen per stage
//! - Every angle carries its unit, its algorithm and, for azimuths, its origin
//! - Intermediate series computed once per [`pipeline::Session`] and reused
//! - Clear-sky or measured horizontal irradiance, horizon shading, reflection losses
//! - Huld and IV efficiency models with Faiman module temperature
//!
//! ## Feature Flags
//!
//! - `serde`: `Serialize`/`Deserialize` for options and result types
//!
//! ## Quick Start
//!
//! ### Solar Position
//! ```rust
//! use pvgis_core::pipeline::{PositionRequest, Session};
//! use pvgis_core::{Location, Quantity, TimeSeries};
//!
//! let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
//! let timestamps = TimeSeries::new(vec![
//!     "2023-06-21T10:00:00Z".parse().unwrap(),
//!     "2023-06-21T11:00:00Z".parse().unwrap(),
//! ])
//! .unwrap();
//! let request = PositionRequest::new(location, timestamps)
//!     .with_quantities([Quantity::Altitude, Quantity::Azimuth])
//!     .with_events(true);
//!
//! let mut session = Session::new();
//! let overview = session.overview(&request).unwrap();
//! for (altitude, azimuth) in overview
//!     .altitude
//!     .unwrap()
//!     .degrees()
//!     .iter()
//!     .zip(overview.azimuth.unwrap().degrees().iter())
//! {
//!     println!("altitude {altitude:.2}°, azimuth {azimuth:.2}°");
//! }
//! ```
//!
//! ### Photovoltaic Power
//! ```rust
//! use pvgis_core::irradiance::{IrradianceOptions, SolarGeometry, decompose};
//! use pvgis_core::pipeline::{PositionRequest, Session};
//! use pvgis_core::power::{PowerOptions, photovoltaic_power};
//! use pvgis_core::shading::HorizonProfile;
//! use pvgis_core::{Location, SurfaceGeometry, TimeSeries};
//! use chrono::{Duration, TimeZone, Utc};
//!
//! let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
//! let surface = SurfaceGeometry::from_degrees(180.0, 35.0).unwrap();
//! let start = Utc.with_ymd_and_hms(2023, 6, 21, 0, 0, 0).unwrap().fixed_offset();
//! let timestamps = TimeSeries::range(start, start + Duration::days(1), Duration::hours(1)).unwrap();
//! let horizon = HorizonProfile::from_degrees_default_interval(&[3.0; 24]).unwrap();
//!
//! let request = PositionRequest::new(location, timestamps).with_surface(surface);
//! let geometry = SolarGeometry::compute(&mut Session::new(), &request, Some(&horizon), None).unwrap();
//! let irradiance =
//!     decompose(&location, &surface, &geometry, &IrradianceOptions::default(), None).unwrap();
//! let power = photovoltaic_power(&irradiance, &PowerOptions::default()).unwrap();
//!
//! let daily = power.energy_wh(Duration::hours(1));
//! assert!(daily > 5000.0 && daily < 9000.0, "{daily}");
//! ```
//!
//! ## Conventions
//!
//! - **Angles**: radians internally, time-like quantities in minutes
//! - **Azimuth**: measured clockwise; the origin (North, East or South) travels with the value
//! - **Surface orientation**: clockwise from North, 180° faces south
//! - **Calendar**: day of year and time of day are taken in UTC
//!
//! ## References
//!
//! - NOAA Global Monitoring Division. General Solar Position Calculations.
//! - Hofierka, J.; Šúri, M. (2002). The solar radiation model for Open source GIS:
//!   implementation and applications. Proceedings of the Open source GIS - GRASS users conference.
//! - Muneer, T. (1990). Solar radiation model for Europe. Building Services Engineering
//!   Research and Technology, 11(4), 153-163.
//! - Martin, N.; Ruiz, J. M. (2005). Annual angular reflection losses in PV modules.
//!   Progress in Photovoltaics, 13(1), 75-84.
//! - Huld, T. et al. (2011). A power-rating model for crystalline silicon PV modules.
//!   Solar Energy Materials and Solar Cells, 95(12), 3359-3369.
//! - Faiman, D. (2008). Assessing the outdoor operating temperature of photovoltaic
//!   modules. Progress in Photovoltaics, 16(4), 307-315.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery, clippy::cargo, clippy::all)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cargo_common_metadata,
    clippy::multiple_crate_versions, // Acceptable for dev-dependencies
    clippy::float_cmp, // Exact comparisons of zeroed components in tests
)]

// Public API exports
pub use crate::error::{Error, Result};
pub use crate::models::{Algorithm, AlgorithmSelection};
pub use crate::pipeline::{PositionOptions, PositionRequest, Session, SolarPositionOverview};
pub use crate::quantity::{AngularQuantity, Quantity, RangePolicy};
pub use crate::types::{Location, Series, SunriseResult, SurfaceGeometry, TimeSeries};
pub use crate::units::{AzimuthOrigin, Unit, convert_azimuth_origin};

// Value types
pub mod quantity;
pub mod types;
pub mod units;

// Algorithms
pub mod models;
pub mod position;
pub mod refraction;
pub mod registry;

// Orchestration
pub mod cache;
pub mod pipeline;

// Irradiance and power
pub mod irradiance;
pub mod power;
pub mod shading;

// Core modules
pub mod constants;
pub mod error;
pub mod io;
pub mod time;

// Internal modules
mod math;
