//! Decomposition of irradiance on an inclined surface.
//!
//! Irradiance arrives either as a measured pair of global and direct
//! horizontal series or from the clear-sky model of Hofierka and Šúri. Both
//! paths produce direct, diffuse and ground-reflected components on the
//! surface, aligned with the solar geometry they were computed from.
//!
//! Angular losses apply to the sky diffuse component at every tilt, so a
//! horizontal surface with losses enabled receives about 95.6 % of the
//! diffuse horizontal irradiance.
//!
//! ```
//! use pvgis_core::irradiance::{IrradianceOptions, SolarGeometry, decompose};
//! use pvgis_core::pipeline::{PositionRequest, Session};
//! use pvgis_core::{Location, SurfaceGeometry, TimeSeries};
//!
//! let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
//! let timestamps = TimeSeries::new(vec!["2023-06-21T11:00:00Z".parse().unwrap()]).unwrap();
//! let surface = SurfaceGeometry::from_degrees(180.0, 30.0).unwrap();
//! let request = PositionRequest::new(location, timestamps).with_surface(surface);
//!
//! let mut session = Session::new();
//! let geometry = SolarGeometry::compute(&mut session, &request, None, None).unwrap();
//! let irradiance =
//!     decompose(&location, &surface, &geometry, &IrradianceOptions::default(), None).unwrap();
//! let global = irradiance.global()[0];
//! assert!(global > 800.0 && global < 1200.0, "{global}");
//! ```

pub mod diffuse;
pub mod direct;
pub mod extraterrestrial;
pub mod loss;
pub mod reflected;

use crate::constants::{
    ALBEDO_DEFAULT, ANGULAR_LOSS_COEFFICIENT, LINKE_TURBIDITY_DEFAULT,
    LOW_ANGLE_DIRECT_THRESHOLD, SOLAR_CONSTANT, SURFACE_TILT_HORIZONTALLY_FLAT_PANEL_THRESHOLD,
};
use crate::error::{check_alignment, check_linke_turbidity};
use crate::pipeline::{PositionRequest, Session};
use crate::position::declination::OrbitParameters;
use crate::position::incidence::{IncidenceDefinition, IncidenceSettings};
use crate::quantity::Quantity;
use crate::shading::{HorizonProfile, surface_in_shade};
use crate::types::{Location, Series, SurfaceGeometry};
use crate::units::AzimuthOrigin;
use crate::{Error, Result};
use diffuse::{DiffuseSample, clear_sky_diffuse_horizontal, diffuse_inclined};
use direct::{
    clear_sky_direct_normal, direct_inclined, direct_normal_from_horizontal, optical_air_mass,
    refracted_altitude,
};
use extraterrestrial::{extraterrestrial_horizontal, extraterrestrial_normal};
use loss::{
    diffuse_angular_factor, direct_transmission, isotropic_transmission, reflected_angular_factor,
};
use reflected::ground_reflected;
use std::collections::BTreeMap;

/// Where the sun stands relative to the horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SunHorizonPosition {
    /// At or below the horizon: no irradiance on the surface.
    Below,
    /// Just above the horizon: diffuse and reflected only.
    LowAngle,
    /// High enough for direct irradiance.
    Above,
}

impl SunHorizonPosition {
    /// Classifies a solar altitude in radians.
    #[must_use]
    pub fn classify(altitude: f64) -> Self {
        if altitude <= 0.0 {
            Self::Below
        } else if altitude < LOW_ANGLE_DIRECT_THRESHOLD {
            Self::LowAngle
        } else {
            Self::Above
        }
    }
}

/// Solar geometry per timestamp as consumed by [`decompose`].
#[derive(Debug, Clone, PartialEq)]
pub struct SolarGeometry {
    altitude: Vec<f64>,
    azimuth: Vec<f64>,
    incidence_cosine: Vec<f64>,
    in_shade: Vec<bool>,
    day_angle: Vec<f64>,
}

impl SolarGeometry {
    /// Assembles geometry from series in radians.
    ///
    /// `azimuth` is counted clockwise from North. `incidence_cosine` is the
    /// cosine of the angle between the sun and the surface normal, negative
    /// when the sun is behind the surface.
    ///
    /// # Errors
    /// Returns `EmptyTimeSeries` for empty input and `DataAlignment` when the
    /// series differ in length.
    pub fn new(
        altitude: Vec<f64>,
        azimuth: Vec<f64>,
        incidence_cosine: Vec<f64>,
        in_shade: Vec<bool>,
        day_angle: Vec<f64>,
    ) -> Result<Self> {
        let len = altitude.len();
        if len == 0 {
            return Err(Error::EmptyTimeSeries);
        }
        check_alignment("solar azimuth", len, azimuth.len())?;
        check_alignment("incidence", len, incidence_cosine.len())?;
        check_alignment("in shade", len, in_shade.len())?;
        check_alignment("day angle", len, day_angle.len())?;
        Ok(Self {
            altitude,
            azimuth,
            incidence_cosine,
            in_shade,
            day_angle,
        })
    }

    /// Computes the geometry of `request` through `session`.
    ///
    /// The incidence family of the request's selection is evaluated without
    /// masking so that a sun behind the surface yields a negative cosine.
    /// The sun is in shade below the `horizon` profile, below the flat
    /// horizon when no profile is given, or where `shadow` is set.
    ///
    /// # Errors
    /// Propagates pipeline and shading errors.
    pub fn compute(
        session: &mut Session,
        request: &PositionRequest,
        horizon: Option<&HorizonProfile>,
        shadow: Option<&[bool]>,
    ) -> Result<Self> {
        let mut request = request
            .clone()
            .with_quantities([
                Quantity::Altitude,
                Quantity::Azimuth,
                Quantity::Incidence,
                Quantity::DayAngle,
            ])
            .with_events(false);
        request.options.incidence = IncidenceSettings {
            definition: IncidenceDefinition::Normal,
            zero_negative: false,
        };
        let overview = session.overview(&request)?;
        let missing = || Error::incompatible_algorithms("selection does not provide solar geometry");
        let altitude = overview.altitude.as_ref().ok_or_else(missing)?;
        let azimuth = overview.azimuth.as_ref().ok_or_else(missing)?;
        let incidence = overview.incidence.as_ref().ok_or_else(missing)?;
        let day_angle = overview.day_angle.as_ref().ok_or_else(missing)?;

        let in_shade = surface_in_shade(altitude, azimuth, horizon, shadow)?;
        Self::new(
            altitude.radians().into_owned(),
            azimuth.to_origin(AzimuthOrigin::North)?.radians().into_owned(),
            incidence.radians().iter().map(|theta| theta.cos()).collect(),
            in_shade,
            day_angle.radians().into_owned(),
        )
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.altitude.len()
    }

    /// Always `false`: geometry holds at least one timestamp.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.altitude.is_empty()
    }

    /// Solar altitude, radians.
    #[must_use]
    pub fn altitude(&self) -> &[f64] {
        &self.altitude
    }

    /// Solar azimuth, radians clockwise from North.
    #[must_use]
    pub fn azimuth(&self) -> &[f64] {
        &self.azimuth
    }

    /// Cosine of the incidence angle on the surface.
    #[must_use]
    pub fn incidence_cosine(&self) -> &[f64] {
        &self.incidence_cosine
    }

    /// Shade flags.
    #[must_use]
    pub fn in_shade(&self) -> &[bool] {
        &self.in_shade
    }

    /// Day angle, radians.
    #[must_use]
    pub fn day_angle(&self) -> &[f64] {
        &self.day_angle
    }
}

/// Measured global and direct irradiance on a horizontal plane, W/m².
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HorizontalIrradiance {
    /// Global horizontal irradiance.
    pub global: Vec<f64>,
    /// Direct (beam) horizontal irradiance.
    pub direct: Vec<f64>,
}

impl HorizontalIrradiance {
    /// Pairs global and direct series of equal length.
    ///
    /// # Errors
    /// Returns `DataAlignment` for series of different length.
    pub fn new(global: Vec<f64>, direct: Vec<f64>) -> Result<Self> {
        check_alignment("direct horizontal irradiance", global.len(), direct.len())?;
        Ok(Self { global, direct })
    }

    /// Diffuse horizontal irradiance at `index`, the global minus the direct part.
    #[must_use]
    pub fn diffuse(&self, index: usize) -> f64 {
        (self.global[index] - self.direct[index]).max(0.0)
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.global.len()
    }

    /// Whether the series are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.global.is_empty()
    }
}

/// Options of the irradiance decomposition.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IrradianceOptions {
    /// Linke turbidity factor of the clear-sky model.
    pub linke_turbidity: Series,
    /// Ground albedo.
    pub albedo: f64,
    /// Solar constant, W/m².
    pub solar_constant: f64,
    /// Orbit parameters of the extraterrestrial irradiance.
    pub orbit: OrbitParameters,
    /// Apply reflection losses at the module cover.
    pub apply_angular_loss: bool,
    /// Angular loss coefficient `a_r`.
    pub angular_loss_coefficient: f64,
    /// Tilts at or below this many radians are horizontal.
    pub flat_threshold: f64,
}

impl Default for IrradianceOptions {
    fn default() -> Self {
        Self {
            linke_turbidity: Series::Constant(LINKE_TURBIDITY_DEFAULT),
            albedo: ALBEDO_DEFAULT,
            solar_constant: SOLAR_CONSTANT,
            orbit: OrbitParameters::default(),
            apply_angular_loss: true,
            angular_loss_coefficient: ANGULAR_LOSS_COEFFICIENT,
            flat_threshold: SURFACE_TILT_HORIZONTALLY_FLAT_PANEL_THRESHOLD,
        }
    }
}

impl IrradianceOptions {
    /// Checks the options against a series of `len` timestamps.
    ///
    /// # Errors
    /// Returns `DataAlignment` for a turbidity series of another length and
    /// `InvalidParameter` for values outside their physical range.
    pub fn validate(&self, len: usize) -> Result<()> {
        self.linke_turbidity.check_len("Linke turbidity factor", len)?;
        self.linke_turbidity.try_for_each(check_linke_turbidity)?;
        if !(0.0..=1.0).contains(&self.albedo) {
            return Err(Error::invalid_parameter("albedo", self.albedo));
        }
        if !self.solar_constant.is_finite() || self.solar_constant <= 0.0 {
            return Err(Error::invalid_parameter("solar constant", self.solar_constant));
        }
        if self.apply_angular_loss
            && (!self.angular_loss_coefficient.is_finite() || self.angular_loss_coefficient <= 0.0)
        {
            return Err(Error::invalid_parameter(
                "angular loss coefficient",
                self.angular_loss_coefficient,
            ));
        }
        Ok(())
    }
}

/// Direct, diffuse and reflected irradiance on a surface, W/m².
///
/// Only [`decompose`] builds this value; every series has the length of the
/// solar geometry it came from.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct IrradianceComponents {
    direct: Vec<f64>,
    diffuse: Vec<f64>,
    reflected: Vec<f64>,
    extraterrestrial_normal: Vec<f64>,
    direct_normal: Vec<f64>,
    direct_horizontal: Vec<f64>,
    diffuse_horizontal: Vec<f64>,
    positions: Vec<SunHorizonPosition>,
    in_shade: Vec<bool>,
}

impl IrradianceComponents {
    /// Direct irradiance on the surface.
    #[must_use]
    pub fn direct(&self) -> &[f64] {
        &self.direct
    }

    /// Sky diffuse irradiance on the surface.
    #[must_use]
    pub fn diffuse(&self) -> &[f64] {
        &self.diffuse
    }

    /// Ground-reflected irradiance on the surface.
    #[must_use]
    pub fn reflected(&self) -> &[f64] {
        &self.reflected
    }

    /// Direct normal irradiance before projection and losses.
    #[must_use]
    pub fn direct_normal(&self) -> &[f64] {
        &self.direct_normal
    }

    /// Diffuse irradiance on the horizontal plane.
    #[must_use]
    pub fn diffuse_horizontal(&self) -> &[f64] {
        &self.diffuse_horizontal
    }

    /// Sun position class per timestamp.
    #[must_use]
    pub fn positions(&self) -> &[SunHorizonPosition] {
        &self.positions
    }

    /// Shade flags per timestamp.
    #[must_use]
    pub fn in_shade(&self) -> &[bool] {
        &self.in_shade
    }

    /// Number of timestamps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.direct.len()
    }

    /// Whether the components are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty()
    }

    /// Global irradiance on the surface, the sum of the three components.
    #[must_use]
    pub fn global(&self) -> Vec<f64> {
        self.direct
            .iter()
            .zip(&self.diffuse)
            .zip(&self.reflected)
            .map(|((b, d), r)| b + d + r)
            .collect()
    }

    /// Every series by name.
    #[must_use]
    pub fn components(&self) -> BTreeMap<&'static str, Vec<f64>> {
        BTreeMap::from([
            ("global inclined irradiance", self.global()),
            ("direct inclined irradiance", self.direct.clone()),
            ("diffuse inclined irradiance", self.diffuse.clone()),
            ("reflected inclined irradiance", self.reflected.clone()),
            ("extraterrestrial normal irradiance", self.extraterrestrial_normal.clone()),
            ("direct normal irradiance", self.direct_normal.clone()),
            ("direct horizontal irradiance", self.direct_horizontal.clone()),
            ("diffuse horizontal irradiance", self.diffuse_horizontal.clone()),
        ])
    }
}

/// Horizontal irradiance and extraterrestrial terms at one timestamp.
struct Horizontal {
    extraterrestrial: f64,
    extraterrestrial_horizontal: f64,
    direct_normal: f64,
    direct: f64,
    diffuse: f64,
}

fn clear_sky(location: &Location, extraterrestrial: f64, linke_turbidity: f64, altitude: f64) -> Horizontal {
    let extraterrestrial_horizontal = extraterrestrial_horizontal(extraterrestrial, altitude);
    if altitude <= 0.0 {
        return Horizontal {
            extraterrestrial,
            extraterrestrial_horizontal,
            direct_normal: 0.0,
            direct: 0.0,
            diffuse: 0.0,
        };
    }
    let air_mass = optical_air_mass(location.elevation(), refracted_altitude(altitude.to_degrees()));
    let direct_normal = clear_sky_direct_normal(extraterrestrial, linke_turbidity, air_mass);
    Horizontal {
        extraterrestrial,
        extraterrestrial_horizontal,
        direct_normal,
        direct: direct_normal * altitude.sin(),
        diffuse: clear_sky_diffuse_horizontal(extraterrestrial, linke_turbidity, altitude),
    }
}

fn measured_horizontal(measured: &HorizontalIrradiance, index: usize, extraterrestrial: f64, altitude: f64) -> Horizontal {
    let direct = measured.direct[index].max(0.0);
    Horizontal {
        extraterrestrial,
        extraterrestrial_horizontal: extraterrestrial_horizontal(extraterrestrial, altitude),
        direct_normal: direct_normal_from_horizontal(direct, altitude),
        direct,
        diffuse: measured.diffuse(index),
    }
}

/// Decomposes irradiance on `surface` at every timestamp of `geometry`.
///
/// Without `measured` series the clear-sky model supplies the horizontal
/// irradiance. Direct irradiance reaches the surface only when the sun is
/// [`SunHorizonPosition::Above`] and not in shade. Nothing reaches it with
/// the sun below the horizon.
///
/// # Errors
/// Returns `DataAlignment` for measured series of another length and
/// `InvalidParameter` for invalid options.
pub fn decompose(
    location: &Location,
    surface: &SurfaceGeometry,
    geometry: &SolarGeometry,
    options: &IrradianceOptions,
    measured: Option<&HorizontalIrradiance>,
) -> Result<IrradianceComponents> {
    let len = geometry.len();
    options.validate(len)?;
    if let Some(measured) = measured {
        check_alignment("global horizontal irradiance", len, measured.len())?;
    }
    let tilt = surface.tilt();
    let orientation = surface.orientation();
    let loss = options.apply_angular_loss;
    let coefficient = options.angular_loss_coefficient;
    let diffuse_transmission = if loss {
        isotropic_transmission(diffuse_angular_factor(tilt), coefficient)?
    } else {
        1.0
    };
    let reflected_transmission = if loss {
        isotropic_transmission(reflected_angular_factor(tilt), coefficient)?
    } else {
        1.0
    };

    let mut components = IrradianceComponents {
        direct: Vec::with_capacity(len),
        diffuse: Vec::with_capacity(len),
        reflected: Vec::with_capacity(len),
        extraterrestrial_normal: Vec::with_capacity(len),
        direct_normal: Vec::with_capacity(len),
        direct_horizontal: Vec::with_capacity(len),
        diffuse_horizontal: Vec::with_capacity(len),
        positions: Vec::with_capacity(len),
        in_shade: geometry.in_shade.clone(),
    };

    for i in 0..len {
        let altitude = geometry.altitude[i];
        let cosine = geometry.incidence_cosine[i];
        let position = SunHorizonPosition::classify(altitude);
        let g0 = extraterrestrial_normal(geometry.day_angle[i], options.solar_constant, options.orbit);
        let horizontal = match measured {
            Some(measured) => measured_horizontal(measured, i, g0, altitude),
            None => clear_sky(location, g0, options.linke_turbidity.at(i), altitude),
        };

        let (direct, diffuse, reflected) = if position == SunHorizonPosition::Below {
            (0.0, 0.0, 0.0)
        } else {
            let direct = if position == SunHorizonPosition::Above && !geometry.in_shade[i] {
                let transmission = if loss { direct_transmission(cosine, coefficient)? } else { 1.0 };
                direct_inclined(horizontal.direct_normal, cosine) * transmission
            } else {
                0.0
            };
            let sample = DiffuseSample {
                diffuse_horizontal: horizontal.diffuse,
                direct_horizontal: horizontal.direct,
                extraterrestrial_horizontal: horizontal.extraterrestrial_horizontal,
                altitude,
                azimuth: geometry.azimuth[i],
                incidence_cosine: cosine,
                in_shade: geometry.in_shade[i],
            };
            let diffuse = diffuse_inclined(&sample, tilt, orientation, options.flat_threshold)
                * diffuse_transmission;
            let global_horizontal = horizontal.direct + horizontal.diffuse;
            let reflected = if tilt <= options.flat_threshold {
                0.0
            } else {
                ground_reflected(global_horizontal, options.albedo, tilt) * reflected_transmission
            };
            (direct, diffuse, reflected)
        };

        components.direct.push(direct);
        components.diffuse.push(diffuse);
        components.reflected.push(reflected);
        components.extraterrestrial_normal.push(horizontal.extraterrestrial);
        components.direct_normal.push(horizontal.direct_normal);
        components.direct_horizontal.push(horizontal.direct);
        components.diffuse_horizontal.push(horizontal.diffuse);
        components.positions.push(position);
    }

    tracing::debug!(
        timestamps = len,
        measured = measured.is_some(),
        shaded = geometry.in_shade.iter().filter(|&&s| s).count(),
        "irradiance decomposed"
    );
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    fn noon_geometry(in_shade: bool) -> SolarGeometry {
        let altitude = 60f64.to_radians();
        SolarGeometry::new(
            vec![altitude, 0.02, -0.2],
            vec![180f64.to_radians(); 3],
            vec![(FRAC_PI_2 - altitude).cos(), 0.01, -0.5],
            vec![in_shade; 3],
            vec![3.0; 3],
        )
        .unwrap()
    }

    fn site() -> Location {
        Location::from_degrees(8.628, 45.812, 214.0).unwrap()
    }

    #[test]
    fn test_geometry_alignment() {
        let result = SolarGeometry::new(vec![0.1; 2], vec![0.1; 2], vec![0.1], vec![false; 2], vec![0.0; 2]);
        assert!(matches!(result, Err(Error::DataAlignment { .. })));
        assert!(matches!(
            SolarGeometry::new(vec![], vec![], vec![], vec![], vec![]),
            Err(Error::EmptyTimeSeries)
        ));
    }

    #[test]
    fn test_sun_position_classes() {
        assert_eq!(SunHorizonPosition::classify(-0.1), SunHorizonPosition::Below);
        assert_eq!(SunHorizonPosition::classify(0.0), SunHorizonPosition::Below);
        assert_eq!(SunHorizonPosition::classify(0.02), SunHorizonPosition::LowAngle);
        assert_eq!(SunHorizonPosition::classify(0.5), SunHorizonPosition::Above);
    }

    #[test]
    fn test_horizontal_surface_clear_sky() {
        let options = IrradianceOptions {
            apply_angular_loss: false,
            ..IrradianceOptions::default()
        };
        let components = decompose(&site(), &SurfaceGeometry::horizontal(), &noon_geometry(false), &options, None).unwrap();
        assert_eq!(components.diffuse()[0], components.diffuse_horizontal()[0]);
        assert_eq!(components.reflected()[0], 0.0);
        let direct_horizontal = components.components()["direct horizontal irradiance"][0];
        assert!((components.direct()[0] - direct_horizontal).abs() < 1e-9);
        // low sun: diffuse only; night: nothing
        assert_eq!(components.direct()[1], 0.0);
        assert!(components.diffuse()[1] > 0.0);
        assert_eq!(components.global()[2], 0.0);
        assert_eq!(
            components.positions(),
            &[SunHorizonPosition::Above, SunHorizonPosition::LowAngle, SunHorizonPosition::Below]
        );
    }

    #[test]
    fn test_shade_removes_direct_only() {
        let surface = SurfaceGeometry::from_degrees(180.0, 30.0).unwrap();
        let options = IrradianceOptions::default();
        let sunny = decompose(&site(), &surface, &noon_geometry(false), &options, None).unwrap();
        let shaded = decompose(&site(), &surface, &noon_geometry(true), &options, None).unwrap();
        assert!(sunny.direct()[0] > 0.0);
        assert_eq!(shaded.direct()[0], 0.0);
        assert!(shaded.diffuse()[0] > 0.0);
        assert!(shaded.diffuse()[0] < sunny.diffuse()[0]);
        assert_eq!(shaded.reflected()[0], sunny.reflected()[0]);
    }

    #[test]
    fn test_measured_series() {
        let measured = HorizontalIrradiance::new(vec![700.0, 30.0, 0.0], vec![500.0, 5.0, 0.0]).unwrap();
        let surface = SurfaceGeometry::from_degrees(180.0, 30.0).unwrap();
        let options = IrradianceOptions {
            apply_angular_loss: false,
            ..IrradianceOptions::default()
        };
        let components = decompose(&site(), &surface, &noon_geometry(false), &options, Some(&measured)).unwrap();
        assert!((components.diffuse_horizontal()[0] - 200.0).abs() < 1e-12);
        let expected_reflected = 700.0 * 0.2 * (1.0 - 30f64.to_radians().cos()) / 2.0;
        assert!((components.reflected()[0] - expected_reflected).abs() < 1e-9);
        // the beam is recovered from the horizontal measurement
        let normal = 500.0 / 60f64.to_radians().sin();
        assert!((components.direct_normal()[0] - normal).abs() < 1e-9);

        let short = HorizontalIrradiance::new(vec![1.0], vec![1.0]).unwrap();
        assert!(matches!(
            decompose(&site(), &surface, &noon_geometry(false), &options, Some(&short)),
            Err(Error::DataAlignment { .. })
        ));
    }

    #[test]
    fn test_angular_loss_reduces_components() {
        let surface = SurfaceGeometry::from_degrees(180.0, 30.0).unwrap();
        let lossless = IrradianceOptions {
            apply_angular_loss: false,
            ..IrradianceOptions::default()
        };
        let with_loss = decompose(&site(), &surface, &noon_geometry(false), &IrradianceOptions::default(), None).unwrap();
        let without = decompose(&site(), &surface, &noon_geometry(false), &lossless, None).unwrap();
        assert!(with_loss.direct()[0] < without.direct()[0]);
        assert!(with_loss.diffuse()[0] < without.diffuse()[0]);
        assert!(with_loss.reflected()[0] < without.reflected()[0]);
    }

    #[test]
    fn test_option_validation() {
        let geometry = noon_geometry(false);
        let surface = SurfaceGeometry::default();
        let bad_albedo = IrradianceOptions {
            albedo: 1.5,
            ..IrradianceOptions::default()
        };
        assert!(decompose(&site(), &surface, &geometry, &bad_albedo, None).is_err());
        let bad_turbidity = IrradianceOptions {
            linke_turbidity: Series::Values(vec![2.0, 9.0, 2.0]),
            ..IrradianceOptions::default()
        };
        assert!(decompose(&site(), &surface, &geometry, &bad_turbidity, None).is_err());
        let short_turbidity = IrradianceOptions {
            linke_turbidity: Series::Values(vec![2.0]),
            ..IrradianceOptions::default()
        };
        assert!(matches!(
            decompose(&site(), &surface, &geometry, &short_turbidity, None),
            Err(Error::DataAlignment { .. })
        ));
    }
}
