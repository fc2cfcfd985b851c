//! Solar position overview over the dependency graph of the calculators.
//!
//! A [`Session`] owns the memoization cache. Asking it for a quantity walks
//! the registry's dependency declarations, computes only the ancestors of
//! what was requested and reuses every intermediate series.

use crate::cache::{Cache, CacheStats};
use crate::constants::REFRACTED_SOLAR_ZENITH_ANGLE_DEFAULT;
use crate::models::{Algorithm, AlgorithmSelection};
use crate::position::declination::OrbitParameters;
use crate::position::events::{SolarEvents, solar_events};
use crate::position::incidence::IncidenceSettings;
use crate::position::solar_time::local_solar_time;
use crate::quantity::{AngularQuantity, Quantity};
use crate::registry::{self, Inputs};
use crate::types::{Location, SurfaceGeometry, TimeSeries};
use crate::Result;
use chrono::Duration;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

/// Options of the solar position calculators.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PositionOptions {
    /// Correct the NOAA zenith for atmospheric refraction.
    pub apply_refraction: bool,
    /// Zenith of the sun's center at sunrise and sunset, radians.
    pub event_zenith: f64,
    /// Orbit parameters of the single-sine declination.
    pub orbit: OrbitParameters,
    /// Output convention of the incidence angle.
    pub incidence: IncidenceSettings,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            apply_refraction: true,
            event_zenith: REFRACTED_SOLAR_ZENITH_ANGLE_DEFAULT,
            orbit: OrbitParameters::default(),
            incidence: IncidenceSettings::default(),
        }
    }
}

/// What to compute, where and when.
#[derive(Debug, Clone)]
pub struct PositionRequest {
    /// Site.
    pub location: Location,
    /// Timestamps of every output series.
    pub timestamps: TimeSeries,
    /// Receiving surface for the incidence angle.
    pub surface: SurfaceGeometry,
    /// Families per stage.
    pub selection: AlgorithmSelection,
    /// Calculator options.
    pub options: PositionOptions,
    /// Quantities to report; their ancestors are reported as well.
    pub quantities: Vec<Quantity>,
    /// Also compute sunrise, noon and sunset.
    pub events: bool,
}

impl PositionRequest {
    /// Requests altitude, azimuth and incidence with the default families.
    #[must_use]
    pub fn new(location: Location, timestamps: TimeSeries) -> Self {
        Self {
            location,
            timestamps,
            surface: SurfaceGeometry::default(),
            selection: AlgorithmSelection::default(),
            options: PositionOptions::default(),
            quantities: vec![Quantity::Altitude, Quantity::Azimuth, Quantity::Incidence],
            events: false,
        }
    }

    /// Sets the receiving surface.
    #[must_use]
    pub const fn with_surface(mut self, surface: SurfaceGeometry) -> Self {
        self.surface = surface;
        self
    }

    /// Sets the algorithm families.
    #[must_use]
    pub const fn with_selection(mut self, selection: AlgorithmSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the calculator options.
    #[must_use]
    pub const fn with_options(mut self, options: PositionOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the requested quantities.
    #[must_use]
    pub fn with_quantities(mut self, quantities: impl IntoIterator<Item = Quantity>) -> Self {
        self.quantities = quantities.into_iter().collect();
        self
    }

    /// Enables or disables the computation of solar events.
    #[must_use]
    pub const fn with_events(mut self, events: bool) -> Self {
        self.events = events;
        self
    }

    fn inputs(&self) -> Inputs<'_> {
        Inputs {
            location: &self.location,
            timestamps: &self.timestamps,
            surface: &self.surface,
            selection: self.selection,
            options: &self.options,
        }
    }

    fn targets(&self) -> Vec<Quantity> {
        let mut targets = self.quantities.clone();
        if self.events {
            targets.extend([Quantity::EquationOfTime, Quantity::Declination]);
        }
        targets
    }
}

/// Every series computed for a request.
///
/// A field is `Some` when the quantity was requested or needed by one that
/// was. Intermediate series of another family than the selected one (the
/// NOAA zenith feeding Iqbal incidence, for instance) are not reported.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolarPositionOverview {
    /// Fractional year.
    pub fractional_year: Option<AngularQuantity>,
    /// Day angle.
    pub day_angle: Option<AngularQuantity>,
    /// Equation of time.
    pub equation_of_time: Option<AngularQuantity>,
    /// Time offset.
    pub time_offset: Option<AngularQuantity>,
    /// True solar time.
    pub true_solar_time: Option<AngularQuantity>,
    /// Hour angle.
    pub hour_angle: Option<AngularQuantity>,
    /// Declination.
    pub declination: Option<AngularQuantity>,
    /// Zenith.
    pub zenith: Option<AngularQuantity>,
    /// Altitude.
    pub altitude: Option<AngularQuantity>,
    /// Azimuth.
    pub azimuth: Option<AngularQuantity>,
    /// Incidence on the surface.
    pub incidence: Option<AngularQuantity>,
    /// Hour angle at sunrise and sunset.
    pub event_hour_angle: Option<AngularQuantity>,
    /// Sunrise, noon and sunset per timestamp.
    pub events: Option<Vec<SolarEvents>>,
}

impl SolarPositionOverview {
    /// Series of `kind`, if computed.
    #[must_use]
    pub const fn get(&self, kind: Quantity) -> Option<&AngularQuantity> {
        match kind {
            Quantity::FractionalYear => self.fractional_year.as_ref(),
            Quantity::DayAngle => self.day_angle.as_ref(),
            Quantity::EquationOfTime => self.equation_of_time.as_ref(),
            Quantity::TimeOffset => self.time_offset.as_ref(),
            Quantity::TrueSolarTime => self.true_solar_time.as_ref(),
            Quantity::HourAngle => self.hour_angle.as_ref(),
            Quantity::Declination => self.declination.as_ref(),
            Quantity::Zenith => self.zenith.as_ref(),
            Quantity::Altitude => self.altitude.as_ref(),
            Quantity::Azimuth => self.azimuth.as_ref(),
            Quantity::Incidence => self.incidence.as_ref(),
            Quantity::EventHourAngle => self.event_hour_angle.as_ref(),
        }
    }

    fn slot(&mut self, kind: Quantity) -> &mut Option<AngularQuantity> {
        match kind {
            Quantity::FractionalYear => &mut self.fractional_year,
            Quantity::DayAngle => &mut self.day_angle,
            Quantity::EquationOfTime => &mut self.equation_of_time,
            Quantity::TimeOffset => &mut self.time_offset,
            Quantity::TrueSolarTime => &mut self.true_solar_time,
            Quantity::HourAngle => &mut self.hour_angle,
            Quantity::Declination => &mut self.declination,
            Quantity::Zenith => &mut self.zenith,
            Quantity::Altitude => &mut self.altitude,
            Quantity::Azimuth => &mut self.azimuth,
            Quantity::Incidence => &mut self.incidence,
            Quantity::EventHourAngle => &mut self.event_hour_angle,
        }
    }

    /// Time since the most recent solar noon, when the true solar time was computed.
    #[must_use]
    pub fn local_solar_time(&self) -> Option<Vec<Duration>> {
        self.true_solar_time.as_ref().map(local_solar_time)
    }

    /// Flattens the overview into named series in canonical units.
    ///
    /// Indices flagged by a warning range policy appear under
    /// `"<name> out of range"`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn diagnostics(&self) -> BTreeMap<String, Vec<f64>> {
        let mut map = BTreeMap::new();
        for kind in Quantity::ALL {
            let Some(quantity) = self.get(kind) else {
                continue;
            };
            map.insert(kind.name().to_owned(), quantity.values().to_vec());
            if !quantity.out_of_range().is_empty() {
                map.insert(
                    format!("{} out of range", kind.name()),
                    quantity.out_of_range().iter().map(|&i| i as f64).collect(),
                );
            }
        }
        if let Some(elapsed) = self.local_solar_time() {
            map.insert(
                "local solar time".to_owned(),
                elapsed
                    .iter()
                    .map(|d| d.num_milliseconds() as f64 / 60_000.0)
                    .collect(),
            );
        }
        map
    }
}

/// Owner of the cache shared by the calculators of one or more requests.
#[derive(Debug, Default)]
pub struct Session {
    cache: Cache<Rc<AngularQuantity>>,
}

impl Session {
    /// Session with an unbounded cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session keeping at most `capacity` series.
    #[must_use]
    pub fn bounded(capacity: usize) -> Self {
        Self {
            cache: Cache::bounded(capacity),
        }
    }

    /// Hit and miss counters of the cache.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Computes `kind` with `algorithm`, or returns the cached series.
    ///
    /// # Errors
    /// Propagates registry and calculator errors. Failures are not cached.
    pub fn resolve(
        &mut self,
        kind: Quantity,
        algorithm: Algorithm,
        inputs: &Inputs<'_>,
    ) -> Result<Rc<AngularQuantity>> {
        let key = registry::cache_key(kind, algorithm, inputs)?;
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let value = Rc::new(registry::compute(kind, algorithm, inputs, self)?);
        self.cache.insert(key, Rc::clone(&value));
        Ok(value)
    }

    /// Computes `kind` with the family chosen by the selection in `inputs`.
    ///
    /// # Errors
    /// Propagates registry and calculator errors.
    pub fn resolve_selected(
        &mut self,
        kind: Quantity,
        inputs: &Inputs<'_>,
    ) -> Result<Rc<AngularQuantity>> {
        self.resolve(kind, inputs.selection.for_quantity(kind), inputs)
    }

    /// Calculators needed by `request`, dependencies first.
    ///
    /// # Errors
    /// Returns `UnsupportedAlgorithm` when a node of the graph has no
    /// calculator in the selected family.
    pub fn plan(request: &PositionRequest) -> Result<Vec<(Quantity, Algorithm)>> {
        fn visit(
            node: (Quantity, Algorithm),
            selection: &AlgorithmSelection,
            seen: &mut HashSet<(Quantity, Algorithm)>,
            order: &mut Vec<(Quantity, Algorithm)>,
        ) -> Result<()> {
            if !seen.insert(node) {
                return Ok(());
            }
            let spec = registry::lookup(node.0, node.1)?;
            for dependency in spec.dependencies {
                let child = (dependency.kind, dependency.algorithm(selection));
                visit(child, selection, seen, order)?;
            }
            order.push(node);
            Ok(())
        }

        let selection = request.selection;
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        for kind in request.targets() {
            visit(
                (kind, selection.for_quantity(kind)),
                &selection,
                &mut seen,
                &mut order,
            )?;
        }
        Ok(order)
    }

    /// Computes every requested quantity and its ancestors.
    ///
    /// # Errors
    /// Returns `IncompatibleAlgorithms` for an invalid selection and
    /// propagates every calculator error.
    ///
    /// # Example
    /// ```
    /// use pvgis_core::pipeline::{PositionRequest, Session};
    /// use pvgis_core::{Location, Quantity, TimeSeries};
    ///
    /// let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
    /// let timestamps = TimeSeries::new(vec!["2023-06-21T12:00:00Z".parse().unwrap()]).unwrap();
    /// let request = PositionRequest::new(location, timestamps)
    ///     .with_quantities([Quantity::Altitude]);
    ///
    /// let overview = Session::new().overview(&request).unwrap();
    /// let altitude = overview.altitude.unwrap().degrees()[0];
    /// assert!((altitude - 66.7).abs() < 0.5);
    /// assert!(overview.declination.is_some());
    /// assert!(overview.incidence.is_none());
    /// ```
    pub fn overview(&mut self, request: &PositionRequest) -> Result<SolarPositionOverview> {
        request.selection.check_pairing()?;
        let plan = Self::plan(request)?;
        let inputs = request.inputs();
        tracing::debug!(steps = plan.len(), "solar position plan");

        let mut overview = SolarPositionOverview::default();
        for (kind, algorithm) in plan {
            let value = self.resolve(kind, algorithm, &inputs)?;
            if algorithm == request.selection.for_quantity(kind) {
                *overview.slot(kind) = Some(AngularQuantity::clone(&value));
            }
        }

        if request.events {
            let eot = self.resolve_selected(Quantity::EquationOfTime, &inputs)?;
            let declination = self.resolve_selected(Quantity::Declination, &inputs)?;
            overview.events = Some(solar_events(
                &request.timestamps,
                &request.location,
                &eot,
                &declination,
                request.options.event_zenith,
            )?);
        }
        Ok(overview)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let stats = self.cache.stats();
        tracing::debug!(
            hits = stats.hits,
            misses = stats.misses,
            entries = stats.entries,
            evictions = stats.evictions,
            "session cache"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::units::AzimuthOrigin;
    use core::f64::consts::FRAC_PI_2;

    fn request(quantities: &[Quantity]) -> PositionRequest {
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        let timestamps = TimeSeries::new(vec![
            "2023-06-21T06:00:00Z".parse().unwrap(),
            "2023-06-21T12:00:00Z".parse().unwrap(),
            "2023-06-21T18:00:00Z".parse().unwrap(),
        ])
        .unwrap();
        PositionRequest::new(location, timestamps).with_quantities(quantities.iter().copied())
    }

    #[test]
    fn test_plan_is_topological() {
        let plan = Session::plan(&request(&[Quantity::Incidence])).unwrap();
        let position = |kind| plan.iter().position(|(k, _)| *k == kind).unwrap();
        assert!(position(Quantity::FractionalYear) < position(Quantity::EquationOfTime));
        assert!(position(Quantity::TrueSolarTime) < position(Quantity::HourAngle));
        assert!(position(Quantity::Zenith) < position(Quantity::Azimuth));
        assert_eq!(plan.last().map(|(k, _)| *k), Some(Quantity::Incidence));
        assert!(!plan.iter().any(|(k, _)| *k == Quantity::DayAngle));
    }

    #[test]
    fn test_only_ancestors_are_computed() {
        let mut session = Session::new();
        let overview = session.overview(&request(&[Quantity::Declination])).unwrap();
        assert!(overview.declination.is_some());
        assert!(overview.fractional_year.is_some());
        assert!(overview.hour_angle.is_none());
        assert!(overview.zenith.is_none());
        assert_eq!(session.cache_stats().entries, 2);
    }

    #[test]
    fn test_repeated_request_hits_cache() {
        let mut session = Session::new();
        let request = request(&[Quantity::Azimuth]);
        let first = session.overview(&request).unwrap();
        let misses = session.cache_stats().misses;
        let second = session.overview(&request).unwrap();
        assert_eq!(first, second);
        assert_eq!(session.cache_stats().misses, misses);
        assert!(session.cache_stats().hits > 0);
    }

    #[test]
    fn test_families_are_tagged() {
        let selection = AlgorithmSelection::family(Algorithm::Jenco)
            .with_incidence(Algorithm::Jenco)
            .with_timing(Algorithm::Milne1921);
        let request = request(&[Quantity::Azimuth, Quantity::Incidence]).with_selection(selection);
        let overview = Session::new().overview(&request).unwrap();
        assert_eq!(
            overview.azimuth.as_ref().and_then(AngularQuantity::algorithm),
            Some(Algorithm::Jenco)
        );
        assert_eq!(
            overview.true_solar_time.as_ref().and_then(AngularQuantity::algorithm),
            Some(Algorithm::Milne1921)
        );
        assert_eq!(overview.day_angle.as_ref().map(AngularQuantity::len), Some(3));
        // the morning sun is east of south
        let azimuth = overview.azimuth.unwrap().to_origin(AzimuthOrigin::North).unwrap();
        assert!(azimuth.degrees()[0] < 180.0);
    }

    #[test]
    fn test_invalid_pairing_is_rejected() {
        let selection = AlgorithmSelection::family(Algorithm::Pvis);
        let result =
            Session::new().overview(&request(&[Quantity::Incidence]).with_selection(selection));
        assert!(matches!(result, Err(Error::IncompatibleAlgorithms { .. })));

        let pvis = selection.with_incidence(Algorithm::Pvis);
        let overview = Session::new()
            .overview(&request(&[Quantity::Incidence]).with_selection(pvis))
            .unwrap();
        assert!(overview.incidence.is_some());
    }

    #[test]
    fn test_events_and_diagnostics() {
        let overview = Session::new()
            .overview(&request(&[Quantity::Altitude, Quantity::TrueSolarTime]).with_events(true))
            .unwrap();
        let events = overview.events.as_ref().unwrap();
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(SolarEvents::is_regular_day));

        let diagnostics = overview.diagnostics();
        assert_eq!(diagnostics["solar altitude"].len(), 3);
        assert!(diagnostics.contains_key("local solar time"));
        assert!(diagnostics["solar altitude"][1] < FRAC_PI_2);
    }
}
