//! Lookup table from quantity and algorithm family to calculator.
//!
//! Every entry declares the quantities it consumes and the request
//! parameters it reads. [`compute`] resolves the quantities through the
//! session cache and calls the calculator; [`cache_key`] keys a series on
//! the parameters its whole dependency closure reads, and nothing else.

use crate::cache::{CacheKey, Key};
use crate::models::{Algorithm, AlgorithmSelection};
use crate::pipeline::{PositionOptions, Session};
use crate::position::{
    azimuth, declination, equation_of_time, events, fractional_year, incidence, range_policy,
    solar_time, zenith,
};
use crate::quantity::{AngularQuantity, Quantity, RangePolicy};
use crate::types::{Location, SurfaceGeometry, TimeSeries};
use crate::{Error, Result};
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use Parameter::{EventZenith, IncidenceConvention, Orbit, Refraction, Site, Surface};
use Algorithm::{Hargreaves, Hofierka, Iqbal, Jenco, Milne1921, Noaa, Pvis};
use Quantity::{
    Altitude, Azimuth, DayAngle, Declination, EquationOfTime, EventHourAngle, FractionalYear,
    HourAngle, Incidence, TimeOffset, TrueSolarTime, Zenith,
};

/// Everything a calculator may read besides the quantities it depends on.
#[derive(Debug, Clone, Copy)]
pub struct Inputs<'a> {
    /// Site of the computation.
    pub location: &'a Location,
    /// Timestamps every series is aligned to.
    pub timestamps: &'a TimeSeries,
    /// Receiving surface, used by incidence calculators.
    pub surface: &'a SurfaceGeometry,
    /// Families chosen for each stage.
    pub selection: AlgorithmSelection,
    /// Model options.
    pub options: &'a PositionOptions,
}

/// A request parameter read by a calculator besides the timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    /// Longitude, latitude and elevation.
    Site,
    /// Orientation and tilt of the receiving surface.
    Surface,
    /// Orbit parameters of the single-sine declination.
    Orbit,
    /// Whether the zenith is corrected for refraction.
    Refraction,
    /// Output convention of the incidence angle.
    IncidenceConvention,
    /// Zenith of the sun's center at sunrise and sunset.
    EventZenith,
}

/// A quantity consumed by a calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency {
    /// Quantity consumed.
    pub kind: Quantity,
    /// Family fixed by the calculator, or `None` to follow the selection.
    pub family: Option<Algorithm>,
}

impl Dependency {
    const fn selected(kind: Quantity) -> Self {
        Self { kind, family: None }
    }

    const fn pinned(kind: Quantity, family: Algorithm) -> Self {
        Self {
            kind,
            family: Some(family),
        }
    }

    /// Family resolving this dependency under `selection`.
    #[must_use]
    pub fn algorithm(&self, selection: &AlgorithmSelection) -> Algorithm {
        self.family
            .unwrap_or_else(|| selection.for_quantity(self.kind))
    }
}

type Compute = fn(&Inputs<'_>, &[Rc<AngularQuantity>]) -> Result<AngularQuantity>;

/// One registered calculator.
#[derive(Debug, Clone, Copy)]
pub struct CalculatorSpec {
    /// Quantity produced.
    pub kind: Quantity,
    /// Family implemented.
    pub algorithm: Algorithm,
    /// Quantities consumed, in the order the calculator expects them.
    pub dependencies: &'static [Dependency],
    /// Parameters read directly, not through a dependency.
    pub reads: &'static [Parameter],
    compute: Compute,
}

impl CalculatorSpec {
    /// Range policy applied to the output.
    #[must_use]
    pub const fn policy(&self) -> RangePolicy {
        range_policy(self.kind, self.algorithm)
    }
}

fn unpack<const N: usize>(
    dependencies: &[Rc<AngularQuantity>],
) -> Result<&[Rc<AngularQuantity>; N]> {
    dependencies.try_into().map_err(|_| {
        Error::incompatible_algorithms("resolved dependencies do not match the calculator")
    })
}

const NONE: &[Dependency] = &[];
const NO_READS: &[Parameter] = &[];
const POSITION: &[Dependency] = &[
    Dependency::selected(Declination),
    Dependency::selected(HourAngle),
];

static CALCULATORS: &[CalculatorSpec] = &[
    CalculatorSpec {
        kind: FractionalYear,
        algorithm: Noaa,
        reads: NO_READS,
        dependencies: NONE,
        compute: |inputs, _| fractional_year::fractional_year_noaa(inputs.timestamps),
    },
    CalculatorSpec {
        kind: FractionalYear,
        algorithm: Pvis,
        reads: NO_READS,
        dependencies: NONE,
        compute: |inputs, _| fractional_year::fractional_year_pvis(inputs.timestamps),
    },
    CalculatorSpec {
        kind: DayAngle,
        algorithm: Hofierka,
        reads: NO_READS,
        dependencies: NONE,
        compute: |inputs, _| fractional_year::day_angle_hofierka(inputs.timestamps),
    },
    CalculatorSpec {
        kind: EquationOfTime,
        algorithm: Noaa,
        reads: NO_READS,
        dependencies: &[Dependency::pinned(FractionalYear, Noaa)],
        compute: |_, deps| {
            let [gamma] = unpack::<1>(deps)?;
            equation_of_time::equation_of_time_noaa(gamma)
        },
    },
    CalculatorSpec {
        kind: EquationOfTime,
        algorithm: Milne1921,
        reads: NO_READS,
        dependencies: NONE,
        compute: |inputs, _| equation_of_time::equation_of_time_milne(inputs.timestamps),
    },
    CalculatorSpec {
        kind: TimeOffset,
        algorithm: Noaa,
        reads: &[Site],
        dependencies: &[Dependency::pinned(EquationOfTime, Noaa)],
        compute: time_offset,
    },
    CalculatorSpec {
        kind: TimeOffset,
        algorithm: Milne1921,
        reads: &[Site],
        dependencies: &[Dependency::pinned(EquationOfTime, Milne1921)],
        compute: time_offset,
    },
    CalculatorSpec {
        kind: TrueSolarTime,
        algorithm: Noaa,
        reads: NO_READS,
        dependencies: &[Dependency::pinned(TimeOffset, Noaa)],
        compute: true_solar_time,
    },
    CalculatorSpec {
        kind: TrueSolarTime,
        algorithm: Milne1921,
        reads: NO_READS,
        dependencies: &[Dependency::pinned(TimeOffset, Milne1921)],
        compute: true_solar_time,
    },
    CalculatorSpec {
        kind: HourAngle,
        algorithm: Noaa,
        reads: NO_READS,
        dependencies: &[Dependency::selected(TrueSolarTime)],
        compute: |_, deps| {
            let [tst] = unpack::<1>(deps)?;
            solar_time::hour_angle_noaa(tst)
        },
    },
    CalculatorSpec {
        kind: HourAngle,
        algorithm: Hofierka,
        reads: NO_READS,
        dependencies: &[Dependency::selected(TrueSolarTime)],
        compute: |_, deps| {
            let [tst] = unpack::<1>(deps)?;
            solar_time::hour_angle_hofierka(Hofierka, tst)
        },
    },
    CalculatorSpec {
        kind: HourAngle,
        algorithm: Pvis,
        reads: NO_READS,
        dependencies: &[Dependency::selected(TrueSolarTime)],
        compute: |_, deps| {
            let [tst] = unpack::<1>(deps)?;
            solar_time::hour_angle_hofierka(Pvis, tst)
        },
    },
    CalculatorSpec {
        kind: Declination,
        algorithm: Noaa,
        reads: NO_READS,
        dependencies: &[Dependency::pinned(FractionalYear, Noaa)],
        compute: |_, deps| {
            let [gamma] = unpack::<1>(deps)?;
            declination::declination_noaa(gamma)
        },
    },
    CalculatorSpec {
        kind: Declination,
        algorithm: Hofierka,
        reads: &[Orbit],
        dependencies: &[Dependency::pinned(DayAngle, Hofierka)],
        compute: |inputs, deps| {
            let [day_angle] = unpack::<1>(deps)?;
            declination::declination_hofierka(Hofierka, day_angle, inputs.options.orbit)
        },
    },
    CalculatorSpec {
        kind: Declination,
        algorithm: Jenco,
        reads: &[Orbit],
        dependencies: &[Dependency::pinned(DayAngle, Hofierka)],
        compute: |inputs, deps| {
            let [day_angle] = unpack::<1>(deps)?;
            declination::declination_hofierka(Jenco, day_angle, inputs.options.orbit)
        },
    },
    CalculatorSpec {
        kind: Declination,
        algorithm: Pvis,
        reads: &[Orbit],
        dependencies: &[Dependency::pinned(FractionalYear, Pvis)],
        compute: |inputs, deps| {
            let [gamma] = unpack::<1>(deps)?;
            declination::declination_pvis(gamma, inputs.options.orbit)
        },
    },
    CalculatorSpec {
        kind: Declination,
        algorithm: Hargreaves,
        reads: NO_READS,
        dependencies: NONE,
        compute: |inputs, _| declination::declination_hargreaves(inputs.timestamps),
    },
    CalculatorSpec {
        kind: Zenith,
        algorithm: Noaa,
        reads: &[Site, Refraction],
        dependencies: POSITION,
        compute: |inputs, deps| {
            let [delta, omega] = unpack::<2>(deps)?;
            zenith::zenith_noaa(
                inputs.location,
                delta,
                omega,
                inputs.options.apply_refraction,
            )
        },
    },
    CalculatorSpec {
        kind: Altitude,
        algorithm: Noaa,
        reads: NO_READS,
        dependencies: &[Dependency::pinned(Zenith, Noaa)],
        compute: |_, deps| {
            let [zenith] = unpack::<1>(deps)?;
            zenith::altitude_noaa(zenith)
        },
    },
    CalculatorSpec {
        kind: Altitude,
        algorithm: Hofierka,
        reads: &[Site],
        dependencies: POSITION,
        compute: |inputs, deps| altitude_direct(Hofierka, inputs, deps),
    },
    CalculatorSpec {
        kind: Altitude,
        algorithm: Jenco,
        reads: &[Site],
        dependencies: POSITION,
        compute: |inputs, deps| altitude_direct(Jenco, inputs, deps),
    },
    CalculatorSpec {
        kind: Altitude,
        algorithm: Pvis,
        reads: &[Site],
        dependencies: POSITION,
        compute: |inputs, deps| altitude_direct(Pvis, inputs, deps),
    },
    CalculatorSpec {
        kind: Azimuth,
        algorithm: Noaa,
        reads: &[Site],
        dependencies: &[
            Dependency::selected(Declination),
            Dependency::selected(HourAngle),
            Dependency::pinned(Zenith, Noaa),
        ],
        compute: |inputs, deps| {
            let [delta, omega, zenith] = unpack::<3>(deps)?;
            azimuth::azimuth_noaa(inputs.location, delta, omega, zenith)
        },
    },
    CalculatorSpec {
        kind: Azimuth,
        algorithm: Jenco,
        reads: &[Site],
        dependencies: &[
            Dependency::selected(Declination),
            Dependency::selected(HourAngle),
            Dependency::pinned(Altitude, Jenco),
        ],
        compute: |inputs, deps| azimuth_from_altitude(Jenco, inputs, deps),
    },
    CalculatorSpec {
        kind: Azimuth,
        algorithm: Hofierka,
        reads: &[Site],
        dependencies: &[
            Dependency::selected(Declination),
            Dependency::selected(HourAngle),
            Dependency::pinned(Altitude, Hofierka),
        ],
        compute: |inputs, deps| azimuth_from_altitude(Hofierka, inputs, deps),
    },
    CalculatorSpec {
        kind: Incidence,
        algorithm: Iqbal,
        reads: &[Surface, IncidenceConvention],
        dependencies: &[
            Dependency::pinned(Zenith, Noaa),
            Dependency::selected(Azimuth),
        ],
        compute: |inputs, deps| {
            let [zenith, azimuth] = unpack::<2>(deps)?;
            incidence::incidence_iqbal(inputs.surface, zenith, azimuth, inputs.options.incidence)
        },
    },
    CalculatorSpec {
        kind: Incidence,
        algorithm: Jenco,
        reads: &[Site, Surface, IncidenceConvention],
        dependencies: &[
            Dependency::selected(Declination),
            Dependency::selected(HourAngle),
            Dependency::selected(Altitude),
        ],
        compute: |inputs, deps| {
            let [delta, omega, altitude] = unpack::<3>(deps)?;
            incidence::incidence_jenco(
                inputs.location,
                inputs.surface,
                delta,
                omega,
                altitude,
                inputs.options.incidence,
            )
        },
    },
    CalculatorSpec {
        kind: Incidence,
        algorithm: Pvis,
        reads: &[Site, Surface, IncidenceConvention],
        dependencies: POSITION,
        compute: |inputs, deps| {
            let [delta, omega] = unpack::<2>(deps)?;
            incidence::incidence_pvis(
                inputs.location,
                inputs.surface,
                delta,
                omega,
                inputs.options.incidence,
            )
        },
    },
    CalculatorSpec {
        kind: EventHourAngle,
        algorithm: Noaa,
        reads: &[Site, EventZenith],
        dependencies: &[Dependency::selected(Declination)],
        compute: |inputs, deps| {
            let [delta] = unpack::<1>(deps)?;
            events::event_hour_angle(inputs.location, delta, inputs.options.event_zenith)
        },
    },
];

fn time_offset(inputs: &Inputs<'_>, deps: &[Rc<AngularQuantity>]) -> Result<AngularQuantity> {
    let [eot] = unpack::<1>(deps)?;
    solar_time::time_offset(inputs.timestamps, inputs.location, eot)
}

fn true_solar_time(inputs: &Inputs<'_>, deps: &[Rc<AngularQuantity>]) -> Result<AngularQuantity> {
    let [offset] = unpack::<1>(deps)?;
    solar_time::true_solar_time(inputs.timestamps, offset)
}

fn altitude_direct(
    algorithm: Algorithm,
    inputs: &Inputs<'_>,
    deps: &[Rc<AngularQuantity>],
) -> Result<AngularQuantity> {
    let [delta, omega] = unpack::<2>(deps)?;
    zenith::altitude_hofierka(algorithm, inputs.location, delta, omega)
}

fn azimuth_from_altitude(
    algorithm: Algorithm,
    inputs: &Inputs<'_>,
    deps: &[Rc<AngularQuantity>],
) -> Result<AngularQuantity> {
    let [delta, omega, altitude] = unpack::<3>(deps)?;
    azimuth::azimuth_jenco(algorithm, inputs.location, delta, omega, altitude)
}

/// Registered calculator for `kind` in family `algorithm`.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` when the pair is not registered.
pub fn lookup(kind: Quantity, algorithm: Algorithm) -> Result<&'static CalculatorSpec> {
    CALCULATORS
        .iter()
        .find(|spec| spec.kind == kind && spec.algorithm == algorithm)
        .ok_or_else(|| Error::unsupported_algorithm(kind, algorithm))
}

/// Families registered for `kind`, in table order.
///
/// # Example
/// ```
/// use pvgis_core::{Algorithm, Quantity, registry};
///
/// let families = registry::available(Quantity::Declination);
/// assert!(families.contains(&Algorithm::Hargreaves));
/// assert!(!registry::available(Quantity::Azimuth).contains(&Algorithm::Pvis));
/// ```
#[must_use]
pub fn available(kind: Quantity) -> Vec<Algorithm> {
    CALCULATORS
        .iter()
        .filter(|spec| spec.kind == kind)
        .map(|spec| spec.algorithm)
        .collect()
}

/// Every registered calculator.
#[must_use]
pub fn calculators() -> &'static [CalculatorSpec] {
    CALCULATORS
}

fn closure(
    kind: Quantity,
    algorithm: Algorithm,
    selection: &AlgorithmSelection,
    nodes: &mut Vec<(Quantity, Algorithm)>,
    reads: &mut Vec<Parameter>,
) -> Result<()> {
    if nodes.contains(&(kind, algorithm)) {
        return Ok(());
    }
    let spec = lookup(kind, algorithm)?;
    nodes.push((kind, algorithm));
    reads.extend_from_slice(spec.reads);
    for dependency in spec.dependencies {
        closure(
            dependency.kind,
            dependency.algorithm(selection),
            selection,
            nodes,
            reads,
        )?;
    }
    Ok(())
}

struct ClosureKey<'a, 'b> {
    nodes: &'a [(Quantity, Algorithm)],
    reads: &'a [Parameter],
    inputs: &'a Inputs<'b>,
}

impl CacheKey for ClosureKey<'_, '_> {
    fn write_key<H: Hasher>(&self, state: &mut H) {
        self.nodes.write_key(state);
        self.inputs.timestamps.write_key(state);
        let options = self.inputs.options;
        for parameter in self.reads {
            parameter.hash(state);
            match parameter {
                Site => self.inputs.location.write_key(state),
                Surface => self.inputs.surface.write_key(state),
                Orbit => {
                    options.orbit.perigee_offset.write_key(state);
                    options.orbit.eccentricity.write_key(state);
                }
                Refraction => options.apply_refraction.write_key(state),
                IncidenceConvention => options.incidence.hash(state),
                EventZenith => options.event_zenith.write_key(state),
            }
        }
    }
}

/// Cache key of `kind` computed with `algorithm` under `inputs`.
///
/// The key covers the calculators of the dependency closure, the
/// timestamps and only the parameters that closure reads. Two requests
/// differing in a parameter no calculator of the closure reads share the
/// key.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` when a node of the closure is not registered.
pub fn cache_key(kind: Quantity, algorithm: Algorithm, inputs: &Inputs<'_>) -> Result<Key> {
    let mut nodes = Vec::new();
    let mut reads = Vec::new();
    closure(kind, algorithm, &inputs.selection, &mut nodes, &mut reads)?;
    reads.sort_unstable();
    reads.dedup();
    Ok(Key::new(
        kind.name(),
        &ClosureKey {
            nodes: &nodes,
            reads: &reads,
            inputs,
        },
    ))
}

/// Computes `kind` with `algorithm`, resolving its dependencies through `session`.
///
/// # Errors
/// Returns `UnsupportedAlgorithm` for an unregistered pair and propagates
/// every error of the dependencies and the calculator.
pub fn compute(
    kind: Quantity,
    algorithm: Algorithm,
    inputs: &Inputs<'_>,
    session: &mut Session,
) -> Result<AngularQuantity> {
    let spec = lookup(kind, algorithm)?;
    let dependencies = spec
        .dependencies
        .iter()
        .map(|dependency| {
            session.resolve(dependency.kind, dependency.algorithm(&inputs.selection), inputs)
        })
        .collect::<Result<Vec<_>>>()?;
    tracing::trace!(quantity = kind.name(), algorithm = algorithm.name(), "dispatch");
    (spec.compute)(inputs, &dependencies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_unique_entries() {
        let mut seen = HashSet::new();
        for spec in calculators() {
            assert!(
                seen.insert((spec.kind, spec.algorithm)),
                "duplicate {} / {}",
                spec.kind,
                spec.algorithm
            );
        }
    }

    #[test]
    fn test_every_quantity_has_a_calculator() {
        for kind in Quantity::ALL {
            assert!(!available(kind).is_empty(), "{kind}");
        }
    }

    #[test]
    fn test_pinned_dependencies_are_registered() {
        for spec in calculators() {
            for dependency in spec.dependencies {
                if let Some(family) = dependency.family {
                    assert!(lookup(dependency.kind, family).is_ok());
                }
            }
        }
    }

    #[test]
    fn test_keys_ignore_unread_parameters() {
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        let start = "2023-06-21T08:00:00Z".parse().unwrap();
        let timestamps = TimeSeries::new(vec![start]).unwrap();
        let flat = SurfaceGeometry::from_degrees(180.0, 0.0).unwrap();
        let tilted = SurfaceGeometry::from_degrees(180.0, 30.0).unwrap();
        let options = PositionOptions::default();
        let inputs = |surface| Inputs {
            location: &location,
            timestamps: &timestamps,
            surface,
            selection: AlgorithmSelection::default(),
            options: &options,
        };
        let key = |kind, surface| {
            let algorithm = AlgorithmSelection::default().for_quantity(kind);
            cache_key(kind, algorithm, &inputs(surface)).unwrap()
        };
        assert_eq!(key(Quantity::Declination, &flat), key(Quantity::Declination, &tilted));
        assert_eq!(key(Quantity::Azimuth, &flat), key(Quantity::Azimuth, &tilted));
        assert_ne!(key(Quantity::Incidence, &flat), key(Quantity::Incidence, &tilted));
    }

    #[test]
    fn test_keys_follow_the_selected_ancestors() {
        let location = Location::from_degrees(8.628, 45.812, 214.0).unwrap();
        let start = "2023-06-21T08:00:00Z".parse().unwrap();
        let timestamps = TimeSeries::new(vec![start]).unwrap();
        let surface = SurfaceGeometry::default();
        let options = PositionOptions::default();
        let inputs = |selection| Inputs {
            location: &location,
            timestamps: &timestamps,
            surface: &surface,
            selection,
            options: &options,
        };
        let noaa = AlgorithmSelection::default();
        let milne = noaa.with_timing(Algorithm::Milne1921);
        assert_ne!(
            cache_key(Quantity::HourAngle, Algorithm::Noaa, &inputs(noaa)).unwrap(),
            cache_key(Quantity::HourAngle, Algorithm::Noaa, &inputs(milne)).unwrap()
        );
    }

    #[test]
    fn test_unknown_pair() {
        assert_eq!(
            lookup(Quantity::Azimuth, Algorithm::Hargreaves).map(|spec| spec.kind),
            Err(Error::unsupported_algorithm(Quantity::Azimuth, "hargreaves"))
        );
    }

    #[test]
    fn test_policies_follow_table() {
        let spec = lookup(Quantity::Declination, Algorithm::Jenco).unwrap();
        assert_eq!(spec.policy(), RangePolicy::Warn);
        let spec = lookup(Quantity::TrueSolarTime, Algorithm::Milne1921).unwrap();
        assert_eq!(spec.policy(), RangePolicy::Raise);
    }
}
