//! Algorithm family tags and the selection of families for a computation.

use crate::quantity::Quantity;
use crate::units::AzimuthOrigin;
use crate::{Error, Result};
use core::fmt;
use core::str::FromStr;

/// Algorithm family tag.
///
/// A family names a set of published formulas; not every family provides
/// every quantity. [`crate::registry::available`] lists what is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// NOAA Global Monitoring Division general solar position calculations.
    Noaa,
    /// Hofierka (2002) single-sine declination with eccentricity correction.
    Hofierka,
    /// Jenčo (1992) position and incidence as used by r.sun.
    Jenco,
    /// Legacy PVGIS (PVIS) formulas.
    Pvis,
    /// Hargreaves declination.
    Hargreaves,
    /// Milne (1921) apparent solar time.
    Milne1921,
    /// Iqbal (1983) incidence on an inclined surface.
    Iqbal,
}

impl Algorithm {
    /// Every known family, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Noaa,
        Self::Hofierka,
        Self::Jenco,
        Self::Pvis,
        Self::Hargreaves,
        Self::Milne1921,
        Self::Iqbal,
    ];

    /// Short lowercase tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Noaa => "noaa",
            Self::Hofierka => "hofierka",
            Self::Jenco => "jenco",
            Self::Pvis => "pvis",
            Self::Hargreaves => "hargreaves",
            Self::Milne1921 => "milne1921",
            Self::Iqbal => "iqbal",
        }
    }

    /// Origin of the azimuth values produced by this family, if it has one.
    #[must_use]
    pub const fn azimuth_origin(self) -> Option<AzimuthOrigin> {
        match self {
            Self::Noaa => Some(AzimuthOrigin::North),
            Self::Jenco | Self::Hofierka => Some(AzimuthOrigin::East),
            _ => None,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_ascii_lowercase();
        let tag = if tag == "milne" { "milne1921" } else { tag.as_str() };
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.name() == tag)
            .ok_or_else(|| Error::unknown_algorithm(s))
    }
}

/// Choice of algorithm family per stage of the solar position pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlgorithmSelection {
    /// Family for declination, zenith, altitude and azimuth.
    pub position: Algorithm,
    /// Family for the equation of time, time offset and true solar time.
    pub timing: Algorithm,
    /// Family for the incidence angle on the surface.
    pub incidence: Algorithm,
    /// Declination family when it differs from `position`.
    pub declination: Option<Algorithm>,
}

impl Default for AlgorithmSelection {
    fn default() -> Self {
        Self {
            position: Algorithm::Noaa,
            timing: Algorithm::Noaa,
            incidence: Algorithm::Iqbal,
            declination: None,
        }
    }
}

impl AlgorithmSelection {
    /// Selects one family for every stage it provides, Iqbal for incidence.
    #[must_use]
    pub const fn family(position: Algorithm) -> Self {
        Self {
            position,
            timing: Algorithm::Noaa,
            incidence: Algorithm::Iqbal,
            declination: None,
        }
    }

    /// Overrides the incidence family.
    #[must_use]
    pub const fn with_incidence(mut self, incidence: Algorithm) -> Self {
        self.incidence = incidence;
        self
    }

    /// Overrides the timing family.
    #[must_use]
    pub const fn with_timing(mut self, timing: Algorithm) -> Self {
        self.timing = timing;
        self
    }

    /// Overrides the declination family.
    #[must_use]
    pub const fn with_declination(mut self, declination: Algorithm) -> Self {
        self.declination = Some(declination);
        self
    }

    /// Declination family in effect.
    #[must_use]
    pub fn declination(&self) -> Algorithm {
        self.declination.unwrap_or(self.position)
    }

    /// Family that computes `kind` under this selection.
    #[must_use]
    pub fn for_quantity(&self, kind: Quantity) -> Algorithm {
        match kind {
            Quantity::FractionalYear => {
                if self.declination() == Algorithm::Pvis {
                    Algorithm::Pvis
                } else {
                    Algorithm::Noaa
                }
            }
            Quantity::DayAngle => Algorithm::Hofierka,
            Quantity::EquationOfTime | Quantity::TimeOffset | Quantity::TrueSolarTime => {
                self.timing
            }
            Quantity::HourAngle => match self.position {
                Algorithm::Pvis => Algorithm::Pvis,
                Algorithm::Hofierka | Algorithm::Jenco => Algorithm::Hofierka,
                _ => Algorithm::Noaa,
            },
            Quantity::Declination => self.declination(),
            Quantity::Zenith | Quantity::EventHourAngle => Algorithm::Noaa,
            Quantity::Altitude | Quantity::Azimuth => self.position,
            Quantity::Incidence => self.incidence,
        }
    }

    /// Checks the pairing between position and incidence families.
    ///
    /// Iqbal incidence consumes the zenith and azimuth of the position family,
    /// which therefore has to produce an azimuth with a known origin. Jenčo
    /// and PVIS incidence derive their own geometry and pair with any family.
    ///
    /// # Errors
    /// Returns `IncompatibleAlgorithms` for a pairing that cannot be evaluated.
    pub fn check_pairing(&self) -> Result<()> {
        if self.incidence == Algorithm::Iqbal && self.position.azimuth_origin().is_none() {
            return Err(Error::incompatible_algorithms(
                "Iqbal incidence needs a position family that provides azimuth",
            ));
        }
        Ok(())
    }
}
