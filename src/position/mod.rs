//! Per-quantity solar position calculators.
//!
//! Every calculator is a free function over whole series. Each one tags its
//! output with the algorithm family that produced it and validates it with
//! the family's [`RangePolicy`], looked up in [`range_policy`].

pub mod azimuth;
pub mod declination;
pub mod equation_of_time;
pub mod events;
pub mod fractional_year;
pub mod incidence;
pub mod solar_time;
pub mod zenith;

use crate::Result;
use crate::error::check_alignment;
use crate::models::Algorithm;
use crate::quantity::{AngularQuantity, Quantity, RangePolicy};

/// Range policy of the calculator for `kind` in family `algorithm`.
///
/// Simplified single-sine families and every incidence model only warn;
/// the NOAA family and all time quantities fail on an out-of-range value.
#[must_use]
pub const fn range_policy(kind: Quantity, algorithm: Algorithm) -> RangePolicy {
    match (kind, algorithm) {
        (Quantity::FractionalYear, Algorithm::Pvis)
        | (
            Quantity::Declination | Quantity::Altitude | Quantity::Azimuth,
            Algorithm::Hofierka | Algorithm::Jenco,
        )
        | (Quantity::Altitude, Algorithm::Pvis)
        | (Quantity::Incidence, _) => RangePolicy::Warn,
        _ => RangePolicy::Raise,
    }
}

/// Wraps calculator output into a validated, tagged quantity.
pub(crate) fn finish(
    kind: Quantity,
    algorithm: Algorithm,
    values: Vec<f64>,
) -> Result<AngularQuantity> {
    AngularQuantity::validated(
        kind,
        values,
        kind.canonical_unit(),
        Some(algorithm),
        range_policy(kind, algorithm),
    )
}

/// Checks that every input series matches the time series length.
pub(crate) fn check_inputs(expected: usize, inputs: &[&AngularQuantity]) -> Result<()> {
    for input in inputs {
        check_alignment(input.kind().name(), expected, input.len())?;
    }
    Ok(())
}
