//! Reading external time series at a location.
//!
//! Gridded readers live outside this crate and plug in through
//! [`TimeSeriesSource`]. [`PointSeries`] is an in-memory source for a single
//! site, as used by tests and by callers that already hold the data.

use crate::error::check_alignment;
use crate::irradiance::HorizontalIrradiance;
use crate::types::{Location, TimeSeries};
use crate::{Error, Result};
use chrono::{DateTime, FixedOffset};
use core::fmt;

/// How a requested timestamp is matched against the timestamps of a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NeighborLookup {
    /// Only identical timestamps match.
    Exact,
    /// Closest timestamp, earlier on ties.
    #[default]
    Nearest,
    /// Latest timestamp at or before the requested one.
    Pad,
    /// Earliest timestamp at or after the requested one.
    Backfill,
}

impl fmt::Display for NeighborLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Exact => "exact",
            Self::Nearest => "nearest",
            Self::Pad => "pad",
            Self::Backfill => "backfill",
        })
    }
}

/// A source of one variable over time, selectable at a location.
pub trait TimeSeriesSource: Send + Sync {
    /// Short name for messages.
    fn name(&self) -> &str;

    /// Values at `location` for every timestamp of `timestamps`.
    ///
    /// `tolerance` bounds the distance, in degrees, between `location` and
    /// the grid point the source selects.
    ///
    /// # Errors
    /// Returns `Source` when the source cannot serve the request.
    fn select_time_series(
        &self,
        location: &Location,
        timestamps: &TimeSeries,
        lookup: NeighborLookup,
        tolerance: Option<f64>,
    ) -> Result<Vec<f64>>;
}

/// Selects a series from `source` and checks that it covers `timestamps`.
///
/// # Errors
/// Propagates source errors and returns `DataAlignment` for a series of
/// another length.
pub fn read_series(
    source: &dyn TimeSeriesSource,
    location: &Location,
    timestamps: &TimeSeries,
    lookup: NeighborLookup,
    tolerance: Option<f64>,
) -> Result<Vec<f64>> {
    let values = source.select_time_series(location, timestamps, lookup, tolerance)?;
    check_alignment("external time series", timestamps.len(), values.len())?;
    tracing::debug!(source = source.name(), %lookup, values = values.len(), "read time series");
    Ok(values)
}

/// Reads global and direct horizontal irradiance, side by side on the rayon
/// pool when `parallel` is set.
///
/// # Errors
/// Propagates source errors and returns `DataAlignment` for series that do
/// not cover `timestamps`. A panicking reader panics the caller.
pub fn read_irradiance_pair(
    global: &dyn TimeSeriesSource,
    direct: &dyn TimeSeriesSource,
    location: &Location,
    timestamps: &TimeSeries,
    lookup: NeighborLookup,
    tolerance: Option<f64>,
    parallel: bool,
) -> Result<HorizontalIrradiance> {
    let read = |source: &dyn TimeSeriesSource| {
        read_series(source, location, timestamps, lookup, tolerance)
    };
    let (global, direct) = if parallel {
        let (global, direct) = rayon::join(|| read(global), || read(direct));
        (global?, direct?)
    } else {
        (read(global)?, read(direct)?)
    };
    HorizontalIrradiance::new(global, direct)
}

/// Values of one site held in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    name: String,
    location: Location,
    timestamps: Vec<DateTime<FixedOffset>>,
    values: Vec<f64>,
}

impl PointSeries {
    /// Creates a series from ascending timestamps and their values.
    ///
    /// # Errors
    /// Returns `EmptyTimeSeries`, `DataAlignment` for a value count that
    /// differs from the timestamp count and `InvalidDateTime` for timestamps
    /// out of order.
    pub fn new(
        name: impl Into<String>,
        location: Location,
        timestamps: Vec<DateTime<FixedOffset>>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(Error::EmptyTimeSeries);
        }
        check_alignment("point series values", timestamps.len(), values.len())?;
        if timestamps.windows(2).any(|w| w[1] < w[0]) {
            return Err(Error::invalid_datetime("point series timestamps must ascend"));
        }
        Ok(Self {
            name: name.into(),
            location,
            timestamps,
            values,
        })
    }

    /// Location of the series.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    fn index_of(&self, moment: &DateTime<FixedOffset>, lookup: NeighborLookup) -> Option<usize> {
        let after = self.timestamps.partition_point(|t| t < moment);
        let exact = self.timestamps.get(after).filter(|t| *t == moment).map(|_| after);
        match lookup {
            NeighborLookup::Exact => exact,
            NeighborLookup::Backfill => (after < self.timestamps.len()).then_some(after),
            NeighborLookup::Pad => exact.or_else(|| after.checked_sub(1)),
            NeighborLookup::Nearest => {
                let before = after.checked_sub(1);
                match (before, self.timestamps.get(after)) {
                    (Some(b), Some(next)) => {
                        let to_before = *moment - self.timestamps[b];
                        let to_next = *next - *moment;
                        Some(if to_next < to_before { after } else { b })
                    }
                    (Some(b), None) => Some(b),
                    (None, Some(_)) => Some(after),
                    (None, None) => None,
                }
            }
        }
    }
}

impl TimeSeriesSource for PointSeries {
    fn name(&self) -> &str {
        &self.name
    }

    fn select_time_series(
        &self,
        location: &Location,
        timestamps: &TimeSeries,
        lookup: NeighborLookup,
        tolerance: Option<f64>,
    ) -> Result<Vec<f64>> {
        if let Some(tolerance) = tolerance {
            let distance = (location.longitude_degrees() - self.location.longitude_degrees())
                .abs()
                .max((location.latitude_degrees() - self.location.latitude_degrees()).abs());
            if distance > tolerance {
                return Err(Error::source(format!(
                    "{}: no point within {tolerance}° of the location",
                    self.name
                )));
            }
        }
        timestamps
            .iter()
            .map(|moment| {
                self.index_of(moment, lookup)
                    .map(|i| self.values[i])
                    .ok_or_else(|| {
                        Error::source(format!("{}: no {lookup} match for {moment}", self.name))
                    })
            })
            .collect()
    }
}
