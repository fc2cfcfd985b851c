//! Photovoltaic power from in-plane irradiance.
//!
//! Power in watts is `P = P_peak · G_eff · η_rel · η_sys`, with `P_peak` the
//! installed peak power in kWp, `G_eff` the in-plane irradiance corrected by
//! the spectral factor, `η_rel` the module efficiency relative to standard
//! test conditions and `η_sys` the fixed system efficiency.

pub mod efficiency;
pub mod temperature;

use crate::constants::{
    PEAK_POWER_DEFAULT, RADIATION_CUTOFF_THRESHOLD, SPECTRAL_FACTOR_DEFAULT,
    SYSTEM_EFFICIENCY_DEFAULT, TEMPERATURE_DEFAULT, WIND_SPEED_DEFAULT,
};
use crate::irradiance::IrradianceComponents;
use crate::types::Series;
use crate::{Error, Result};
use chrono::Duration;
use efficiency::EfficiencyModel;
use std::collections::BTreeMap;
use temperature::TemperatureModel;

pub use efficiency::{IvCoefficients, ModuleCoefficients};

/// Options of the power estimate.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PowerOptions {
    /// Installed peak power, kWp.
    pub peak_power: f64,
    /// Losses of cabling, inverter and mismatch as a factor.
    pub system_efficiency: f64,
    /// Module efficiency model.
    pub efficiency: EfficiencyModel,
    /// Module temperature model.
    pub temperature_model: TemperatureModel,
    /// Air temperature, °C.
    pub temperature: Series,
    /// Wind speed, m/s.
    pub wind_speed: Series,
    /// Spectral mismatch factor.
    pub spectral_factor: Series,
    /// Relative irradiance at or below which the module yields nothing.
    pub radiation_cutoff: f64,
}

impl Default for PowerOptions {
    fn default() -> Self {
        Self {
            peak_power: PEAK_POWER_DEFAULT,
            system_efficiency: SYSTEM_EFFICIENCY_DEFAULT,
            efficiency: EfficiencyModel::default(),
            temperature_model: TemperatureModel::default(),
            temperature: Series::Constant(TEMPERATURE_DEFAULT),
            wind_speed: Series::Constant(WIND_SPEED_DEFAULT),
            spectral_factor: Series::Constant(SPECTRAL_FACTOR_DEFAULT),
            radiation_cutoff: RADIATION_CUTOFF_THRESHOLD,
        }
    }
}

impl PowerOptions {
    /// Checks the options against a series of `len` timestamps.
    ///
    /// # Errors
    /// Returns `DataAlignment` for a weather series of another length and
    /// `InvalidParameter` for values outside their physical range.
    pub fn validate(&self, len: usize) -> Result<()> {
        if !(self.peak_power.is_finite() && self.peak_power >= 0.0) {
            return Err(Error::invalid_parameter("peak power", self.peak_power));
        }
        if !(0.0..=1.0).contains(&self.system_efficiency) {
            return Err(Error::invalid_parameter("system efficiency", self.system_efficiency));
        }
        self.temperature.check_len("temperature", len)?;
        self.wind_speed.check_len("wind speed", len)?;
        self.spectral_factor.check_len("spectral factor", len)?;
        self.wind_speed.try_for_each(|v| {
            if v < 0.0 || !v.is_finite() {
                return Err(Error::invalid_parameter("wind speed", v));
            }
            Ok(())
        })?;
        self.spectral_factor.try_for_each(|v| {
            if v < 0.0 || !v.is_finite() {
                return Err(Error::invalid_parameter("spectral factor", v));
            }
            Ok(())
        })?;
        self.efficiency.validate()?;
        self.temperature_model.validate()
    }
}

/// Power series with every intermediate series by name.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PhotovoltaicPowerResult {
    power: Vec<f64>,
    components: BTreeMap<&'static str, Vec<f64>>,
}

impl PhotovoltaicPowerResult {
    /// Power, W.
    #[must_use]
    pub fn power(&self) -> &[f64] {
        &self.power
    }

    /// Irradiance, temperature and efficiency series that led to the power.
    #[must_use]
    pub const fn components(&self) -> &BTreeMap<&'static str, Vec<f64>> {
        &self.components
    }

    /// Energy in Wh, each power value held for `step`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn energy_wh(&self, step: Duration) -> f64 {
        let hours = step.num_milliseconds() as f64 / 3_600_000.0;
        self.power.iter().sum::<f64>() * hours
    }

    /// Mean power, W.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_power(&self) -> f64 {
        if self.power.is_empty() {
            return 0.0;
        }
        self.power.iter().sum::<f64>() / self.power.len() as f64
    }
}

/// Estimates photovoltaic power from decomposed in-plane irradiance.
///
/// # Errors
/// Returns `DataAlignment` for weather series of another length and
/// `InvalidParameter` for invalid options.
pub fn photovoltaic_power(
    irradiance: &IrradianceComponents,
    options: &PowerOptions,
) -> Result<PhotovoltaicPowerResult> {
    let len = irradiance.len();
    options.validate(len)?;
    let global = irradiance.global();

    let mut effective = Vec::with_capacity(len);
    let mut module_temperature = Vec::with_capacity(len);
    let mut efficiency = Vec::with_capacity(len);
    let mut power = Vec::with_capacity(len);
    for (i, &g) in global.iter().enumerate() {
        let g_eff = g * options.spectral_factor.at(i);
        let t_module = options.temperature_model.module_temperature(
            options.temperature.at(i),
            g,
            options.wind_speed.at(i),
        );
        let eta = options
            .efficiency
            .relative_efficiency(g_eff, t_module, options.radiation_cutoff);
        effective.push(g_eff);
        module_temperature.push(t_module);
        efficiency.push(eta);
        power.push(options.peak_power * g_eff * eta * options.system_efficiency);
    }

    let mut components = irradiance.components();
    components.insert("effective irradiance", effective);
    components.insert("module temperature", module_temperature);
    components.insert("efficiency", efficiency);

    let result = PhotovoltaicPowerResult { power, components };
    tracing::debug!(
        timestamps = len,
        mean_power = result.mean_power(),
        "photovoltaic power"
    );
    Ok(result)
}
