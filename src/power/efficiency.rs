//! Module efficiency relative to standard test conditions.

use crate::constants::{
    CURRENT_AT_STANDARD_TEST_CONDITIONS, CURRENT_TEMPERATURE_COEFFICIENT,
    HULD_CSI_FREE_STANDING, STANDARD_TEST_IRRADIANCE,
    TEMPERATURE_DEFAULT, VOLTAGE_AT_STANDARD_TEST_CONDITIONS, VOLTAGE_IRRADIANCE_COEFFICIENTS,
    VOLTAGE_TEMPERATURE_COEFFICIENT,
};
use crate::{Error, Result};

/// Coefficients `k0..k6` of the Huld (2011) logarithmic efficiency model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModuleCoefficients(pub [f64; 7]);

impl Default for ModuleCoefficients {
    fn default() -> Self {
        Self(HULD_CSI_FREE_STANDING)
    }
}

/// Current and voltage response of a module for the IV efficiency model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IvCoefficients {
    /// Current at standard test conditions, A.
    pub current: f64,
    /// Current change per kelvin, A/K.
    pub current_temperature: f64,
    /// Voltage at standard test conditions, V.
    pub voltage: f64,
    /// Voltage change per `ln G'` and per `ln² G'`, V.
    pub voltage_irradiance: [f64; 2],
    /// Voltage change per kelvin, V/K.
    pub voltage_temperature: f64,
}

impl Default for IvCoefficients {
    fn default() -> Self {
        Self {
            current: CURRENT_AT_STANDARD_TEST_CONDITIONS,
            current_temperature: CURRENT_TEMPERATURE_COEFFICIENT,
            voltage: VOLTAGE_AT_STANDARD_TEST_CONDITIONS,
            voltage_irradiance: VOLTAGE_IRRADIANCE_COEFFICIENTS,
            voltage_temperature: VOLTAGE_TEMPERATURE_COEFFICIENT,
        }
    }
}

/// How module efficiency depends on irradiance and temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EfficiencyModel {
    /// Rated efficiency at every condition.
    Fixed,
    /// Huld/King logarithmic polynomial in irradiance and temperature.
    Huld(ModuleCoefficients),
    /// Product of a current and a voltage model.
    Iv(IvCoefficients),
}

impl Default for EfficiencyModel {
    fn default() -> Self {
        Self::Huld(ModuleCoefficients::default())
    }
}

impl EfficiencyModel {
    /// Efficiency relative to standard test conditions.
    ///
    /// `irradiance` is the effective in-plane irradiance in W/m² and
    /// `module_temperature` is in °C. Relative irradiances at or below
    /// `cutoff` yield zero for the irradiance-dependent models.
    #[must_use]
    pub fn relative_efficiency(self, irradiance: f64, module_temperature: f64, cutoff: f64) -> f64 {
        let relative = irradiance / STANDARD_TEST_IRRADIANCE;
        let delta_t = module_temperature - TEMPERATURE_DEFAULT;
        match self {
            Self::Fixed => 1.0,
            _ if relative <= cutoff || relative <= 0.0 => 0.0,
            Self::Huld(ModuleCoefficients(k)) => {
                let ln = relative.ln();
                let value = k[0]
                    + ln * (k[1] + ln * k[2])
                    + delta_t * (k[3] + ln * (k[4] + ln * k[5]) + k[6] * delta_t);
                (value / k[0]).max(0.0)
            }
            Self::Iv(iv) => {
                let ln = relative.ln();
                let current = iv.current + iv.current_temperature * delta_t;
                let voltage = iv.voltage
                    + ln * (iv.voltage_irradiance[0] + ln * iv.voltage_irradiance[1])
                    + iv.voltage_temperature * delta_t;
                (current * voltage / (iv.current * iv.voltage)).max(0.0)
            }
        }
    }

    pub(crate) fn validate(self) -> Result<()> {
        match self {
            Self::Fixed => Ok(()),
            Self::Huld(ModuleCoefficients(k)) => {
                if k[0] == 0.0 || !k.iter().all(|c| c.is_finite()) {
                    return Err(Error::invalid_parameter("Huld k0", k[0]));
                }
                Ok(())
            }
            Self::Iv(iv) => {
                let rated = iv.current * iv.voltage;
                if !(rated.is_finite() && rated > 0.0) {
                    return Err(Error::invalid_parameter("rated module power", rated));
                }
                Ok(())
            }
        }
    }
}
