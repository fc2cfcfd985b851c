//! Module temperature.

use crate::constants::FAIMAN_FREE_STANDING;
use crate::{Error, Result};

/// How the module temperature follows from the weather.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemperatureModel {
    /// The module runs at air temperature.
    Ambient,
    /// Faiman (2008) heat balance `T_m = T_a + G / (U0 + U1 · v)`.
    Faiman {
        /// Constant heat loss coefficient, W/(m²K).
        u0: f64,
        /// Wind-dependent heat loss coefficient, Ws/(m³K).
        u1: f64,
    },
}

impl Default for TemperatureModel {
    fn default() -> Self {
        Self::Faiman {
            u0: FAIMAN_FREE_STANDING[0],
            u1: FAIMAN_FREE_STANDING[1],
        }
    }
}

impl TemperatureModel {
    /// Module temperature in °C for air temperature `ambient` (°C), in-plane
    /// `irradiance` (W/m²) and `wind_speed` (m/s).
    #[must_use]
    pub fn module_temperature(self, ambient: f64, irradiance: f64, wind_speed: f64) -> f64 {
        match self {
            Self::Ambient => ambient,
            Self::Faiman { u0, u1 } => ambient + irradiance / (u0 + u1 * wind_speed.max(0.0)),
        }
    }

    pub(crate) fn validate(self) -> Result<()> {
        if let Self::Faiman { u0, u1 } = self {
            if !(u0.is_finite() && u0 > 0.0) {
                return Err(Error::invalid_parameter("Faiman U0", u0));
            }
            if !(u1.is_finite() && u1 >= 0.0) {
                return Err(Error::invalid_parameter("Faiman U1", u1));
            }
        }
        Ok(())
    }
}
