use serde::{Deserialize, Serialize};

use super::tables::{air_property, vapor_saturation_pressure, AirProperty};
use crate::error::ThermalError;

/// Ratio of molar masses of water vapour and dry air
pub const MOLAR_MASS_RATIO: f64 = 0.62198;

/// Specific enthalpy of water vapour near room temperature (kJ/kg)
pub const WATER_VAPOR_ENTHALPY_KJ_KG: f64 = 2539.9;

/// Ambient air state shared by the room and the outside: pressure and relative humidity.
///
/// Temperatures passed to the methods are absolute (K).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientAir {
    /// Total air pressure (kPa)
    pub pressure_kpa: f64,
    /// Relative humidity (%)
    pub relative_humidity: f64,
}

impl Default for AmbientAir {
    fn default() -> Self {
        Self {
            pressure_kpa: 101.325,
            relative_humidity: 50.0,
        }
    }
}

impl AmbientAir {
    pub fn new(pressure_kpa: f64, relative_humidity: f64) -> Self {
        Self {
            pressure_kpa,
            relative_humidity,
        }
    }

    /// Partial pressure of water vapour (kPa)
    pub fn partial_vapor_pressure(&self, temperature_k: f64) -> Result<f64, ThermalError> {
        Ok((self.relative_humidity / 100.0) * vapor_saturation_pressure(temperature_k)?)
    }

    /// Mass of water vapour per mass of dry air (kg/kg)
    pub fn humidity_ratio(&self, temperature_k: f64) -> Result<f64, ThermalError> {
        let pp = self.partial_vapor_pressure(temperature_k)?;
        Ok(MOLAR_MASS_RATIO * pp / (self.pressure_kpa - pp))
    }

    /// Specific enthalpy of the humid air (kJ/kg)
    pub fn specific_enthalpy(&self, temperature_k: f64) -> Result<f64, ThermalError> {
        let x = self.humidity_ratio(temperature_k)?;
        let dry = air_property(AirProperty::SpecificHeatCp, temperature_k)? * temperature_k;
        Ok(dry + x * WATER_VAPOR_ENTHALPY_KJ_KG)
    }

    /// Dry-air density (kg/m³)
    pub fn dry_density(&self, temperature_k: f64) -> Result<f64, ThermalError> {
        air_property(AirProperty::Density, temperature_k)
    }

    /// Total mass (dry air plus vapour) of `volume_m3` of room air (kg)
    pub fn humid_mass(&self, volume_m3: f64, temperature_k: f64) -> Result<f64, ThermalError> {
        let dry = self.dry_density(temperature_k)? * volume_m3;
        Ok(dry * (1.0 + self.humidity_ratio(temperature_k)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_humidity_ratio() {
        // 2.10 kPa saturation at 294.15 K, half at 50% RH
        let air = AmbientAir::default();
        let x = air.humidity_ratio(294.15).unwrap();
        let expected = 0.62198 * 1.05 / (101.325 - 1.05);
        assert!((x - expected).abs() < 1e-12);
    }

    #[test]
    fn test_enthalpy_increases_with_temperature() {
        let air = AmbientAir::default();
        let cold = air.specific_enthalpy(278.15).unwrap();
        let warm = air.specific_enthalpy(294.15).unwrap();
        assert!(warm > cold);
        // Dry part dominates: ~1.004 kJ/kgK * 294 K
        assert!((warm - 295.4 - 0.0066 * 2539.9).abs() < 1.0, "got {warm}");
    }

    #[test]
    fn test_enthalpy_outside_vapor_table() {
        let air = AmbientAir::default();
        assert!(matches!(
            air.specific_enthalpy(340.0),
            Err(ThermalError::PropertyOutOfRange { .. })
        ));
    }
}
