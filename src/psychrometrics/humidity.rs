//! Vapour pressure and absolute humidity from air temperature and relative humidity.
//!
//! These are plain numeric helpers: no clamping, no validation. Invalid inputs
//! (negative RH, temperatures far outside the Antoine fit) give numerically
//! invalid outputs, so callers drop missing samples before calling in.

use itertools::{EitherOrBoth, Itertools};
use serde::{Deserialize, Serialize};

use crate::domain::Sample;

/// Specific gas constant of water vapour (J/kg·K)
pub const WATER_VAPOR_GAS_CONSTANT: f64 = 461.5;

const MMHG_TO_KPA: f64 = 101.325 / 760.0;

/// Saturation vapour pressure (kPa) at `temp_c` using the Antoine equation for water
pub fn saturation_vapor_pressure(temp_c: f64) -> f64 {
    let log_p_mmhg = 8.07131 - 1730.63 / (233.426 + temp_c);
    10f64.powf(log_p_mmhg) * MMHG_TO_KPA
}

/// Partial vapour pressure (kPa) for relative humidity `rh_percent` at `temp_c`
pub fn actual_vapor_pressure(rh_percent: f64, temp_c: f64) -> f64 {
    (rh_percent / 100.0) * saturation_vapor_pressure(temp_c)
}

/// Absolute humidity (kg/m³) from the ideal-gas relation for water vapour
pub fn absolute_humidity(rh_percent: f64, temp_c: f64) -> f64 {
    let vapor_pa = actual_vapor_pressure(rh_percent, temp_c) * 1000.0;
    vapor_pa / (WATER_VAPOR_GAS_CONSTANT * (temp_c + 273.15))
}

/// Humidity statistics for one sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityStats {
    pub vapor_pressure_kpa: f64,
    pub absolute_humidity_kg_m3: f64,
}

impl HumidityStats {
    pub fn from_reading(temp_c: f64, rh_percent: f64) -> Self {
        Self {
            vapor_pressure_kpa: actual_vapor_pressure(rh_percent, temp_c),
            absolute_humidity_kg_m3: absolute_humidity(rh_percent, temp_c),
        }
    }
}

/// Per-sample humidity statistics; `None` where either reading is missing.
///
/// If the series differ in length the tail of the longer one has no partner
/// and is reported as missing.
pub fn humidity_series(temperature: &[Sample], humidity: &[Sample]) -> Vec<Option<HumidityStats>> {
    temperature
        .iter()
        .zip_longest(humidity)
        .map(|pair| match pair {
            EitherOrBoth::Both(Some(t), Some(rh)) => Some(HumidityStats::from_reading(*t, *rh)),
            _ => None,
        })
        .collect()
}
