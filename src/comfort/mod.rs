//! # Thermal Comfort
//!
//! Fanger PMV/PPD in two interchangeable formulations plus the batch, archetype
//! and schedule-driven entry points built on them.
//!
//! ## Components
//!
//! - **iso7730**: ISO 7730 formulation with clamped inputs
//! - **ashrae55**: ASHRAE 55 reference formulation with its heat-loss breakdown
//! - **series**: per-sample batch over aligned temperature/humidity series
//! - **subjects**: named clothing/activity archetypes and sensation labels
//! - **schedule**: time-of-day parameter schedule and per-bin summaries
//! - **classification**: comfort bands from mean PMV/PPD
//!
//! Metabolic rate and external work are carried in W/m² throughout;
//! 1 met = [`WATTS_PER_MET`] W/m².

pub mod ashrae55;
pub mod classification;
pub mod iso7730;
pub mod schedule;
pub mod series;
pub mod subjects;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::psychrometrics::actual_vapor_pressure;

pub use ashrae55::{Ashrae55, Ashrae55Solution, HeatLossBreakdown};
pub use classification::{classify, ComfortBand};
pub use iso7730::{Iso7730, Iso7730Solution};
pub use schedule::{
    schedule_comfort, schedule_parameters, BinSummary, ParameterSchedule, PersonalDefaults,
    ScheduleBin, ScheduleComfort,
};
pub use series::{calculate_pmv_ppd_series, ParameterSeries, PersonalParameters};
pub use subjects::{SubjectArchetype, SubjectProfile, ThermalSensation};

/// Metabolic rate of one met (W/m²)
pub const WATTS_PER_MET: f64 = 58.15;

/// Thermal resistance of one clo (m²K/W)
pub const CLO_TO_M2K_PER_W: f64 = 0.155;

/// Predicted Mean Vote and Predicted Percentage Dissatisfied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComfortResult {
    pub pmv: f64,
    pub ppd: f64,
}

impl ComfortResult {
    pub fn from_pmv(pmv: f64) -> Self {
        Self {
            pmv,
            ppd: ppd_from_pmv(pmv),
        }
    }
}

/// PPD (%) for a given PMV; 5% at neutral and symmetric in sign
pub fn ppd_from_pmv(pmv: f64) -> f64 {
    100.0 - 95.0 * (-0.03353 * pmv.powi(4) - 0.2179 * pmv.powi(2)).exp()
}

/// Environmental side of a comfort evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermalConditions {
    /// Air temperature (°C)
    pub air_temp_c: f64,
    /// Mean radiant temperature (°C)
    pub radiant_temp_c: f64,
    /// Relative air velocity (m/s)
    pub air_velocity: f64,
    /// Relative humidity (%)
    pub relative_humidity: f64,
}

impl ThermalConditions {
    /// Conditions where the radiant temperature is unknown and taken as the air temperature
    pub fn still_air(air_temp_c: f64, relative_humidity: f64, air_velocity: f64) -> Self {
        Self {
            air_temp_c,
            radiant_temp_c: air_temp_c,
            air_velocity,
            relative_humidity,
        }
    }

    /// Partial water vapour pressure (kPa)
    pub fn vapor_pressure_kpa(&self) -> f64 {
        actual_vapor_pressure(self.relative_humidity, self.air_temp_c)
    }
}

/// Personal side of a comfort evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalFactors {
    /// Clothing insulation (clo)
    pub clothing_clo: f64,
    /// Metabolic rate (W/m²)
    pub metabolic_w_m2: f64,
    /// External work (W/m²)
    pub external_work_w_m2: f64,
}

impl PersonalFactors {
    pub fn new(clothing_clo: f64, metabolic_w_m2: f64, external_work_w_m2: f64) -> Self {
        Self {
            clothing_clo,
            metabolic_w_m2,
            external_work_w_m2,
        }
    }

    /// Build from rates in met
    pub fn from_met(clothing_clo: f64, metabolic_met: f64, external_work_met: f64) -> Self {
        Self::new(
            clothing_clo,
            metabolic_met * WATTS_PER_MET,
            external_work_met * WATTS_PER_MET,
        )
    }
}

/// A point PMV/PPD formulation
pub trait PmvModel {
    fn name(&self) -> &'static str;

    fn evaluate(&self, conditions: &ThermalConditions, person: &PersonalFactors) -> ComfortResult;
}

/// Formula selector for the batch entry points
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ComfortFormula {
    Iso7730,
    #[default]
    Ashrae55,
}

impl PmvModel for ComfortFormula {
    fn name(&self) -> &'static str {
        match self {
            ComfortFormula::Iso7730 => Iso7730.name(),
            ComfortFormula::Ashrae55 => Ashrae55.name(),
        }
    }

    fn evaluate(&self, conditions: &ThermalConditions, person: &PersonalFactors) -> ComfortResult {
        match self {
            ComfortFormula::Iso7730 => Iso7730.evaluate(conditions, person),
            ComfortFormula::Ashrae55 => Ashrae55.evaluate(conditions, person),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_ppd_minimum_at_neutral() {
        assert!((ppd_from_pmv(0.0) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_formulas_agree_near_comfort() {
        let conditions = ThermalConditions::still_air(22.0, 50.0, 0.1);
        let person = PersonalFactors::new(1.0, 70.0, 0.0);

        let iso = ComfortFormula::Iso7730.evaluate(&conditions, &person);
        let ashrae = ComfortFormula::Ashrae55.evaluate(&conditions, &person);

        assert!((iso.pmv - 0.140).abs() < 0.01, "iso {}", iso.pmv);
        assert!((ashrae.pmv - 0.101).abs() < 0.01, "ashrae {}", ashrae.pmv);
        assert!((iso.pmv - ashrae.pmv).abs() <= 0.3);
    }

    #[test]
    fn test_formula_names() {
        let names: Vec<_> = ComfortFormula::iter().map(|f| f.to_string()).collect();
        assert_eq!(names, vec!["iso7730", "ashrae55"]);
        assert_eq!(ComfortFormula::default(), ComfortFormula::Ashrae55);
    }

    proptest! {
        #[test]
        fn ppd_symmetric_in_pmv(pmv in 0.0f64..3.0) {
            prop_assert!((ppd_from_pmv(pmv) - ppd_from_pmv(-pmv)).abs() < 1e-9);
            prop_assert!(ppd_from_pmv(pmv) >= 5.0 - 1e-12);
        }
    }
}
