//! Subject archetypes
//!
//! Fixed clothing/activity bundles used to compare how different occupants
//! would feel in the same room.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::series::{calculate_pmv_ppd_series, PersonalParameters};
use super::{
    ComfortFormula, ComfortResult, PersonalFactors, PmvModel, ThermalConditions, WATTS_PER_MET,
};
use crate::domain::Sample;
use crate::error::ComfortError;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubjectArchetype {
    Naked,
    Sleeping,
    SummerSleeping,
    Office,
    OfficeJumper,
    Jumper,
    Coat,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubjectProfile {
    pub description: &'static str,
    pub metabolic_met: f64,
    pub external_work_met: f64,
    /// Air velocity (m/s)
    pub air_velocity: f64,
    pub clothing_clo: f64,
}

impl SubjectProfile {
    const fn new(description: &'static str, metabolic_met: f64, clothing_clo: f64) -> Self {
        Self {
            description,
            metabolic_met,
            external_work_met: 0.0,
            air_velocity: 0.2,
            clothing_clo,
        }
    }

    pub fn personal_factors(&self) -> PersonalFactors {
        PersonalFactors::from_met(self.clothing_clo, self.metabolic_met, self.external_work_met)
    }
}

impl SubjectArchetype {
    pub fn profile(&self) -> SubjectProfile {
        match self {
            SubjectArchetype::Naked => SubjectProfile::new("Naked", 1.0, 0.0),
            // 10.5 tog duvet
            SubjectArchetype::Sleeping => {
                SubjectProfile::new("Sleeping With Autumn Weight Duvet", 0.8, 6.8)
            }
            // 4.5 tog duvet
            SubjectArchetype::SummerSleeping => {
                SubjectProfile::new("Sleeping With Summer Weight Duvet", 0.8, 2.9)
            }
            SubjectArchetype::Office => SubjectProfile::new("Office Work", 1.2, 0.51),
            SubjectArchetype::OfficeJumper => SubjectProfile::new("Office Work + Jumper", 1.2, 0.86),
            SubjectArchetype::Jumper => SubjectProfile::new("Domestic Chores", 2.5, 0.86),
            SubjectArchetype::Coat => SubjectProfile::new("Outdoors (Walking)", 3.4, 1.56),
            SubjectArchetype::Running => SubjectProfile::new("Running", 8.0, 0.19),
        }
    }

    /// Comfort at a single air temperature (°C) and relative humidity (%).
    ///
    /// `air_velocity` overrides the archetype's own value when given.
    pub fn point_comfort(
        &self,
        temperature_c: f64,
        relative_humidity: f64,
        air_velocity: Option<f64>,
        formula: ComfortFormula,
    ) -> ComfortResult {
        let profile = self.profile();
        let conditions = ThermalConditions::still_air(
            temperature_c,
            relative_humidity,
            air_velocity.unwrap_or(profile.air_velocity),
        );
        formula.evaluate(&conditions, &profile.personal_factors())
    }

    /// Per-sample comfort for this archetype
    pub fn series_comfort(
        &self,
        temperature: &[Sample],
        humidity: &[Sample],
        formula: ComfortFormula,
    ) -> Result<Vec<Option<ComfortResult>>, ComfortError> {
        let profile = self.profile();
        let params = PersonalParameters::constant(
            profile.air_velocity,
            profile.clothing_clo,
            profile.metabolic_met * WATTS_PER_MET,
            profile.external_work_met * WATTS_PER_MET,
        );
        calculate_pmv_ppd_series(temperature, humidity, &params, formula)
    }
}

/// Seven-point thermal sensation scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ThermalSensation {
    #[strum(serialize = "Very Cold")]
    VeryCold,
    Cold,
    Cool,
    Neutral,
    Warm,
    Hot,
    #[strum(serialize = "Very Hot")]
    VeryHot,
}

impl ThermalSensation {
    pub fn from_pmv(pmv: f64) -> Self {
        match pmv {
            p if p <= -2.8 => ThermalSensation::VeryCold,
            p if p <= -1.8 => ThermalSensation::Cold,
            p if p <= -0.8 => ThermalSensation::Cool,
            p if p < 0.8 => ThermalSensation::Neutral,
            p if p < 1.8 => ThermalSensation::Warm,
            p if p < 2.8 => ThermalSensation::Hot,
            _ => ThermalSensation::VeryHot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[rstest]
    #[case(SubjectArchetype::Naked, -5.68)]
    #[case(SubjectArchetype::Sleeping, 1.46)]
    #[case(SubjectArchetype::SummerSleeping, 0.33)]
    #[case(SubjectArchetype::Office, -1.44)]
    #[case(SubjectArchetype::OfficeJumper, -0.56)]
    #[case(SubjectArchetype::Jumper, 1.10)]
    #[case(SubjectArchetype::Coat, 2.34)]
    #[case(SubjectArchetype::Running, 6.52)]
    fn test_archetypes_at_21c(#[case] subject: SubjectArchetype, #[case] expected: f64) {
        let result = subject.point_comfort(21.0, 50.0, None, ComfortFormula::Ashrae55);
        assert!(
            (result.pmv - expected).abs() < 0.02,
            "{subject}: {} vs {expected}",
            result.pmv
        );
    }

    #[test]
    fn test_velocity_override_cools() {
        let still = SubjectArchetype::Office.point_comfort(24.0, 50.0, None, ComfortFormula::Ashrae55);
        let breezy =
            SubjectArchetype::Office.point_comfort(24.0, 50.0, Some(0.8), ComfortFormula::Ashrae55);
        assert!(breezy.pmv < still.pmv);
    }

    #[test]
    fn test_series_matches_point() {
        let temperature = vec![Some(21.0), None];
        let humidity = vec![Some(50.0), Some(50.0)];
        let series = SubjectArchetype::Coat
            .series_comfort(&temperature, &humidity, ComfortFormula::Ashrae55)
            .unwrap();
        let point = SubjectArchetype::Coat.point_comfort(21.0, 50.0, None, ComfortFormula::Ashrae55);
        assert_eq!(series, vec![Some(point), None]);
    }

    #[test]
    fn test_archetype_names() {
        assert_eq!(SubjectArchetype::iter().count(), 8);
        assert_eq!(SubjectArchetype::OfficeJumper.to_string(), "office_jumper");
        assert_eq!(
            "summer_sleeping".parse::<SubjectArchetype>().unwrap(),
            SubjectArchetype::SummerSleeping
        );
    }

    #[rstest]
    #[case(-3.0, ThermalSensation::VeryCold)]
    #[case(-2.8, ThermalSensation::VeryCold)]
    #[case(-2.0, ThermalSensation::Cold)]
    #[case(-0.8, ThermalSensation::Cool)]
    #[case(0.0, ThermalSensation::Neutral)]
    #[case(0.8, ThermalSensation::Warm)]
    #[case(1.8, ThermalSensation::Hot)]
    #[case(2.8, ThermalSensation::VeryHot)]
    fn test_sensation_labels(#[case] pmv: f64, #[case] expected: ThermalSensation) {
        assert_eq!(ThermalSensation::from_pmv(pmv), expected);
    }

    #[test]
    fn test_sensation_display() {
        assert_eq!(ThermalSensation::VeryCold.to_string(), "Very Cold");
        assert_eq!(ThermalSensation::Neutral.to_string(), "Neutral");
    }
}
