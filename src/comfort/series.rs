//! Per-sample PMV/PPD over aligned temperature and humidity series.

use serde::{Deserialize, Serialize};

use super::{ComfortFormula, ComfortResult, PersonalFactors, PmvModel, ThermalConditions};
use crate::domain::Sample;
use crate::error::ComfortError;

/// A personal or environmental input that is either fixed or varies per sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterSeries {
    Constant(f64),
    PerSample(Vec<Sample>),
}

impl ParameterSeries {
    pub fn at(&self, index: usize) -> Sample {
        match self {
            ParameterSeries::Constant(value) => Some(*value),
            ParameterSeries::PerSample(values) => values.get(index).copied().flatten(),
        }
    }

    fn check_len(&self, parameter: &'static str, expected: usize) -> Result<(), ComfortError> {
        match self {
            ParameterSeries::PerSample(values) if values.len() != expected => {
                Err(ComfortError::LengthMismatch {
                    parameter,
                    expected,
                    actual: values.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl From<f64> for ParameterSeries {
    fn from(value: f64) -> Self {
        ParameterSeries::Constant(value)
    }
}

impl From<Vec<Sample>> for ParameterSeries {
    fn from(values: Vec<Sample>) -> Self {
        ParameterSeries::PerSample(values)
    }
}

impl From<Vec<f64>> for ParameterSeries {
    fn from(values: Vec<f64>) -> Self {
        ParameterSeries::PerSample(values.into_iter().map(Some).collect())
    }
}

/// Personal and environmental inputs of a batch run.
///
/// Metabolic rate and external work are in W/m², clothing in clo, air
/// velocity in m/s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalParameters {
    pub air_velocity: ParameterSeries,
    pub clothing_clo: ParameterSeries,
    pub metabolic_w_m2: ParameterSeries,
    pub external_work_w_m2: ParameterSeries,
}

impl PersonalParameters {
    pub fn constant(
        air_velocity: f64,
        clothing_clo: f64,
        metabolic_w_m2: f64,
        external_work_w_m2: f64,
    ) -> Self {
        Self {
            air_velocity: air_velocity.into(),
            clothing_clo: clothing_clo.into(),
            metabolic_w_m2: metabolic_w_m2.into(),
            external_work_w_m2: external_work_w_m2.into(),
        }
    }

    fn check_len(&self, expected: usize) -> Result<(), ComfortError> {
        self.air_velocity.check_len("air_velocity", expected)?;
        self.clothing_clo.check_len("clothing_clo", expected)?;
        self.metabolic_w_m2.check_len("metabolic_w_m2", expected)?;
        self.external_work_w_m2
            .check_len("external_work_w_m2", expected)
    }

    fn at(&self, index: usize) -> Option<(f64, PersonalFactors)> {
        Some((
            self.air_velocity.at(index)?,
            PersonalFactors::new(
                self.clothing_clo.at(index)?,
                self.metabolic_w_m2.at(index)?,
                self.external_work_w_m2.at(index)?,
            ),
        ))
    }
}

/// PMV/PPD for every sample, with the mean radiant temperature taken as the
/// air temperature.
///
/// A sample with any missing input yields `None` at that index; only a length
/// mismatch between the inputs fails the batch.
pub fn calculate_pmv_ppd_series(
    temperature: &[Sample],
    humidity: &[Sample],
    params: &PersonalParameters,
    formula: ComfortFormula,
) -> Result<Vec<Option<ComfortResult>>, ComfortError> {
    if humidity.len() != temperature.len() {
        return Err(ComfortError::LengthMismatch {
            parameter: "humidity",
            expected: temperature.len(),
            actual: humidity.len(),
        });
    }
    params.check_len(temperature.len())?;

    let results = temperature
        .iter()
        .zip(humidity)
        .enumerate()
        .map(|(i, (t, rh))| {
            let (t, rh) = ((*t)?, (*rh)?);
            let (velocity, person) = params.at(i)?;
            let conditions = ThermalConditions::still_air(t, rh, velocity);
            Some(formula.evaluate(&conditions, &person))
        })
        .collect();
    Ok(results)
}
