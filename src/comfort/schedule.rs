//! # Time-of-day Comfort Schedule
//!
//! Occupants dress and move differently through the day. A schedule is an
//! ordered list of half-open `[start_hour, end_hour)` bins in local time; the
//! first bin containing a sample's hour supplies its clothing and metabolic
//! rate, and flat defaults cover everything else. After the batch run, results
//! are grouped by bin, averaged and classified into a comfort band.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use super::classification::{classify, ComfortBand};
use super::series::{calculate_pmv_ppd_series, ParameterSeries, PersonalParameters};
use super::{ComfortFormula, ComfortResult};
use crate::domain::{Dataset, SampleClock};
use crate::error::ComfortError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleBin {
    pub description: String,
    pub start_hour: f64,
    pub end_hour: f64,
    /// Metabolic rate (W/m²); the default applies when absent
    #[serde(default)]
    pub metabolic_w_m2: Option<f64>,
    /// Clothing insulation (clo); the default applies when absent
    #[serde(default)]
    pub clothing_clo: Option<f64>,
}

impl ScheduleBin {
    pub fn new(
        description: impl Into<String>,
        start_hour: f64,
        end_hour: f64,
        metabolic_w_m2: Option<f64>,
        clothing_clo: Option<f64>,
    ) -> Self {
        Self {
            description: description.into(),
            start_hour,
            end_hour,
            metabolic_w_m2,
            clothing_clo,
        }
    }

    pub fn contains(&self, hour: f64) -> bool {
        hour >= self.start_hour && hour < self.end_hour
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParameterSchedule {
    pub bins: Vec<ScheduleBin>,
}

impl ParameterSchedule {
    pub fn new(bins: Vec<ScheduleBin>) -> Self {
        Self { bins }
    }

    /// A typical day at home: sleep, get up, work at a desk with a lunch
    /// break, relax, sleep again.
    pub fn default_daily() -> Self {
        // Duvet of about 5 tog
        let duvet = 3.225;
        let pyjamas = 0.57;
        // Trousers, long-sleeved shirt and sweater
        let dressed = 1.01;
        Self::new(vec![
            ScheduleBin::new("Early Hours - Sleeping", 0.0, 6.5, Some(46.0), Some(duvet)),
            ScheduleBin::new("Morning - Wake Up", 6.5, 8.5, Some(100.0), Some(pyjamas)),
            ScheduleBin::new("Morning - Work", 8.5, 12.5, Some(70.0), Some(dressed)),
            ScheduleBin::new("Lunchtime", 12.5, 14.0, Some(100.0), Some(dressed)),
            ScheduleBin::new("Afternoon/Early Evening - Work", 14.0, 22.0, Some(70.0), Some(dressed)),
            ScheduleBin::new("Late Evening - Relaxation", 22.0, 23.0, Some(58.0), Some(pyjamas)),
            ScheduleBin::new("Late Hours - Sleeping", 23.0, 24.0, Some(46.0), Some(duvet)),
        ])
    }

    pub fn validate(&self) -> Result<(), ComfortError> {
        for bin in &self.bins {
            let invalid = |reason: &str| -> Result<(), ComfortError> {
                Err(ComfortError::InvalidSchedule(format!(
                    "bin '{}' {reason}",
                    bin.description
                )))
            };
            if !(bin.start_hour.is_finite() && bin.end_hour.is_finite()) {
                return invalid("has a non-finite bound");
            }
            if bin.start_hour < 0.0 || bin.end_hour > 24.0 || bin.start_hour >= bin.end_hour {
                return invalid("must satisfy 0 <= start_hour < end_hour <= 24");
            }
            if bin.metabolic_w_m2.is_some_and(|m| m.is_nan() || m <= 0.0) {
                return invalid("has a non-positive metabolic rate");
            }
            if bin.clothing_clo.is_some_and(|clo| clo.is_nan() || clo < 0.0) {
                return invalid("has negative clothing insulation");
            }
        }
        Ok(())
    }

    /// Index of the first bin containing `hour`
    pub fn bin_for(&self, hour: f64) -> Option<usize> {
        self.bins.iter().position(|bin| bin.contains(hour))
    }
}

/// Flat personal parameters used outside every schedule bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PersonalDefaults {
    /// W/m²
    #[validate(range(min = 0.0))]
    pub metabolic_w_m2: f64,
    /// clo
    #[validate(range(min = 0.0))]
    pub clothing_clo: f64,
    /// m/s
    #[validate(range(min = 0.0))]
    pub air_velocity: f64,
    /// W/m²
    #[validate(range(min = 0.0))]
    pub external_work_w_m2: f64,
}

impl Default for PersonalDefaults {
    fn default() -> Self {
        Self {
            metabolic_w_m2: 100.0,
            // Socks, trousers, long-sleeved shirt and jumper
            clothing_clo: 0.82,
            air_velocity: 0.1,
            external_work_w_m2: 0.0,
        }
    }
}

/// Per-sample parameters for the samples of `clock` in local time `tz`
pub fn schedule_parameters(
    clock: &SampleClock,
    tz: &Tz,
    schedule: &ParameterSchedule,
    defaults: &PersonalDefaults,
) -> PersonalParameters {
    let (clothing, metabolic): (Vec<_>, Vec<_>) = (0..clock.len)
        .map(|i| {
            let bin = clock
                .local_hour_at(i, tz)
                .and_then(|hour| schedule.bin_for(hour))
                .map(|b| &schedule.bins[b]);
            let clothing = bin
                .and_then(|b| b.clothing_clo)
                .unwrap_or(defaults.clothing_clo);
            let metabolic = bin
                .and_then(|b| b.metabolic_w_m2)
                .unwrap_or(defaults.metabolic_w_m2);
            (Some(clothing), Some(metabolic))
        })
        .unzip();

    PersonalParameters {
        air_velocity: ParameterSeries::Constant(defaults.air_velocity),
        clothing_clo: ParameterSeries::PerSample(clothing),
        metabolic_w_m2: ParameterSeries::PerSample(metabolic),
        external_work_w_m2: ParameterSeries::Constant(defaults.external_work_w_m2),
    }
}

/// Averaged comfort over every sample falling in one schedule bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSummary {
    pub description: String,
    /// Samples that fell in the bin, including ones without a result
    pub samples: usize,
    pub mean_pmv: Option<f64>,
    pub mean_ppd: Option<f64>,
    pub band: Option<ComfortBand>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleComfort {
    pub per_sample: Vec<Option<ComfortResult>>,
    /// One summary per schedule bin, in schedule order
    pub bins: Vec<BinSummary>,
}

#[derive(Default)]
struct BinAccumulator {
    samples: usize,
    pmv_sum: f64,
    ppd_sum: f64,
    results: usize,
}

impl BinAccumulator {
    fn push(&mut self, result: Option<&ComfortResult>) {
        self.samples += 1;
        if let Some(result) = result {
            self.pmv_sum += result.pmv;
            self.ppd_sum += result.ppd;
            self.results += 1;
        }
    }

    fn summarise(&self, description: &str) -> BinSummary {
        let mean = |sum: f64| (self.results > 0).then(|| sum / self.results as f64);
        let (mean_pmv, mean_ppd) = (mean(self.pmv_sum), mean(self.ppd_sum));
        BinSummary {
            description: description.to_string(),
            samples: self.samples,
            mean_pmv,
            mean_ppd,
            band: mean_pmv.zip(mean_ppd).and_then(|(pmv, ppd)| classify(pmv, ppd)),
        }
    }
}

/// Schedule-driven PMV/PPD over a dataset, summarised per bin
pub fn schedule_comfort(
    dataset: &Dataset,
    tz: &Tz,
    schedule: &ParameterSchedule,
    defaults: &PersonalDefaults,
    formula: ComfortFormula,
) -> Result<ScheduleComfort, ComfortError> {
    defaults.validate()?;
    schedule.validate()?;

    let clock = dataset.clock();
    let params = schedule_parameters(&clock, tz, schedule, defaults);
    let per_sample =
        calculate_pmv_ppd_series(&dataset.temperature, &dataset.humidity, &params, formula)?;

    let mut accumulators: Vec<BinAccumulator> =
        schedule.bins.iter().map(|_| BinAccumulator::default()).collect();
    for (i, result) in per_sample.iter().enumerate() {
        if let Some(bin) = clock
            .local_hour_at(i, tz)
            .and_then(|hour| schedule.bin_for(hour))
        {
            accumulators[bin].push(result.as_ref());
        }
    }

    let bins: Vec<BinSummary> = schedule
        .bins
        .iter()
        .zip(&accumulators)
        .map(|(bin, acc)| acc.summarise(&bin.description))
        .collect();
    for summary in &bins {
        debug!(
            bin = %summary.description,
            samples = summary.samples,
            mean_pmv = ?summary.mean_pmv,
            band = ?summary.band,
            "schedule bin summary"
        );
    }

    Ok(ScheduleComfort { per_sample, bins })
}
