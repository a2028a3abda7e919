//! # Points of Interest
//!
//! Statistical peak/threshold scan over a series. Bounds are either supplied
//! or derived as `mean ± k·σ` (population variance) from the samples outside
//! daylight. Two scan modes:
//!
//! - **all points**: every sample on or beyond a bound is reported
//! - **peak**: each contiguous excursion above `upper` (or below `lower`)
//!   yields its single most extreme sample
//!
//! Samples inside daylight (when excluded) and missing samples both close an
//! open peak, so an excursion never spans a gap.

use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::{Validate, ValidationError};

use crate::domain::{EpochMillis, Sample, SampleClock};
use crate::error::AnomalyError;
use crate::solar::SunlightCalendar;

/// Explicit excursion bounds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub upper: f64,
    pub lower: f64,
}

fn validate_bounds(bounds: &Bounds) -> Result<(), ValidationError> {
    if bounds.lower <= bounds.upper {
        Ok(())
    } else {
        Err(ValidationError::new("lower_above_upper"))
    }
}

/// Options for [`find_points_of_interest`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct AnomalyConfig {
    /// Bound distance from the mean in standard deviations
    #[validate(range(min = 0.0))]
    pub num_std_dev: f64,
    /// Report every out-of-band sample instead of one peak per excursion
    pub all_points: bool,
    /// Skip samples that fall inside daylight
    pub exclude_daylight: bool,
    /// Fixed bounds; statistics are not computed when set
    #[validate(custom(function = "validate_bounds"))]
    pub bounds: Option<Bounds>,
}

impl Default for AnomalyConfig {
    fn default() -> Self {
        Self {
            num_std_dev: 2.0,
            all_points: false,
            exclude_daylight: true,
            bounds: None,
        }
    }
}

impl AnomalyConfig {
    pub fn std_devs(num_std_dev: f64) -> Self {
        Self {
            num_std_dev,
            ..Default::default()
        }
    }

    pub fn with_daylight(mut self, exclude_daylight: bool) -> Self {
        self.exclude_daylight = exclude_daylight;
        self
    }

    pub fn with_bounds(mut self, upper: f64, lower: f64) -> Self {
        self.bounds = Some(Bounds { upper, lower });
        self
    }
}

/// Mean and spread of the reference samples
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStatistics {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub count: usize,
}

/// Per-index exclusion flags: daylight (if enabled) or nothing
fn exclusion_mask(
    len: usize,
    start: EpochMillis,
    end: EpochMillis,
    calendar: Option<&SunlightCalendar>,
    exclude_daylight: bool,
) -> Vec<bool> {
    match calendar {
        Some(calendar) if exclude_daylight => {
            calendar.daylight_mask(&SampleClock::new(start, end, len))
        }
        _ => vec![false; len],
    }
}

fn statistics(series: &[Sample], excluded: &[bool]) -> Result<SeriesStatistics, AnomalyError> {
    let values: Vec<f64> = series
        .iter()
        .zip(excluded)
        .filter_map(|(sample, &skip)| if skip { None } else { *sample })
        .collect();
    if values.is_empty() {
        return Err(AnomalyError::NoReferenceSamples);
    }

    let count = values.len();
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;
    let std_dev = variance.sqrt();
    debug!(mean, variance, std_dev, count, total = series.len(), "series statistics");

    Ok(SeriesStatistics {
        mean,
        variance,
        std_dev,
        count,
    })
}

/// Statistics of `series` over samples outside daylight (when excluded)
pub fn series_statistics(
    series: &[Sample],
    start: EpochMillis,
    end: EpochMillis,
    calendar: Option<&SunlightCalendar>,
    exclude_daylight: bool,
) -> Result<SeriesStatistics, AnomalyError> {
    let excluded = exclusion_mask(series.len(), start, end, calendar, exclude_daylight);
    statistics(series, &excluded)
}

fn bounds_from(
    series: &[Sample],
    excluded: &[bool],
    config: &AnomalyConfig,
) -> Result<Bounds, AnomalyError> {
    if let Some(bounds) = config.bounds {
        return Ok(bounds);
    }
    let stats = statistics(series, excluded)?;
    if stats.std_dev == 0.0 {
        return Err(AnomalyError::ZeroSpread { mean: stats.mean });
    }
    Ok(Bounds {
        upper: stats.mean + config.num_std_dev * stats.std_dev,
        lower: stats.mean - config.num_std_dev * stats.std_dev,
    })
}

/// Bounds the scan would use for `series` under `config`
pub fn resolve_bounds(
    series: &[Sample],
    start: EpochMillis,
    end: EpochMillis,
    calendar: Option<&SunlightCalendar>,
    config: &AnomalyConfig,
) -> Result<Bounds, AnomalyError> {
    config.validate()?;
    let excluded = exclusion_mask(series.len(), start, end, calendar, config.exclude_daylight);
    bounds_from(series, &excluded, config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Region {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy)]
struct Peak {
    index: usize,
    value: f64,
    region: Region,
}

impl Peak {
    fn is_exceeded_by(&self, value: f64) -> bool {
        match self.region {
            Region::Above => value > self.value,
            Region::Below => value < self.value,
        }
    }
}

/// Indices of statistically anomalous samples, in ascending order.
///
/// Daylight exclusion only applies when a `calendar` is given. Values
/// `>= upper` count as above (checked first), values `<= lower` as below. A
/// held peak is replaced only by a strictly more extreme value, so ties keep
/// the earliest index.
pub fn find_points_of_interest(
    series: &[Sample],
    start: EpochMillis,
    end: EpochMillis,
    calendar: Option<&SunlightCalendar>,
    config: &AnomalyConfig,
) -> Result<Vec<usize>, AnomalyError> {
    config.validate()?;
    let excluded = exclusion_mask(series.len(), start, end, calendar, config.exclude_daylight);
    let Bounds { upper, lower } = bounds_from(series, &excluded, config)?;

    let mut points = Vec::new();
    let mut open: Option<Peak> = None;

    for (index, (sample, &skip)) in series.iter().zip(&excluded).enumerate() {
        let Some(value) = sample.filter(|_| !skip) else {
            if let Some(peak) = open.take() {
                points.push(peak.index);
            }
            continue;
        };

        let region = if value >= upper {
            Some(Region::Above)
        } else if value <= lower {
            Some(Region::Below)
        } else {
            None
        };

        if config.all_points {
            if region.is_some() {
                points.push(index);
            }
            continue;
        }

        match (region, open) {
            (None, Some(peak)) => {
                points.push(peak.index);
                open = None;
            }
            (None, None) => {}
            (Some(region), Some(peak)) if peak.region != region => {
                points.push(peak.index);
                open = Some(Peak { index, value, region });
            }
            (Some(_), Some(peak)) => {
                if peak.is_exceeded_by(value) {
                    open = Some(Peak { index, value, ..peak });
                }
            }
            (Some(region), None) => open = Some(Peak { index, value, region }),
        }
    }

    if let Some(peak) = open {
        points.push(peak.index);
    }
    Ok(points)
}
