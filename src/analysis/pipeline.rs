//! Full analysis of one dataset.
//!
//! Each run returns its own [`AnalysisReport`]; the only state kept between
//! runs is the sunlight calendar, reused while the dataset range and location
//! stay the same.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use tracing::{info, warn};

use super::anomaly::{find_points_of_interest, AnomalyConfig};
use super::occupancy::{estimate_occupancy, occupied_percentage, OccupancyConfig, OccupancyEvent};
use super::rate::rate_of_change;
use crate::comfort::{ComfortFormula, ComfortResult, SubjectArchetype};
use crate::domain::{Dataset, LightChannel, Sample};
use crate::psychrometrics::{humidity_series, HumidityStats};
use crate::solar::{CalendarCache, Location, SunlightCalendar, SunlightWindow};

/// Light rates (per minute) beyond ± this are points of interest
pub const DEFAULT_LIGHT_RATE_BOUND: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub location: Location,
    pub occupancy: OccupancyConfig,
    /// Fixed ± bound on light rates (per minute); σ-derived bounds when unset
    pub light_rate_bound: Option<f64>,
    pub formula: ComfortFormula,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            location: Location::default(),
            occupancy: OccupancyConfig::default(),
            light_rate_bound: Some(DEFAULT_LIGHT_RATE_BOUND),
            formula: ComfortFormula::default(),
        }
    }
}

/// Rate of change of one series and its points of interest at 1σ and 2σ.
///
/// A scan that has no defined bounds is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesAnalysis {
    pub rate: Vec<Sample>,
    pub poi_1st_std_dev: Option<Vec<usize>>,
    pub poi_2nd_std_dev: Option<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub sunlight: Vec<SunlightWindow>,
    pub humidity: Vec<Option<HumidityStats>>,
    pub temperature: SeriesAnalysis,
    pub light: BTreeMap<LightChannel, SeriesAnalysis>,
    pub occupancy: Option<Vec<OccupancyEvent>>,
    pub occupied_percentage: Option<f64>,
    pub comfort: BTreeMap<SubjectArchetype, Vec<Option<ComfortResult>>>,
}

#[derive(Debug, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
    cache: CalendarCache,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            cache: CalendarCache::new(),
        }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(&mut self, dataset: &Dataset) -> AnalysisReport {
        let config = self.config;
        let clock = dataset.clock();
        let calendar = self
            .cache
            .get_or_build(dataset.start, dataset.end, config.location);
        info!(samples = dataset.len(), days = calendar.days.len(), "analysing dataset");

        let temperature = analyse_series(
            "temperature",
            &rate_of_change(&dataset.temperature, clock.interval_hours()),
            dataset,
            calendar,
            AnomalyConfig::default().with_daylight(false),
        );

        let light_config = match config.light_rate_bound {
            Some(bound) => AnomalyConfig::default().with_bounds(bound, -bound),
            None => AnomalyConfig::default(),
        };
        let light: BTreeMap<_, _> = LightChannel::iter()
            .map(|channel| {
                let rate = rate_of_change(dataset.light(channel), clock.interval_minutes());
                let name = channel.to_string();
                let analysis = analyse_series(&name, &rate, dataset, calendar, light_config);
                (channel, analysis)
            })
            .collect();

        let occupancy = light.get(&LightChannel::Clear).and_then(|clear| {
            let points = clear.poi_1st_std_dev.as_deref()?;
            estimate_occupancy(
                &dataset.light_clear,
                &clear.rate,
                points,
                dataset.start,
                dataset.end,
                calendar,
                &config.occupancy,
            )
            .map_err(|e| warn!(error = %e, "occupancy estimation skipped"))
            .ok()
        });
        let occupied = occupied_percentage(
            &dataset.light_clear,
            dataset.start,
            dataset.end,
            calendar,
            config.occupancy.noise_floor,
        );

        let comfort = SubjectArchetype::iter()
            .filter_map(|subject| {
                subject
                    .series_comfort(&dataset.temperature, &dataset.humidity, config.formula)
                    .map_err(|e| warn!(%subject, error = %e, "subject comfort skipped"))
                    .ok()
                    .map(|series| (subject, series))
            })
            .collect();

        AnalysisReport {
            sunlight: calendar.days.clone(),
            humidity: humidity_series(&dataset.temperature, &dataset.humidity),
            temperature,
            light,
            occupancy,
            occupied_percentage: occupied,
            comfort,
        }
    }
}

fn analyse_series(
    name: &str,
    rate: &[Sample],
    dataset: &Dataset,
    calendar: &SunlightCalendar,
    config: AnomalyConfig,
) -> SeriesAnalysis {
    let scan = |num_std_dev: f64| {
        let config = AnomalyConfig {
            num_std_dev,
            ..config
        };
        find_points_of_interest(rate, dataset.start, dataset.end, Some(calendar), &config)
            .map_err(|e| warn!(series = name, num_std_dev, error = %e, "points of interest undefined"))
            .ok()
    };
    SeriesAnalysis {
        poi_1st_std_dev: scan(1.0),
        poi_2nd_std_dev: scan(2.0),
        rate: rate.to_vec(),
    }
}
