//! # Series Analysis
//!
//! Statistical analysis of one dataset's sensor series.
//!
//! ## Components
//!
//! - **rate**: first-difference rate of change
//! - **anomaly**: points-of-interest scan with optional daylight exclusion
//! - **occupancy**: entry/exit events voted from light changes
//! - **pipeline**: one full analysis run over a dataset, returning an owned report

pub mod anomaly;
pub mod occupancy;
pub mod pipeline;
pub mod rate;

pub use anomaly::{
    find_points_of_interest, resolve_bounds, series_statistics, AnomalyConfig, Bounds,
    SeriesStatistics,
};
pub use occupancy::{
    estimate_occupancy, occupied_brightness_threshold, occupied_percentage, OccupancyConfig,
    OccupancyEvent, OccupancyEventKind,
};
pub use pipeline::{
    AnalysisConfig, AnalysisReport, Analyzer, SeriesAnalysis, DEFAULT_LIGHT_RATE_BOUND,
};
pub use rate::rate_of_change;
