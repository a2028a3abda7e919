//! Error types for the comfort and thermal engines.
//!
//! Missing samples are never errors; they travel as `None` through every
//! per-sample computation. The variants here cover inputs the numerics cannot
//! give a meaningful answer for.

use thiserror::Error;

/// Dataset construction errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DatasetError {
    #[error("Series length mismatch: {series} has {actual} samples, expected {expected}")]
    LengthMismatch {
        series: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Dataset end {end} precedes start {start}")]
    InvertedRange { start: i64, end: i64 },

    #[error("Dataset contains no samples")]
    Empty,

    #[error("Timestamp {timestamp} ms is outside the representable date range")]
    UnrepresentableTimestamp { timestamp: i64 },
}

/// Points-of-interest scan errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnomalyError {
    #[error("No samples available to derive statistics (all missing or inside daylight)")]
    NoReferenceSamples,

    #[error("Series has zero spread around mean {mean}; bounds are undefined")]
    ZeroSpread { mean: f64 },

    #[error("Invalid anomaly configuration: {0}")]
    InvalidConfig(String),
}

/// Occupancy estimation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OccupancyError {
    #[error("Brightness and rate series differ in length: {brightness} vs {rate}")]
    LengthMismatch { brightness: usize, rate: usize },

    #[error("No night-time sample exceeds the noise floor of {noise_floor}; occupied brightness is undefined")]
    NoIlluminatedSamples { noise_floor: f64 },

    #[error("Point of interest {index} lies outside the series (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Invalid occupancy configuration: {0}")]
    InvalidConfig(String),
}

/// Comfort batch errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComfortError {
    #[error("Parameter series {parameter} has {actual} samples, expected {expected}")]
    LengthMismatch {
        parameter: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid schedule: {0}")]
    InvalidSchedule(String),

    #[error("Invalid personal defaults: {0}")]
    InvalidDefaults(String),
}

/// Room thermal solver errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThermalError {
    #[error("{property} is only tabulated between {min_k} K and {max_k} K, requested {temperature_k:.2} K")]
    PropertyOutOfRange {
        property: &'static str,
        temperature_k: f64,
        min_k: f64,
        max_k: f64,
    },

    #[error("Room can never reach target: net heat input {net_power_w:.1} W at {temperature_c:.2} °C")]
    HeatingStalled { temperature_c: f64, net_power_w: f64 },

    #[error("Invalid room configuration: {0}")]
    InvalidConfig(String),
}

/// Configuration errors found after extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("Invalid {section} configuration: {reason}")]
    Invalid {
        section: &'static str,
        reason: String,
    },
}

impl From<validator::ValidationErrors> for ComfortError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ComfortError::InvalidDefaults(errors.to_string())
    }
}

impl From<validator::ValidationErrors> for ThermalError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ThermalError::InvalidConfig(errors.to_string())
    }
}

impl From<validator::ValidationErrors> for AnomalyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AnomalyError::InvalidConfig(errors.to_string())
    }
}

impl From<validator::ValidationErrors> for OccupancyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        OccupancyError::InvalidConfig(errors.to_string())
    }
}
