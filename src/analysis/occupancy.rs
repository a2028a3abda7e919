//! # Occupancy Estimation
//!
//! Turns light-change points of interest into room entry/exit events.
//!
//! 1. The occupied-brightness threshold is the mean brightness of night-time
//!    samples above a small noise floor.
//! 2. Each point of interest is a candidate entry (positive rate) or exit
//!    (negative rate); a zero or missing rate is ignored.
//! 3. A candidate collects up to three votes from the next sample, itself and
//!    the previous sample; enough votes confirm it.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::debug;
use validator::Validate;

use crate::domain::{EpochMillis, Sample, SampleClock};
use crate::error::OccupancyError;
use crate::solar::SunlightCalendar;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OccupancyConfig {
    /// Brightness at or below this is treated as sensor noise
    #[validate(range(min = 0.0))]
    pub noise_floor: f64,
    /// Votes (of three) needed to confirm a candidate
    #[validate(range(min = 1, max = 3))]
    pub min_votes: u8,
}

impl Default for OccupancyConfig {
    fn default() -> Self {
        Self {
            noise_floor: 5.0,
            min_votes: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OccupancyEventKind {
    Entry,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OccupancyEvent {
    pub kind: OccupancyEventKind,
    pub timestamp: EpochMillis,
    /// Sample index the event was detected at
    pub index: usize,
}

/// Mean night-time brightness above the noise floor
pub fn occupied_brightness_threshold(
    brightness: &[Sample],
    daylight: &[bool],
    noise_floor: f64,
) -> Result<f64, OccupancyError> {
    let (sum, count) = brightness
        .iter()
        .zip(daylight)
        .filter_map(|(sample, &lit)| if lit { None } else { *sample })
        .filter(|value| *value > noise_floor)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        return Err(OccupancyError::NoIlluminatedSamples { noise_floor });
    }
    let threshold = sum / count as f64;
    debug!(threshold, samples = count, "mean occupied brightness");
    Ok(threshold)
}

/// Vote on the neighbour at `index`: beyond the series it votes, missing it does not
fn neighbour_vote(brightness: &[Sample], index: Option<usize>, test: impl Fn(f64) -> bool) -> u8 {
    match index.map(|i| brightness.get(i)) {
        None | Some(None) => 1,
        Some(Some(Some(value))) => u8::from(test(*value)),
        Some(Some(None)) => 0,
    }
}

fn votes(brightness: &[Sample], index: usize, kind: OccupancyEventKind, threshold: f64) -> u8 {
    // Complementary: a sample at the threshold counts as lit
    let lit = |v: f64| v >= threshold;
    let dark = |v: f64| v < threshold;
    let next = index.checked_add(1).filter(|i| *i < brightness.len());
    let prev = index.checked_sub(1);

    match kind {
        OccupancyEventKind::Entry => {
            neighbour_vote(brightness, next, lit)
                + u8::from(brightness[index].is_some_and(lit))
                + neighbour_vote(brightness, prev, dark)
        }
        OccupancyEventKind::Exit => {
            neighbour_vote(brightness, next, dark)
                + u8::from(brightness[index].is_some_and(dark))
                + neighbour_vote(brightness, prev, lit)
        }
    }
}

/// Confirmed entry/exit events, in the order of `points`.
///
/// `rate` must align with `brightness`; `points` are indices from the
/// points-of-interest scan of `rate`.
pub fn estimate_occupancy(
    brightness: &[Sample],
    rate: &[Sample],
    points: &[usize],
    start: EpochMillis,
    end: EpochMillis,
    calendar: &SunlightCalendar,
    config: &OccupancyConfig,
) -> Result<Vec<OccupancyEvent>, OccupancyError> {
    config.validate()?;
    if brightness.len() != rate.len() {
        return Err(OccupancyError::LengthMismatch {
            brightness: brightness.len(),
            rate: rate.len(),
        });
    }
    if let Some(&index) = points.iter().find(|&&i| i >= brightness.len()) {
        return Err(OccupancyError::IndexOutOfRange {
            index,
            len: brightness.len(),
        });
    }

    let clock = SampleClock::new(start, end, brightness.len());
    let daylight = calendar.daylight_mask(&clock);
    let threshold = occupied_brightness_threshold(brightness, &daylight, config.noise_floor)?;

    let events = points
        .iter()
        .filter_map(|&index| {
            let kind = match rate[index] {
                Some(r) if r > 0.0 => OccupancyEventKind::Entry,
                Some(r) if r < 0.0 => OccupancyEventKind::Exit,
                _ => return None,
            };
            let votes = votes(brightness, index, kind, threshold);
            let timestamp = clock.timestamp_at(index);
            debug!(%kind, index, timestamp, votes, "occupancy candidate");
            (votes >= config.min_votes).then_some(OccupancyEvent {
                kind,
                timestamp,
                index,
            })
        })
        .collect();
    Ok(events)
}

/// Percentage of night-time samples brighter than `noise_floor`.
///
/// Missing samples are left out; `None` when no night-time sample remains.
pub fn occupied_percentage(
    brightness: &[Sample],
    start: EpochMillis,
    end: EpochMillis,
    calendar: &SunlightCalendar,
    noise_floor: f64,
) -> Option<f64> {
    let clock = SampleClock::new(start, end, brightness.len());
    let (lit, total) = brightness
        .iter()
        .zip(calendar.daylight_mask(&clock))
        .filter_map(|(sample, daylight)| if daylight { None } else { *sample })
        .fold((0usize, 0usize), |(lit, total), value| {
            (lit + usize::from(value > noise_floor), total + 1)
        });
    (total > 0).then(|| 100.0 * lit as f64 / total as f64)
}
