//! # Sunrise Equation
//!
//! Sunrise and sunset instants for one calendar day from the standard
//! solar-position sunrise equation: Julian day, mean solar noon, mean anomaly,
//! equation of the centre, ecliptic longitude, solar transit, declination and
//! hour angle.
//!
//! Longitudes are measured positive WEST of Greenwich.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{EpochMillis, MILLIS_PER_DAY};

const UNIX_EPOCH_JULIAN: f64 = 2440587.5;
const J2000: f64 = 2451545.0;
const EARTH_AXIAL_TILT_DEG: f64 = 23.44;
/// Solar disc radius plus atmospheric refraction
const HORIZON_CORRECTION_DEG: f64 = -0.83;

/// Observer location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    /// Latitude in degrees, north positive
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude_deg: f64,
    /// Longitude in degrees, WEST positive
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude_west_deg: f64,
}

impl Default for Location {
    /// Cambridge, UK
    fn default() -> Self {
        Self {
            latitude_deg: 52.207,
            longitude_west_deg: -0.121,
        }
    }
}

/// Whether the sun crosses the horizon on a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SunCondition {
    /// Sun rises and sets
    Normal,
    /// Sun stays above the horizon all day
    PolarDay,
    /// Sun stays below the horizon all day
    PolarNight,
}

/// Sunrise and sunset of one day (epoch milliseconds).
///
/// For [`SunCondition::PolarDay`] the window spans the full day centred on
/// solar transit; for [`SunCondition::PolarNight`] it is empty (both instants
/// equal the transit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SunlightWindow {
    pub sunrise: EpochMillis,
    pub sunset: EpochMillis,
    pub condition: SunCondition,
}

impl SunlightWindow {
    /// True if `timestamp` falls inside the daylight part of this window.
    ///
    /// On a normal day the instant must lie strictly between
    /// `sunrise + margin` and `sunset - margin`. A polar day counts in full,
    /// without the margin; a polar night never contains daylight.
    pub fn contains(&self, timestamp: EpochMillis, margin_ms: i64) -> bool {
        match self.condition {
            SunCondition::Normal => {
                timestamp > self.sunrise + margin_ms && timestamp < self.sunset - margin_ms
            }
            SunCondition::PolarDay => timestamp >= self.sunrise && timestamp < self.sunset,
            SunCondition::PolarNight => false,
        }
    }
}

/// Julian day number containing `timestamp`
pub fn julian_day(timestamp: EpochMillis) -> f64 {
    (timestamp as f64 / MILLIS_PER_DAY as f64 + UNIX_EPOCH_JULIAN).floor()
}

/// Epoch milliseconds of a fractional Julian date
pub fn julian_to_millis(julian: f64) -> EpochMillis {
    ((julian - UNIX_EPOCH_JULIAN) * MILLIS_PER_DAY as f64) as EpochMillis
}

/// Sunrise and sunset for the calendar day containing `timestamp`.
///
/// Julian days start at noon, so the day is taken from the Julian day number
/// of the instant; pass a midday timestamp to target a civil date (see
/// [`sunrise_sunset_on`]).
pub fn sunrise_sunset(timestamp: EpochMillis, location: &Location) -> SunlightWindow {
    let rad = std::f64::consts::PI / 180.0;

    let n = julian_day(timestamp) - J2000 + 0.0008;
    let mean_noon = location.longitude_west_deg / 360.0 + n;
    let mean_anomaly = (357.5291 + 0.98560028 * mean_noon).rem_euclid(360.0);
    let centre = 1.9148 * (mean_anomaly * rad).sin()
        + 0.0200 * (2.0 * mean_anomaly * rad).sin()
        + 0.0003 * (3.0 * mean_anomaly * rad).sin();
    let ecliptic_longitude = (mean_anomaly + centre + 180.0 + 102.9372).rem_euclid(360.0);
    let transit = J2000 + mean_noon + 0.0053 * (mean_anomaly * rad).sin()
        - 0.0069 * (2.0 * ecliptic_longitude * rad).sin();

    let sin_declination = (ecliptic_longitude * rad).sin() * (EARTH_AXIAL_TILT_DEG * rad).sin();
    let latitude = location.latitude_deg * rad;
    let cos_hour_angle = ((HORIZON_CORRECTION_DEG * rad).sin() - latitude.sin() * sin_declination)
        / (latitude.cos() * sin_declination.asin().cos());

    let (half_day, condition) = if cos_hour_angle > 1.0 {
        (0.0, SunCondition::PolarNight)
    } else if cos_hour_angle < -1.0 {
        (0.5, SunCondition::PolarDay)
    } else {
        (cos_hour_angle.acos() / rad / 360.0, SunCondition::Normal)
    };

    SunlightWindow {
        sunrise: julian_to_millis(transit - half_day),
        sunset: julian_to_millis(transit + half_day),
        condition,
    }
}

/// Sunrise and sunset for a UTC civil date
pub fn sunrise_sunset_on(date: NaiveDate, location: &Location) -> SunlightWindow {
    let noon = date.and_time(NaiveTime::MIN).and_utc().timestamp_millis() + MILLIS_PER_DAY / 2;
    sunrise_sunset(noon, location)
}
