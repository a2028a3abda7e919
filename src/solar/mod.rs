//! # Solar
//!
//! Sunrise/sunset calculation and the per-dataset sunlight calendar used to
//! exclude daylight-contaminated samples from light and temperature analysis.

pub mod calendar;
pub mod sunrise;

pub use calendar::{CalendarCache, SunlightCalendar, DAYLIGHT_MARGIN_MS};
pub use sunrise::{sunrise_sunset, sunrise_sunset_on, Location, SunCondition, SunlightWindow};
