use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::sunrise::{sunrise_sunset_on, Location, SunlightWindow};
use crate::domain::{EpochMillis, SampleClock, MILLIS_PER_MINUTE};

/// Dawn/dusk margin applied at query time
pub const DAYLIGHT_MARGIN_MS: i64 = 30 * MILLIS_PER_MINUTE;

/// Sunlight windows for every UTC day covered by a dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunlightCalendar {
    pub start: EpochMillis,
    pub end: EpochMillis,
    pub location: Location,
    pub days: Vec<SunlightWindow>,
}

fn utc_date(timestamp: EpochMillis) -> Option<NaiveDate> {
    DateTime::from_timestamp_millis(timestamp).map(|dt| dt.date_naive())
}

impl SunlightCalendar {
    /// One window per UTC date from `start` to `end`, both inclusive.
    ///
    /// A bound outside the calendar's representable range leaves the
    /// calendar empty, so nothing counts as daylight.
    pub fn build(start: EpochMillis, end: EpochMillis, location: Location) -> Self {
        let days: Vec<SunlightWindow> = match (utc_date(start), utc_date(end)) {
            (Some(first), Some(last)) => first
                .iter_days()
                .take_while(|date| *date <= last)
                .map(|date| sunrise_sunset_on(date, &location))
                .collect(),
            _ => {
                warn!(start, end, "timestamp outside calendar range, no sunlight windows");
                Vec::new()
            }
        };
        debug!(days = days.len(), start, end, "built sunlight calendar");

        Self {
            start,
            end,
            location,
            days,
        }
    }

    pub fn for_clock(clock: &SampleClock, location: Location) -> Self {
        Self::build(clock.start, clock.end, location)
    }

    /// Whether this calendar was built for the given range and location
    pub fn covers(&self, start: EpochMillis, end: EpochMillis, location: &Location) -> bool {
        self.start == start && self.end == end && self.location == *location
    }

    /// Daylight test with the default half-hour margin
    pub fn is_in_daylight(&self, timestamp: EpochMillis) -> bool {
        self.is_in_daylight_with_margin(timestamp, DAYLIGHT_MARGIN_MS)
    }

    pub fn is_in_daylight_with_margin(&self, timestamp: EpochMillis, margin_ms: i64) -> bool {
        self.days.iter().any(|day| day.contains(timestamp, margin_ms))
    }

    /// Daylight flag per sample index of `clock`
    pub fn daylight_mask(&self, clock: &SampleClock) -> Vec<bool> {
        (0..clock.len)
            .map(|i| self.is_in_daylight(clock.timestamp_at(i)))
            .collect()
    }
}

/// Holds the calendar of the dataset currently under analysis and rebuilds it
/// only when the range or location changes.
#[derive(Debug, Default)]
pub struct CalendarCache {
    current: Option<SunlightCalendar>,
}

impl CalendarCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(
        &mut self,
        start: EpochMillis,
        end: EpochMillis,
        location: Location,
    ) -> &SunlightCalendar {
        let stale = !matches!(&self.current, Some(c) if c.covers(start, end, &location));
        if stale {
            self.current = None;
        }
        self.current
            .get_or_insert_with(|| SunlightCalendar::build(start, end, location))
    }

    pub fn invalidate(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MILLIS_PER_DAY;

    // 2024-03-18T00:00:00Z
    const MONDAY: EpochMillis = 1_710_720_000_000;

    #[test]
    fn test_calendar_spans_inclusive_days() {
        let calendar =
            SunlightCalendar::build(MONDAY + 3_600_000, MONDAY + 2 * MILLIS_PER_DAY, Location::default());
        assert_eq!(calendar.days.len(), 3);

        let single = SunlightCalendar::build(MONDAY, MONDAY + 1_000, Location::default());
        assert_eq!(single.days.len(), 1);
    }

    #[test]
    fn test_daylight_membership() {
        let calendar = SunlightCalendar::build(MONDAY, MONDAY + MILLIS_PER_DAY, Location::default());
        // Midday is daylight, midnight is not
        assert!(calendar.is_in_daylight(MONDAY + MILLIS_PER_DAY / 2));
        assert!(!calendar.is_in_daylight(MONDAY));
        assert!(!calendar.is_in_daylight(MONDAY + 23 * 3_600_000));

        let first = calendar.days[0];
        assert!(!calendar.is_in_daylight(first.sunrise));
    }

    #[test]
    fn test_daylight_mask() {
        let calendar = SunlightCalendar::build(MONDAY, MONDAY + MILLIS_PER_DAY, Location::default());
        let clock = SampleClock::new(MONDAY, MONDAY + MILLIS_PER_DAY, 24);
        let mask = calendar.daylight_mask(&clock);
        assert_eq!(mask.len(), 24);
        assert!(!mask[0]);
        assert!(mask[12]);
    }

    #[test]
    fn test_cache_rebuilds_on_change() {
        let mut cache = CalendarCache::new();
        let days = cache.get_or_build(MONDAY, MONDAY + 1_000, Location::default()).days.len();
        assert_eq!(days, 1);

        // Same inputs: reused
        let again = cache.get_or_build(MONDAY, MONDAY + 1_000, Location::default()).clone();
        assert_eq!(again.days.len(), 1);

        // Longer range: rebuilt
        let longer = cache.get_or_build(MONDAY, MONDAY + 3 * MILLIS_PER_DAY, Location::default());
        assert_eq!(longer.days.len(), 4);

        // New location: rebuilt
        let elsewhere = Location {
            latitude_deg: 40.0,
            longitude_west_deg: 74.0,
        };
        let moved = cache.get_or_build(MONDAY, MONDAY + 3 * MILLIS_PER_DAY, elsewhere);
        assert_eq!(moved.location, elsewhere);
    }

    #[test]
    fn test_unrepresentable_bounds_give_empty_calendar() {
        let calendar = SunlightCalendar::build(i64::MIN, MONDAY, Location::default());
        assert!(calendar.days.is_empty());
        assert!(!calendar.is_in_daylight(MONDAY + MILLIS_PER_DAY / 2));

        let calendar = SunlightCalendar::build(MONDAY, i64::MAX, Location::default());
        assert!(calendar.days.is_empty());
    }
}
