use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds since the Unix epoch
pub type EpochMillis = i64;

/// One sensor reading; `None` marks a missing sample
pub type Sample = Option<f64>;

pub const MILLIS_PER_MINUTE: i64 = 60 * 1000;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Maps sample indices of a fixed-length series onto timestamps.
///
/// Sample `i` of `n` sits at `start + i/n * (end - start)`, floored to the
/// millisecond. The end instant itself is never reached by an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleClock {
    pub start: EpochMillis,
    pub end: EpochMillis,
    pub len: usize,
}

impl SampleClock {
    pub fn new(start: EpochMillis, end: EpochMillis, len: usize) -> Self {
        Self { start, end, len }
    }

    pub fn span_millis(&self) -> i64 {
        self.end - self.start
    }

    /// Timestamp of sample `index`
    pub fn timestamp_at(&self, index: usize) -> EpochMillis {
        if self.len == 0 {
            return self.start;
        }
        let fraction = index as f64 / self.len as f64;
        (fraction * self.span_millis() as f64 + self.start as f64).floor() as EpochMillis
    }

    /// Sample interval in hours (used for temperature rates)
    pub fn interval_hours(&self) -> f64 {
        self.interval_millis() / MILLIS_PER_HOUR as f64
    }

    /// Sample interval in minutes (used for light rates)
    pub fn interval_minutes(&self) -> f64 {
        self.interval_millis() / MILLIS_PER_MINUTE as f64
    }

    fn interval_millis(&self) -> f64 {
        if self.len == 0 {
            return 0.0;
        }
        self.span_millis() as f64 / self.len as f64
    }

    /// UTC datetime of sample `index`
    pub fn datetime_at(&self, index: usize) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp_millis(self.timestamp_at(index))
    }

    /// Local decimal hour-of-day (e.g. 6.5 for 06:30) of sample `index`
    pub fn local_hour_at<Z: TimeZone>(&self, index: usize, tz: &Z) -> Option<f64> {
        let local = self.datetime_at(index)?.with_timezone(tz);
        Some(local.hour() as f64 + local.minute() as f64 / 60.0)
    }
}
