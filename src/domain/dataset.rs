use chrono::DateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::series::{EpochMillis, Sample, SampleClock};
use crate::error::DatasetError;

/// The four channels of the colour light sensor
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LightChannel {
    Red,
    Green,
    Blue,
    Clear,
}

/// Aligned environmental sensor series covering `[start, end)`
///
/// Every series shares the same length and bounds; construction fails otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    /// Air temperature (°C)
    pub temperature: Vec<Sample>,
    /// Relative humidity (%)
    pub humidity: Vec<Sample>,
    /// Barometric pressure (as reported by the sensor)
    pub pressure: Vec<Sample>,
    pub light_red: Vec<Sample>,
    pub light_green: Vec<Sample>,
    pub light_blue: Vec<Sample>,
    pub light_clear: Vec<Sample>,
    pub start: EpochMillis,
    pub end: EpochMillis,
}

/// Builder used while frames are appended one at a time
#[derive(Debug, Clone, Default)]
pub struct DatasetBuilder {
    temperature: Vec<Sample>,
    humidity: Vec<Sample>,
    pressure: Vec<Sample>,
    light_red: Vec<Sample>,
    light_green: Vec<Sample>,
    light_blue: Vec<Sample>,
    light_clear: Vec<Sample>,
}

/// One sensor frame; any field may be missing
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorFrame {
    pub temperature: Sample,
    pub humidity: Sample,
    pub pressure: Sample,
    pub red: Sample,
    pub green: Sample,
    pub blue: Sample,
    pub clear: Sample,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one frame; non-finite readings are stored as missing
    pub fn push_frame(&mut self, frame: SensorFrame) -> &mut Self {
        let clean = |s: Sample| s.filter(|v| v.is_finite());
        self.temperature.push(clean(frame.temperature));
        self.humidity.push(clean(frame.humidity));
        self.pressure.push(clean(frame.pressure));
        self.light_red.push(clean(frame.red));
        self.light_green.push(clean(frame.green));
        self.light_blue.push(clean(frame.blue));
        self.light_clear.push(clean(frame.clear));
        self
    }

    pub fn build(self, start: EpochMillis, end: EpochMillis) -> Result<Dataset, DatasetError> {
        Dataset::new(
            self.temperature,
            self.humidity,
            self.pressure,
            [
                self.light_red,
                self.light_green,
                self.light_blue,
                self.light_clear,
            ],
            start,
            end,
        )
    }
}

impl Dataset {
    /// Create a dataset, checking the shared-length invariant
    ///
    /// `light` is ordered red, green, blue, clear.
    pub fn new(
        temperature: Vec<Sample>,
        humidity: Vec<Sample>,
        pressure: Vec<Sample>,
        light: [Vec<Sample>; 4],
        start: EpochMillis,
        end: EpochMillis,
    ) -> Result<Self, DatasetError> {
        if end < start {
            return Err(DatasetError::InvertedRange { start, end });
        }
        if let Some(timestamp) = [start, end]
            .into_iter()
            .find(|&t| DateTime::from_timestamp_millis(t).is_none())
        {
            return Err(DatasetError::UnrepresentableTimestamp { timestamp });
        }
        let expected = temperature.len();
        if expected == 0 {
            return Err(DatasetError::Empty);
        }

        let [light_red, light_green, light_blue, light_clear] = light;
        let check = |series: &'static str, s: &[Sample]| {
            if s.len() == expected {
                Ok(())
            } else {
                Err(DatasetError::LengthMismatch {
                    series,
                    expected,
                    actual: s.len(),
                })
            }
        };
        check("humidity", &humidity)?;
        check("pressure", &pressure)?;
        check("light_red", &light_red)?;
        check("light_green", &light_green)?;
        check("light_blue", &light_blue)?;
        check("light_clear", &light_clear)?;

        Ok(Self {
            temperature,
            humidity,
            pressure,
            light_red,
            light_green,
            light_blue,
            light_clear,
            start,
            end,
        })
    }

    pub fn len(&self) -> usize {
        self.temperature.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temperature.is_empty()
    }

    pub fn clock(&self) -> SampleClock {
        SampleClock::new(self.start, self.end, self.len())
    }

    pub fn light(&self, channel: LightChannel) -> &[Sample] {
        match channel {
            LightChannel::Red => &self.light_red,
            LightChannel::Green => &self.light_green,
            LightChannel::Blue => &self.light_blue,
            LightChannel::Clear => &self.light_clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(t: f64) -> SensorFrame {
        SensorFrame {
            temperature: Some(t),
            humidity: Some(50.0),
            pressure: Some(1013.0),
            red: Some(1.0),
            green: Some(2.0),
            blue: Some(3.0),
            clear: Some(4.0),
        }
    }

    #[test]
    fn test_builder_produces_aligned_series() {
        let mut builder = DatasetBuilder::new();
        builder.push_frame(frame(20.0)).push_frame(SensorFrame {
            temperature: Some(f64::NAN),
            ..frame(21.0)
        });
        let dataset = builder.build(0, 1_000).unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.temperature, vec![Some(20.0), None]);
        assert_eq!(dataset.light(LightChannel::Clear), &[Some(4.0), Some(4.0)]);
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let result = Dataset::new(
            vec![Some(20.0); 3],
            vec![Some(50.0); 2],
            vec![None; 3],
            [vec![None; 3], vec![None; 3], vec![None; 3], vec![None; 3]],
            0,
            1_000,
        );
        assert_eq!(
            result.unwrap_err(),
            DatasetError::LengthMismatch {
                series: "humidity",
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut builder = DatasetBuilder::new();
        builder.push_frame(frame(20.0));
        assert!(matches!(
            builder.build(10, 5),
            Err(DatasetError::InvertedRange { .. })
        ));
    }

    #[test]
    fn test_unrepresentable_timestamp_rejected() {
        let mut builder = DatasetBuilder::new();
        builder.push_frame(frame(20.0));
        assert_eq!(
            builder.clone().build(i64::MIN, 0).unwrap_err(),
            DatasetError::UnrepresentableTimestamp { timestamp: i64::MIN }
        );
        assert_eq!(
            builder.build(0, i64::MAX).unwrap_err(),
            DatasetError::UnrepresentableTimestamp { timestamp: i64::MAX }
        );
    }
}
