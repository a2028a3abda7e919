//! End-to-end analysis of a synthetic evening of sensor readings.

use room_comfort_engine::analysis::{AnalysisConfig, Analyzer, OccupancyEventKind};
use room_comfort_engine::comfort::{
    schedule_comfort, ComfortBand, ComfortFormula, ParameterSchedule, PersonalDefaults,
    SubjectArchetype,
};
use room_comfort_engine::domain::{
    Dataset, DatasetBuilder, EpochMillis, LightChannel, SensorFrame, MILLIS_PER_MINUTE,
};
use room_comfort_engine::error::DatasetError;

// 2024-01-15T18:00:00Z
const EVENING: EpochMillis = 1_705_341_600_000;

fn frame(temperature: f64, clear: f64) -> SensorFrame {
    SensorFrame {
        temperature: Some(temperature),
        humidity: Some(45.0),
        pressure: Some(1012.0),
        red: Some(clear / 2.0),
        green: Some(clear / 2.0),
        blue: Some(clear / 3.0),
        clear: Some(clear),
    }
}

/// Lights on at sample 4, dimmed at sample 8, with one dropped reading.
/// Twenty minutes apart, so the switches change clear light by 10/min and -8/min.
fn evening() -> Dataset {
    let clear = [0.0, 0.0, 0.0, 0.0, 200.0, 200.0, 200.0, 200.0, 40.0, 40.0];
    let mut builder = DatasetBuilder::new();
    for (i, level) in clear.into_iter().enumerate() {
        builder.push_frame(frame(19.0 + 0.2 * i as f64, level));
    }
    builder.push_frame(SensorFrame {
        temperature: Some(f64::NAN),
        ..frame(21.0, 40.0)
    });
    builder
        .build(EVENING, EVENING + 220 * MILLIS_PER_MINUTE)
        .unwrap()
}

#[test]
fn test_builder_rejects_inverted_range() {
    let mut builder = DatasetBuilder::new();
    builder.push_frame(frame(20.0, 0.0));
    assert!(matches!(
        builder.build(EVENING, EVENING - 1),
        Err(DatasetError::InvertedRange { .. })
    ));
}

#[test]
fn test_evening_report() {
    let dataset = evening();
    assert_eq!(dataset.temperature[10], None);

    let mut analyzer = Analyzer::new(AnalysisConfig::default());
    let report = analyzer.run(&dataset);

    assert_eq!(report.light.len(), 4);
    assert_eq!(report.temperature.rate.len(), 11);
    assert_eq!(report.temperature.rate[10], None);
    assert!(report.humidity[..10].iter().all(Option::is_some));
    assert_eq!(report.humidity[10], None);

    let clear = &report.light[&LightChannel::Clear];
    // Default fixed bound of ±5/min
    assert_eq!(clear.poi_1st_std_dev, Some(vec![4, 8]));
    assert_eq!(clear.poi_1st_std_dev, clear.poi_2nd_std_dev);

    let events = report.occupancy.unwrap();
    assert_eq!(events[0].kind, OccupancyEventKind::Entry);
    assert_eq!(events[0].index, 4);
    assert_eq!(events.last().map(|e| (e.kind, e.index)), Some((OccupancyEventKind::Exit, 8)));

    let office = &report.comfort[&SubjectArchetype::Office];
    assert_eq!(office.len(), 11);
    assert!(office[10].is_none());
    assert!(office[..10].iter().all(|r| r.map_or(false, |r| r.pmv < 0.0)));
}

#[test]
fn test_evening_schedule_bins() {
    let dataset = evening();
    let comfort = schedule_comfort(
        &dataset,
        &chrono_tz::Europe::London,
        &ParameterSchedule::default_daily(),
        &PersonalDefaults::default(),
        ComfortFormula::Ashrae55,
    )
    .unwrap();

    assert_eq!(comfort.per_sample.len(), 11);
    // 18:00 to 21:40 local falls entirely in the afternoon work bin
    let occupied: Vec<_> = comfort.bins.iter().filter(|b| b.samples > 0).collect();
    assert_eq!(occupied.len(), 1);
    assert_eq!(occupied[0].samples, 11);
    assert!(occupied[0].mean_pmv.unwrap() < 0.0);
    assert!(occupied[0].band.is_some());
    assert_ne!(occupied[0].band, Some(ComfortBand::SatisfactoryWarm));

    let empty = comfort.bins.iter().find(|b| b.samples == 0).unwrap();
    assert_eq!(empty.mean_pmv, None);
    assert_eq!(empty.band, None);
}
