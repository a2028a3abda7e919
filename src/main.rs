use std::collections::BTreeMap;

use anyhow::{Context, Result};
use room_comfort_engine::analysis::{AnalysisReport, Analyzer};
use room_comfort_engine::comfort::{ScheduleComfort, SubjectArchetype, ThermalSensation};
use room_comfort_engine::domain::Dataset;
use room_comfort_engine::thermal::{
    self, ConsumptionSummary, ExternalSweepPoint, HeatLoss, HeatTrajectory, NetFluxPoint,
    PanelOutput,
};
use room_comfort_engine::{comfort, config, telemetry};
use config::Config;
use serde::Serialize;
use strum::IntoEnumIterator;
use telemetry::init_tracing;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct ArchetypeComfort {
    description: &'static str,
    pmv: f64,
    ppd: f64,
    sensation: ThermalSensation,
}

#[derive(Debug, Serialize)]
struct RoomReport {
    losses_at_target: HeatLoss,
    panel_output: PanelOutput,
    consumption: Option<ConsumptionSummary>,
    external_sweep: Vec<ExternalSweepPoint>,
    radiator_sweep: Vec<NetFluxPoint>,
    trajectory: HeatTrajectory,
    comfort_at_target: BTreeMap<SubjectArchetype, ArchetypeComfort>,
}

#[derive(Debug, Serialize)]
struct DatasetReport {
    analysis: AnalysisReport,
    schedule: ScheduleComfort,
}

#[derive(Debug, Serialize)]
struct Report {
    room: RoomReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    dataset: Option<DatasetReport>,
}

fn room_report(cfg: &Config) -> Result<RoomReport> {
    let room = &cfg.room;
    let losses_at_target = HeatLoss::at(
        room,
        thermal::to_kelvin(room.target_temp_c),
        thermal::to_kelvin(room.external_temp_c),
    )?;
    let panel_output = thermal::panel_output(&room.panel, room.radiator_temp_c, room.target_temp_c)?;

    let consumption = thermal::consumption_summary(room, &cfg.tariff)?;
    if consumption.is_none() {
        warn!(target_c = room.target_temp_c, "target temperature cannot be held");
    }

    let comfort_at_target = SubjectArchetype::iter()
        .map(|subject| {
            let result = subject.point_comfort(
                room.target_temp_c,
                room.air.relative_humidity,
                Some(room.air_velocity),
                cfg.comfort.formula,
            );
            let entry = ArchetypeComfort {
                description: subject.profile().description,
                pmv: result.pmv,
                ppd: result.ppd,
                sensation: ThermalSensation::from_pmv(result.pmv),
            };
            (subject, entry)
        })
        .collect();

    Ok(RoomReport {
        losses_at_target,
        panel_output,
        consumption,
        external_sweep: thermal::external_temperature_sweep(room)?,
        radiator_sweep: thermal::radiator_sweep(room)?,
        trajectory: thermal::heat_trajectory(
            room,
            room.radiator_temp_c,
            room.initial_temp_c,
            room.external_temp_c,
        )?,
        comfort_at_target,
    })
}

fn dataset_report(cfg: &Config, path: &str) -> Result<DatasetReport> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("reading dataset {path}"))?;
    let parsed: Dataset =
        serde_json::from_str(&raw).with_context(|| format!("parsing dataset {path}"))?;
    let dataset = Dataset::new(
        parsed.temperature,
        parsed.humidity,
        parsed.pressure,
        [
            parsed.light_red,
            parsed.light_green,
            parsed.light_blue,
            parsed.light_clear,
        ],
        parsed.start,
        parsed.end,
    )?;
    info!(path, samples = dataset.len(), "dataset loaded");

    let mut analyzer = Analyzer::new(cfg.analysis_config());
    let analysis = analyzer.run(&dataset);
    let schedule = comfort::schedule_comfort(
        &dataset,
        &cfg.comfort.timezone,
        &cfg.comfort.schedule,
        &cfg.comfort.defaults,
        cfg.comfort.formula,
    )?;
    Ok(DatasetReport { analysis, schedule })
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    info!(
        formula = %cfg.comfort.formula,
        timezone = %cfg.comfort.timezone,
        "starting room comfort engine"
    );

    let room = room_report(&cfg)?;
    info!("room scenarios complete");

    let dataset = match std::env::args().nth(1) {
        Some(path) => Some(dataset_report(&cfg, &path)?),
        None => None,
    };

    let report = Report { room, dataset };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
