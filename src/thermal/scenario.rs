//! Scenario reports over a configured room: how it behaves across external
//! temperatures, what it costs to hold at target, and how net heat flow
//! varies with radiator temperature.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::equilibrium::{equilibrium_radiator_temperature, equilibrium_room_temperature};
use super::heating::time_to_heat;
use super::losses::HeatLoss;
use super::room::RoomConfig;
use super::to_kelvin;
use crate::error::ThermalError;

const EXTERNAL_SWEEP_C: (f64, f64) = (-12.0, 18.0);
const RADIATOR_SWEEP_C: (f64, f64) = (25.0, 80.0);
const SWEEP_STEP_K: f64 = 0.5;

/// Heat-up times are only reported for targets above this (°C)
const HEAT_UP_MIN_TARGET_C: f64 = 15.0;

const HOURS_PER_DAY: f64 = 24.0;
const DAYS_PER_MONTH: f64 = 30.0;

/// Energy price and carbon intensity of the heat supply
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Tariff {
    /// Currency units per kWh
    #[validate(range(min = 0.0))]
    pub price_per_kwh: f64,
    #[validate(range(min = 0.0))]
    pub co2_kg_per_kwh: f64,
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            price_per_kwh: 0.07,
            co2_kg_per_kwh: 0.185,
        }
    }
}

fn sweep(range: (f64, f64), step: f64) -> impl Iterator<Item = f64> {
    let (start, end) = range;
    let steps = ((end - start) / step + 1e-9).floor() as usize;
    (0..=steps).map(move |i| start + i as f64 * step)
}

/// Outcome of heating from the initial to the target temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HeatUp {
    Reached { minutes: f64 },
    Stalled { temperature_c: f64, net_power_w: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExternalSweepPoint {
    pub external_c: f64,
    /// Radiator temperature holding the room at target
    pub radiator_equilibrium_c: Option<f64>,
    /// Room temperature reached with the configured radiator temperature
    pub room_equilibrium_c: Option<f64>,
    /// `None` when the target is too low to report
    pub heat_up: Option<HeatUp>,
}

/// Equilibrium temperatures and heat-up time across external temperatures
/// from −12 to 18 °C.
pub fn external_temperature_sweep(
    room: &RoomConfig,
) -> Result<Vec<ExternalSweepPoint>, ThermalError> {
    room.validate()?;
    let points = sweep(EXTERNAL_SWEEP_C, SWEEP_STEP_K)
        .map(|external_c| -> Result<ExternalSweepPoint, ThermalError> {
            let heat_up = if room.target_temp_c > HEAT_UP_MIN_TARGET_C {
                let outcome = time_to_heat(
                    room,
                    room.radiator_temp_c,
                    room.initial_temp_c,
                    room.target_temp_c,
                    external_c,
                );
                Some(match outcome {
                    Ok(seconds) => HeatUp::Reached {
                        minutes: seconds / 60.0,
                    },
                    Err(ThermalError::HeatingStalled {
                        temperature_c,
                        net_power_w,
                    }) => HeatUp::Stalled {
                        temperature_c,
                        net_power_w,
                    },
                    Err(other) => return Err(other),
                })
            } else {
                None
            };

            Ok(ExternalSweepPoint {
                external_c,
                radiator_equilibrium_c: equilibrium_radiator_temperature(
                    room,
                    room.target_temp_c,
                    external_c,
                )?,
                room_equilibrium_c: equilibrium_room_temperature(
                    room,
                    room.radiator_temp_c,
                    external_c,
                )?,
                heat_up,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!(points = points.len(), "external temperature sweep complete");
    Ok(points)
}

/// One loss path with its share of the total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LossShare {
    pub watts: f64,
    pub percent: f64,
}

impl LossShare {
    fn of(watts: f64, total: f64) -> Self {
        let percent = if total == 0.0 { 0.0 } else { 100.0 * watts / total };
        Self { watts, percent }
    }
}

/// Cost of holding the room at its target temperature
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSummary {
    pub radiator_temp_c: f64,
    pub heat_input_w: f64,
    pub daily_kwh: f64,
    pub monthly_kwh: f64,
    pub monthly_cost: f64,
    pub monthly_co2_kg: f64,
    pub walls: LossShare,
    pub windows: LossShare,
    pub air_exchange: LossShare,
}

/// Energy, cost and loss breakdown at the target temperature and the
/// configured external temperature. `None` when no radiator temperature can
/// hold the target.
pub fn consumption_summary(
    room: &RoomConfig,
    tariff: &Tariff,
) -> Result<Option<ConsumptionSummary>, ThermalError> {
    room.validate()?;
    tariff.validate()?;

    let Some(radiator_temp_c) =
        equilibrium_radiator_temperature(room, room.target_temp_c, room.external_temp_c)?
    else {
        return Ok(None);
    };

    let (room_k, external_k) = (to_kelvin(room.target_temp_c), to_kelvin(room.external_temp_c));
    let heat_input_w = room.radiator.heat_output(to_kelvin(radiator_temp_c), room_k)?;
    let loss = HeatLoss::at_unchecked(room, room_k, external_k)?;
    let total = loss.total_w();

    let daily_kwh = heat_input_w * HOURS_PER_DAY / 1000.0;
    let monthly_kwh = daily_kwh * DAYS_PER_MONTH;
    let summary = ConsumptionSummary {
        radiator_temp_c,
        heat_input_w,
        daily_kwh,
        monthly_kwh,
        monthly_cost: monthly_kwh * tariff.price_per_kwh,
        monthly_co2_kg: monthly_kwh * tariff.co2_kg_per_kwh,
        walls: LossShare::of(loss.envelope.walls_w, total),
        windows: LossShare::of(loss.envelope.windows_w, total),
        air_exchange: LossShare::of(loss.air_exchange_w, total),
    };
    debug!(?summary, "consumption summary");
    Ok(Some(summary))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetFluxPoint {
    pub radiator_c: f64,
    pub heat_input_w: f64,
    pub net_flux_w: f64,
}

/// Net heat flow at the target temperature for radiator temperatures 25 to 80 °C,
/// losses taken at the configured external temperature
pub fn radiator_sweep(room: &RoomConfig) -> Result<Vec<NetFluxPoint>, ThermalError> {
    room.validate()?;
    let room_k = to_kelvin(room.target_temp_c);
    let loss = HeatLoss::at_unchecked(room, room_k, to_kelvin(room.external_temp_c))?.total_w();

    sweep(RADIATOR_SWEEP_C, SWEEP_STEP_K)
        .map(|radiator_c| -> Result<NetFluxPoint, ThermalError> {
            let heat_input_w = room.radiator.heat_output(to_kelvin(radiator_c), room_k)?;
            Ok(NetFluxPoint {
                radiator_c,
                heat_input_w,
                net_flux_w: heat_input_w - loss,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sweep_grid() {
        let grid: Vec<f64> = sweep(EXTERNAL_SWEEP_C, SWEEP_STEP_K).collect();
        assert_eq!(grid.len(), 61);
        assert_eq!(grid[0], -12.0);
        assert_eq!(grid[60], 18.0);
        assert_eq!(grid[24], 0.0);
    }

    #[test]
    fn test_external_sweep() {
        let room = RoomConfig::default();
        let points = external_temperature_sweep(&room).unwrap();
        assert_eq!(points.len(), 61);

        // Colder outside needs a hotter radiator
        let radiator: Vec<f64> = points
            .iter()
            .map(|p| p.radiator_equilibrium_c.unwrap())
            .collect();
        assert!(radiator.windows(2).all(|w| w[1] < w[0]));

        let at_five = points.iter().find(|p| p.external_c == 5.0).unwrap();
        assert!((at_five.radiator_equilibrium_c.unwrap() - 35.79).abs() < 0.1);
        assert!((at_five.room_equilibrium_c.unwrap() - 33.62).abs() < 0.1);
        match at_five.heat_up {
            Some(HeatUp::Reached { minutes }) => assert!((minutes - 12.8).abs() < 0.3),
            other => panic!("unexpected heat-up {other:?}"),
        }
    }

    #[test]
    fn test_low_target_skips_heat_up() {
        let room = RoomConfig {
            target_temp_c: 15.0,
            initial_temp_c: 10.0,
            ..Default::default()
        };
        let points = external_temperature_sweep(&room).unwrap();
        assert!(points.iter().all(|p| p.heat_up.is_none()));
    }

    #[test]
    fn test_weak_radiator_stalls() {
        let room = RoomConfig {
            radiator_temp_c: 25.0,
            ..Default::default()
        };
        let points = external_temperature_sweep(&room).unwrap();
        assert!(matches!(points[0].heat_up, Some(HeatUp::Stalled { .. })));
    }

    #[test]
    fn test_consumption_summary() {
        let room = RoomConfig::default();
        let tariff = Tariff::default();
        let summary = consumption_summary(&room, &tariff).unwrap().unwrap();

        assert!((summary.radiator_temp_c - 35.79).abs() < 0.1);
        assert!((summary.heat_input_w - 262.4).abs() < 3.0);
        assert!((summary.monthly_kwh - summary.daily_kwh * 30.0).abs() < 1e-9);
        assert!((summary.monthly_co2_kg - summary.monthly_kwh * 0.185).abs() < 1e-9);
        let shares = summary.walls.percent + summary.windows.percent + summary.air_exchange.percent;
        assert!((shares - 100.0).abs() < 1e-9);
        assert!((summary.walls.watts - 129.6).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_tariff() {
        let tariff = Tariff {
            price_per_kwh: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            consumption_summary(&RoomConfig::default(), &tariff),
            Err(ThermalError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_radiator_sweep_crosses_zero() {
        let room = RoomConfig::default();
        let points = radiator_sweep(&room).unwrap();
        assert_eq!(points.len(), 111);
        assert!(points[0].net_flux_w < 0.0);
        assert!(points[110].net_flux_w > 0.0);
        assert!(points.windows(2).all(|w| w[1].net_flux_w > w[0].net_flux_w));
    }
}
