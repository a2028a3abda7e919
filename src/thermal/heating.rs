//! Transient heating of the room air.
//!
//! Only the air's heat capacity is modelled. Each increment of air
//! temperature costs the rise in humid-air enthalpy times the air mass, paid
//! for by the net heat flow at the start of the increment.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use super::equilibrium::net_flow;
use super::room::RoomConfig;
use super::{to_celsius, to_kelvin};
use crate::error::ThermalError;
use crate::psychrometrics::tables::{VAPOR_TABLE_MAX_K, VAPOR_TABLE_MIN_K};

const HEAT_UP_STEP_K: f64 = 0.1;

const TRAJECTORY_HORIZON_S: u32 = 21_600;
const TRAJECTORY_STEP_S: u32 = 30;
const TRAJECTORY_SEARCH_STEP_K: f64 = 0.01;

/// Seconds to bring the room air from `start_c` to `end_c` with the radiator
/// held at `radiator_c`.
///
/// Fails with [`ThermalError::HeatingStalled`] as soon as the net heat flow
/// stops being positive on the way up.
pub fn time_to_heat(
    room: &RoomConfig,
    radiator_c: f64,
    start_c: f64,
    end_c: f64,
    external_c: f64,
) -> Result<f64, ThermalError> {
    room.validate()?;
    let (radiator_k, external_k) = (to_kelvin(radiator_c), to_kelvin(external_c));
    let (start_k, end_k) = (to_kelvin(start_c), to_kelvin(end_c));
    let volume = room.volume();
    let air = &room.air;

    let mut seconds = 0.0;
    let mut step = 0u32;
    loop {
        let temperature_k = start_k + step as f64 * HEAT_UP_STEP_K;
        if temperature_k >= end_k {
            break;
        }
        let net_w = net_flow(room, radiator_k, temperature_k, external_k)?;
        if net_w <= 0.0 {
            return Err(ThermalError::HeatingStalled {
                temperature_c: to_celsius(temperature_k),
                net_power_w: net_w,
            });
        }

        let mass = air.humid_mass(volume, temperature_k)?;
        let enthalpy_rise = air.specific_enthalpy(temperature_k + HEAT_UP_STEP_K)?
            - air.specific_enthalpy(temperature_k)?;
        seconds += enthalpy_rise * mass * 1000.0 / net_w;
        step += 1;
    }

    debug!(start_c, end_c, radiator_c, seconds, "heat-up time");
    Ok(seconds)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub minutes: f64,
    pub temperature_c: f64,
}

/// Room air temperature every 30 s over six hours
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeatTrajectory {
    pub points: Vec<TrajectoryPoint>,
}

impl HeatTrajectory {
    pub fn final_temperature_c(&self) -> Option<f64> {
        self.points.last().map(|p| p.temperature_c)
    }

    /// First time (minutes) the trajectory reaches `temperature_c`
    pub fn minutes_to_reach(&self, temperature_c: f64) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.temperature_c >= temperature_c)
            .map(|p| p.minutes)
    }
}

/// Temperature after spending `energy_j` on the air at `temperature_k`.
///
/// Walks in 0.01 K increments until the enthalpy change covers the energy;
/// the walk stops at the edges of the vapour table.
fn advance(
    room: &RoomConfig,
    temperature_k: f64,
    energy_j: f64,
) -> Result<f64, ThermalError> {
    if energy_j == 0.0 {
        return Ok(temperature_k);
    }
    let air = &room.air;
    let direction = energy_j.signum();
    let mass = air.humid_mass(room.volume(), temperature_k)?;
    let enthalpy = air.specific_enthalpy(temperature_k)?;

    let mut reached = temperature_k;
    for increment in 1u32.. {
        let candidate = temperature_k + direction * increment as f64 * TRAJECTORY_SEARCH_STEP_K;
        if !(VAPOR_TABLE_MIN_K..=VAPOR_TABLE_MAX_K).contains(&candidate) {
            break;
        }
        reached = candidate;
        let spent = (air.specific_enthalpy(candidate)? - enthalpy) * 1000.0 * mass;
        if spent.abs() >= energy_j.abs() {
            break;
        }
    }
    Ok(reached)
}

/// Integrate the room air temperature from `start_c` with the radiator held
/// at `radiator_c`. The first point is the starting temperature at t = 0.
pub fn heat_trajectory(
    room: &RoomConfig,
    radiator_c: f64,
    start_c: f64,
    external_c: f64,
) -> Result<HeatTrajectory, ThermalError> {
    room.validate()?;
    let (radiator_k, external_k) = (to_kelvin(radiator_c), to_kelvin(external_c));
    let steps = TRAJECTORY_HORIZON_S / TRAJECTORY_STEP_S;

    let mut temperature_k = to_kelvin(start_c);
    let mut points = Vec::with_capacity(steps as usize + 1);
    points.push(TrajectoryPoint {
        minutes: 0.0,
        temperature_c: start_c,
    });

    for step in 1..=steps {
        let net_w = net_flow(room, radiator_k, temperature_k, external_k)?;
        temperature_k = advance(room, temperature_k, net_w * TRAJECTORY_STEP_S as f64)?;
        points.push(TrajectoryPoint {
            minutes: (step * TRAJECTORY_STEP_S) as f64 / 60.0,
            temperature_c: to_celsius(temperature_k),
        });
    }

    let trajectory = HeatTrajectory { points };
    info!(
        start_c,
        radiator_c,
        final_c = trajectory.final_temperature_c(),
        "heat trajectory integrated"
    );
    Ok(trajectory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermal::equilibrium::equilibrium_room_temperature;

    #[test]
    fn test_default_heat_up_time() {
        let room = RoomConfig::default();
        let seconds = time_to_heat(&room, 60.0, 15.0, 21.0, 5.0).unwrap();
        assert!((seconds - 768.0).abs() < 15.0, "seconds {seconds}");
    }

    #[test]
    fn test_already_warm() {
        let room = RoomConfig::default();
        assert_eq!(time_to_heat(&room, 60.0, 21.0, 21.0, 5.0).unwrap(), 0.0);
        assert_eq!(time_to_heat(&room, 60.0, 22.0, 21.0, 5.0).unwrap(), 0.0);
    }

    #[test]
    fn test_stalls_past_equilibrium() {
        // Equilibrium at a 30 °C radiator lies well below 25 °C
        let room = RoomConfig::default();
        let error = time_to_heat(&room, 30.0, 15.0, 25.0, 5.0).unwrap_err();
        match error {
            ThermalError::HeatingStalled {
                temperature_c,
                net_power_w,
            } => {
                assert!(temperature_c > 15.0 && temperature_c < 25.0);
                assert!(net_power_w <= 0.0);
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_trajectory_settles_at_equilibrium() {
        let room = RoomConfig::default();
        let trajectory = heat_trajectory(&room, 60.0, 15.0, 5.0).unwrap();

        assert_eq!(trajectory.points.len(), 721);
        assert_eq!(trajectory.points[0].temperature_c, 15.0);
        assert_eq!(trajectory.points[720].minutes, 360.0);

        let rising = &trajectory.points[..20];
        assert!(rising.windows(2).all(|w| w[1].temperature_c > w[0].temperature_c));

        let settled = trajectory.final_temperature_c().unwrap();
        let equilibrium = equilibrium_room_temperature(&room, 60.0, 5.0).unwrap().unwrap();
        assert!((settled - equilibrium).abs() < 0.1, "{settled} vs {equilibrium}");
    }

    #[test]
    fn test_trajectory_agrees_with_heat_up_time() {
        let room = RoomConfig::default();
        let trajectory = heat_trajectory(&room, 60.0, 15.0, 5.0).unwrap();
        let minutes = trajectory.minutes_to_reach(21.0).unwrap();
        let seconds = time_to_heat(&room, 60.0, 15.0, 21.0, 5.0).unwrap();
        assert!((minutes * 60.0 - seconds).abs() < 90.0);
    }

    #[test]
    fn test_cooling_room_falls() {
        let room = RoomConfig::default();
        let trajectory = heat_trajectory(&room, 20.0, 30.0, 5.0).unwrap();
        assert!(trajectory.final_temperature_c().unwrap() < 30.0);
    }

    #[test]
    fn test_rejects_invalid_room() {
        let negative_height = RoomConfig {
            height_m: -2.5,
            ..RoomConfig::default()
        };
        assert!(matches!(
            time_to_heat(&negative_height, 60.0, 15.0, 21.0, 5.0),
            Err(ThermalError::InvalidConfig(_))
        ));
        assert!(matches!(
            heat_trajectory(&negative_height, 60.0, 15.0, 5.0),
            Err(ThermalError::InvalidConfig(_))
        ));

        let no_floor = RoomConfig {
            width_m: 0.0,
            depth_m: 0.0,
            ..RoomConfig::default()
        };
        assert!(matches!(
            time_to_heat(&no_floor, 60.0, 15.0, 21.0, 5.0),
            Err(ThermalError::InvalidConfig(_))
        ));
        assert!(matches!(
            heat_trajectory(&no_floor, 60.0, 15.0, 5.0),
            Err(ThermalError::InvalidConfig(_))
        ));
    }
}
