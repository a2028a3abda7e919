//! Steady-state temperatures found by sweeping for a zero net heat flow.

use tracing::{debug, warn};
use validator::Validate;

use super::losses::HeatLoss;
use super::room::RoomConfig;
use super::{to_celsius, to_kelvin};
use crate::error::ThermalError;
use crate::psychrometrics::tables::{VAPOR_TABLE_MAX_K, VAPOR_TABLE_MIN_K};

/// Radiator sweep, 0 to 100 °C
const RADIATOR_SWEEP_K: (f64, f64) = (273.15, 373.15);
const RADIATOR_STEP_K: f64 = 0.1;
const ROOM_STEP_K: f64 = 0.5;

/// Net heat flow into the room (W): radiator output less all losses
pub fn net_heat_flow(
    room: &RoomConfig,
    radiator_k: f64,
    room_k: f64,
    external_k: f64,
) -> Result<f64, ThermalError> {
    room.validate()?;
    net_flow(room, radiator_k, room_k, external_k)
}

/// [`net_heat_flow`] for a room the caller has already validated
pub(super) fn net_flow(
    room: &RoomConfig,
    radiator_k: f64,
    room_k: f64,
    external_k: f64,
) -> Result<f64, ThermalError> {
    let input = room.radiator.heat_output(radiator_k, room_k)?;
    let loss = HeatLoss::at_unchecked(room, room_k, external_k)?;
    Ok(input - loss.total_w())
}

/// Sweep `start..=end` in `step` increments and return the first zero
/// crossing of `net_flux`, linearly interpolated between the bracketing
/// samples. Either crossing direction counts.
pub fn find_equilibrium<F>(
    start: f64,
    end: f64,
    step: f64,
    mut net_flux: F,
) -> Result<Option<f64>, ThermalError>
where
    F: FnMut(f64) -> Result<f64, ThermalError>,
{
    if step.is_nan() || step <= 0.0 || end < start {
        return Ok(None);
    }
    let steps = ((end - start) / step + 1e-9).floor() as usize;

    let mut previous: Option<(f64, f64)> = None;
    for i in 0..=steps {
        let temperature = start + i as f64 * step;
        let flux = net_flux(temperature)?;
        if let Some((prev_temperature, prev_flux)) = previous {
            let crossed = (prev_flux <= 0.0 && flux >= 0.0) || (prev_flux >= 0.0 && flux <= 0.0);
            if crossed {
                if flux == prev_flux {
                    return Ok(Some(prev_temperature));
                }
                let fraction = -prev_flux / (flux - prev_flux);
                return Ok(Some(prev_temperature + (temperature - prev_temperature) * fraction));
            }
        }
        previous = Some((temperature, flux));
    }
    Ok(None)
}

/// Radiator temperature (°C) that holds the room at `room_c`.
///
/// `None` when no radiator temperature between 0 and 100 °C balances the losses.
pub fn equilibrium_radiator_temperature(
    room: &RoomConfig,
    room_c: f64,
    external_c: f64,
) -> Result<Option<f64>, ThermalError> {
    room.validate()?;
    let (room_k, external_k) = (to_kelvin(room_c), to_kelvin(external_c));
    let loss = HeatLoss::at_unchecked(room, room_k, external_k)?.total_w();

    let (start, end) = RADIATOR_SWEEP_K;
    let equilibrium = find_equilibrium(start, end, RADIATOR_STEP_K, |radiator_k| {
        Ok(room.radiator.heat_output(radiator_k, room_k)? - loss)
    })?
    .map(to_celsius);

    match equilibrium {
        Some(t) => debug!(radiator_c = t, room_c, external_c, "radiator equilibrium"),
        None => warn!(room_c, external_c, loss_w = loss, "no radiator temperature balances the losses"),
    }
    Ok(equilibrium)
}

/// Room temperature (°C) reached with the radiator held at `radiator_c`.
///
/// The sweep runs from the external to the radiator temperature, limited to
/// the span the humid-air tables cover. `None` when no balance point lies in it.
pub fn equilibrium_room_temperature(
    room: &RoomConfig,
    radiator_c: f64,
    external_c: f64,
) -> Result<Option<f64>, ThermalError> {
    room.validate()?;
    let (radiator_k, external_k) = (to_kelvin(radiator_c), to_kelvin(external_c));
    let start = external_k.max(VAPOR_TABLE_MIN_K);
    let end = radiator_k.min(VAPOR_TABLE_MAX_K);

    let equilibrium = find_equilibrium(start, end, ROOM_STEP_K, |room_k| {
        net_flow(room, radiator_k, room_k, external_k)
    })?
    .map(to_celsius);

    match equilibrium {
        Some(t) => debug!(room_c = t, radiator_c, external_c, "room equilibrium"),
        None => warn!(radiator_c, external_c, "no room equilibrium in sweep range"),
    }
    Ok(equilibrium)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_crossing() {
        let t = find_equilibrium(0.0, 100.0, 0.5, |t| Ok(30.25 - t)).unwrap().unwrap();
        assert!((t - 30.25).abs() < 1e-9);

        let rising = find_equilibrium(0.0, 100.0, 0.5, |t| Ok(2.0 * t - 41.0)).unwrap().unwrap();
        assert!((rising - 20.5).abs() < 1e-9);
    }

    #[test]
    fn test_no_crossing() {
        assert_eq!(find_equilibrium(0.0, 100.0, 0.5, |_| Ok(1.0)).unwrap(), None);
        assert_eq!(find_equilibrium(10.0, 0.0, 0.5, |t| Ok(t)).unwrap(), None);
    }

    #[test]
    fn test_errors_propagate() {
        let result = find_equilibrium(0.0, 1.0, 0.5, |_| Err(ThermalError::InvalidConfig("x".into())));
        assert!(result.is_err());
    }

    #[test]
    fn test_radiator_equilibrium() {
        let room = RoomConfig::default();
        let t = equilibrium_radiator_temperature(&room, 21.0, 5.0).unwrap().unwrap();
        assert!((t - 35.79).abs() < 0.1, "radiator {t}");

        let flow = net_heat_flow(&room, to_kelvin(t), 294.15, 278.15).unwrap();
        assert!(flow.abs() < 1.0);
    }

    #[test]
    fn test_room_equilibrium() {
        let room = RoomConfig::default();
        let t = equilibrium_room_temperature(&room, 60.0, 5.0).unwrap().unwrap();
        assert!((t - 33.62).abs() < 0.1, "room {t}");
    }

    #[test]
    fn test_radiator_too_cold_for_room() {
        // A radiator at the external temperature can never balance
        let room = RoomConfig::default();
        assert_eq!(equilibrium_room_temperature(&room, 5.0, 5.0).unwrap(), None);
    }

    #[test]
    fn test_rejects_invalid_room() {
        let negative_height = RoomConfig {
            height_m: -2.5,
            ..RoomConfig::default()
        };
        let no_floor = RoomConfig {
            width_m: 0.0,
            depth_m: 0.0,
            ..RoomConfig::default()
        };
        for room in [negative_height, no_floor] {
            assert!(matches!(
                net_heat_flow(&room, 333.15, 294.15, 278.15),
                Err(ThermalError::InvalidConfig(_))
            ));
            assert!(matches!(
                equilibrium_radiator_temperature(&room, 21.0, 5.0),
                Err(ThermalError::InvalidConfig(_))
            ));
            assert!(matches!(
                equilibrium_room_temperature(&room, 60.0, 5.0),
                Err(ThermalError::InvalidConfig(_))
            ));
        }
    }
}
