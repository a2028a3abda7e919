//! Heat lost from the room through the envelope and by air exchange.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::room::RoomConfig;
use crate::error::ThermalError;

const KJ_PER_HOUR_PER_WATT: f64 = 3.6;

/// Conduction losses (W)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeLoss {
    pub walls_w: f64,
    pub windows_w: f64,
    pub total_w: f64,
}

/// Conduction through external walls and windows (temperatures in K)
pub fn envelope_loss(
    room: &RoomConfig,
    room_k: f64,
    external_k: f64,
) -> Result<EnvelopeLoss, ThermalError> {
    room.validate()?;
    Ok(envelope(room, room_k, external_k))
}

fn envelope(room: &RoomConfig, room_k: f64, external_k: f64) -> EnvelopeLoss {
    let delta = room_k - external_k;
    let walls_w = room.wall.u_value() * room.net_wall_area() * delta;
    let windows_w = room.window.u_value() * room.window_area_m2 * delta;
    EnvelopeLoss {
        walls_w,
        windows_w,
        total_w: walls_w + windows_w,
    }
}

/// Power (W) carried out by exchanging room air for external air.
///
/// Every hour `volume × ACH` of room air leaves at the room's specific
/// enthalpy and is replaced by external air at the external one; both share
/// the ambient pressure and relative humidity.
pub fn air_exchange_loss(
    room: &RoomConfig,
    room_k: f64,
    external_k: f64,
) -> Result<f64, ThermalError> {
    room.validate()?;
    air_exchange(room, room_k, external_k)
}

fn air_exchange(room: &RoomConfig, room_k: f64, external_k: f64) -> Result<f64, ThermalError> {
    let exchanged_m3 = room.volume() * room.air_changes_per_hour;
    let air = &room.air;
    let leaving_kj = air.specific_enthalpy(room_k)? * air.dry_density(room_k)? * exchanged_m3;
    let entering_kj =
        air.specific_enthalpy(external_k)? * air.dry_density(external_k)? * exchanged_m3;
    Ok((leaving_kj - entering_kj) / KJ_PER_HOUR_PER_WATT)
}

/// Everything the room loses at one operating point (W)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatLoss {
    pub envelope: EnvelopeLoss,
    pub air_exchange_w: f64,
}

impl HeatLoss {
    pub fn at(room: &RoomConfig, room_k: f64, external_k: f64) -> Result<Self, ThermalError> {
        room.validate()?;
        Self::at_unchecked(room, room_k, external_k)
    }

    /// [`HeatLoss::at`] for a room the caller has already validated
    pub(crate) fn at_unchecked(
        room: &RoomConfig,
        room_k: f64,
        external_k: f64,
    ) -> Result<Self, ThermalError> {
        Ok(Self {
            envelope: envelope(room, room_k, external_k),
            air_exchange_w: air_exchange(room, room_k, external_k)?,
        })
    }

    pub fn total_w(&self) -> f64 {
        self.envelope.total_w + self.air_exchange_w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thermal::construction::{WallConstruction, WindowGlazing};

    #[test]
    fn test_default_room_losses() {
        let room = RoomConfig::default();
        let loss = HeatLoss::at(&room, 294.15, 278.15).unwrap();

        // 18 m² at 0.45 and 2 m² at 1.9 across 16 K
        assert!((loss.envelope.walls_w - 129.6).abs() < 1e-9);
        assert!((loss.envelope.windows_w - 60.8).abs() < 1e-9);
        assert!((loss.envelope.total_w - 190.4).abs() < 1e-9);
        assert!((loss.air_exchange_w - 72.0).abs() < 1.0, "air {}", loss.air_exchange_w);
    }

    #[test]
    fn test_no_loss_without_difference() {
        let room = RoomConfig::default();
        let loss = HeatLoss::at(&room, 293.15, 293.15).unwrap();
        assert_eq!(loss.total_w(), 0.0);
    }

    #[test]
    fn test_worse_construction_loses_more() {
        let good = RoomConfig::default();
        let bad = RoomConfig {
            wall: WallConstruction::Brick9,
            window: WindowGlazing::Single,
            ..good
        };
        assert!(
            envelope_loss(&bad, 294.15, 278.15).unwrap().total_w
                > envelope_loss(&good, 294.15, 278.15).unwrap().total_w
        );
    }

    #[test]
    fn test_exchange_outside_vapour_table() {
        let room = RoomConfig::default();
        assert!(matches!(
            air_exchange_loss(&room, 294.15, 250.0),
            Err(ThermalError::PropertyOutOfRange { .. })
        ));
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
                envelope_loss(&room, 294.15, 278.15),
                Err(ThermalError::InvalidConfig(_))
            ));
            assert!(matches!(
                air_exchange_loss(&room, 294.15, 278.15),
                Err(ThermalError::InvalidConfig(_))
            ));
            assert!(matches!(
                HeatLoss::at(&room, 294.15, 278.15),
                Err(ThermalError::InvalidConfig(_))
            ));
        }
    }
}
