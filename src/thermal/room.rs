use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::construction::{RadiatorClass, WallConstruction, WindowGlazing};
use super::radiator::{PanelGeometry, RadiatorSpec};
use crate::psychrometrics::AmbientAir;

/// Which of the room's walls face the outside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Walls {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Default for Walls {
    fn default() -> Self {
        Self {
            north: true,
            east: true,
            south: false,
            west: false,
        }
    }
}

fn validate_ambient(air: &AmbientAir) -> Result<(), ValidationError> {
    if air.pressure_kpa > 0.0 && (0.0..=100.0).contains(&air.relative_humidity) {
        Ok(())
    } else {
        Err(ValidationError::new("ambient_air_out_of_range"))
    }
}

fn validate_window_area(room: &RoomConfig) -> Result<(), ValidationError> {
    if room.window_area_m2 <= room.gross_wall_area() {
        Ok(())
    } else {
        Err(ValidationError::new("window_larger_than_external_walls"))
    }
}

/// A single heated room with its envelope, radiator and surroundings.
///
/// Temperatures are in °C. External walls span the full room height; the
/// window area is taken out of the external wall area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_window_area"))]
pub struct RoomConfig {
    /// East-west extent (m), the length of the north and south walls
    #[validate(range(exclusive_min = 0.0))]
    pub width_m: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub height_m: f64,
    /// North-south extent (m), the length of the east and west walls
    #[validate(range(exclusive_min = 0.0))]
    pub depth_m: f64,
    pub walls: Walls,
    pub wall: WallConstruction,
    #[validate(range(min = 0.0))]
    pub window_area_m2: f64,
    pub window: WindowGlazing,
    pub radiator: RadiatorSpec,
    /// Geometry for the detailed panel output report
    #[validate(nested)]
    pub panel: PanelGeometry,
    /// Air changes per hour
    #[validate(range(min = 0.0))]
    pub air_changes_per_hour: f64,
    #[validate(custom(function = "validate_ambient"))]
    pub air: AmbientAir,
    /// Air velocity for occupant comfort at the target temperature (m/s)
    #[validate(range(min = 0.0))]
    pub air_velocity: f64,
    pub external_temp_c: f64,
    pub target_temp_c: f64,
    pub initial_temp_c: f64,
    pub radiator_temp_c: f64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            width_m: 4.0,
            height_m: 2.5,
            depth_m: 4.0,
            walls: Walls::default(),
            wall: WallConstruction::CavFilled,
            window_area_m2: 2.0,
            window: WindowGlazing::Double,
            radiator: RadiatorSpec::Catalogue(RadiatorClass::ModernDouble),
            panel: PanelGeometry::default(),
            air_changes_per_hour: 0.5,
            air: AmbientAir::default(),
            air_velocity: 0.1,
            external_temp_c: 5.0,
            target_temp_c: 21.0,
            initial_temp_c: 15.0,
            radiator_temp_c: 60.0,
        }
    }
}

impl RoomConfig {
    pub fn well_insulated() -> Self {
        Self {
            wall: WallConstruction::Brick9WithK18,
            window: WindowGlazing::Triple,
            air_changes_per_hour: 0.3,
            ..Default::default()
        }
    }

    pub fn poorly_insulated() -> Self {
        Self {
            wall: WallConstruction::Brick9,
            window: WindowGlazing::Single,
            air_changes_per_hour: 1.5,
            ..Default::default()
        }
    }

    /// m³
    pub fn volume(&self) -> f64 {
        self.width_m * self.height_m * self.depth_m
    }

    /// External wall area before windows (m²)
    pub fn gross_wall_area(&self) -> f64 {
        let Walls {
            north,
            east,
            south,
            west,
        } = self.walls;
        let long = self.width_m * self.height_m;
        let short = self.depth_m * self.height_m;
        [(north, long), (east, short), (south, long), (west, short)]
            .into_iter()
            .filter(|(external, _)| *external)
            .map(|(_, area)| area)
            .sum()
    }

    /// External wall area less windows (m²)
    pub fn net_wall_area(&self) -> f64 {
        self.gross_wall_area() - self.window_area_m2
    }
}
