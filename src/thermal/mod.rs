//! # Room Thermal
//!
//! Steady-state and transient heat balance of a single heated room.
//!
//! ## Components
//!
//! - **construction**: wall, glazing and catalogue radiator classes
//! - **room**: room geometry, envelope and operating temperatures
//! - **radiator**: natural convection and radiation off the heat source
//! - **losses**: envelope conduction and air exchange losses
//! - **equilibrium**: zero-crossing sweeps for balance temperatures
//! - **heating**: heat-up time and temperature trajectory
//! - **scenario**: external-temperature sweep, radiator sweep and consumption
//!
//! Public entry points take °C; the numerics underneath work in K.

pub mod construction;
pub mod equilibrium;
pub mod heating;
pub mod losses;
pub mod radiator;
pub mod room;
pub mod scenario;

pub use construction::{RadiatorClass, WallConstruction, WindowGlazing};
pub use equilibrium::{
    equilibrium_radiator_temperature, equilibrium_room_temperature, find_equilibrium,
    net_heat_flow,
};
pub use heating::{heat_trajectory, time_to_heat, HeatTrajectory, TrajectoryPoint};
pub use losses::{air_exchange_loss, envelope_loss, EnvelopeLoss, HeatLoss};
pub use radiator::{
    natural_convection, panel_output, radiator_convective_output, radiator_radiative_output,
    NaturalConvection, PanelGeometry, PanelOutput, RadiatorSpec,
};
pub use room::{RoomConfig, Walls};
pub use scenario::{
    consumption_summary, external_temperature_sweep, radiator_sweep, ConsumptionSummary,
    ExternalSweepPoint, HeatUp, LossShare, NetFluxPoint, Tariff,
};

pub const KELVIN_OFFSET: f64 = 273.15;

pub fn to_kelvin(celsius: f64) -> f64 {
    celsius + KELVIN_OFFSET
}

pub fn to_celsius(kelvin: f64) -> f64 {
    kelvin - KELVIN_OFFSET
}
