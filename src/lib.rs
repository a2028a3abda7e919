//! # Room Comfort Engine
//!
//! Thermal comfort, occupancy and room heating numerics over environmental
//! sensor series.
//!
//! - [`analysis`]: rate of change, points of interest and occupancy per dataset
//! - [`comfort`]: PMV/PPD solvers, archetypes, schedules and comfort bands
//! - [`thermal`]: radiator output, room losses, equilibria and heat-up
//! - [`psychrometrics`] and [`solar`]: shared physical models

pub mod analysis;
pub mod comfort;
pub mod config;
pub mod domain;
pub mod error;
pub mod psychrometrics;
pub mod solar;
pub mod telemetry;
pub mod thermal;
