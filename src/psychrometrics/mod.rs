//! # Psychrometrics
//!
//! Properties of humid air used by both engines.
//!
//! - **humidity**: Antoine saturation pressure, vapour pressure and absolute
//!   humidity for the comfort side (temperatures in °C)
//! - **tables**: tabulated dry-air and vapour properties with interpolation
//! - **moist_air**: humidity ratio, enthalpy and mass of room air for the
//!   thermal side (temperatures in K)

pub mod humidity;
pub mod moist_air;
pub mod tables;

pub use humidity::{
    absolute_humidity, actual_vapor_pressure, humidity_series, saturation_vapor_pressure,
    HumidityStats,
};
pub use moist_air::AmbientAir;
pub use tables::{air_property, vapor_saturation_pressure, AirProperty};
