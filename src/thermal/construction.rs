//! Construction classes and their heat transfer properties.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Wall build-up, by U-value
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WallConstruction {
    /// 305 mm solid brick
    #[serde(rename = "brick_305")]
    #[strum(serialize = "brick_305")]
    Brick305,
    /// 9 inch solid brick
    #[serde(rename = "brick_9")]
    #[strum(serialize = "brick_9")]
    Brick9,
    CavEmpty,
    #[default]
    CavFilled,
    /// 9 inch brick lined with insulated plasterboard
    #[serde(rename = "brick_9_w_k18")]
    #[strum(serialize = "brick_9_w_k18")]
    Brick9WithK18,
}

impl WallConstruction {
    /// W/m²K
    pub fn u_value(&self) -> f64 {
        match self {
            WallConstruction::Brick305 => 1.3,
            WallConstruction::Brick9 => 4.3,
            WallConstruction::CavEmpty => 1.6,
            WallConstruction::CavFilled => 0.45,
            WallConstruction::Brick9WithK18 => 0.28,
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WindowGlazing {
    Single,
    #[default]
    Double,
    Triple,
    Secondary,
}

impl WindowGlazing {
    /// W/m²K
    pub fn u_value(&self) -> f64 {
        match self {
            WindowGlazing::Single => 5.4,
            WindowGlazing::Double => 1.9,
            WindowGlazing::Triple => 0.6,
            WindowGlazing::Secondary => 1.7,
        }
    }
}

/// Catalogue radiators described by total surface area (fins included) and
/// vertical plate height
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RadiatorClass {
    #[default]
    ModernDouble,
    ModernSingle,
    SingleUnfinned,
}

impl RadiatorClass {
    /// m²
    pub fn area(&self) -> f64 {
        match self {
            RadiatorClass::ModernDouble => 4.4,
            RadiatorClass::ModernSingle => 2.2,
            RadiatorClass::SingleUnfinned => 0.5,
        }
    }

    /// m
    pub fn height(&self) -> f64 {
        0.3
    }
}
