//! # Radiator Output
//!
//! Natural convection off a vertical plate plus grey-body radiation.
//!
//! Convection: Grashof from the plate height and the film temperature,
//! Rayleigh = Gr·Pr, Nusselt = 0.59·Ra^¼ (laminar, Ra < 10⁹) or 0.1·Ra^⅓
//! (turbulent), then h = Nu·k/L. Air properties are interpolated at the film
//! temperature. A radiator colder than the room convects with the same
//! coefficient in the opposite direction.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::construction::RadiatorClass;
use super::{to_celsius, to_kelvin};
use crate::error::ThermalError;
use crate::psychrometrics::{air_property, AirProperty};

const GRAVITY: f64 = 9.81;
const STEFAN_BOLTZMANN: f64 = 5.6703e-8;
const EMISSIVITY: f64 = 0.9;
const LAMINAR_RAYLEIGH_LIMIT: f64 = 1e9;

const PANEL_THICKNESS_M: f64 = 0.01;
const PANEL_SPACING_M: f64 = 0.08;
const FIN_WIDTH_M: f64 = 0.01;
const FIN_SPACING_M: f64 = 0.01;
const FIN_DEPTH_M: f64 = 0.035;
/// Width lost to mounting brackets at the panel ends
const FIN_INSET_M: f64 = 0.15;
/// Unfinned strip along the top and bottom
const FINLESS_HEIGHT_M: f64 = 0.02;

/// Dimensionless groups and the resulting coefficient for one plate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NaturalConvection {
    pub film_temp_k: f64,
    pub grashof: f64,
    pub prandtl: f64,
    pub rayleigh: f64,
    pub nusselt: f64,
    /// W/m²K
    pub coefficient: f64,
}

/// Natural convection off a vertical plate of `height_m` (temperatures in K)
pub fn natural_convection(
    height_m: f64,
    surface_k: f64,
    ambient_k: f64,
) -> Result<NaturalConvection, ThermalError> {
    let film_temp_k = (surface_k + ambient_k) / 2.0;
    let nu = air_property(AirProperty::KinematicViscosity, film_temp_k)?;
    let prandtl = air_property(AirProperty::Prandtl, film_temp_k)?;
    // kW/mK
    let k = air_property(AirProperty::ThermalConductivity, film_temp_k)?;

    let grashof =
        GRAVITY * height_m.powi(3) * (surface_k - ambient_k).abs() / (nu.powi(2) * film_temp_k);
    let rayleigh = grashof * prandtl;
    let nusselt = if rayleigh < LAMINAR_RAYLEIGH_LIMIT {
        0.59 * rayleigh.powf(0.25)
    } else {
        0.1 * rayleigh.cbrt()
    };

    Ok(NaturalConvection {
        film_temp_k,
        grashof,
        prandtl,
        rayleigh,
        nusselt,
        coefficient: nusselt * k / height_m * 1000.0,
    })
}

/// Convective output (W) of a catalogue radiator; negative when it is colder than the room
pub fn radiator_convective_output(
    radiator: RadiatorClass,
    radiator_k: f64,
    room_k: f64,
) -> Result<f64, ThermalError> {
    let convection = natural_convection(radiator.height(), radiator_k, room_k)?;
    Ok(convection.coefficient * radiator.area() * (radiator_k - room_k))
}

/// A panel radiator described by its dimensions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PanelGeometry {
    #[validate(range(exclusive_min = 0.0))]
    pub width_m: f64,
    #[validate(range(exclusive_min = 0.0))]
    pub height_m: f64,
    #[validate(range(min = 1))]
    pub panels: u32,
    pub fin_layers: u32,
}

impl Default for PanelGeometry {
    /// A common double-panel, double-convector radiator
    fn default() -> Self {
        Self {
            width_m: 1.0,
            height_m: 0.6,
            panels: 2,
            fin_layers: 2,
        }
    }
}

impl PanelGeometry {
    /// Depth of the radiator body (m)
    fn thickness(&self) -> f64 {
        let panels = self.panels as f64;
        let mut thickness = panels * PANEL_THICKNESS_M + (panels - 1.0).max(0.0) * PANEL_SPACING_M;
        if self.panels == 1 {
            thickness += self.fin_layers as f64 * FIN_DEPTH_M;
        } else if self.fin_layers > self.panels {
            thickness += (self.fin_layers - self.panels) as f64 * FIN_DEPTH_M;
        }
        thickness
    }

    /// Outer envelope area that radiates (m²)
    pub fn radiating_area(&self) -> f64 {
        let faces = 2.0 * self.width_m * self.height_m;
        let thickness = self.thickness();
        faces + 2.0 * (thickness * self.height_m + thickness * self.width_m)
    }

    /// Both sides of every panel (m²)
    pub fn panel_area(&self) -> f64 {
        self.panels as f64 * self.width_m * self.height_m * 2.0
    }

    /// Both sides of every fin (m²)
    pub fn fin_area(&self) -> f64 {
        let fins = ((self.width_m - FIN_INSET_M) / (FIN_WIDTH_M + FIN_SPACING_M))
            .floor()
            .max(0.0);
        let finned_height = (self.height_m - FINLESS_HEIGHT_M).max(0.0);
        let per_fin = (FIN_WIDTH_M + 2.0 * FIN_DEPTH_M) * finned_height;
        self.fin_layers as f64 * fins * per_fin * 2.0
    }
}

/// Radiated output (W) between a panel at `radiator_k` and a room at `room_k`
pub fn radiator_radiative_output(panel: &PanelGeometry, radiator_k: f64, room_k: f64) -> f64 {
    EMISSIVITY * STEFAN_BOLTZMANN * panel.radiating_area() * (radiator_k.powi(4) - room_k.powi(4))
}

/// Breakdown of a panel radiator's output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelOutput {
    pub film_temp_c: f64,
    pub grashof: f64,
    pub prandtl: f64,
    pub rayleigh: f64,
    pub nusselt: f64,
    /// W/m²K
    pub convective_coeff: f64,
    pub panel_area_m2: f64,
    pub fin_area_m2: f64,
    pub total_area_m2: f64,
    pub convective_w_per_k: f64,
    pub convective_w: f64,
    pub radiative_w: f64,
    pub total_w: f64,
    pub convective_pct: f64,
    pub radiative_pct: f64,
}

/// Full output report of `panel` at `radiator_c` in a room at `room_c`
pub fn panel_output(
    panel: &PanelGeometry,
    radiator_c: f64,
    room_c: f64,
) -> Result<PanelOutput, ThermalError> {
    panel.validate()?;
    let (radiator_k, room_k) = (to_kelvin(radiator_c), to_kelvin(room_c));
    let convection = natural_convection(panel.height_m, radiator_k, room_k)?;

    let panel_area_m2 = panel.panel_area();
    let fin_area_m2 = panel.fin_area();
    let total_area_m2 = panel_area_m2 + fin_area_m2;
    let convective_w_per_k = total_area_m2 * convection.coefficient;
    let convective_w = convective_w_per_k * (radiator_k - room_k);
    let radiative_w = radiator_radiative_output(panel, radiator_k, room_k);
    let total_w = convective_w + radiative_w;
    let share = |part: f64| if total_w == 0.0 { 0.0 } else { 100.0 * part / total_w };

    Ok(PanelOutput {
        film_temp_c: to_celsius(convection.film_temp_k),
        grashof: convection.grashof,
        prandtl: convection.prandtl,
        rayleigh: convection.rayleigh,
        nusselt: convection.nusselt,
        convective_coeff: convection.coefficient,
        panel_area_m2,
        fin_area_m2,
        total_area_m2,
        convective_w_per_k,
        convective_w,
        radiative_w,
        total_w,
        convective_pct: share(convective_w),
        radiative_pct: share(radiative_w),
    })
}

/// The room's heat source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RadiatorSpec {
    /// Catalogue class, convective output only
    Catalogue(RadiatorClass),
    /// Panel geometry, convective plus radiative output
    Panel(PanelGeometry),
}

impl Default for RadiatorSpec {
    fn default() -> Self {
        RadiatorSpec::Catalogue(RadiatorClass::default())
    }
}

impl RadiatorSpec {
    /// Heat delivered to the room (W), temperatures in K
    pub fn heat_output(&self, radiator_k: f64, room_k: f64) -> Result<f64, ThermalError> {
        match self {
            RadiatorSpec::Catalogue(class) => radiator_convective_output(*class, radiator_k, room_k),
            RadiatorSpec::Panel(panel) => {
                let convection = natural_convection(panel.height_m, radiator_k, room_k)?;
                let area = panel.panel_area() + panel.fin_area();
                Ok(convection.coefficient * area * (radiator_k - room_k)
                    + radiator_radiative_output(panel, radiator_k, room_k))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_catalogue_output() {
        // 35.8 °C radiator in a 21 °C room
        let q = radiator_convective_output(RadiatorClass::ModernDouble, 308.94, 294.15).unwrap();
        assert!((q - 262.4).abs() < 3.0, "q {q}");
    }

    #[test]
    fn test_laminar_regime() {
        let convection = natural_convection(0.3, 333.15, 294.15).unwrap();
        assert!(convection.rayleigh < LAMINAR_RAYLEIGH_LIMIT);
        assert!((convection.nusselt - 0.59 * convection.rayleigh.powf(0.25)).abs() < 1e-9);
        assert!(convection.coefficient > 3.0 && convection.coefficient < 7.0);
    }

    #[test]
    fn test_colder_radiator_absorbs_heat() {
        let warm = radiator_convective_output(RadiatorClass::ModernSingle, 299.15, 294.15).unwrap();
        let cold = radiator_convective_output(RadiatorClass::ModernSingle, 289.15, 294.15).unwrap();
        assert!(warm > 0.0);
        assert!(cold < 0.0);
        assert!(radiator_convective_output(RadiatorClass::ModernSingle, 294.15, 294.15).unwrap() == 0.0);
    }

    #[rstest]
    #[case(1, 0, 0.01)]
    #[case(1, 1, 0.045)]
    #[case(2, 2, 0.10)]
    #[case(2, 3, 0.135)]
    fn test_panel_thickness(#[case] panels: u32, #[case] fin_layers: u32, #[case] expected: f64) {
        let panel = PanelGeometry {
            panels,
            fin_layers,
            ..Default::default()
        };
        assert!((panel.thickness() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_panel_report() {
        let panel = PanelGeometry::default();
        let report = panel_output(&panel, 60.0, 21.0).unwrap();

        // 42 fins per layer on a 1 m panel
        assert!((report.fin_area_m2 - 2.0 * 42.0 * 0.08 * 0.58 * 2.0).abs() < 1e-9);
        assert!((report.panel_area_m2 - 2.4).abs() < 1e-12);
        assert!((report.film_temp_c - 40.5).abs() < 1e-9);
        assert!((report.convective_pct + report.radiative_pct - 100.0).abs() < 1e-9);
        assert!(report.convective_w > report.radiative_w);
        assert!((report.total_w - RadiatorSpec::Panel(panel).heat_output(333.15, 294.15).unwrap()).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_panel_has_no_fins() {
        let panel = PanelGeometry {
            width_m: 0.1,
            ..Default::default()
        };
        assert_eq!(panel.fin_area(), 0.0);
    }

    #[test]
    fn test_invalid_panel() {
        let panel = PanelGeometry {
            panels: 0,
            ..Default::default()
        };
        assert!(matches!(
            panel_output(&panel, 60.0, 21.0),
            Err(ThermalError::InvalidConfig(_))
        ));
    }
}
