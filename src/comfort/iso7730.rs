//! ISO 7730 PMV/PPD.
//!
//! Inputs are clamped to the ranges the standard considers valid before
//! solving. The clothing surface temperature is found by fixed-point iteration
//! in which each new estimate is averaged with the previous one and with the
//! initial guess; this keeps the iteration from diverging at high insulation.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{ppd_from_pmv, ComfortResult, PersonalFactors, PmvModel, ThermalConditions, CLO_TO_M2K_PER_W};

const MAX_ITERATIONS: usize = 1000;
const CONVERGENCE_C: f64 = 0.1;

/// Full ISO 7730 solution including the solver state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Iso7730Solution {
    pub pmv: f64,
    pub ppd: f64,
    /// Clothing surface temperature (°C)
    pub clothing_temp_c: f64,
    /// Convective heat transfer coefficient (W/m²K)
    pub convective_coeff: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// ISO 7730 formulation
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso7730;

impl Iso7730 {
    /// Solve for PMV/PPD.
    ///
    /// `vapor_pressure_kpa` is the partial water vapour pressure, metabolic rate
    /// and work are in W/m², clothing in clo.
    #[allow(clippy::too_many_arguments)]
    pub fn solve(
        &self,
        vapor_pressure_kpa: f64,
        air_temp_c: f64,
        radiant_temp_c: f64,
        air_velocity: f64,
        clothing_clo: f64,
        metabolic_w_m2: f64,
        external_work_w_m2: f64,
    ) -> Iso7730Solution {
        let m = metabolic_w_m2.clamp(46.0, 232.0);
        let clo = clothing_clo.clamp(0.0, 2.0);
        let ta = air_temp_c.clamp(10.0, 30.0);
        let tr = radiant_temp_c.clamp(10.0, 40.0);
        let v = air_velocity.clamp(0.0, 1.0);
        let pa_kpa = vapor_pressure_kpa.clamp(0.0, 2.7);
        let pa = pa_kpa * 1000.0;
        let w = external_work_w_m2;
        let mw = m - w;

        let icl = clo * CLO_TO_M2K_PER_W;
        let fcl = if icl < 0.078 {
            1.0 + 1.290 * icl
        } else {
            1.05 + 0.645 * icl
        };
        let forced = 12.1 * v.sqrt();
        let convective = |tcl: f64| forced.max(2.38 * (tcl - ta).abs().powf(0.25));
        let radiant_exchange = |tcl: f64| (tcl + 273.0).powi(4) - (tr + 273.0).powi(4);

        // Closed-form first guess from the steady-state heat balance
        let balance = mw
            - 3.05 * (5.73 - 0.007 * mw - pa_kpa)
            - 0.42 * (mw - 58.15)
            - 0.0173 * m * (5.87 - pa_kpa)
            - 0.0014 * m * (34.0 - ta);
        let initial = 35.7 - 0.0275 * mw - icl * balance;

        let mut tcl = initial;
        let mut iterations = 0;
        let mut converged = false;
        while iterations < MAX_ITERATIONS {
            iterations += 1;
            let hc = convective(tcl);
            let calculated = 35.7
                - 0.028 * mw
                - icl * (3.96e-8 * fcl * radiant_exchange(tcl) + fcl * hc * (tcl - ta));
            let next = (calculated + tcl + initial) / 3.0;
            let delta = (next - tcl).abs();
            tcl = next;
            if delta < CONVERGENCE_C {
                converged = true;
                break;
            }
        }
        if !converged {
            warn!(iterations, clothing_temp_c = tcl, "ISO 7730 clothing temperature did not converge");
        }

        let hc = convective(tcl);
        let sensation = 0.303 * (-0.036 * m).exp() + 0.028;
        let pmv = sensation
            * (mw - 3.05e-3 * (5733.0 - 6.99 * mw - pa)
                - 0.42 * (mw - 58.15)
                - 1.7e-5 * m * (5867.0 - pa)
                - 0.0014 * m * (34.0 - ta)
                - 3.96e-8 * fcl * radiant_exchange(tcl)
                - fcl * hc * (tcl - ta));

        Iso7730Solution {
            pmv,
            ppd: ppd_from_pmv(pmv),
            clothing_temp_c: tcl,
            convective_coeff: hc,
            iterations,
            converged,
        }
    }
}

impl PmvModel for Iso7730 {
    fn name(&self) -> &'static str {
        "ISO 7730"
    }

    fn evaluate(&self, conditions: &ThermalConditions, person: &PersonalFactors) -> ComfortResult {
        let solution = self.solve(
            conditions.vapor_pressure_kpa(),
            conditions.air_temp_c,
            conditions.radiant_temp_c,
            conditions.air_velocity,
            person.clothing_clo,
            person.metabolic_w_m2,
            person.external_work_w_m2,
        );
        ComfortResult {
            pmv: solution.pmv,
            ppd: solution.ppd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::psychrometrics::actual_vapor_pressure;

    #[test]
    fn test_reference_point() {
        let pa = actual_vapor_pressure(50.0, 22.0);
        let solution = Iso7730.solve(pa, 22.0, 22.0, 0.1, 1.0, 70.0, 0.0);

        assert!(solution.converged);
        assert_eq!(solution.iterations, 2);
        assert!((solution.pmv - 0.140).abs() < 0.005, "pmv {}", solution.pmv);
        assert!((solution.ppd - 5.41).abs() < 0.05, "ppd {}", solution.ppd);
        assert!((solution.clothing_temp_c - 26.76).abs() < 0.05);
    }

    #[test]
    fn test_inputs_clamped() {
        // 45 °C air is treated as 30 °C
        let hot = Iso7730.solve(2.0, 45.0, 45.0, 0.1, 0.5, 70.0, 0.0);
        let clamped = Iso7730.solve(2.0, 30.0, 40.0, 0.1, 0.5, 70.0, 0.0);
        assert_eq!(hot, clamped);
    }

    #[test]
    fn test_warm_room_feels_hot() {
        let pa = actual_vapor_pressure(50.0, 30.0);
        let solution = Iso7730.solve(pa, 30.0, 30.0, 0.1, 0.5, 70.0, 0.0);
        assert!((solution.pmv - 2.02).abs() < 0.02, "pmv {}", solution.pmv);
    }
}
