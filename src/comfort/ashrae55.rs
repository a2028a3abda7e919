//! ASHRAE 55 PMV/PPD.
//!
//! Follows the standard's reference program: vapour pressure from its own
//! saturation fit, clothing temperature solved on the normalised variable
//! `X = (t_cl + 273) / 100`, and the heat loss split into six components.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{
    ppd_from_pmv, ComfortResult, PersonalFactors, PmvModel, ThermalConditions, CLO_TO_M2K_PER_W,
    WATTS_PER_MET,
};

const MAX_ITERATIONS: usize = 150;
const CONVERGENCE: f64 = 0.00015;

/// Heat loss components (W/m²)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatLossBreakdown {
    /// Vapour diffusion through the skin
    pub skin_diffusion: f64,
    /// Sweating, only above comfortable activity levels
    pub sweating: f64,
    pub latent_respiration: f64,
    pub dry_respiration: f64,
    pub radiation: f64,
    pub convection: f64,
}

impl HeatLossBreakdown {
    pub fn total(&self) -> f64 {
        self.skin_diffusion
            + self.sweating
            + self.latent_respiration
            + self.dry_respiration
            + self.radiation
            + self.convection
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ashrae55Solution {
    pub pmv: f64,
    pub ppd: f64,
    /// Clothing surface temperature (°C)
    pub clothing_temp_c: f64,
    pub heat_loss: HeatLossBreakdown,
    pub iterations: usize,
    pub converged: bool,
}

/// ASHRAE 55 formulation
#[derive(Debug, Clone, Copy, Default)]
pub struct Ashrae55;

impl Ashrae55 {
    /// Solve for PMV/PPD with ASHRAE units: clothing in clo, metabolic rate
    /// and external work in met, humidity as RH %.
    #[allow(clippy::too_many_arguments)]
    pub fn solve(
        &self,
        clo: f64,
        met: f64,
        wme: f64,
        ta: f64,
        tr: f64,
        vel: f64,
        rh: f64,
    ) -> Ashrae55Solution {
        let pa = rh * 10.0 * (16.6536 - 4030.184 / (ta + 235.0)).exp();
        let icl = CLO_TO_M2K_PER_W * clo;
        let m = met * WATTS_PER_MET;
        let w = wme * WATTS_PER_MET;
        let mw = m - w;
        let fcl = if icl < 0.078 {
            1.0 + 1.29 * icl
        } else {
            1.05 + 0.645 * icl
        };
        let hcf = 12.1 * vel.sqrt();
        let taa = ta + 273.0;
        let tra = tr + 273.0;

        let tcla = taa + (35.5 - ta) / (3.5 * (6.45 * icl + 0.1));
        let p1 = icl * fcl;
        let p2 = p1 * 3.96;
        let p3 = p1 * 100.0;
        let p4 = p1 * taa;
        let p5 = 308.7 - 0.028 * mw + p2 * (tra / 100.0).powi(4);

        let mut xn = tcla / 100.0;
        let mut xf = xn;
        let mut hc = hcf;
        let mut iterations = 0;
        let mut converged = false;
        while iterations < MAX_ITERATIONS {
            iterations += 1;
            xf = (xf + xn) / 2.0;
            let hcn = 2.38 * (100.0 * xf - taa).abs().powf(0.25);
            hc = hcf.max(hcn);
            xn = (p5 + p4 * hc - p2 * xf.powi(4)) / (100.0 + p3 * hc);
            if (xn - xf).abs() <= CONVERGENCE {
                converged = true;
                break;
            }
        }
        if !converged {
            warn!(iterations, "ASHRAE 55 clothing temperature did not converge");
        }

        let tcl = 100.0 * xn - 273.0;
        let heat_loss = HeatLossBreakdown {
            skin_diffusion: 3.05e-3 * (5733.0 - 6.99 * mw - pa),
            sweating: if mw > 58.15 { 0.42 * (mw - 58.15) } else { 0.0 },
            latent_respiration: 1.7e-5 * m * (5867.0 - pa),
            dry_respiration: 0.0014 * m * (34.0 - ta),
            radiation: 3.96 * fcl * (xn.powi(4) - (tra / 100.0).powi(4)),
            convection: fcl * hc * (tcl - ta),
        };

        let sensation = 0.303 * (-0.036 * m).exp() + 0.028;
        let pmv = sensation * (mw - heat_loss.total());

        Ashrae55Solution {
            pmv,
            ppd: ppd_from_pmv(pmv),
            clothing_temp_c: tcl,
            heat_loss,
            iterations,
            converged,
        }
    }
}

impl PmvModel for Ashrae55 {
    fn name(&self) -> &'static str {
        "ASHRAE 55"
    }

    fn evaluate(&self, conditions: &ThermalConditions, person: &PersonalFactors) -> ComfortResult {
        let solution = self.solve(
            person.clothing_clo,
            person.metabolic_w_m2 / WATTS_PER_MET,
            person.external_work_w_m2 / WATTS_PER_MET,
            conditions.air_temp_c,
            conditions.radiant_temp_c,
            conditions.air_velocity,
            conditions.relative_humidity,
        );
        ComfortResult {
            pmv: solution.pmv,
            ppd: solution.ppd,
        }
    }
}
