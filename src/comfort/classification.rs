//! Comfort bands for schedule summaries.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Comfort level of a period, ordered from coldest to hottest
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
pub enum ComfortBand {
    #[strum(serialize = "Very Cold")]
    VeryCold,
    #[strum(serialize = "Fairly Cold")]
    FairlyCold,
    #[strum(serialize = "Uncomfortably Cold")]
    UncomfortablyCold,
    #[strum(serialize = "Satisfactory (Cold)")]
    SatisfactoryCold,
    Ideal,
    #[strum(serialize = "Satisfactory (Warm)")]
    SatisfactoryWarm,
    #[strum(serialize = "Uncomfortably Hot")]
    UncomfortablyHot,
    #[strum(serialize = "Fairly Hot")]
    FairlyHot,
    #[strum(serialize = "Very Hot")]
    VeryHot,
}

/// Band for a mean PMV/PPD pair.
///
/// A mean PMV of zero counts as warm. `None` for a PPD outside 0..=100 or a
/// non-finite PMV.
pub fn classify(mean_pmv: f64, mean_ppd: f64) -> Option<ComfortBand> {
    if !mean_pmv.is_finite() || !(0.0..=100.0).contains(&mean_ppd) {
        return None;
    }
    let (cold, warm) = match mean_ppd {
        p if p <= 10.0 => return Some(ComfortBand::Ideal),
        p if p <= 25.0 => (ComfortBand::SatisfactoryCold, ComfortBand::SatisfactoryWarm),
        p if p <= 50.0 => (ComfortBand::UncomfortablyCold, ComfortBand::UncomfortablyHot),
        p if p <= 75.0 => (ComfortBand::FairlyCold, ComfortBand::FairlyHot),
        _ => (ComfortBand::VeryCold, ComfortBand::VeryHot),
    };
    Some(if mean_pmv >= 0.0 { warm } else { cold })
}
