//! Tabulated dry-air and water-vapour properties with linear interpolation.
//!
//! Lookups outside the tabulated span are rejected with
//! [`ThermalError::PropertyOutOfRange`]; nothing is extrapolated.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::ThermalError;

/// One row of the dry-air property table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirPropertyRow {
    /// Temperature (K)
    pub temperature_k: f64,
    /// Specific heat at constant pressure (kJ/kg·K)
    pub c_p: f64,
    /// Specific heat at constant volume (kJ/kg·K)
    pub c_v: f64,
    /// Ratio c_p / c_v
    pub cp_cv: f64,
    /// Dynamic viscosity (kg/m·s)
    pub mu: f64,
    /// Thermal conductivity (kW/m·K)
    pub k: f64,
    /// Prandtl number
    pub pr: f64,
    /// Kinematic viscosity (m²/s)
    pub nu: f64,
    /// Density (kg/m³)
    pub rho: f64,
}

/// Column selector for [`air_property`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum AirProperty {
    SpecificHeatCp,
    SpecificHeatCv,
    HeatCapacityRatio,
    DynamicViscosity,
    ThermalConductivity,
    Prandtl,
    KinematicViscosity,
    Density,
}

impl AirProperty {
    fn read(self, row: &AirPropertyRow) -> f64 {
        match self {
            AirProperty::SpecificHeatCp => row.c_p,
            AirProperty::SpecificHeatCv => row.c_v,
            AirProperty::HeatCapacityRatio => row.cp_cv,
            AirProperty::DynamicViscosity => row.mu,
            AirProperty::ThermalConductivity => row.k,
            AirProperty::Prandtl => row.pr,
            AirProperty::KinematicViscosity => row.nu,
            AirProperty::Density => row.rho,
        }
    }
}

macro_rules! air {
    ($t:expr, $cp:expr, $cv:expr, $ratio:expr, $mu:expr, $k:expr, $pr:expr, $nu:expr, $rho:expr) => {
        AirPropertyRow {
            temperature_k: $t,
            c_p: $cp,
            c_v: $cv,
            cp_cv: $ratio,
            mu: $mu,
            k: $k,
            pr: $pr,
            nu: $nu,
            rho: $rho,
        }
    };
}

/// Dry air at atmospheric pressure, 175 K to 1900 K
pub static AIR_PROPERTIES: [AirPropertyRow; 35] = [
    air!(175.0, 1.0023, 0.7152, 1.401, 1.182e-5, 1.593e-5, 0.744, 0.586e-5, 2.017),
    air!(200.0, 1.0025, 0.7154, 1.401, 1.329e-5, 1.809e-5, 0.736, 0.753e-5, 1.765),
    air!(225.0, 1.0027, 0.7156, 1.401, 1.467e-5, 2.020e-5, 0.728, 0.935e-5, 1.569),
    air!(250.0, 1.0031, 0.7160, 1.401, 1.599e-5, 2.227e-5, 0.720, 1.132e-5, 1.412),
    air!(275.0, 1.0038, 0.7167, 1.401, 1.725e-5, 2.428e-5, 0.713, 1.343e-5, 1.284),
    air!(300.0, 1.0049, 0.7178, 1.400, 1.846e-5, 2.624e-5, 0.707, 1.568e-5, 1.177),
    air!(325.0, 1.0063, 0.7192, 1.400, 1.962e-5, 2.816e-5, 0.701, 1.807e-5, 1.086),
    air!(350.0, 1.0082, 0.7211, 1.398, 2.075e-5, 3.003e-5, 0.697, 2.056e-5, 1.009),
    air!(375.0, 1.0106, 0.7235, 1.397, 2.181e-5, 3.186e-5, 0.692, 2.317e-5, 0.9413),
    air!(400.0, 1.0135, 0.7264, 1.395, 2.286e-5, 3.365e-5, 0.688, 2.591e-5, 0.8824),
    air!(450.0, 1.0206, 0.7335, 1.391, 2.485e-5, 3.710e-5, 0.684, 3.168e-5, 0.7844),
    air!(500.0, 1.0295, 0.7424, 1.387, 2.670e-5, 4.041e-5, 0.680, 3.782e-5, 0.7060),
    air!(550.0, 1.0398, 0.7527, 1.381, 2.849e-5, 4.357e-5, 0.680, 4.439e-5, 0.6418),
    air!(600.0, 1.0511, 0.7640, 1.376, 3.017e-5, 4.661e-5, 0.680, 5.128e-5, 0.5883),
    air!(650.0, 1.0629, 0.7758, 1.370, 3.178e-5, 4.954e-5, 0.682, 5.853e-5, 0.5430),
    air!(700.0, 1.0750, 0.7879, 1.364, 3.332e-5, 5.236e-5, 0.684, 6.607e-5, 0.5043),
    air!(750.0, 1.0870, 0.7999, 1.359, 3.482e-5, 5.509e-5, 0.687, 7.399e-5, 0.4706),
    air!(800.0, 1.0987, 0.8116, 1.354, 3.624e-5, 5.774e-5, 0.690, 8.214e-5, 0.4412),
    air!(850.0, 1.1101, 0.8230, 1.349, 3.763e-5, 6.030e-5, 0.693, 9.061e-5, 0.4153),
    air!(900.0, 1.1209, 0.8338, 1.344, 3.897e-5, 6.276e-5, 0.696, 9.936e-5, 0.3922),
    air!(950.0, 1.1313, 0.8442, 1.340, 4.026e-5, 6.520e-5, 0.699, 10.83e-5, 0.3716),
    air!(1000.0, 1.1411, 0.8540, 1.336, 4.153e-5, 6.754e-5, 0.702, 11.76e-5, 0.3530),
    air!(1050.0, 1.1502, 0.8631, 1.333, 4.276e-5, 6.985e-5, 0.704, 12.72e-5, 0.3362),
    air!(1100.0, 1.1589, 0.8718, 1.329, 4.396e-5, 7.209e-5, 0.707, 13.70e-5, 0.3209),
    air!(1150.0, 1.1670, 0.8799, 1.326, 4.511e-5, 7.427e-5, 0.709, 14.70e-5, 0.3069),
    air!(1200.0, 1.1746, 0.8875, 1.323, 4.626e-5, 7.640e-5, 0.711, 15.73e-5, 0.2941),
    air!(1250.0, 1.1817, 0.8946, 1.321, 4.736e-5, 7.849e-5, 0.713, 16.77e-5, 0.2824),
    air!(1300.0, 1.1884, 0.9013, 1.319, 4.846e-5, 8.054e-5, 0.715, 17.85e-5, 0.2715),
    air!(1350.0, 1.1946, 0.9075, 1.316, 4.952e-5, 8.253e-5, 0.717, 18.94e-5, 0.2615),
    air!(1400.0, 1.2005, 0.9134, 1.314, 5.057e-5, 8.450e-5, 0.719, 20.06e-5, 0.2521),
    air!(1500.0, 1.2112, 0.9241, 1.311, 5.264e-5, 8.831e-5, 0.722, 22.36e-5, 0.2353),
    air!(1600.0, 1.2207, 0.9336, 1.308, 5.457e-5, 9.199e-5, 0.724, 24.74e-5, 0.2206),
    air!(1700.0, 1.2293, 0.9422, 1.305, 5.646e-5, 9.554e-5, 0.726, 27.20e-5, 0.2076),
    air!(1800.0, 1.2370, 0.9499, 1.302, 5.829e-5, 9.899e-5, 0.728, 29.72e-5, 0.1961),
    air!(1900.0, 1.2440, 0.9569, 1.300, 6.008e-5, 10.233e-5, 0.730, 32.34e-5, 0.1858),
];

/// Saturation pressure of water vapour: (temperature K, pressure kPa)
pub static VAPOR_SATURATION_PRESSURES: [(f64, f64); 25] = [
    (258.15, 0.15),
    (261.15, 0.19),
    (264.15, 0.24),
    (266.15, 0.30),
    (269.15, 0.37),
    (272.15, 0.46),
    (275.15, 0.56),
    (277.15, 0.69),
    (280.15, 0.84),
    (283.15, 1.03),
    (286.15, 1.23),
    (289.15, 1.48),
    (291.15, 1.77),
    (294.15, 2.10),
    (297.15, 2.50),
    (300.15, 2.96),
    (302.15, 3.50),
    (305.15, 4.10),
    (308.15, 4.81),
    (311.15, 5.62),
    (314.15, 6.56),
    (316.15, 7.62),
    (319.15, 8.78),
    (322.15, 10.14),
    (325.15, 11.68),
];

/// Lowest temperature (K) covered by the vapour table
pub const VAPOR_TABLE_MIN_K: f64 = 258.15;
/// Highest temperature (K) covered by the vapour table
pub const VAPOR_TABLE_MAX_K: f64 = 325.15;

fn interpolate<R>(
    rows: &[R],
    temperature: impl Fn(&R) -> f64,
    value: impl Fn(&R) -> f64,
    temperature_k: f64,
    property: &'static str,
) -> Result<f64, ThermalError> {
    let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
        return Err(ThermalError::InvalidConfig(format!("{property} table is empty")));
    };
    let (min_k, max_k) = (temperature(first), temperature(last));
    if !(min_k..=max_k).contains(&temperature_k) {
        return Err(ThermalError::PropertyOutOfRange {
            property,
            temperature_k,
            min_k,
            max_k,
        });
    }

    // First row strictly above the requested temperature
    let upper = rows.partition_point(|row| temperature(row) <= temperature_k);
    if upper == rows.len() {
        return Ok(value(last));
    }
    let (lo, hi) = (&rows[upper - 1], &rows[upper]);
    let fraction = (temperature_k - temperature(lo)) / (temperature(hi) - temperature(lo));
    Ok(value(lo) + (value(hi) - value(lo)) * fraction)
}

/// Interpolated dry-air property at `temperature_k`
pub fn air_property(property: AirProperty, temperature_k: f64) -> Result<f64, ThermalError> {
    interpolate(
        &AIR_PROPERTIES,
        |row| row.temperature_k,
        |row| property.read(row),
        temperature_k,
        property.into(),
    )
}

/// Interpolated saturation vapour pressure (kPa) at `temperature_k`
pub fn vapor_saturation_pressure(temperature_k: f64) -> Result<f64, ThermalError> {
    interpolate(
        &VAPOR_SATURATION_PRESSURES,
        |row| row.0,
        |row| row.1,
        temperature_k,
        "vapor_saturation_pressure",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AirProperty::Density, 300.0, 1.177)]
    #[case(AirProperty::Density, 287.5, 1.2305)]
    #[case(AirProperty::Prandtl, 175.0, 0.744)]
    #[case(AirProperty::KinematicViscosity, 1900.0, 32.34e-5)]
    #[case(AirProperty::SpecificHeatCp, 312.5, 1.0056)]
    fn test_air_interpolation(#[case] property: AirProperty, #[case] t: f64, #[case] expected: f64) {
        let value = air_property(property, t).unwrap();
        assert!((value - expected).abs() < 1e-9, "{property} at {t}: {value}");
    }

    #[test]
    fn test_vapor_interpolation() {
        let p = vapor_saturation_pressure(295.65).unwrap();
        assert!((p - 2.30).abs() < 1e-9);
        assert!((vapor_saturation_pressure(VAPOR_TABLE_MAX_K).unwrap() - 11.68).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = air_property(AirProperty::Density, 150.0).unwrap_err();
        assert_eq!(
            err,
            ThermalError::PropertyOutOfRange {
                property: "density",
                temperature_k: 150.0,
                min_k: 175.0,
                max_k: 1900.0
            }
        );
        assert!(vapor_saturation_pressure(330.0).is_err());
        assert!(vapor_saturation_pressure(f64::NAN).is_err());
    }

    #[test]
    fn test_tables_sorted() {
        assert!(AIR_PROPERTIES
            .windows(2)
            .all(|w| w[0].temperature_k < w[1].temperature_k));
        assert!(VAPOR_SATURATION_PRESSURES.windows(2).all(|w| w[0].0 < w[1].0));
    }
}
