use anyhow::Result;
use chrono_tz::Tz;
use figment::{providers::{Env, Format, Toml}, Figment};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analysis::{AnalysisConfig, OccupancyConfig, DEFAULT_LIGHT_RATE_BOUND};
use crate::comfort::{ComfortFormula, ParameterSchedule, PersonalDefaults};
use crate::error::ConfigError;
use crate::solar::Location;
use crate::thermal::{RoomConfig, Tariff};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub location: Location,
    pub analysis: AnalysisSettings,
    pub comfort: ComfortSettings,
    pub room: RoomConfig,
    pub tariff: Tariff,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub occupancy: OccupancyConfig,
    /// Fixed ± bound on light rates (per minute); σ-derived bounds when unset
    pub light_rate_bound: Option<f64>,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            occupancy: OccupancyConfig::default(),
            light_rate_bound: Some(DEFAULT_LIGHT_RATE_BOUND),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortSettings {
    pub formula: ComfortFormula,
    pub defaults: PersonalDefaults,
    pub schedule: ParameterSchedule,
    /// Zone the schedule's hours are read in
    pub timezone: Tz,
}

impl Default for ComfortSettings {
    fn default() -> Self {
        Self {
            formula: ComfortFormula::default(),
            defaults: PersonalDefaults::default(),
            schedule: ParameterSchedule::default_daily(),
            timezone: Tz::Europe__London,
        }
    }
}

fn invalid(section: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        section,
        reason: reason.to_string(),
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("RCE__").split("__"));
        let config: Self = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.location.validate().map_err(|e| invalid("location", e))?;
        self.analysis
            .occupancy
            .validate()
            .map_err(|e| invalid("analysis.occupancy", e))?;
        if let Some(bound) = self.analysis.light_rate_bound {
            if bound.is_nan() || bound <= 0.0 {
                return Err(invalid("analysis", "light_rate_bound must be positive"));
            }
        }
        self.comfort
            .defaults
            .validate()
            .map_err(|e| invalid("comfort.defaults", e))?;
        self.comfort
            .schedule
            .validate()
            .map_err(|e| invalid("comfort.schedule", e))?;
        self.room.validate().map_err(|e| invalid("room", e))?;
        self.tariff.validate().map_err(|e| invalid("tariff", e))?;
        Ok(())
    }

    /// Options for a dataset analysis run
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            location: self.location,
            occupancy: self.analysis.occupancy,
            light_rate_bound: self.analysis.light_rate_bound,
            formula: self.comfort.formula,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_validate() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.comfort.schedule.bins.len(), 7);
        assert_eq!(config.comfort.timezone, Tz::Europe__London);
        assert_eq!(config.analysis.light_rate_bound, Some(5.0));
        assert_eq!(config.analysis_config(), AnalysisConfig::default());
    }

    #[test]
    fn test_rejects_non_positive_light_bound() {
        let mut config = Config::default();
        config.analysis.light_rate_bound = Some(0.0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { section: "analysis", .. })
        ));
        config.analysis.light_rate_bound = None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_merges_file_and_env() {
        Jail::expect_with(|jail| {
            jail.create_dir("config")?;
            jail.create_file(
                "config/default.toml",
                r#"
                [location]
                latitude_deg = 51.5
                longitude_west_deg = 0.1

                [room]
                wall = "brick_9"
                window = "single"
                radiator = { catalogue = "modern_single" }

                [comfort]
                formula = "iso7730"
                timezone = "Australia/Sydney"
                "#,
            )?;
            jail.set_env("RCE__ROOM__TARGET_TEMP_C", "19.5");
            jail.set_env("RCE__TARIFF__PRICE_PER_KWH", "0.1");

            let config = Config::load().map_err(|e| e.to_string())?;
            assert_eq!(config.location.latitude_deg, 51.5);
            assert_eq!(config.room.target_temp_c, 19.5);
            assert_eq!(config.room.wall, crate::thermal::WallConstruction::Brick9);
            assert_eq!(
                config.room.radiator,
                crate::thermal::RadiatorSpec::Catalogue(crate::thermal::RadiatorClass::ModernSingle)
            );
            assert_eq!(config.comfort.formula, ComfortFormula::Iso7730);
            assert_eq!(config.comfort.timezone, Tz::Australia__Sydney);
            assert_eq!(config.tariff.price_per_kwh, 0.1);
            assert_eq!(config.analysis_config().location.latitude_deg, 51.5);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_room() {
        Jail::expect_with(|jail| {
            jail.set_env("RCE__ROOM__HEIGHT_M", "0");
            let error = Config::load().unwrap_err();
            assert!(error.to_string().contains("room"), "{error}");
            Ok(())
        });
    }
}
