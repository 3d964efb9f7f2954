mod config;
mod domain;

pub use domain::*;

use std::collections::HashMap;

use serde::Deserialize;

use crate::core::time::DateTime;

/// Override for a single cell of the seasonal table, as read from configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileEntry {
    pub season: Season,
    pub intent: Intent,
    pub temperature: u8,
    pub mode: ClimateMode,
    pub fan_speed: FanSpeed,
}

/// Season x intent lookup, built once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct SeasonalTable {
    settings: HashMap<(Season, Intent), ClimateSetting>,
}

impl Default for SeasonalTable {
    fn default() -> Self {
        let settings = config::default_seasonal_table()
            .into_iter()
            .map(|(season, intent, setting)| ((season, intent), setting))
            .collect();

        Self { settings }
    }
}

impl SeasonalTable {
    /// Applies configured overrides on top of the built-in table.
    pub fn with_overrides(overrides: &[ProfileEntry]) -> Result<Self, ClimateError> {
        let mut table = Self::default();

        for entry in overrides {
            table.settings.insert(
                (entry.season, entry.intent),
                ClimateSetting {
                    temperature: entry.temperature,
                    mode: entry.mode,
                    fan_speed: entry.fan_speed,
                },
            );
        }

        table.validate()?;
        Ok(table)
    }

    fn validate(&self) -> Result<(), ClimateError> {
        for season in Season::ALL {
            for intent in [Intent::PowerOn, Intent::PowerOff] {
                let setting = self.setting(season, intent)?;

                if !(MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&setting.temperature) {
                    return Err(ClimateError::TemperatureOutOfRange {
                        season,
                        intent,
                        temperature: setting.temperature,
                    });
                }
            }
        }

        Ok(())
    }

    fn setting(&self, season: Season, intent: Intent) -> Result<&ClimateSetting, ClimateError> {
        self.settings
            .get(&(season, intent))
            .ok_or(ClimateError::MissingProfile { season, intent })
    }

    /// Resolves the profile for `intent` in the current month, or in `month_override` if given.
    pub fn resolve(&self, intent: Intent, month_override: Option<u32>) -> Result<SeasonalProfile, ClimateError> {
        let month = month_override.unwrap_or_else(|| DateTime::now().month());
        self.resolve_for_month(intent, month)
    }

    pub fn resolve_for_month(&self, intent: Intent, month: u32) -> Result<SeasonalProfile, ClimateError> {
        let season = Season::from_month(month)?;
        let setting = self.setting(season, intent)?;

        Ok(SeasonalProfile {
            season,
            temperature: setting.temperature,
            mode: setting.mode,
            fan_speed: setting.fan_speed,
        })
    }
}
