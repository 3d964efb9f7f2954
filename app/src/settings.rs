use anyhow::Context as _;
use config::{Config, ConfigError, Environment, File};
use infrastructure::{HttpServerConfig, MonitoringConfig};
use serde::Deserialize;

use crate::climate::{ProfileEntry, SeasonalTable};
use crate::command::DispatcherConfig;
use crate::core::geo::Coordinate;
use crate::core::time::Duration;
use crate::geofence::{CoordinatorConfig, OffTriggerPolicy};
use crate::trigger::TriggerConfig;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub http_server: HttpServerConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub geofence: GeofenceSettings,
    pub switchbot: SwitchBotSettings,
    #[serde(default)]
    pub climate: ClimateSettings,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name("config.toml").required(false))
            .add_source(Environment::with_prefix("AIRCON").separator("__"));

        let s = builder.build()?;
        s.try_deserialize()
    }

    /// Items whose absence makes every position check fail with a configuration error.
    pub fn missing_items(&self) -> Vec<&'static str> {
        let mut missing = vec![];

        if self.geofence.home.is_none() {
            missing.push("geofence.home");
        }
        if self.geofence.threshold_meters.is_none() {
            missing.push("geofence.threshold_meters");
        }
        if self.switchbot.dispatcher_config().device_id.is_none() {
            missing.push("switchbot.device_id");
        }

        missing
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HomeSettings {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeofenceSettings {
    #[serde(default)]
    pub home: Option<HomeSettings>,
    #[serde(default)]
    pub threshold_meters: Option<f64>,
    #[serde(default = "default_cooldown")]
    pub cooldown: Duration,
    #[serde(default = "default_hysteresis_meters")]
    pub hysteresis_meters: f64,
    #[serde(default)]
    pub off_trigger_policy: OffTriggerPolicy,
    #[serde(default)]
    pub debug: bool,
}

impl Default for GeofenceSettings {
    fn default() -> Self {
        Self {
            home: None,
            threshold_meters: None,
            cooldown: default_cooldown(),
            hysteresis_meters: default_hysteresis_meters(),
            off_trigger_policy: OffTriggerPolicy::default(),
            debug: false,
        }
    }
}

impl GeofenceSettings {
    pub fn coordinator_config(&self) -> anyhow::Result<CoordinatorConfig> {
        let home = self
            .home
            .as_ref()
            .map(|home| Coordinate::new(home.latitude, home.longitude))
            .transpose()
            .context("Invalid geofence.home")?;

        if let Some(threshold) = self.threshold_meters {
            anyhow::ensure!(
                threshold.is_finite() && threshold > 0.0,
                "geofence.threshold_meters must be a positive number, got {}",
                threshold
            );
        }

        Ok(CoordinatorConfig {
            home,
            threshold_meters: self.threshold_meters,
            off_trigger_policy: self.off_trigger_policy,
            debug: self.debug,
        })
    }

    pub fn trigger_config(&self) -> anyhow::Result<TriggerConfig> {
        anyhow::ensure!(
            self.hysteresis_meters.is_finite() && self.hysteresis_meters >= 0.0,
            "geofence.hysteresis_meters must be a non-negative number, got {}",
            self.hysteresis_meters
        );
        anyhow::ensure!(
            self.cooldown.as_millis() >= 0,
            "geofence.cooldown must not be negative, got {}",
            self.cooldown.to_iso_string()
        );

        Ok(TriggerConfig {
            cooldown: self.cooldown,
            hysteresis_meters: self.hysteresis_meters,
        })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SwitchBotSettings {
    #[serde(default = "default_switchbot_url")]
    pub url: String,
    pub token: String,
    pub secret: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default = "default_request_timeout")]
    pub request_timeout: Duration,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_retry_delay")]
    pub retry_delay: Duration,
    #[serde(default)]
    pub readback_after_command: bool,
    #[serde(default = "default_readback_delay")]
    pub readback_delay: Duration,
}

impl SwitchBotSettings {
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            device_id: self.device_id.clone().filter(|id| !id.trim().is_empty()),
            request_timeout: self.request_timeout,
            max_attempts: self.max_attempts,
            retry_delay: self.retry_delay,
            readback_after_command: self.readback_after_command,
            readback_delay: self.readback_delay,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClimateSettings {
    #[serde(default)]
    pub profiles: Vec<ProfileEntry>,
}

impl ClimateSettings {
    pub fn seasonal_table(&self) -> anyhow::Result<SeasonalTable> {
        SeasonalTable::with_overrides(&self.profiles).context("Invalid climate.profiles")
    }
}

fn default_cooldown() -> Duration {
    Duration::seconds(120)
}

fn default_hysteresis_meters() -> f64 {
    10.0
}

fn default_switchbot_url() -> String {
    "https://api.switch-bot.com".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::seconds(8)
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay() -> Duration {
    Duration::seconds(1)
}

fn default_readback_delay() -> Duration {
    Duration::seconds(2)
}
