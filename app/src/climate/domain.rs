use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};

pub const MIN_TEMPERATURE: u8 = 16;
pub const MAX_TEMPERATURE: u8 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[display("power_on")]
    PowerOn,
    #[display("power_off")]
    PowerOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    #[display("spring")]
    Spring,
    #[display("summer")]
    Summer,
    #[display("autumn")]
    Autumn,
    #[display("winter")]
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn from_month(month: u32) -> Result<Self, ClimateError> {
        match month {
            3..=5 => Ok(Season::Spring),
            6..=8 => Ok(Season::Summer),
            9..=11 => Ok(Season::Autumn),
            1 | 2 | 12 => Ok(Season::Winter),
            _ => Err(ClimateError::InvalidMonth { month }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ClimateMode {
    #[display("auto")]
    Auto,
    #[display("cool")]
    Cool,
    #[display("heat")]
    Heat,
    #[display("fan")]
    Fan,
    #[display("dehumidify")]
    Dehumidify,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum FanSpeed {
    #[display("low")]
    Low,
    #[display("medium")]
    Medium,
    #[display("high")]
    High,
    #[display("auto")]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum ClimateError {
    #[display("month {month} is not within 1..=12")]
    InvalidMonth { month: u32 },

    #[display("temperature {temperature} for {season}/{intent} is not within 16..=30")]
    TemperatureOutOfRange { season: Season, intent: Intent, temperature: u8 },

    #[display("no climate setting for {season}/{intent}")]
    MissingProfile { season: Season, intent: Intent },
}

/// Climate parameters for one (season, intent) cell of the seasonal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClimateSetting {
    pub temperature: u8,
    pub mode: ClimateMode,
    pub fan_speed: FanSpeed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeasonalProfile {
    pub season: Season,
    pub temperature: u8,
    pub mode: ClimateMode,
    pub fan_speed: FanSpeed,
}

impl SeasonalProfile {
    /// Vendor parameter string `{temperature},{mode_code},{fan_code},{on|off}`.
    pub fn encode(&self, intent: Intent) -> String {
        let power = match intent {
            Intent::PowerOn => "on",
            Intent::PowerOff => "off",
        };

        format!(
            "{},{},{},{}",
            self.temperature,
            self.mode.vendor_code(),
            self.fan_speed.vendor_code(),
            power
        )
    }
}

impl ClimateMode {
    pub fn vendor_code(&self) -> u8 {
        match self {
            ClimateMode::Auto => 1,
            ClimateMode::Cool => 2,
            ClimateMode::Dehumidify => 3,
            ClimateMode::Fan => 4,
            ClimateMode::Heat => 5,
        }
    }
}

impl FanSpeed {
    pub fn vendor_code(&self) -> u8 {
        match self {
            FanSpeed::Auto => 1,
            FanSpeed::Low => 2,
            FanSpeed::Medium => 3,
            FanSpeed::High => 4,
        }
    }
}
