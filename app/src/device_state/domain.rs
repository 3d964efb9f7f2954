use derive_more::derive::Display;
use serde::{Deserialize, Serialize};

use crate::climate::ClimateMode;
use crate::core::time::DateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    #[display("on")]
    On,
    #[display("off")]
    Off,
    #[display("unknown")]
    Unknown,
}

/// Which actor last wrote the device state record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum StateSource {
    #[display("local_manual")]
    LocalManual,
    #[display("local_control")]
    LocalControl,
    #[display("remote_api")]
    RemoteApi,
    #[display("unknown")]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    pub power: PowerState,
    pub temperature: Option<f64>,
    pub mode: Option<ClimateMode>,
    pub last_update: DateTime,
    pub source: StateSource,
}

impl DeviceState {
    pub fn unknown() -> Self {
        Self {
            power: PowerState::Unknown,
            temperature: None,
            mode: None,
            last_update: DateTime::now(),
            source: StateSource::Unknown,
        }
    }
}

/// Field-level update. `None` fields keep their current value.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStateUpdate {
    pub power: Option<PowerState>,
    pub temperature: Option<f64>,
    pub mode: Option<ClimateMode>,
    pub source: StateSource,
}

impl DeviceStateUpdate {
    pub fn power(power: PowerState, source: StateSource) -> Self {
        Self {
            power: Some(power),
            temperature: None,
            mode: None,
            source,
        }
    }
}
