use derive_more::derive::{Display, Error};
use serde::{Deserialize, Serialize};

use crate::command::DispatchFailure;
use crate::device_state::DeviceState;
use crate::trigger::TriggerReason;

#[derive(Debug, Clone, Deserialize)]
pub struct PositionSample {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// What to do when the off-trigger fires while the store already reports `off`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum OffTriggerPolicy {
    #[default]
    #[display("always_resend")]
    AlwaysResend,
    #[display("skip_when_known_off")]
    SkipWhenKnownOff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckAction {
    DeviceOff,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub distance: i64,
    pub triggered: bool,
    pub action: Option<CheckAction>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<CheckDebug>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckDebug {
    pub reason: TriggerReason,
    pub threshold: f64,
    pub device_state: DeviceState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HomeView {
    pub latitude: f64,
    pub longitude: f64,
    pub threshold_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum GeofenceError {
    #[display("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[display("distance computation out of bounds: {distance}")]
    ComputationAnomaly { distance: f64 },

    #[display("dispatch failed at distance {distance:.0}m: {source}")]
    DispatchFailed { distance: f64, source: DispatchFailure },

    #[display("configuration missing: {item}")]
    ConfigurationMissing { item: String },
}

impl GeofenceError {
    /// True if a command was sent to the actuator before the failure.
    pub fn attempted(&self) -> bool {
        matches!(self, GeofenceError::DispatchFailed { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GeofenceError::InvalidInput { .. } => "invalid_input",
            GeofenceError::ComputationAnomaly { .. } => "computation_anomaly",
            GeofenceError::DispatchFailed { .. } => "transport_failure",
            GeofenceError::ConfigurationMissing { .. } => "configuration_missing",
        }
    }

    pub(super) fn configuration_missing(item: impl Into<String>) -> Self {
        GeofenceError::ConfigurationMissing { item: item.into() }
    }
}
