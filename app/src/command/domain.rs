use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::climate::{ClimateError, Intent, SeasonalProfile};
use crate::device_state::{DeviceState, StateSource};

/// Who asked for a command. Decides the provenance written to the device state store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum CommandOrigin {
    #[display("automatic")]
    Automatic,
    #[display("manual")]
    Manual,
}

impl CommandOrigin {
    pub fn state_source(&self) -> StateSource {
        match self {
            CommandOrigin::Automatic => StateSource::LocalControl,
            CommandOrigin::Manual => StateSource::LocalManual,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlCommand {
    pub intent: Intent,
    pub encoded_parameter: String,
}

impl ControlCommand {
    pub fn new(intent: Intent, profile: &SeasonalProfile) -> Self {
        Self {
            intent,
            encoded_parameter: profile.encode(intent),
        }
    }
}

/// Outcome of an accepted command. Failures are reported as [`DispatchError`], so
/// `success` is always `true`; it is kept for the manual-control response body.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResult {
    pub success: bool,
    pub command: ControlCommand,
    pub profile: SeasonalProfile,
    pub vendor_response: serde_json::Value,
    pub state: DeviceState,
}

/// The vendor could not be reached or rejected the command. The device state store is untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct DispatchFailure {
    pub http_status: Option<u16>,
    pub vendor_message: String,
}

impl std::fmt::Display for DispatchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.http_status {
            Some(status) => write!(f, "command rejected with HTTP {}: {}", status, self.vendor_message),
            None => write!(f, "command transmission failed: {}", self.vendor_message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum DispatchError {
    #[display("{source}")]
    Profile { source: ClimateError },

    #[display("device id is not configured")]
    DeviceNotConfigured,

    #[display("{source}")]
    Failed { source: DispatchFailure },
}

impl DispatchError {
    /// True if a command actually went out to the vendor.
    pub fn attempted(&self) -> bool {
        matches!(self, DispatchError::Failed { .. })
    }
}

impl From<ClimateError> for DispatchError {
    fn from(source: ClimateError) -> Self {
        DispatchError::Profile { source }
    }
}

impl From<DispatchFailure> for DispatchError {
    fn from(source: DispatchFailure) -> Self {
        DispatchError::Failed { source }
    }
}
