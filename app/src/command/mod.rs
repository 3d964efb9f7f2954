mod adapter;
mod domain;
mod service;

pub use adapter::{ActuatorTransport, SwitchBotClient, TransportResponse};
pub use domain::*;

#[cfg(test)]
pub use adapter::fake;

use std::sync::Arc;

use service::CommandService;

use crate::climate::{Intent, SeasonalTable};
use crate::core::time::Duration;
use crate::device_state::{DeviceStateStore, PowerState};

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub device_id: Option<String>,
    pub request_timeout: Duration,
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub readback_after_command: bool,
    pub readback_delay: Duration,
}

/// Cheap-to-clone handle for sending profile-based commands to the air conditioner.
pub struct CommandDispatcher<T> {
    service: Arc<CommandService<T>>,
}

impl<T> Clone for CommandDispatcher<T> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
        }
    }
}

impl<T: ActuatorTransport> CommandDispatcher<T> {
    pub fn new(transport: Arc<T>, profiles: SeasonalTable, store: DeviceStateStore, config: DispatcherConfig) -> Self {
        Self {
            service: Arc::new(CommandService::new(transport, profiles, store, config)),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.service.is_configured()
    }

    /// Sends `intent` using the profile of the current month, or of `month_override` if given.
    /// On success the device state store reflects the command; on failure it is untouched.
    pub async fn send(
        &self,
        intent: Intent,
        month_override: Option<u32>,
        origin: CommandOrigin,
    ) -> Result<DispatchResult, DispatchError> {
        self.service.send(intent, month_override, origin).await
    }

    pub async fn refresh_remote_state(&self) -> PowerState {
        self.service.refresh_remote_state().await
    }
}
