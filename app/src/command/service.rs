use std::sync::Arc;

use infrastructure::meter;

use super::adapter::{ActuatorTransport, TransportResponse};
use super::{
    CommandOrigin, ControlCommand, DispatchError, DispatchFailure, DispatchResult, DispatcherConfig,
};
use crate::climate::{Intent, SeasonalTable};
use crate::core::resilience::ExponentialBackoff;
use crate::device_state::{DeviceStateStore, DeviceStateUpdate, PowerState, StateSource};

pub struct CommandService<T> {
    transport: Arc<T>,
    profiles: SeasonalTable,
    store: DeviceStateStore,
    config: DispatcherConfig,
}

impl<T: ActuatorTransport> CommandService<T> {
    pub fn new(transport: Arc<T>, profiles: SeasonalTable, store: DeviceStateStore, config: DispatcherConfig) -> Self {
        Self {
            transport,
            profiles,
            store,
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.config.device_id.is_some()
    }

    #[tracing::instrument(skip(self))]
    pub async fn send(
        &self,
        intent: Intent,
        month_override: Option<u32>,
        origin: CommandOrigin,
    ) -> Result<DispatchResult, DispatchError> {
        let device_id = self.config.device_id.as_deref().ok_or(DispatchError::DeviceNotConfigured)?;

        let profile = self.profiles.resolve(intent, month_override)?;
        let command = ControlCommand::new(intent, &profile);

        tracing::info!(
            "Dispatching {} ({} {}) to {}: {}",
            intent,
            origin,
            profile.season,
            device_id,
            command.encoded_parameter
        );

        let response = match self.transmit(device_id, &command).await {
            Ok(response) => response,
            Err(failure) => {
                tracing::error!("Dispatch of {} failed: {}", intent, failure);
                meter::increment("aircon_commands", &[("intent", &intent.to_string()), ("outcome", "failure")]);
                return Err(failure.into());
            }
        };

        let power = match intent {
            Intent::PowerOn => PowerState::On,
            Intent::PowerOff => PowerState::Off,
        };
        let state = self.store.write(DeviceStateUpdate {
            power: Some(power),
            temperature: Some(f64::from(profile.temperature)),
            mode: Some(profile.mode),
            source: origin.state_source(),
        });

        meter::increment("aircon_commands", &[("intent", &intent.to_string()), ("outcome", "success")]);

        if self.config.readback_after_command {
            self.spawn_readback(device_id.to_owned());
        }

        Ok(DispatchResult {
            success: true,
            command,
            profile,
            vendor_response: response.body,
            state,
        })
    }

    /// All attempts share one `request_timeout` budget; a retry only starts if time is left.
    async fn transmit(&self, device_id: &str, command: &ControlCommand) -> Result<TransportResponse, DispatchFailure> {
        let deadline = tokio::time::Instant::now() + std::time::Duration::from(self.config.request_timeout);
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = ExponentialBackoff::new(self.config.retry_delay, self.config.retry_delay * 8);

        loop {
            let attempt = backoff.attempts() + 1;

            let sent = tokio::time::timeout_at(
                deadline,
                self.transport.send_command(device_id, &command.encoded_parameter),
            )
            .await;

            let (failure, retryable) = match sent {
                Ok(Ok(response)) if response.ok => return Ok(response),
                Ok(Ok(response)) => (
                    DispatchFailure {
                        http_status: Some(response.status_code),
                        vendor_message: response.vendor_message(),
                    },
                    response.status_code >= 500,
                ),
                Ok(Err(e)) => (
                    DispatchFailure {
                        http_status: None,
                        vendor_message: format!("{:#}", e),
                    },
                    true,
                ),
                Err(_) => (
                    DispatchFailure {
                        http_status: None,
                        vendor_message: format!(
                            "no response within {}s",
                            self.config.request_timeout.as_secs_f64()
                        ),
                    },
                    true,
                ),
            };

            if !retryable || attempt >= max_attempts {
                return Err(failure);
            }

            let delay = backoff.next_delay();
            let retry_at = tokio::time::Instant::now() + std::time::Duration::from(delay);
            if retry_at >= deadline {
                tracing::warn!("Attempt {}/{} failed ({}), no time left for a retry", attempt, max_attempts, failure);
                return Err(failure);
            }

            tracing::warn!(
                "Attempt {}/{} failed ({}), retrying in {}s",
                attempt,
                max_attempts,
                failure,
                delay.as_secs_f64()
            );
            tokio::time::sleep(delay.into()).await;
            backoff.bump();
        }
    }

    /// Best-effort remote status read. Only a definite on/off answer is written to the store.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_remote_state(&self) -> PowerState {
        let Some(device_id) = self.config.device_id.as_deref() else {
            return PowerState::Unknown;
        };

        let response = match tokio::time::timeout(
            self.config.request_timeout.into(),
            self.transport.read_status(device_id),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::warn!("Remote status read failed: {:#}", e);
                return PowerState::Unknown;
            }
            Err(_) => {
                tracing::warn!("Remote status read timed out");
                return PowerState::Unknown;
            }
        };

        let power = response.reported_power();
        if power == PowerState::Unknown {
            tracing::info!(
                "Remote status is ambiguous ({}): {}",
                response.status_code,
                response.vendor_message()
            );
        } else {
            self.store.write(DeviceStateUpdate::power(power, StateSource::RemoteApi));
        }

        power
    }

    fn spawn_readback(&self, device_id: String) {
        let transport = self.transport.clone();
        let delay = self.config.readback_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay.into()).await;

            match transport.read_status(&device_id).await {
                Ok(response) => tracing::info!(
                    "Read-back after command: power={} ({} - {})",
                    response.reported_power(),
                    response.status_code,
                    response.body
                ),
                Err(e) => tracing::warn!("Read-back after command failed: {:#}", e),
            }
        });
    }
}
