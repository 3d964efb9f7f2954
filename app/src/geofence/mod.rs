mod domain;

pub use domain::*;

use infrastructure::meter;

use crate::climate::Intent;
use crate::command::{ActuatorTransport, CommandDispatcher, CommandOrigin, DispatchError};
use crate::core::geo::{self, Coordinate, GeoError};
use crate::core::time::DateTime;
use crate::device_state::{DeviceStateStore, PowerState};
use crate::trigger::{TriggerDecision, TriggerEngine, TriggerReason};

#[derive(Debug, Clone, Default)]
pub struct CoordinatorConfig {
    pub home: Option<Coordinate>,
    pub threshold_meters: Option<f64>,
    pub off_trigger_policy: OffTriggerPolicy,
    pub debug: bool,
}

/// Turns position samples into at most one rate-limited off-command.
pub struct Coordinator<T> {
    config: CoordinatorConfig,
    trigger: TriggerEngine,
    store: DeviceStateStore,
    dispatcher: CommandDispatcher<T>,
}

impl<T: ActuatorTransport> Coordinator<T> {
    pub fn new(
        config: CoordinatorConfig,
        trigger: TriggerEngine,
        store: DeviceStateStore,
        dispatcher: CommandDispatcher<T>,
    ) -> Self {
        Self {
            config,
            trigger,
            store,
            dispatcher,
        }
    }

    pub fn home(&self) -> Option<HomeView> {
        let home = self.config.home?;
        let threshold_meters = self.config.threshold_meters?;

        Some(HomeView {
            latitude: home.latitude(),
            longitude: home.longitude(),
            threshold_meters,
        })
    }

    #[tracing::instrument(skip(self))]
    pub async fn check_position(&self, sample: PositionSample) -> Result<CheckResult, GeofenceError> {
        let home = self
            .config
            .home
            .ok_or_else(|| GeofenceError::configuration_missing("geofence.home"))?;
        let threshold = self
            .config
            .threshold_meters
            .ok_or_else(|| GeofenceError::configuration_missing("geofence.threshold_meters"))?;
        if !self.dispatcher.is_configured() {
            return Err(GeofenceError::configuration_missing("switchbot.device_id"));
        }

        if let Some(timestamp) = &sample.timestamp {
            let reported = DateTime::from_iso(timestamp).map_err(|e| GeofenceError::InvalidInput {
                reason: format!("timestamp {:?} is not RFC 3339: {}", timestamp, e),
            })?;
            tracing::debug!("Sample reported at {}", reported);
        }

        let position = Coordinate::new(sample.latitude, sample.longitude)
            .map_err(|e| GeofenceError::InvalidInput { reason: e.to_string() })?;
        let distance = geo::distance(&home, &position).map_err(|e| match e {
            GeoError::ComputationAnomaly { distance } => GeofenceError::ComputationAnomaly { distance },
            GeoError::InvalidCoordinate { reason } => GeofenceError::InvalidInput { reason },
        })?;

        let (decision, claim) = self.trigger.decide(distance, threshold);

        tracing::info!(
            "Position check: {:.0}m from home (threshold {:.0}m) -> {}",
            distance,
            threshold,
            decision.reason
        );
        meter::increment("geofence_checks", &[("reason", &decision.reason.to_string())]);
        meter::set("geofence_distance_meters", distance, &[]);

        let Some(claim) = claim else {
            return Ok(self.result(&decision, threshold, false, suppressed_message(&decision, threshold)));
        };

        if self.config.off_trigger_policy == OffTriggerPolicy::SkipWhenKnownOff && self.known_off().await {
            self.trigger.release(claim);
            tracing::info!("Air conditioner already known off, skipping off-command");
            return Ok(self.result(
                &decision,
                threshold,
                false,
                format!(
                    "Distance {:.0}m exceeds threshold {:.0}m, air conditioner already off",
                    distance, threshold
                ),
            ));
        }

        match self.dispatcher.send(Intent::PowerOff, None, CommandOrigin::Automatic).await {
            Ok(dispatched) => {
                meter::increment("geofence_triggers", &[]);
                tracing::info!(
                    "Air conditioner turned off at {:.0}m ({})",
                    distance,
                    dispatched.command.encoded_parameter
                );

                Ok(self.result(
                    &decision,
                    threshold,
                    true,
                    format!(
                        "Distance {:.0}m exceeds threshold {:.0}m, air conditioner turned off",
                        distance, threshold
                    ),
                ))
            }
            Err(DispatchError::Failed { source }) => Err(GeofenceError::DispatchFailed { distance, source }),
            Err(e) => {
                self.trigger.release(claim);
                Err(GeofenceError::configuration_missing(match e {
                    DispatchError::DeviceNotConfigured => "switchbot.device_id".to_string(),
                    other => format!("climate profile ({})", other),
                }))
            }
        }
    }

    async fn known_off(&self) -> bool {
        match self.store.read().power {
            PowerState::Off => true,
            PowerState::On => false,
            PowerState::Unknown => self.dispatcher.refresh_remote_state().await == PowerState::Off,
        }
    }

    fn result(&self, decision: &TriggerDecision, threshold: f64, triggered: bool, message: String) -> CheckResult {
        CheckResult {
            distance: decision.distance_meters.round() as i64,
            triggered,
            action: triggered.then_some(CheckAction::DeviceOff),
            message,
            debug: self.config.debug.then(|| CheckDebug {
                reason: decision.reason,
                threshold,
                device_state: self.store.read(),
            }),
        }
    }
}

fn suppressed_message(decision: &TriggerDecision, threshold: f64) -> String {
    let distance = decision.distance_meters;

    match decision.reason {
        TriggerReason::WithinThreshold => format!("Within threshold ({:.0}m <= {:.0}m)", distance, threshold),
        TriggerReason::CooldownActive => format!("Distance {:.0}m exceeds threshold, trigger cooling down", distance),
        TriggerReason::JitterSuppressed => {
            format!("Distance {:.0}m exceeds threshold, unchanged since last trigger", distance)
        }
        TriggerReason::OverThreshold => format!("Distance {:.0}m exceeds threshold {:.0}m", distance, threshold),
    }
}
