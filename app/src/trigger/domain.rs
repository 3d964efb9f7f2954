use derive_more::derive::Display;
use serde::Serialize;

use crate::core::time::{DateTime, Duration};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum TriggerReason {
    #[display("over_threshold")]
    OverThreshold,
    #[display("within_threshold")]
    WithinThreshold,
    #[display("cooldown_active")]
    CooldownActive,
    #[display("jitter_suppressed")]
    JitterSuppressed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerDecision {
    pub distance_meters: f64,
    pub should_trigger: bool,
    pub reason: TriggerReason,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TriggerHistory {
    pub last_trigger_at: Option<DateTime>,
    pub last_trigger_distance: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct TriggerConfig {
    pub cooldown: Duration,
    pub hysteresis_meters: f64,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            cooldown: Duration::seconds(120),
            hysteresis_meters: 10.0,
        }
    }
}

/// Guard chain deciding whether a position sample should fire the off-trigger.
/// Rules apply in order: threshold, cooldown, jitter, trigger.
pub fn evaluate(
    distance: f64,
    threshold: f64,
    history: &TriggerHistory,
    now: DateTime,
    config: &TriggerConfig,
) -> TriggerDecision {
    let reason = if distance <= threshold {
        TriggerReason::WithinThreshold
    } else if history
        .last_trigger_at
        .is_some_and(|at| now.elapsed_since(at) < config.cooldown)
    {
        TriggerReason::CooldownActive
    } else if history
        .last_trigger_distance
        .is_some_and(|last| (distance - last).abs() < config.hysteresis_meters)
    {
        TriggerReason::JitterSuppressed
    } else {
        TriggerReason::OverThreshold
    };

    TriggerDecision {
        distance_meters: distance,
        should_trigger: reason == TriggerReason::OverThreshold,
        reason,
    }
}
