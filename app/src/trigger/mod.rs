mod domain;

pub use domain::*;

use std::sync::{Arc, Mutex, PoisonError};

use crate::core::time::DateTime;

/// Process-wide trigger history guarding against rapid-fire and jitter-induced triggers.
#[derive(Debug, Clone)]
pub struct TriggerEngine {
    history: Arc<Mutex<TriggerHistory>>,
    config: TriggerConfig,
}

/// Handle for a trigger recorded by [`TriggerEngine::decide`], used to undo it when
/// no command was attempted after all.
#[derive(Debug, Clone, Copy)]
pub struct TriggerClaim {
    previous: TriggerHistory,
    recorded_at: DateTime,
}

impl TriggerEngine {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            history: Arc::new(Mutex::new(TriggerHistory::default())),
            config,
        }
    }

    #[cfg(test)]
    pub fn history(&self) -> TriggerHistory {
        *self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Unconditional record; production paths go through [`TriggerEngine::decide`].
    #[cfg(test)]
    pub fn record_trigger(&self, distance: f64) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        Self::record(&mut history, distance, DateTime::now());
    }

    /// Evaluates and, on a positive decision, records the trigger in the same critical section.
    /// Of two concurrent callers at most one gets `should_trigger`.
    pub fn decide(&self, distance: f64, threshold: f64) -> (TriggerDecision, Option<TriggerClaim>) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let now = DateTime::now();
        let decision = evaluate(distance, threshold, &history, now, &self.config);

        if !decision.should_trigger {
            return (decision, None);
        }

        let claim = TriggerClaim {
            previous: *history,
            recorded_at: now,
        };
        Self::record(&mut history, distance, now);

        (decision, Some(claim))
    }

    /// Restores the history from before `claim`, unless another trigger was recorded since.
    pub fn release(&self, claim: TriggerClaim) {
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);

        if history.last_trigger_at == Some(claim.recorded_at) {
            *history = claim.previous;
            tracing::debug!("Released trigger recorded at {}", claim.recorded_at);
        }
    }

    fn record(history: &mut TriggerHistory, distance: f64, now: DateTime) {
        history.last_trigger_at = Some(now);
        history.last_trigger_distance = Some(distance);
        tracing::info!("Trigger recorded at {} for distance {:.0}m", now, distance);
    }
}
