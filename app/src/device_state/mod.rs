mod domain;

pub use domain::*;

use std::sync::{Arc, Mutex, PoisonError};

use crate::core::time::DateTime;

/// Process-wide record of the actuator's last known state.
///
/// Cloning the store hands out another handle to the same record. Every `write` is a
/// single critical section, so concurrent manual and automatic updates never interleave
/// within one merge.
#[derive(Debug, Clone)]
pub struct DeviceStateStore {
    state: Arc<Mutex<DeviceState>>,
}

impl Default for DeviceStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceStateStore {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(DeviceState::unknown())),
        }
    }

    pub fn read(&self) -> DeviceState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn write(&self, update: DeviceStateUpdate) -> DeviceState {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(power) = update.power {
            state.power = power;
        }
        if let Some(temperature) = update.temperature {
            state.temperature = Some(temperature);
        }
        if let Some(mode) = update.mode {
            state.mode = Some(mode);
        }
        state.source = update.source;
        state.last_update = DateTime::now();

        tracing::info!(
            "Device state updated by {}: power={}, temperature={:?}, mode={:?}",
            state.source,
            state.power,
            state.temperature,
            state.mode
        );

        state.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climate::ClimateMode;
    use crate::core::time::FIXED_NOW;

    #[test]
    fn starts_unknown() {
        let state = DeviceStateStore::new().read();

        assert_eq!(state.power, PowerState::Unknown);
        assert_eq!(state.source, StateSource::Unknown);
        assert_eq!(state.temperature, None);
        assert_eq!(state.mode, None);
    }

    #[test]
    fn write_merges_only_given_fields() {
        let store = DeviceStateStore::new();
        store.write(DeviceStateUpdate {
            power: Some(PowerState::On),
            temperature: Some(27.0),
            mode: Some(ClimateMode::Cool),
            source: StateSource::LocalManual,
        });

        let state = store.write(DeviceStateUpdate::power(PowerState::Off, StateSource::LocalControl));

        assert_eq!(state.power, PowerState::Off);
        assert_eq!(state.temperature, Some(27.0));
        assert_eq!(state.mode, Some(ClimateMode::Cool));
        assert_eq!(state.source, StateSource::LocalControl);
        assert_eq!(store.read(), state);
    }

    #[tokio::test]
    async fn write_refreshes_last_update() {
        let store = DeviceStateStore::new();
        let later = DateTime::from_iso("2030-01-01T00:00:00Z").unwrap();

        let state = FIXED_NOW
            .scope(later, async {
                store.write(DeviceStateUpdate {
                    power: None,
                    temperature: None,
                    mode: None,
                    source: StateSource::RemoteApi,
                })
            })
            .await;

        assert_eq!(state.last_update, later);
        assert_eq!(state.power, PowerState::Unknown);
        assert_eq!(state.source, StateSource::RemoteApi);
    }

    #[test]
    fn handles_share_the_record() {
        let store = DeviceStateStore::new();
        let other = store.clone();

        other.write(DeviceStateUpdate::power(PowerState::On, StateSource::LocalManual));

        assert_eq!(store.read().power, PowerState::On);
    }

    #[test]
    fn concurrent_writes_keep_fields_consistent() {
        let store = DeviceStateStore::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        if i % 2 == 0 {
                            store.write(DeviceStateUpdate::power(PowerState::Off, StateSource::LocalControl));
                        } else {
                            store.write(DeviceStateUpdate {
                                power: None,
                                temperature: Some(25.0),
                                mode: None,
                                source: StateSource::LocalManual,
                            });
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let state = store.read();
        assert_eq!(state.power, PowerState::Off);
        assert_eq!(state.temperature, Some(25.0));
    }
}
