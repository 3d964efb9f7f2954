use std::sync::Arc;

use actix_web::web;

use super::{ApiState, new_routes};
use crate::climate::SeasonalTable;
use crate::command::fake::FakeTransport;
use crate::command::{CommandDispatcher, DispatcherConfig};
use crate::core::geo::Coordinate;
use crate::device_state::DeviceStateStore;
use crate::geofence::{Coordinator, CoordinatorConfig, OffTriggerPolicy};
use crate::t;
use crate::trigger::{TriggerConfig, TriggerEngine};

pub fn state(transport: Arc<FakeTransport>, home: Option<Coordinate>) -> Arc<ApiState<FakeTransport>> {
    let store = DeviceStateStore::new();
    let dispatcher = CommandDispatcher::new(
        transport,
        SeasonalTable::default(),
        store.clone(),
        DispatcherConfig {
            device_id: Some("02-AC".to_string()),
            request_timeout: t!(200 millis),
            max_attempts: 1,
            retry_delay: t!(10 millis),
            readback_after_command: false,
            readback_delay: t!(10 millis),
        },
    );
    let coordinator = Coordinator::new(
        CoordinatorConfig {
            home,
            threshold_meters: Some(100.0),
            off_trigger_policy: OffTriggerPolicy::AlwaysResend,
            debug: false,
        },
        TriggerEngine::new(TriggerConfig::default()),
        store.clone(),
        dispatcher.clone(),
    );

    Arc::new(ApiState::new(Arc::new(coordinator), dispatcher, store))
}

pub fn routes(api: Arc<ApiState<FakeTransport>>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        for scope in new_routes(api) {
            cfg.service(scope);
        }
    }
}

pub fn tokyo() -> Option<Coordinate> {
    Coordinate::new(35.681236, 139.767125).ok()
}
