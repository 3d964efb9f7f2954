use std::sync::Arc;

use settings::Settings;

use crate::adapter::http_api::ApiState;
use crate::command::{CommandDispatcher, SwitchBotClient};
use crate::device_state::DeviceStateStore;
use crate::geofence::Coordinator;
use crate::trigger::TriggerEngine;

mod adapter;
mod climate;
mod command;
mod core;
mod device_state;
mod geofence;
mod settings;
mod trigger;

#[tokio::main(flavor = "multi_thread")]
pub async fn main() {
    let settings = Settings::new().expect("Error reading configuration");

    settings.monitoring.init().expect("Error initializing monitoring");

    for item in settings.missing_items() {
        tracing::warn!("Configuration item {} is missing, position checks will fail until it is set", item);
    }

    let profiles = settings
        .climate
        .seasonal_table()
        .expect("Error loading climate profiles");
    let coordinator_config = settings
        .geofence
        .coordinator_config()
        .expect("Error reading geofence configuration");

    let transport = SwitchBotClient::new(
        &settings.switchbot.url,
        &settings.switchbot.token,
        &settings.switchbot.secret,
        settings.switchbot.request_timeout,
    )
    .expect("Error creating SwitchBot client");

    let trigger_config = settings
        .geofence
        .trigger_config()
        .expect("Error reading geofence configuration");

    let store = DeviceStateStore::new();
    let dispatcher = CommandDispatcher::new(
        Arc::new(transport),
        profiles,
        store.clone(),
        settings.switchbot.dispatcher_config(),
    );
    let coordinator = Coordinator::new(
        coordinator_config,
        TriggerEngine::new(trigger_config),
        store.clone(),
        dispatcher.clone(),
    );

    tracing::info!(
        "Geofence coordinator ready (policy {}, cooldown {}, hysteresis {}m)",
        settings.geofence.off_trigger_policy,
        settings.geofence.cooldown.to_iso_string(),
        settings.geofence.hysteresis_meters
    );

    let api = Arc::new(ApiState::new(Arc::new(coordinator), dispatcher, store));

    settings
        .http_server
        .run_server(move || adapter::http_api::new_routes(api.clone()))
        .await
        .expect("HTTP server execution failed");
}
