use actix_web::{HttpResponse, web};
use serde::Deserialize;

use super::{ApiError, ApiResponse, ApiState};
use crate::climate::{ClimateMode, Intent, MAX_TEMPERATURE, MIN_TEMPERATURE};
use crate::command::{ActuatorTransport, CommandOrigin};
use crate::device_state::{DeviceStateUpdate, PowerState, StateSource};

pub fn routes<T: ActuatorTransport>() -> actix_web::Scope {
    web::scope("/api/aircon")
        .route("/control", web::post().to(control::<T>))
        .route("/state", web::get().to(get_state::<T>))
        .route("/state", web::put().to(put_state::<T>))
}

#[derive(Debug, Deserialize)]
struct ControlRequest {
    intent: Intent,
    #[serde(default)]
    month: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct StateReport {
    #[serde(default)]
    power: Option<PowerState>,
    #[serde(default)]
    temperature: Option<f64>,
    #[serde(default)]
    mode: Option<ClimateMode>,
}

async fn control<T: ActuatorTransport>(
    state: web::Data<ApiState<T>>,
    web::Json(request): web::Json<ControlRequest>,
) -> ApiResponse {
    tracing::info!("Manual control request {:?}", request);

    let result = state
        .dispatcher
        .send(request.intent, request.month, CommandOrigin::Manual)
        .await
        .map_err(ApiError::from)?;

    Ok(HttpResponse::Ok().json(result))
}

async fn get_state<T: ActuatorTransport>(state: web::Data<ApiState<T>>) -> HttpResponse {
    HttpResponse::Ok().json(state.store.read())
}

async fn put_state<T: ActuatorTransport>(
    state: web::Data<ApiState<T>>,
    web::Json(report): web::Json<StateReport>,
) -> ApiResponse {
    if let Some(temperature) = report.temperature {
        let range = f64::from(MIN_TEMPERATURE)..=f64::from(MAX_TEMPERATURE);
        if !range.contains(&temperature) {
            return Err(ApiError::InvalidInput {
                reason: format!("temperature {} is not within [{}, {}]", temperature, MIN_TEMPERATURE, MAX_TEMPERATURE),
            });
        }
    }

    let updated = state.store.write(DeviceStateUpdate {
        power: report.power,
        temperature: report.temperature,
        mode: report.mode,
        source: StateSource::LocalManual,
    });

    Ok(HttpResponse::Ok().json(updated))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, http::StatusCode, test};
    use serde_json::json;

    use super::super::testing::{routes, state, tokyo};
    use crate::command::fake::{FakeTransport, Scripted};

    #[actix_web::test]
    async fn manual_power_on_in_winter() {
        let transport = Arc::new(FakeTransport::new());
        let api = state(transport.clone(), tokyo());
        let app = test::init_service(App::new().configure(routes(api))).await;

        let req = test::TestRequest::post()
            .uri("/api/aircon/control")
            .set_json(json!({"intent": "power_on", "month": 1}))
            .to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], true);
        assert_eq!(body["command"]["encoded_parameter"], "22,5,1,on");
        assert_eq!(body["profile"]["season"], "winter");
        assert_eq!(body["state"]["power"], "on");
        assert_eq!(body["state"]["source"], "local_manual");
        assert_eq!(transport.sent().len(), 1);
    }

    #[actix_web::test]
    async fn manual_control_rejects_invalid_month() {
        let transport = Arc::new(FakeTransport::new());
        let api = state(transport.clone(), tokyo());
        let app = test::init_service(App::new().configure(routes(api))).await;

        let req = test::TestRequest::post()
            .uri("/api/aircon/control")
            .set_json(json!({"intent": "power_off", "month": 13}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(transport.sent().is_empty());
    }

    #[actix_web::test]
    async fn manual_control_network_failure() {
        let transport = Arc::new(FakeTransport::new());
        transport.push_command(Scripted::NetworkError("connection reset"));
        let api = state(transport, tokyo());
        let app = test::init_service(App::new().configure(routes(api))).await;

        let req = test::TestRequest::post()
            .uri("/api/aircon/control")
            .set_json(json!({"intent": "power_off"}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "transport_failure");
        assert_eq!(body["attempted"], true);
        assert_eq!(body["vendor_message"], "connection reset");
    }

    #[actix_web::test]
    async fn state_report_merges_fields() {
        let api = state(Arc::new(FakeTransport::new()), tokyo());
        let app = test::init_service(App::new().configure(routes(api))).await;

        let req = test::TestRequest::put()
            .uri("/api/aircon/state")
            .set_json(json!({"power": "on", "temperature": 25.5}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::put()
            .uri("/api/aircon/state")
            .set_json(json!({"mode": "cool"}))
            .to_request();
        test::call_service(&app, req).await;

        let req = test::TestRequest::get().uri("/api/aircon/state").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["power"], "on");
        assert_eq!(body["temperature"], 25.5);
        assert_eq!(body["mode"], "cool");
        assert_eq!(body["source"], "local_manual");
    }

    #[actix_web::test]
    async fn state_report_rejects_out_of_range_temperature() {
        let api = state(Arc::new(FakeTransport::new()), tokyo());
        let app = test::init_service(App::new().configure(routes(api))).await;

        let req = test::TestRequest::put()
            .uri("/api/aircon/state")
            .set_json(json!({"temperature": 45}))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
