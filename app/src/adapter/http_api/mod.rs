mod aircon;
mod geofence;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use derive_more::derive::{Display, Error};
use serde::Serialize;

use crate::climate::ClimateError;
use crate::command::{ActuatorTransport, CommandDispatcher, DispatchError};
use crate::device_state::DeviceStateStore;
use crate::geofence::{Coordinator, GeofenceError};

pub struct ApiState<T> {
    coordinator: Arc<Coordinator<T>>,
    dispatcher: CommandDispatcher<T>,
    store: DeviceStateStore,
}

impl<T: ActuatorTransport> ApiState<T> {
    pub fn new(coordinator: Arc<Coordinator<T>>, dispatcher: CommandDispatcher<T>, store: DeviceStateStore) -> Self {
        Self {
            coordinator,
            dispatcher,
            store,
        }
    }
}

pub fn new_routes<T: ActuatorTransport>(state: Arc<ApiState<T>>) -> Vec<actix_web::Scope> {
    let state = web::Data::from(state);

    vec![
        geofence::routes::<T>().app_data(state.clone()).app_data(json_config()),
        aircon::routes::<T>().app_data(state).app_data(json_config()),
    ]
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _| {
        ApiError::InvalidInput {
            reason: err.to_string(),
        }
        .into()
    })
}

type ApiResponse = Result<HttpResponse, ApiError>;

#[derive(Debug, Display, Error)]
enum ApiError {
    #[display("{source}")]
    Geofence { source: GeofenceError },

    #[display("{source}")]
    Dispatch { source: DispatchError },

    #[display("invalid input: {reason}")]
    InvalidInput { reason: String },
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
    attempted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vendor_message: Option<String>,
}

impl ApiError {
    fn kind(&self) -> &'static str {
        match self {
            ApiError::Geofence { source } => source.kind(),
            ApiError::Dispatch { source } => match source {
                DispatchError::Profile {
                    source: ClimateError::InvalidMonth { .. },
                } => "invalid_input",
                DispatchError::Profile { .. } | DispatchError::DeviceNotConfigured => "configuration_missing",
                DispatchError::Failed { .. } => "transport_failure",
            },
            ApiError::InvalidInput { .. } => "invalid_input",
        }
    }

    fn body(&self) -> ErrorBody {
        let mut body = ErrorBody {
            error: self.kind(),
            message: self.to_string(),
            attempted: false,
            distance: None,
            http_status: None,
            vendor_message: None,
        };

        match self {
            ApiError::Geofence { source } => {
                body.attempted = source.attempted();

                match source {
                    GeofenceError::DispatchFailed { distance, source } => {
                        body.distance = Some(distance.round() as i64);
                        body.http_status = source.http_status;
                        body.vendor_message = Some(source.vendor_message.clone());
                    }
                    GeofenceError::ComputationAnomaly { distance } if distance.is_finite() => {
                        body.distance = Some(distance.round() as i64);
                    }
                    _ => {}
                }
            }
            ApiError::Dispatch { source } => {
                body.attempted = source.attempted();

                if let DispatchError::Failed { source } = source {
                    body.http_status = source.http_status;
                    body.vendor_message = Some(source.vendor_message.clone());
                }
            }
            ApiError::InvalidInput { .. } => {}
        }

        body
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self.kind() {
            "invalid_input" => StatusCode::BAD_REQUEST,
            "transport_failure" => StatusCode::BAD_GATEWAY,
            "configuration_missing" => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("API request failed: {}", self);
        } else {
            tracing::warn!("API request rejected: {}", self);
        }

        HttpResponse::build(status).json(self.body())
    }
}

impl From<GeofenceError> for ApiError {
    fn from(source: GeofenceError) -> Self {
        ApiError::Geofence { source }
    }
}

impl From<DispatchError> for ApiError {
    fn from(source: DispatchError) -> Self {
        ApiError::Dispatch { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DispatchFailure;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        (error.status_code(), serde_json::to_value(error.body()).unwrap())
    }

    #[test]
    fn dispatch_failure_during_check() {
        let (status, body) = body_json(
            GeofenceError::DispatchFailed {
                distance: 111.4,
                source: DispatchFailure {
                    http_status: Some(500),
                    vendor_message: "internal error".to_string(),
                },
            }
            .into(),
        );

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_json_eq!(
            body,
            json!({
                "error": "transport_failure",
                "message": "dispatch failed at distance 111m: command rejected with HTTP 500: internal error",
                "attempted": true,
                "distance": 111,
                "http_status": 500,
                "vendor_message": "internal error"
            })
        );
    }

    #[test]
    fn configuration_missing_is_unavailable() {
        let (status, body) = body_json(
            GeofenceError::ConfigurationMissing {
                item: "geofence.home".to_string(),
            }
            .into(),
        );

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_json_eq!(
            body,
            json!({
                "error": "configuration_missing",
                "message": "configuration missing: geofence.home",
                "attempted": false
            })
        );
    }

    #[test]
    fn invalid_month_is_bad_request() {
        let (status, body) = body_json(
            DispatchError::Profile {
                source: ClimateError::InvalidMonth { month: 13 },
            }
            .into(),
        );

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
        assert_eq!(body["attempted"], false);
    }

    #[test]
    fn anomaly_is_internal_error() {
        let (status, body) = body_json(GeofenceError::ComputationAnomaly { distance: 20_015_087.0 }.into());

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["distance"], 20_015_087);
    }
}
