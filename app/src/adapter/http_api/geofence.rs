use actix_web::{HttpResponse, web};

use super::{ApiError, ApiResponse, ApiState};
use crate::command::ActuatorTransport;
use crate::geofence::{GeofenceError, PositionSample};

pub fn routes<T: ActuatorTransport>() -> actix_web::Scope {
    web::scope("/api/geofence")
        .route("/check", web::post().to(check_position::<T>))
        .route("/home", web::get().to(get_home::<T>))
}

async fn check_position<T: ActuatorTransport>(
    state: web::Data<ApiState<T>>,
    web::Json(sample): web::Json<PositionSample>,
) -> ApiResponse {
    let result = state.coordinator.check_position(sample).await.map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(result))
}

async fn get_home<T: ActuatorTransport>(state: web::Data<ApiState<T>>) -> ApiResponse {
    let home = state
        .coordinator
        .home()
        .ok_or_else(|| GeofenceError::ConfigurationMissing {
            item: "geofence.home".to_string(),
        })?;

    Ok(HttpResponse::Ok().json(home))
}
