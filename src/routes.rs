use actix_web::error::InternalError;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use log::{error, info};
use serde::Serialize;

use crate::error::{AppError, ErrorKind, OkBody, ValidationError};

pub mod admin;
pub mod attendance;
pub mod history;
pub mod routes;
pub mod staff;
pub mod tasks;

/// Header carrying the id of the signed-in user. Recorded as task owner only.
pub const USER_ID_HEADER: &str = "x-user-id";

pub fn current_user(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Turns a service result into the tagged JSON body, logging failures.
pub fn reply<T: Serialize>(action: &str, result: Result<T, AppError>) -> HttpResponse {
    match result {
        Ok(value) => HttpResponse::Ok().json(OkBody::new(value)),
        Err(e) => {
            match e.kind() {
                ErrorKind::Backend => error!("Failed to {}: {}", action, e),
                ErrorKind::Validation | ErrorKind::NotFound => {
                    info!("Rejected request to {}: {}", action, e)
                }
            }
            e.error_response()
        }
    }
}

/// Bodies that fail to deserialize get the tagged validation error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        info!("Rejected malformed request body: {}", err);
        let response = AppError::from(ValidationError::MalformedRequest(err.to_string()))
            .error_response();
        InternalError::from_response(err, response).into()
    })
}

/// Registers every API scope and the JSON body settings.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    routes::tasks_configure(cfg);
    routes::staff_configure(cfg);
    routes::attendance_configure(cfg);
    routes::history_configure(cfg);
    routes::admin_configure(cfg);
}
