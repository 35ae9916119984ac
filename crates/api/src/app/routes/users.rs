use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use invoicehub_auth::{RegisterUser, UpdateUser};
use invoicehub_core::Username;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

fn username(raw: &str) -> Result<Username, axum::response::Response> {
    raw.parse().map_err(|_| {
        errors::json_error(StatusCode::NOT_FOUND, "not_found", format!("User {raw} not found"))
    })
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    match services.login(&body.username, &body.password).await {
        Ok(outcome) => Json(dto::LoginResponse::from(outcome)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<RegisterUser>,
) -> axum::response::Response {
    match services.register(body).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
    Json(body): Json<UpdateUser>,
) -> axum::response::Response {
    let username = match self::username(&username) {
        Ok(username) => username,
        Err(resp) => return resp,
    };
    match services.update_user(&username, body).await {
        Ok(profile) => Json(profile).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(username): Path<String>,
) -> axum::response::Response {
    let username = match self::username(&username) {
        Ok(username) => username,
        Err(resp) => return resp,
    };
    match services.delete_user(&username).await {
        Ok(()) => format!("{username} was deleted.").into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
