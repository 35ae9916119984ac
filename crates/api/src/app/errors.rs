use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use invoicehub_core::DomainError;

use crate::app::services::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::Domain(e) => domain_error_to_response(e),
        e @ (ServiceError::InvoiceNotFound(_) | ServiceError::UserNotFound(_)) => {
            json_error(StatusCode::NOT_FOUND, "not_found", e.to_string())
        }
        e @ ServiceError::UsernameTaken(_) => json_error(StatusCode::BAD_REQUEST, "username_taken", e.to_string()),
        e @ ServiceError::DuplicateInvoice(_) => json_error(StatusCode::CONFLICT, "conflict", e.to_string()),
        e @ ServiceError::LoginFailed => {
            json_error(StatusCode::BAD_REQUEST, "authentication_failed", e.to_string())
        }
        ServiceError::Store(e) => {
            tracing::error!(error = %e, "store operation failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        e @ (ServiceError::Password(_) | ServiceError::Token(_) | ServiceError::Task(_)) => {
            tracing::error!(error = %e, "internal failure");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DomainError::Validation(_) => json_error(StatusCode::BAD_REQUEST, "validation_error", message),
        DomainError::Violations(errors) => json_error_with(
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            message,
            "errors",
            json!(errors),
        ),
        DomainError::MissingFields(fields) => json_error_with(
            StatusCode::BAD_REQUEST,
            "missing_fields",
            message,
            "fields",
            json!(fields),
        ),
        DomainError::InvalidStatus(_) => json_error(StatusCode::BAD_REQUEST, "invalid_status", message),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DomainError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        DomainError::Unauthorized => json_error(StatusCode::UNAUTHORIZED, "unauthorized", message),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// [`json_error`] with one extra detail key (`fields`, `errors`).
pub fn json_error_with(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    key: &'static str,
    detail: serde_json::Value,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            key: detail,
        })),
    )
        .into_response()
}
