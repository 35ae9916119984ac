use axum::http::StatusCode;

pub async fn root() -> &'static str {
    "API is running..."
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
