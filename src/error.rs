use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use espn_fantasy_api::ApiError;
use log::warn;
use serde_json::json;

/// Errors a handler answers with. Rendered as `{"detail": "..."}`.
#[derive(Debug)]
pub enum HttpError {
    Forbidden(String),
    BadRequest(String),
    NotFound(String),
}

impl HttpError {
    pub fn not_found(what: &str) -> Self {
        HttpError::NotFound(format!("{what} not found"))
    }
}

// Upstream failures are not told apart: every one is a 400.
impl From<ApiError> for HttpError {
    fn from(e: ApiError) -> Self {
        warn!("League request failed: {e}");
        HttpError::BadRequest(e.to_string())
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            HttpError::Forbidden(detail) => (StatusCode::FORBIDDEN, detail),
            HttpError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            HttpError::NotFound(detail) => (StatusCode::NOT_FOUND, detail),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}
