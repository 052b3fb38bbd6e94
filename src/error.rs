use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::calendar::CalendarError;
use crate::extractor::ExtractError;

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    BadRequest(String),
    NotFound(String),
    BadGateway(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadGateway(msg) => (StatusCode::BAD_GATEWAY, msg).into_response(),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response(),
        }
    }
}

impl From<ExtractError> for ApiError {
    fn from(value: ExtractError) -> Self {
        match value {
            ExtractError::Http(err) => {
                error!("HTTP error: {err}");
                ApiError::BadGateway("Failed to reach the model endpoint".into())
            }
            ExtractError::EmptyReply => {
                ApiError::BadGateway("Model returned an empty reply".into())
            }
            ExtractError::MalformedReply { reason, raw } => {
                error!(%reason, %raw, "model reply was not valid JSON");
                ApiError::BadGateway("Model reply was not a valid JSON array of deadlines".into())
            }
        }
    }
}

impl From<CalendarError> for ApiError {
    fn from(value: CalendarError) -> Self {
        match value {
            CalendarError::Io(err) => {
                error!("calendar write failed: {err}");
                ApiError::Internal("Failed to write calendar file".into())
            }
        }
    }
}
