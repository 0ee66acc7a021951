use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use verblix_core::error::CoreError;
use verblix_core::models::auth::MessageBody;
use verblix_core::models::request::ErrorBody;

pub const UNAUTHORIZED: &str = "Unauthorized: Please log in.";

/// Relay errors, answered as `{"type":"error","text":...}`.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, text) = match self {
            ApiError::BadRequest(text) => (StatusCode::BAD_REQUEST, text),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED.to_string()),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(text))).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::MissingMessage | CoreError::InvalidHistory => {
                ApiError::BadRequest(e.to_string())
            }
            CoreError::Serialization(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(format!("Bad Request: {}", e.body_text()))
    }
}

/// Session endpoint errors, answered as `{"message":...}`.
#[derive(Debug)]
pub enum AuthApiError {
    BadRequest(String),
    Conflict(String),
    InvalidCredentials,
    Internal(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AuthApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AuthApiError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string())
            }
            AuthApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        (status, Json(MessageBody { message })).into_response()
    }
}

impl From<JsonRejection> for AuthApiError {
    fn from(e: JsonRejection) -> Self {
        AuthApiError::BadRequest(e.body_text())
    }
}
