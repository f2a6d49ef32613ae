/// API Error types
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use contactflow_core::IntakeError;
use contactflow_core::constants::{
    MSG_INTERNAL_ERROR, MSG_METHOD_NOT_ALLOWED, MSG_MISSING_FIELDS, MSG_SERVER_MISCONFIGURED,
};
use serde_json::json;

/// API Error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("All fields are required")]
    MissingFields,

    #[error("Server configuration error: missing {}", .0.join(", "))]
    Misconfigured(Vec<String>),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::MissingFields => StatusCode::BAD_REQUEST,
            ApiError::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            ApiError::MethodNotAllowed => json!({ "error": MSG_METHOD_NOT_ALLOWED }),
            ApiError::MissingFields => json!({ "error": MSG_MISSING_FIELDS }),
            ApiError::Misconfigured(missing) => json!({
                "error": MSG_SERVER_MISCONFIGURED,
                "missing": missing,
            }),
            ApiError::Internal(details) => json!({
                "error": MSG_INTERNAL_ERROR,
                "details": details,
            }),
        };

        (status, Json(body)).into_response()
    }
}

/// Convert contactflow-core errors to API errors
impl From<IntakeError> for ApiError {
    fn from(err: IntakeError) -> Self {
        match err {
            IntakeError::MethodNotAllowed => ApiError::MethodNotAllowed,
            IntakeError::MissingFields => ApiError::MissingFields,
            IntakeError::ServerMisconfigured(missing) => ApiError::Misconfigured(missing),
            IntakeError::Persistence(details) => ApiError::Internal(details),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
